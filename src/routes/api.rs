// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result, UserAlert};
use crate::models::{Coordinate, EmergencyContact, ProfileForm, User, UserProfile};
use crate::services::dispatch::DispatchStatus;
use crate::services::{ContactStore, ProfileService};
use crate::session::Session;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/contacts", get(list_contacts).post(save_contacts))
        .route("/api/contacts/{id}", delete(delete_contact))
        .route("/api/profile", get(get_profile).put(update_profile))
        .route("/api/sos", post(send_sos))
}

// ─── Identity ────────────────────────────────────────────────

/// Get the signed-in user's identity.
async fn get_me(Extension(session): Extension<Session>) -> Result<Json<User>> {
    Ok(Json(session.require_user()?.clone()))
}

// ─── Emergency Contacts ──────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct ContactsResponse {
    pub contacts: Vec<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<UserAlert>,
}

#[derive(Deserialize)]
struct SaveContactsRequest {
    contacts: Vec<EmergencyContact>,
}

async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<ContactsResponse>> {
    let mut store = ContactStore::new(state.db.clone(), &session)?;
    let contacts = store.fetch().await?;

    Ok(Json(ContactsResponse {
        contacts,
        alert: None,
    }))
}

/// Append contacts to the saved list.
async fn save_contacts(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<SaveContactsRequest>,
) -> Result<Json<ContactsResponse>> {
    let mut store = ContactStore::new(state.db.clone(), &session)?;
    store.fetch().await?;
    let contacts = store.save(body.contacts).await?;

    Ok(Json(ContactsResponse {
        contacts,
        alert: Some(UserAlert::new(
            "Contacts Saved",
            "Your emergency contacts have been updated.",
        )),
    }))
}

async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(contact_id): Path<String>,
) -> Result<Json<ContactsResponse>> {
    let mut store = ContactStore::new(state.db.clone(), &session)?;
    store.fetch().await?;
    if !store.saved().iter().any(|c| c.id == contact_id) {
        return Err(AppError::NotFound(format!("Contact {}", contact_id)));
    }
    let contacts = store.remove(&contact_id).await?;

    Ok(Json(ContactsResponse {
        contacts,
        alert: Some(UserAlert::new(
            "Contact Deleted",
            "The contact has been removed.",
        )),
    }))
}

// ─── Profile ─────────────────────────────────────────────────

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<ProfileForm>> {
    let service = ProfileService::new(
        state.db.clone(),
        &session,
        state.config.default_phone_prefix.clone(),
    )?;
    Ok(Json(service.load_form().await?))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<UserProfile>> {
    let service = ProfileService::new(
        state.db.clone(),
        &session,
        state.config.default_phone_prefix.clone(),
    )?;
    Ok(Json(service.update(form).await?))
}

// ─── SOS ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SosRequest {
    /// Last coordinate the client acquired; absent when location is unavailable
    #[serde(default)]
    location: Option<Coordinate>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct SosResponse {
    pub status: DispatchStatus,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub recipients: usize,
    pub message: String,
    pub alert: UserAlert,
}

/// Send the SOS message to every saved contact.
async fn send_sos(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<SosRequest>,
) -> Result<Json<SosResponse>> {
    let user_id = session.require_user()?.id.clone();
    let mut store = ContactStore::new(state.db.clone(), &session)?;
    let contacts = store.fetch().await?;

    tracing::info!(
        user_id = %user_id,
        contacts = contacts.len(),
        has_location = body.location.is_some(),
        "SOS requested"
    );

    let result = state
        .dispatcher
        .send_alert(body.location.as_ref(), &contacts)
        .await?;

    Ok(Json(SosResponse {
        status: result.status,
        recipients: result.recipients.len(),
        alert: result.user_alert(),
        message: result.message,
    }))
}
