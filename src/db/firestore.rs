// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Emergency contacts (one list document per user)
//! - User profiles (merged on every save)

use crate::db::{collections, DocumentStore};
use crate::error::AppError;
use crate::models::{ContactList, UserProfile};
use async_trait::async_trait;
use firestore::FirestoreWritePrecondition;

/// Profile fields written on every merge.
const PROFILE_FIELDS: [&str; 6] = [
    "fullName",
    "email",
    "age",
    "phoneNumber",
    "profileImageUrl",
    "isProfileComplete",
];

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator rejects real credentials, so connect unauthenticated.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client.as_ref().ok_or_else(|| {
            AppError::StoreUnavailable("Database not connected (offline mode)".to_string())
        })
    }
}

#[async_trait]
impl DocumentStore for FirestoreDb {
    // ─── Emergency Contact Operations ────────────────────────────

    async fn get_contacts(&self, user_id: &str) -> Result<Option<ContactList>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EMERGENCY_CONTACTS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))
    }

    async fn set_contacts(&self, user_id: &str, list: &ContactList) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::EMERGENCY_CONTACTS)
            .document_id(user_id)
            .object(list)
            .execute()
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn update_contacts(&self, user_id: &str, list: &ContactList) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(["contacts"])
            .in_col(collections::EMERGENCY_CONTACTS)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(user_id)
            .object(list)
            .execute()
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))
    }

    async fn merge_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), AppError> {
        let mut fields: Vec<&str> = PROFILE_FIELDS.to_vec();
        if profile.created_at.is_some() {
            fields.push("createdAt");
        }
        if profile.updated_at.is_some() {
            fields.push("updatedAt");
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(fields)
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }
}
