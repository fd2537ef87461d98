// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses and user-facing alerts.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Permission to access {0} was denied")]
    PermissionDenied(&'static str),

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Current location is not available")]
    LocationUnavailable,

    #[error("No emergency contacts configured")]
    NoContactsConfigured,

    #[error("No contacts selected")]
    NoContactsSelected,

    #[error("SMS capability error: {0}")]
    SmsCapability(String),

    #[error("SMS was not sent (status: {0})")]
    SmsNotSent(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Short modal message shown to the user when an action fails or completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct UserAlert {
    pub title: String,
    pub message: String,
}

impl UserAlert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl AppError {
    /// The alert a client shows for this error.
    pub fn user_alert(&self) -> UserAlert {
        match self {
            AppError::Unauthorized | AppError::InvalidToken => {
                UserAlert::new("Signed Out", "Please sign in to continue.")
            }
            AppError::NotFound(_) => UserAlert::new("Not Found", "Nothing was found."),
            AppError::BadRequest(msg) => UserAlert::new("Missing Details", msg.clone()),
            AppError::PermissionDenied(what) => UserAlert::new(
                "Permission Denied",
                format!("Permission to access {what} was denied"),
            ),
            AppError::StoreUnavailable(_) => UserAlert::new(
                "Error",
                "There was an issue reaching your saved data. Please try again.",
            ),
            AppError::LocationUnavailable => {
                UserAlert::new("Location Error", "Unable to fetch location.")
            }
            AppError::NoContactsConfigured => {
                UserAlert::new("No Emergency Contacts", "No emergency contacts found.")
            }
            AppError::NoContactsSelected => UserAlert::new(
                "No Contacts Selected",
                "Please select at least one contact.",
            ),
            AppError::SmsCapability(_) => {
                UserAlert::new("Error", "There was an issue sending the SOS alert.")
            }
            AppError::SmsNotSent(_) => UserAlert::new(
                "SOS Not Sent",
                "Your SOS alert was not sent. Please try again.",
            ),
            AppError::Audio(_) => UserAlert::new("Error", "Unable to play the SOS audio."),
            AppError::Internal(_) => UserAlert::new("Error", "Something went wrong."),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    alert: UserAlert,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::PermissionDenied(_) => (StatusCode::FORBIDDEN, "permission_denied", None),
            AppError::StoreUnavailable(msg) => {
                tracing::error!(error = %msg, "Document store error");
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", None)
            }
            AppError::LocationUnavailable => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "location_unavailable",
                None,
            ),
            AppError::NoContactsConfigured => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "no_contacts_configured",
                None,
            ),
            AppError::NoContactsSelected => {
                (StatusCode::BAD_REQUEST, "no_contacts_selected", None)
            }
            AppError::SmsCapability(msg) => {
                tracing::error!(error = %msg, "SMS capability error");
                (StatusCode::BAD_GATEWAY, "sms_error", Some(msg.clone()))
            }
            AppError::SmsNotSent(status) => {
                (StatusCode::BAD_GATEWAY, "sms_not_sent", Some(status.clone()))
            }
            AppError::Audio(msg) => {
                tracing::error!(error = %msg, "Audio error");
                (StatusCode::INTERNAL_SERVER_ERROR, "audio_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            alert: self.user_alert(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and services
pub type Result<T> = std::result::Result<T, AppError>;
