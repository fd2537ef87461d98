// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SOS alert composition and SMS dispatch.

use crate::error::{AppError, UserAlert};
use crate::models::{Coordinate, EmergencyContact};
use crate::services::sms::{SmsCapability, SmsError, SmsStatus};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MESSAGE_PREFIX: &str = "I need help! My current location is: ";

/// Build the SOS message for a coordinate.
pub fn compose_message(coordinate: &Coordinate) -> String {
    format!("{}{}", MESSAGE_PREFIX, coordinate.maps_url())
}

/// How far the SMS capability confirmed the send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub enum DispatchStatus {
    Sent,
    /// Handed off, but the platform cannot report delivery
    Unconfirmed,
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct DispatchResult {
    pub status: DispatchStatus,
    pub recipients: Vec<String>,
    pub message: String,
}

impl DispatchResult {
    pub fn user_alert(&self) -> UserAlert {
        match self.status {
            DispatchStatus::Sent => {
                UserAlert::new("SOS Sent", "Your SOS alert has been sent successfully!")
            }
            DispatchStatus::Unconfirmed => UserAlert::new(
                "SOS Sent",
                "Your SOS alert was handed to your messaging app.",
            ),
        }
    }
}

/// Sends SOS alerts through an injected SMS capability.
#[derive(Clone)]
pub struct AlertDispatcher {
    sms: Arc<dyn SmsCapability>,
}

impl AlertDispatcher {
    pub fn new(sms: Arc<dyn SmsCapability>) -> Self {
        Self { sms }
    }

    /// Send one multi-recipient SOS message.
    ///
    /// Fails without touching the SMS capability when there is no coordinate
    /// or no contact. A `cancelled` (or unrecognised) status is an error; an
    /// `unknown` status counts as an unconfirmed success.
    pub async fn send_alert(
        &self,
        coordinate: Option<&Coordinate>,
        contacts: &[EmergencyContact],
    ) -> Result<DispatchResult, AppError> {
        let coordinate = coordinate.ok_or(AppError::LocationUnavailable)?;
        if contacts.is_empty() {
            return Err(AppError::NoContactsConfigured);
        }

        let message = compose_message(coordinate);
        let recipients: Vec<String> = contacts.iter().map(|c| c.phone_number.clone()).collect();

        if !self.sms.is_available().await {
            tracing::warn!("SMS capability unavailable");
            return Err(AppError::SmsCapability(SmsError::Unavailable.to_string()));
        }

        let status = self
            .sms
            .send(&recipients, &message)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, recipients = recipients.len(), "Error sending SMS");
                AppError::SmsCapability(e.to_string())
            })?;

        let status = match status {
            SmsStatus::Sent => DispatchStatus::Sent,
            SmsStatus::Unknown => DispatchStatus::Unconfirmed,
            other => {
                tracing::warn!(status = %other, "SOS message not sent");
                return Err(AppError::SmsNotSent(other.to_string()));
            }
        };

        tracing::info!(
            recipients = recipients.len(),
            status = ?status,
            "SOS alert dispatched"
        );

        Ok(DispatchResult {
            status,
            recipients,
            message,
        })
    }
}
