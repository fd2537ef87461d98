// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SMS capability and the HTTP gateway client used by the server build.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse status reported by an SMS capability after a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmsStatus {
    Sent,
    /// The platform handed the message off but cannot confirm delivery.
    Unknown,
    Cancelled,
    Other(String),
}

impl SmsStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sent" => SmsStatus::Sent,
            "unknown" => SmsStatus::Unknown,
            "cancelled" | "canceled" => SmsStatus::Cancelled,
            _ => SmsStatus::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for SmsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmsStatus::Sent => f.write_str("sent"),
            SmsStatus::Unknown => f.write_str("unknown"),
            SmsStatus::Cancelled => f.write_str("cancelled"),
            SmsStatus::Other(raw) => f.write_str(raw),
        }
    }
}

/// Transport-level SMS failure (distinct from a returned non-sent status).
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("SMS is not available on this device")]
    Unavailable,

    #[error("SMS transport failed: {0}")]
    Transport(String),
}

/// Device (or gateway) ability to send one message to many recipients.
#[async_trait]
pub trait SmsCapability: Send + Sync {
    async fn is_available(&self) -> bool;

    async fn send(&self, recipients: &[String], message: &str) -> Result<SmsStatus, SmsError>;
}

/// SMS capability for deployments without a gateway.
pub struct UnavailableSms;

#[async_trait]
impl SmsCapability for UnavailableSms {
    async fn is_available(&self) -> bool {
        false
    }

    async fn send(&self, _recipients: &[String], _message: &str) -> Result<SmsStatus, SmsError> {
        Err(SmsError::Unavailable)
    }
}

#[derive(Serialize)]
struct GatewayRequest<'a> {
    recipients: &'a [String],
    message: &'a str,
}

#[derive(Deserialize)]
struct GatewayResponse {
    result: String,
}

/// HTTP SMS gateway client.
#[derive(Clone)]
pub struct SmsGateway {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl SmsGateway {
    pub fn new(url: String, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            token,
        }
    }
}

#[async_trait]
impl SmsCapability for SmsGateway {
    async fn is_available(&self) -> bool {
        true
    }

    async fn send(&self, recipients: &[String], message: &str) -> Result<SmsStatus, SmsError> {
        let mut request = self.http.post(&self.url).json(&GatewayRequest {
            recipients,
            message,
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SmsError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::Transport(format!("HTTP {}: {}", status, body)));
        }

        let body: GatewayResponse = response
            .json()
            .await
            .map_err(|e| SmsError::Transport(format!("Invalid gateway response: {}", e)))?;

        Ok(SmsStatus::parse(&body.result))
    }
}
