// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity-provider JWT authentication middleware.
//!
//! Each request carries the provider's session token, either as a bearer
//! token or in the `safepath_token` cookie. A verified token becomes a
//! [`Session`] request extension.

use crate::models::User;
use crate::session::Session;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "safepath_token";

const PEM_PREFIX: &[u8] = b"-----BEGIN";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (provider user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl From<Claims> for User {
    fn from(claims: Claims) -> Self {
        User {
            id: claims.sub,
            full_name: claims.name,
            email: claims.email,
            image_url: claims.picture,
        }
    }
}

/// Decoding key and algorithm for the configured identity key.
///
/// A PEM public key selects RS256; anything else is an HS256 shared secret.
fn verification_key(key: &[u8]) -> Option<(DecodingKey, Algorithm)> {
    if key.starts_with(PEM_PREFIX) {
        DecodingKey::from_rsa_pem(key)
            .ok()
            .map(|k| (k, Algorithm::RS256))
    } else {
        Some((DecodingKey::from_secret(key), Algorithm::HS256))
    }
}

/// Verify a token and return the identity it carries.
pub fn verify_token(token: &str, key: &[u8]) -> Option<User> {
    let (key, algorithm) = verification_key(key)?;
    let validation = Validation::new(algorithm);

    let token_data = decode::<Claims>(token, &key, &validation).ok()?;
    if token_data.claims.sub.is_empty() {
        return None;
    }
    Some(token_data.claims.into())
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) => token.to_string(),
            None => return Err(StatusCode::UNAUTHORIZED),
        }
    };

    let user = verify_token(&token, &state.config.identity_jwt_key).ok_or_else(|| {
        tracing::debug!("Rejected request with invalid session token");
        StatusCode::UNAUTHORIZED
    })?;

    request.extensions_mut().insert(Session::signed_in(user));

    Ok(next.run(request).await)
}

/// Create an HS256 session token for a user (local development and tests).
pub fn create_jwt(user: &User, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user.id.clone(),
        iat: now,
        exp: now + 24 * 60 * 60, // 1 day
        name: user.full_name.clone(),
        email: user.email.clone(),
        picture: user.image_url.clone(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
