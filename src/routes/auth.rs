// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes. Sign-in happens with the identity provider on the client.

use crate::middleware::auth::SESSION_COOKIE;
use crate::AppState;
use axum::{http::StatusCode, routing::get, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/logout", get(logout))
}

/// Clear the session cookie. Bearer-token clients sign out with the provider.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}
