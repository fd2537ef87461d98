// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! SafePath: emergency contacts and one-tap SOS alerts
//!
//! This crate provides the backend API for storing a user's emergency
//! contacts and profile, and the state objects behind the SOS flow:
//! location acquisition, SMS dispatch and the looping alert sound.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod time_utils;

use config::Config;
use db::DocumentStore;
use services::{sms::SmsCapability, AlertDispatcher};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn DocumentStore>,
    pub dispatcher: AlertDispatcher,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn DocumentStore>, sms: Arc<dyn SmsCapability>) -> Self {
        Self {
            config,
            db,
            dispatcher: AlertDispatcher::new(sms),
        }
    }
}
