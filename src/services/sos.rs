// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! State behind the SOS view.
//!
//! The coordinate and contact list are read once in `on_mount` and reused for
//! every send. A send after the user has moved uses the mount-time location.

use crate::error::{AppError, UserAlert};
use crate::models::{Coordinate, EmergencyContact};
use crate::services::audio::AudioAlertController;
use crate::services::contacts::ContactStore;
use crate::services::dispatch::AlertDispatcher;
use crate::services::location::LocationProvider;

pub struct SosSession {
    location: LocationProvider,
    contacts: Option<ContactStore>,
    dispatcher: AlertDispatcher,
    audio: AudioAlertController,
    coordinate: Option<Coordinate>,
    emergency_contacts: Vec<EmergencyContact>,
}

impl SosSession {
    /// `contacts` is `None` while no user is signed in; the contact fetch is
    /// then skipped.
    pub fn new(
        location: LocationProvider,
        contacts: Option<ContactStore>,
        dispatcher: AlertDispatcher,
        audio: AudioAlertController,
    ) -> Self {
        Self {
            location,
            contacts,
            dispatcher,
            audio,
            coordinate: None,
            emergency_contacts: Vec::new(),
        }
    }

    /// Acquire the coordinate and load contacts. Returns alerts to display.
    pub async fn on_mount(&mut self) -> Vec<UserAlert> {
        let mut alerts = Vec::new();

        match self.location.request_current_coordinate().await {
            Ok(coordinate) => self.coordinate = Some(coordinate),
            Err(e) => alerts.push(e.user_alert()),
        }

        if let Some(store) = self.contacts.as_mut() {
            match store.fetch().await {
                Ok(contacts) => self.emergency_contacts = contacts,
                Err(e) => alerts.push(e.user_alert()),
            }
        }

        alerts
    }

    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coordinate.as_ref()
    }

    pub fn emergency_contacts(&self) -> &[EmergencyContact] {
        &self.emergency_contacts
    }

    pub fn is_audio_playing(&self) -> bool {
        self.audio.is_playing()
    }

    /// Dispatch the alert and return the message to show.
    pub async fn send_sos(&self) -> UserAlert {
        self.try_send_sos()
            .await
            .unwrap_or_else(|e| e.user_alert())
    }

    /// As [`send_sos`](Self::send_sos), keeping the typed error.
    pub async fn try_send_sos(&self) -> Result<UserAlert, AppError> {
        let result = self
            .dispatcher
            .send_alert(self.coordinate.as_ref(), &self.emergency_contacts)
            .await?;
        Ok(result.user_alert())
    }

    /// Errors are logged and reported as an alert; state stays idle.
    pub async fn play_audio(&mut self) -> Option<UserAlert> {
        self.audio.start().await.err().map(|e| e.user_alert())
    }

    pub async fn stop_audio(&mut self) -> Option<UserAlert> {
        self.audio.stop().await.err().map(|e| e.user_alert())
    }

    /// Must run when the view goes away.
    pub async fn teardown(&mut self) {
        self.audio.teardown().await;
    }
}
