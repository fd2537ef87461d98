// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Test doubles for the injected device and service capabilities.
//!
//! Shared by unit tests and the integration tests under `tests/`.

use crate::models::{Coordinate, User};
use crate::services::audio::{AudioEngine, AudioHandle};
use crate::services::location::{DeviceLocation, PermissionStatus};
use crate::services::picker::{DeviceContact, DeviceContacts};
use crate::services::sms::{SmsCapability, SmsError, SmsStatus};
use crate::session::Session;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Identity with predictable fields derived from `id`.
pub fn test_user(id: &str) -> User {
    User {
        id: id.to_string(),
        full_name: Some("Test User".to_string()),
        email: Some(format!("{}@example.com", id)),
        image_url: Some(format!("https://img.example.com/{}.png", id)),
    }
}

pub fn signed_in(id: &str) -> Session {
    Session::signed_in(test_user(id))
}

pub fn device_contact(id: &str, name: &str, numbers: &[&str]) -> DeviceContact {
    DeviceContact {
        id: id.to_string(),
        name: name.to_string(),
        phone_numbers: numbers.iter().map(|n| n.to_string()).collect(),
    }
}

// ─── SMS ─────────────────────────────────────────────────────

enum SmsBehavior {
    Reply(SmsStatus),
    Fail(String),
}

/// Records every send and replies with a fixed status.
pub struct RecordingSms {
    available: bool,
    behavior: SmsBehavior,
    sends: Mutex<Vec<(Vec<String>, String)>>,
}

impl RecordingSms {
    pub fn new() -> Self {
        Self::with_status(SmsStatus::Sent)
    }

    pub fn with_status(status: SmsStatus) -> Self {
        Self {
            available: true,
            behavior: SmsBehavior::Reply(status),
            sends: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            behavior: SmsBehavior::Fail(reason.to_string()),
            ..Self::new()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// `(recipients, message)` for each send attempt, in order.
    pub fn sends(&self) -> Vec<(Vec<String>, String)> {
        lock(&self.sends).clone()
    }
}

impl Default for RecordingSms {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsCapability for RecordingSms {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn send(&self, recipients: &[String], message: &str) -> Result<SmsStatus, SmsError> {
        lock(&self.sends).push((recipients.to_vec(), message.to_string()));
        match &self.behavior {
            SmsBehavior::Reply(status) => Ok(status.clone()),
            SmsBehavior::Fail(reason) => Err(SmsError::Transport(reason.clone())),
        }
    }
}

// ─── Location ────────────────────────────────────────────────

pub struct FakeLocation {
    permission: PermissionStatus,
    position: Mutex<Coordinate>,
    reads: AtomicUsize,
}

impl FakeLocation {
    pub fn granted(position: Coordinate) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: Mutex::new(position),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn with_permission(permission: PermissionStatus) -> Self {
        Self {
            permission,
            ..Self::granted(Coordinate::new(0.0, 0.0))
        }
    }

    /// Simulate the device moving.
    pub fn move_to(&self, position: Coordinate) {
        *lock(&self.position) = position;
    }

    pub fn position_reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceLocation for FakeLocation {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn current_position(&self) -> anyhow::Result<Coordinate> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(*lock(&self.position))
    }
}

// ─── Audio ───────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeAudioEngine {
    fail_load: bool,
    fail_play: bool,
    next_handle: AtomicU64,
    loaded: Mutex<HashSet<AudioHandle>>,
    loads: AtomicUsize,
    stops: AtomicUsize,
    last_looped: AtomicBool,
}

impl FakeAudioEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }

    /// Loads succeed but every `play` fails.
    pub fn failing_play() -> Self {
        Self {
            fail_play: true,
            ..Self::default()
        }
    }

    /// Handles loaded and not yet unloaded.
    pub fn active_handles(&self) -> usize {
        lock(&self.loaded).len()
    }

    pub fn load_calls(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn last_play_looped(&self) -> bool {
        self.last_looped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioEngine for FakeAudioEngine {
    async fn load(&self, asset: &str) -> anyhow::Result<AudioHandle> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            anyhow::bail!("asset not found: {}", asset);
        }
        let handle = AudioHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        lock(&self.loaded).insert(handle);
        Ok(handle)
    }

    async fn play(&self, handle: AudioHandle, looping: bool) -> anyhow::Result<()> {
        if !lock(&self.loaded).contains(&handle) {
            anyhow::bail!("handle {:?} not loaded", handle);
        }
        if self.fail_play {
            anyhow::bail!("audio output unavailable");
        }
        self.last_looped.store(looping, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self, _handle: AudioHandle) -> anyhow::Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn unload(&self, handle: AudioHandle) -> anyhow::Result<()> {
        lock(&self.loaded).remove(&handle);
        Ok(())
    }
}

// ─── Device contacts ─────────────────────────────────────────

pub struct FakeDeviceContacts {
    permission: PermissionStatus,
    contacts: Vec<DeviceContact>,
}

impl FakeDeviceContacts {
    pub fn granted(contacts: Vec<DeviceContact>) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            contacts,
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            contacts: Vec::new(),
        }
    }
}

#[async_trait]
impl DeviceContacts for FakeDeviceContacts {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn read_all(&self) -> anyhow::Result<Vec<DeviceContact>> {
        Ok(self.contacts.clone())
    }
}
