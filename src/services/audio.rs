// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Looping SOS alert sound.
//!
//! State machine: `Idle -> Playing -> Idle`. The playback handle is released
//! on every transition back to `Idle`, and `teardown` must be called when the
//! owning view goes away so no looping playback outlives it.

use crate::config::Config;
use crate::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;

/// Opaque handle to a loaded sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioHandle(pub u64);

/// Device audio subsystem, implemented by the host platform.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    async fn load(&self, asset: &str) -> anyhow::Result<AudioHandle>;

    async fn play(&self, handle: AudioHandle, looping: bool) -> anyhow::Result<()>;

    async fn stop(&self, handle: AudioHandle) -> anyhow::Result<()>;

    async fn unload(&self, handle: AudioHandle) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioAlertState {
    Idle,
    Playing,
}

pub struct AudioAlertController {
    engine: Arc<dyn AudioEngine>,
    asset: String,
    handle: Option<AudioHandle>,
}

impl AudioAlertController {
    pub fn new(engine: Arc<dyn AudioEngine>, asset: impl Into<String>) -> Self {
        Self {
            engine,
            asset: asset.into(),
            handle: None,
        }
    }

    /// Controller for the configured alert sound.
    pub fn from_config(engine: Arc<dyn AudioEngine>, config: &Config) -> Self {
        Self::new(engine, config.alert_sound_asset.clone())
    }

    pub fn state(&self) -> AudioAlertState {
        if self.handle.is_some() {
            AudioAlertState::Playing
        } else {
            AudioAlertState::Idle
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state() == AudioAlertState::Playing
    }

    /// Load the alert asset and start looped playback. No-op while playing.
    pub async fn start(&mut self) -> Result<(), AppError> {
        if self.handle.is_some() {
            tracing::debug!("Alert audio already playing");
            return Ok(());
        }

        let handle = self.engine.load(&self.asset).await.map_err(|e| {
            tracing::error!(error = %e, asset = %self.asset, "Error loading alert sound");
            AppError::Audio(e.to_string())
        })?;

        if let Err(e) = self.engine.play(handle, true).await {
            tracing::error!(error = %e, "Error playing alert sound");
            if let Err(unload_err) = self.engine.unload(handle).await {
                tracing::warn!(error = %unload_err, "Failed to unload alert sound");
            }
            return Err(AppError::Audio(e.to_string()));
        }

        self.handle = Some(handle);
        tracing::info!("Alert audio started");
        Ok(())
    }

    /// Stop playback and release the handle. No-op when idle.
    pub async fn stop(&mut self) -> Result<(), AppError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let stopped = self.engine.stop(handle).await;
        // Release even if stop failed; the handle is not reused.
        let unloaded = self.engine.unload(handle).await;
        tracing::info!("Alert audio stopped");

        stopped
            .and(unloaded)
            .map_err(|e| AppError::Audio(e.to_string()))
    }

    /// Unconditional stop for view teardown. Errors are logged, not returned.
    pub async fn teardown(&mut self) {
        if let Err(e) = self.stop().await {
            tracing::warn!(error = %e, "Error stopping alert audio during teardown");
        }
    }
}
