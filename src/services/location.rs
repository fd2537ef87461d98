// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-shot device location behind a foreground permission prompt.

use crate::error::AppError;
use crate::models::Coordinate;
use async_trait::async_trait;
use std::sync::Arc;

/// Result of a device permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Device location subsystem, implemented by the host platform.
#[async_trait]
pub trait DeviceLocation: Send + Sync {
    async fn request_foreground_permission(&self) -> PermissionStatus;

    async fn current_position(&self) -> anyhow::Result<Coordinate>;
}

/// Requests permission and reads a single coordinate. Nothing is cached here;
/// the caller keeps the snapshot.
#[derive(Clone)]
pub struct LocationProvider {
    device: Arc<dyn DeviceLocation>,
}

impl LocationProvider {
    pub fn new(device: Arc<dyn DeviceLocation>) -> Self {
        Self { device }
    }

    pub async fn request_current_coordinate(&self) -> Result<Coordinate, AppError> {
        let status = self.device.request_foreground_permission().await;
        if status != PermissionStatus::Granted {
            tracing::warn!(status = ?status, "Location permission not granted");
            return Err(AppError::PermissionDenied("location"));
        }

        let coordinate = self.device.current_position().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read current position");
            AppError::LocationUnavailable
        })?;

        tracing::debug!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "Current coordinate acquired"
        );
        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLocation;

    #[tokio::test]
    async fn test_granted_returns_coordinate() {
        let device = Arc::new(FakeLocation::granted(Coordinate::new(12.34, 56.78)));
        let provider = LocationProvider::new(device.clone());

        let coord = provider.request_current_coordinate().await.unwrap();
        assert_eq!(coord, Coordinate::new(12.34, 56.78));
        assert_eq!(device.position_reads(), 1);
    }

    #[tokio::test]
    async fn test_denied_never_reads_position() {
        let device = Arc::new(FakeLocation::with_permission(PermissionStatus::Denied));
        let provider = LocationProvider::new(device.clone());

        let err = provider.request_current_coordinate().await.unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied("location")));
        assert_eq!(device.position_reads(), 0);
    }

    #[tokio::test]
    async fn test_undetermined_is_treated_as_denied() {
        let device = Arc::new(FakeLocation::with_permission(
            PermissionStatus::Undetermined,
        ));
        let provider = LocationProvider::new(device);

        assert!(matches!(
            provider.request_current_coordinate().await,
            Err(AppError::PermissionDenied(_))
        ));
    }
}
