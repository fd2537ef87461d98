// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Point-in-time device coordinate.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAPS_URL_BASE: &str = "https://www.google.com/maps?q=";

/// A single latitude/longitude snapshot. No accuracy or staleness metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Maps link for this point. Values are written with their shortest
    /// round-trip representation, never rounded.
    pub fn maps_url(&self) -> String {
        format!("{}{},{}", MAPS_URL_BASE, self.latitude, self.longitude)
    }
}
