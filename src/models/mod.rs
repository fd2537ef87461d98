// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod contact;
pub mod location;
pub mod user;

pub use contact::{ContactList, EmergencyContact};
pub use location::Coordinate;
pub use user::{ProfileForm, User, UserProfile};
