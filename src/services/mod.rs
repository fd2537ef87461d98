// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod audio;
pub mod contacts;
pub mod dispatch;
pub mod location;
pub mod picker;
pub mod profile;
pub mod sms;
pub mod sos;

pub use audio::{AudioAlertController, AudioAlertState, AudioEngine};
pub use contacts::ContactStore;
pub use dispatch::{AlertDispatcher, DispatchResult, DispatchStatus};
pub use location::{DeviceLocation, LocationProvider, PermissionStatus};
pub use picker::{ContactPicker, DeviceContact, DeviceContacts};
pub use profile::ProfileService;
pub use sms::{SmsCapability, SmsGateway, SmsStatus, UnavailableSms};
pub use sos::SosSession;
