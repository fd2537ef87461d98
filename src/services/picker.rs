// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Picking emergency contacts from the device address book.

use crate::error::{AppError, UserAlert};
use crate::models::EmergencyContact;
use crate::services::contacts::ContactStore;
use crate::services::location::PermissionStatus;
use async_trait::async_trait;
use std::sync::Arc;

/// Stored in place of a phone number when the device contact has none.
pub const NO_NUMBER: &str = "No Number";

/// Address book entry with the fields we read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceContact {
    pub id: String,
    pub name: String,
    pub phone_numbers: Vec<String>,
}

impl DeviceContact {
    fn to_emergency_contact(&self) -> EmergencyContact {
        let phone_number = self
            .phone_numbers
            .first()
            .filter(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| NO_NUMBER.to_string());
        EmergencyContact::new(self.id.clone(), self.name.clone(), phone_number)
    }
}

/// Device contacts subsystem, implemented by the host platform.
#[async_trait]
pub trait DeviceContacts: Send + Sync {
    async fn request_permission(&self) -> PermissionStatus;

    /// Bulk read of name and phone numbers.
    async fn read_all(&self) -> anyhow::Result<Vec<DeviceContact>>;
}

/// Case-insensitive substring match on contact names.
pub fn filter_by_name<'a>(contacts: &'a [DeviceContact], query: &str) -> Vec<&'a DeviceContact> {
    let query = query.to_lowercase();
    contacts
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&query))
        .collect()
}

/// State behind the add-contacts view.
pub struct ContactPicker {
    device: Arc<dyn DeviceContacts>,
    store: ContactStore,
    available: Vec<DeviceContact>,
    selected: Vec<EmergencyContact>,
}

impl ContactPicker {
    pub fn new(device: Arc<dyn DeviceContacts>, store: ContactStore) -> Self {
        Self {
            device,
            store,
            available: Vec::new(),
            selected: Vec::new(),
        }
    }

    /// Load device contacts and the saved list. Each failure yields an alert;
    /// one failing does not stop the other.
    pub async fn on_mount(&mut self) -> Vec<UserAlert> {
        let mut alerts = Vec::new();

        if let Err(e) = self.load_device_contacts().await {
            alerts.push(e.user_alert());
        }
        if let Err(e) = self.store.fetch().await {
            alerts.push(e.user_alert());
        }

        alerts
    }

    async fn load_device_contacts(&mut self) -> Result<(), AppError> {
        if self.device.request_permission().await != PermissionStatus::Granted {
            tracing::warn!("Contacts permission not granted");
            return Err(AppError::PermissionDenied("contacts"));
        }

        self.available = self.device.read_all().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read device contacts");
            AppError::Internal(e)
        })?;
        tracing::debug!(count = self.available.len(), "Device contacts loaded");
        Ok(())
    }

    pub fn available(&self) -> &[DeviceContact] {
        &self.available
    }

    pub fn search(&self, query: &str) -> Vec<&DeviceContact> {
        filter_by_name(&self.available, query)
    }

    pub fn selected(&self) -> &[EmergencyContact] {
        &self.selected
    }

    pub fn saved(&self) -> &[EmergencyContact] {
        self.store.saved()
    }

    /// Add a device contact to the pending selection unless already selected.
    /// Returns whether it was added.
    pub fn select(&mut self, contact: &DeviceContact) -> bool {
        if self.selected.iter().any(|c| c.id == contact.id) {
            return false;
        }
        self.selected.push(contact.to_emergency_contact());
        true
    }

    /// Merge the selection into the saved list. The selection is cleared only
    /// when the write succeeds.
    pub async fn save_selected(&mut self) -> UserAlert {
        if self.selected.is_empty() {
            return AppError::NoContactsSelected.user_alert();
        }

        match self.store.save(self.selected.clone()).await {
            Ok(_) => {
                self.selected.clear();
                UserAlert::new(
                    "Contacts Saved",
                    "Your emergency contacts have been updated.",
                )
            }
            Err(e) => error_alert("There was an issue saving your contacts.", &e),
        }
    }

    pub async fn delete(&mut self, contact_id: &str) -> UserAlert {
        match self.store.remove(contact_id).await {
            Ok(_) => UserAlert::new("Contact Deleted", "The contact has been removed."),
            Err(e) => error_alert("There was an issue deleting the contact.", &e),
        }
    }
}

fn error_alert(message: &str, err: &AppError) -> UserAlert {
    tracing::error!(error = %err, "{}", message);
    UserAlert::new("Error", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DocumentStore, MemoryDb};
    use crate::testing::{device_contact, signed_in, FakeDeviceContacts};

    fn picker(db: Arc<MemoryDb>, device: FakeDeviceContacts) -> ContactPicker {
        let store = ContactStore::new(db, &signed_in("user_1")).unwrap();
        ContactPicker::new(Arc::new(device), store)
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let contacts = vec![
            device_contact("1", "Mom", &["+1555"]),
            device_contact("2", "Tommy", &["+1666"]),
            device_contact("3", "Dad", &[]),
        ];

        let names: Vec<&str> = filter_by_name(&contacts, "OM")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Mom", "Tommy"]);
        assert_eq!(filter_by_name(&contacts, "").len(), 3);
    }

    #[test]
    fn test_missing_number_uses_placeholder() {
        let contact = device_contact("3", "Dad", &[]).to_emergency_contact();
        assert_eq!(contact.phone_number, NO_NUMBER);

        let contact = device_contact("4", "Gran", &["+1777", "+1888"]).to_emergency_contact();
        assert_eq!(contact.phone_number, "+1777");
    }

    #[tokio::test]
    async fn test_select_ignores_repeat_within_selection() {
        let device = FakeDeviceContacts::granted(vec![device_contact("1", "Mom", &["+1555"])]);
        let mut picker = picker(Arc::new(MemoryDb::new()), device);
        assert!(picker.on_mount().await.is_empty());

        let mom = picker.available()[0].clone();
        assert!(picker.select(&mom));
        assert!(!picker.select(&mom));
        assert_eq!(picker.selected().len(), 1);
    }

    #[tokio::test]
    async fn test_save_selected_clears_selection() {
        let db = Arc::new(MemoryDb::new());
        let device = FakeDeviceContacts::granted(vec![
            device_contact("1", "Mom", &["+1555"]),
            device_contact("2", "Dad", &["+1666"]),
        ]);
        let mut picker = picker(db.clone(), device);
        picker.on_mount().await;

        let contacts = picker.available().to_vec();
        picker.select(&contacts[0]);
        picker.select(&contacts[1]);
        let alert = picker.save_selected().await;

        assert_eq!(alert.title, "Contacts Saved");
        assert!(picker.selected().is_empty());
        assert_eq!(picker.saved().len(), 2);
        let stored = db.get_contacts("user_1").await.unwrap().unwrap();
        assert_eq!(stored.contacts.len(), 2);
    }

    #[tokio::test]
    async fn test_same_contact_across_sessions_is_stored_twice() {
        let db = Arc::new(MemoryDb::new());
        let mom = device_contact("1", "Mom", &["+1555"]);

        for _ in 0..2 {
            let mut picker = picker(db.clone(), FakeDeviceContacts::granted(vec![mom.clone()]));
            picker.on_mount().await;
            picker.select(&mom);
            picker.save_selected().await;
        }

        let stored = db.get_contacts("user_1").await.unwrap().unwrap();
        assert_eq!(stored.contacts.len(), 2);
        assert_eq!(stored.contacts[0], stored.contacts[1]);
    }

    #[tokio::test]
    async fn test_save_with_empty_selection_alerts() {
        let mut picker = picker(Arc::new(MemoryDb::new()), FakeDeviceContacts::granted(vec![]));
        let alert = picker.save_selected().await;
        assert_eq!(alert.title, "No Contacts Selected");
    }

    #[tokio::test]
    async fn test_failed_save_keeps_selection() {
        let db = Arc::new(MemoryDb::new());
        let mom = device_contact("1", "Mom", &["+1555"]);
        let mut picker = picker(db.clone(), FakeDeviceContacts::granted(vec![mom.clone()]));
        picker.on_mount().await;
        picker.select(&mom);

        db.set_offline(true);
        let alert = picker.save_selected().await;

        assert_eq!(alert.message, "There was an issue saving your contacts.");
        assert_eq!(picker.selected().len(), 1);
    }

    #[tokio::test]
    async fn test_permission_denied_still_loads_saved_list() {
        let db = Arc::new(MemoryDb::new());
        let saved = crate::models::ContactList {
            contacts: vec![EmergencyContact::new("9", "Aunt", "+1999")],
        };
        db.set_contacts("user_1", &saved).await.unwrap();

        let mut picker = picker(db, FakeDeviceContacts::denied());
        let alerts = picker.on_mount().await;

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Permission Denied");
        assert!(picker.available().is_empty());
        assert_eq!(picker.saved().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_alerts() {
        let db = Arc::new(MemoryDb::new());
        let mom = device_contact("1", "Mom", &["+1555"]);
        let mut picker = picker(db.clone(), FakeDeviceContacts::granted(vec![mom.clone()]));
        picker.on_mount().await;
        picker.select(&mom);
        picker.save_selected().await;

        let alert = picker.delete("1").await;
        assert_eq!(alert.title, "Contact Deleted");
        assert!(picker.saved().is_empty());
    }
}
