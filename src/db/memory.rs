// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store with the same write semantics as Firestore.
//!
//! Used by the test suite and for local development (`STORE_BACKEND=memory`).

use crate::db::DocumentStore;
use crate::error::AppError;
use crate::models::{ContactList, UserProfile};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Process-local document store.
#[derive(Default)]
pub struct MemoryDb {
    contacts: DashMap<String, ContactList>,
    profiles: DashMap<String, UserProfile>,
    offline: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a transport outage: every operation fails while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "Document store offline".to_string(),
            ));
        }
        Ok(())
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryDb {
    async fn get_contacts(&self, user_id: &str) -> Result<Option<ContactList>, AppError> {
        self.check_online()?;
        Ok(self.contacts.get(user_id).map(|list| list.clone()))
    }

    async fn set_contacts(&self, user_id: &str, list: &ContactList) -> Result<(), AppError> {
        self.check_online()?;
        self.contacts.insert(user_id.to_string(), list.clone());
        self.record_write();
        Ok(())
    }

    async fn update_contacts(&self, user_id: &str, list: &ContactList) -> Result<(), AppError> {
        self.check_online()?;
        match self.contacts.get_mut(user_id) {
            Some(mut existing) => {
                existing.contacts = list.contacts.clone();
                self.record_write();
                Ok(())
            }
            None => Err(AppError::StoreUnavailable(format!(
                "No document to update: emergencyContacts/{}",
                user_id
            ))),
        }
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.check_online()?;
        Ok(self.profiles.get(user_id).map(|p| p.clone()))
    }

    async fn merge_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), AppError> {
        self.check_online()?;
        self.profiles
            .entry(user_id.to_string())
            .and_modify(|stored| {
                let created_at = profile.created_at.clone().or(stored.created_at.take());
                let updated_at = profile.updated_at.clone().or(stored.updated_at.take());
                *stored = UserProfile {
                    created_at,
                    updated_at,
                    ..profile.clone()
                };
            })
            .or_insert_with(|| profile.clone());
        self.record_write();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmergencyContact;

    fn profile(name: &str, created_at: Option<&str>, updated_at: &str) -> UserProfile {
        UserProfile {
            full_name: name.to_string(),
            email: "a@example.com".to_string(),
            age: 30,
            phone_number: "+15550000000".to_string(),
            profile_image_url: String::new(),
            is_profile_complete: true,
            created_at: created_at.map(str::to_string),
            updated_at: Some(updated_at.to_string()),
        }
    }

    #[tokio::test]
    async fn test_update_requires_existing_document() {
        let db = MemoryDb::new();
        let list = ContactList {
            contacts: vec![EmergencyContact::new("1", "Mom", "+1555")],
        };

        assert!(db.update_contacts("u", &list).await.is_err());

        db.set_contacts("u", &ContactList::default()).await.unwrap();
        db.update_contacts("u", &list).await.unwrap();
        assert_eq!(db.get_contacts("u").await.unwrap(), Some(list));
        assert_eq!(db.write_count(), 2);
    }

    #[tokio::test]
    async fn test_merge_profile_keeps_created_at() {
        let db = MemoryDb::new();
        db.merge_profile("u", &profile("First", Some("2026-01-01T00:00:00Z"), "2026-01-01T00:00:00Z"))
            .await
            .unwrap();
        db.merge_profile("u", &profile("Second", None, "2026-02-01T00:00:00Z"))
            .await
            .unwrap();

        let stored = db.get_profile("u").await.unwrap().unwrap();
        assert_eq!(stored.full_name, "Second");
        assert_eq!(stored.created_at.as_deref(), Some("2026-01-01T00:00:00Z"));
        assert_eq!(stored.updated_at.as_deref(), Some("2026-02-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_offline_fails_every_operation() {
        let db = MemoryDb::new();
        db.set_offline(true);

        assert!(matches!(
            db.get_contacts("u").await,
            Err(AppError::StoreUnavailable(_))
        ));
        assert!(matches!(
            db.get_profile("u").await,
            Err(AppError::StoreUnavailable(_))
        ));
    }
}
