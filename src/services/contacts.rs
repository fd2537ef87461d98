// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Emergency contact list for the signed-in user.
//!
//! Saves merge new contacts onto the last fetched list by position. Nothing is
//! deduplicated: selecting the same device contact in two sessions stores it
//! twice.

use crate::db::DocumentStore;
use crate::error::AppError;
use crate::models::{ContactList, EmergencyContact};
use crate::session::Session;
use std::sync::Arc;

pub struct ContactStore {
    store: Arc<dyn DocumentStore>,
    user_id: String,
    saved: Vec<EmergencyContact>,
}

impl ContactStore {
    /// Bind a store to the session's user. Fails when signed out.
    pub fn new(store: Arc<dyn DocumentStore>, session: &Session) -> Result<Self, AppError> {
        let user = session.require_user()?;
        Ok(Self {
            store,
            user_id: user.id.clone(),
            saved: Vec::new(),
        })
    }

    /// In-memory view of the saved list.
    pub fn saved(&self) -> &[EmergencyContact] {
        &self.saved
    }

    /// Read the full list; empty when the user has no document yet.
    pub async fn fetch(&mut self) -> Result<Vec<EmergencyContact>, AppError> {
        let list = self
            .store
            .get_contacts(&self.user_id)
            .await
            .inspect_err(|e| {
                tracing::error!(user_id = %self.user_id, error = %e, "Error fetching contacts");
            })?;

        match list {
            Some(list) => self.saved = list.contacts,
            None => {
                tracing::debug!(user_id = %self.user_id, "No contacts found");
                self.saved.clear();
            }
        }
        Ok(self.saved.clone())
    }

    /// Append `new_contacts` to the saved view and persist the whole list.
    ///
    /// The in-memory view is updated before the write and is not rolled back
    /// if the write fails.
    pub async fn save(
        &mut self,
        new_contacts: Vec<EmergencyContact>,
    ) -> Result<Vec<EmergencyContact>, AppError> {
        if new_contacts.is_empty() {
            return Err(AppError::NoContactsSelected);
        }

        let added = new_contacts.len();
        self.saved.extend(new_contacts);

        let list = ContactList {
            contacts: self.saved.clone(),
        };
        self.store
            .set_contacts(&self.user_id, &list)
            .await
            .inspect_err(|e| {
                tracing::error!(user_id = %self.user_id, error = %e, "Error saving contacts");
            })?;

        tracing::info!(
            user_id = %self.user_id,
            added,
            total = list.contacts.len(),
            "Emergency contacts saved"
        );
        Ok(list.contacts)
    }

    /// Drop every contact with `contact_id` and persist the filtered list.
    pub async fn remove(&mut self, contact_id: &str) -> Result<Vec<EmergencyContact>, AppError> {
        let remaining: Vec<EmergencyContact> = self
            .saved
            .iter()
            .filter(|c| c.id != contact_id)
            .cloned()
            .collect();

        let list = ContactList {
            contacts: remaining,
        };
        self.store
            .update_contacts(&self.user_id, &list)
            .await
            .inspect_err(|e| {
                tracing::error!(user_id = %self.user_id, error = %e, "Error deleting contact");
            })?;

        self.saved = list.contacts;
        tracing::info!(user_id = %self.user_id, contact_id, "Emergency contact removed");
        Ok(self.saved.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDb;
    use crate::testing::signed_in;

    fn contact(id: &str, name: &str) -> EmergencyContact {
        EmergencyContact::new(id, name, format!("+1555000{}", id))
    }

    #[tokio::test]
    async fn test_fetch_without_document_is_empty() {
        let db = Arc::new(MemoryDb::new());
        let mut store = ContactStore::new(db, &signed_in("user_1")).unwrap();

        assert!(store.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_signed_out_session_is_rejected() {
        let db = Arc::new(MemoryDb::new());
        assert!(matches!(
            ContactStore::new(db, &Session::signed_out()),
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_save_merges_onto_fetched_list() {
        let db = Arc::new(MemoryDb::new());
        let session = signed_in("user_1");

        let mut first = ContactStore::new(db.clone(), &session).unwrap();
        first.fetch().await.unwrap();
        first.save(vec![contact("1", "Mom")]).await.unwrap();

        let mut second = ContactStore::new(db.clone(), &session).unwrap();
        second.fetch().await.unwrap();
        let saved = second.save(vec![contact("2", "Dad")]).await.unwrap();

        assert_eq!(saved, vec![contact("1", "Mom"), contact("2", "Dad")]);
        let stored = db.get_contacts("user_1").await.unwrap().unwrap();
        assert_eq!(stored.contacts, saved);
    }

    #[tokio::test]
    async fn test_saving_same_contact_twice_keeps_both() {
        let db = Arc::new(MemoryDb::new());
        let mut store = ContactStore::new(db.clone(), &signed_in("user_1")).unwrap();
        store.fetch().await.unwrap();

        store.save(vec![contact("1", "Mom")]).await.unwrap();
        store.save(vec![contact("1", "Mom")]).await.unwrap();

        let stored = db.get_contacts("user_1").await.unwrap().unwrap();
        assert_eq!(stored.contacts, vec![contact("1", "Mom"), contact("1", "Mom")]);
    }

    #[tokio::test]
    async fn test_remove_persists_filtered_list() {
        let db = Arc::new(MemoryDb::new());
        let mut store = ContactStore::new(db.clone(), &signed_in("user_1")).unwrap();
        store.fetch().await.unwrap();
        store
            .save(vec![contact("1", "Mom"), contact("2", "Dad")])
            .await
            .unwrap();

        let remaining = store.remove("1").await.unwrap();

        assert_eq!(remaining, vec![contact("2", "Dad")]);
        let stored = db.get_contacts("user_1").await.unwrap().unwrap();
        assert_eq!(stored.contacts, vec![contact("2", "Dad")]);
    }

    #[tokio::test]
    async fn test_remove_drops_duplicates_with_same_id() {
        let db = Arc::new(MemoryDb::new());
        let mut store = ContactStore::new(db.clone(), &signed_in("user_1")).unwrap();
        store
            .save(vec![contact("1", "Mom"), contact("2", "Dad"), contact("1", "Mom")])
            .await
            .unwrap();

        assert_eq!(store.remove("1").await.unwrap(), vec![contact("2", "Dad")]);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_view_ahead_of_store() {
        let db = Arc::new(MemoryDb::new());
        let mut store = ContactStore::new(db.clone(), &signed_in("user_1")).unwrap();
        store.fetch().await.unwrap();

        db.set_offline(true);
        let err = store.save(vec![contact("1", "Mom")]).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert_eq!(store.saved(), &[contact("1", "Mom")]);

        db.set_offline(false);
        assert!(store.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_save_does_not_write() {
        let db = Arc::new(MemoryDb::new());
        let mut store = ContactStore::new(db.clone(), &signed_in("user_1")).unwrap();

        assert!(matches!(
            store.save(Vec::new()).await,
            Err(AppError::NoContactsSelected)
        ));
        assert_eq!(db.write_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_store_unavailable() {
        let db = Arc::new(MemoryDb::new());
        db.set_offline(true);
        let mut store = ContactStore::new(db, &signed_in("user_1")).unwrap();

        assert!(matches!(
            store.fetch().await,
            Err(AppError::StoreUnavailable(_))
        ));
    }
}
