//! Database layer (Firestore, plus an in-memory store for tests and local dev).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{ContactList, UserProfile};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    /// Emergency contact lists (keyed by user ID)
    pub const EMERGENCY_CONTACTS: &str = "emergencyContacts";
    /// User profiles (keyed by user ID)
    pub const USERS: &str = "users";
}

/// Keyed document access used by the services.
///
/// Every operation addresses one document by user ID. Transport failures are
/// reported as [`AppError::StoreUnavailable`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a user's contact list document, if it exists.
    async fn get_contacts(&self, user_id: &str) -> Result<Option<ContactList>, AppError>;

    /// Create or fully replace a user's contact list document.
    async fn set_contacts(&self, user_id: &str, list: &ContactList) -> Result<(), AppError>;

    /// Overwrite only the `contacts` field of an existing document.
    async fn update_contacts(&self, user_id: &str, list: &ContactList) -> Result<(), AppError>;

    /// Read a user's profile document, if it exists.
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError>;

    /// Merge the given profile into the user's document, creating it if needed.
    /// `None` timestamps leave the stored values untouched.
    async fn merge_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), AppError>;
}
