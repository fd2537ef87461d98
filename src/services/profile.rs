// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile details stored alongside the identity provider's account.

use crate::db::DocumentStore;
use crate::error::AppError;
use crate::models::{ProfileForm, User, UserProfile};
use crate::session::Session;
use crate::time_utils::format_utc_rfc3339;
use std::sync::Arc;
use validator::Validate;

/// Upper bound accepted for the age field.
const MAX_AGE: u32 = 150;

pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
    user: User,
    default_phone_prefix: String,
}

impl ProfileService {
    /// Fails when the session is signed out.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        session: &Session,
        default_phone_prefix: impl Into<String>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            store,
            user: session.require_user()?.clone(),
            default_phone_prefix: default_phone_prefix.into(),
        })
    }

    /// Form prefilled from the stored profile, or from the identity when no
    /// profile exists yet.
    pub async fn load_form(&self) -> Result<ProfileForm, AppError> {
        let stored = self.store.get_profile(&self.user.id).await.inspect_err(|e| {
            tracing::error!(user_id = %self.user.id, error = %e, "Error fetching user data");
        })?;

        Ok(match stored {
            Some(profile) => ProfileForm {
                full_name: profile.full_name,
                email: profile.email,
                age: profile.age.to_string(),
                phone_number: if profile.phone_number.is_empty() {
                    self.default_phone_prefix.clone()
                } else {
                    profile.phone_number
                },
            },
            None => ProfileForm {
                full_name: self.user.full_name.clone().unwrap_or_default(),
                email: self.user.email.clone().unwrap_or_default(),
                age: String::new(),
                phone_number: self.default_phone_prefix.clone(),
            },
        })
    }

    /// Validate and merge the form into the stored profile.
    ///
    /// `createdAt` is written only when no profile document exists yet;
    /// `updatedAt` is written every time.
    pub async fn update(&self, form: ProfileForm) -> Result<UserProfile, AppError> {
        let form = form.trimmed();
        form.validate()
            .map_err(|_| AppError::BadRequest("Please fill in all fields.".to_string()))?;

        let age: u32 = form
            .age
            .trim()
            .parse()
            .ok()
            .filter(|age| (1..=MAX_AGE).contains(age))
            .ok_or_else(|| AppError::BadRequest("Please enter a valid age.".to_string()))?;

        let existing = self.store.get_profile(&self.user.id).await?;
        let now = format_utc_rfc3339(chrono::Utc::now());

        let email = match &existing {
            Some(profile) if !profile.email.is_empty() => profile.email.clone(),
            _ => self.user.email.clone().unwrap_or_default(),
        };

        let profile = UserProfile {
            full_name: form.full_name,
            email,
            age,
            phone_number: form.phone_number,
            profile_image_url: self.user.image_url.clone().unwrap_or_default(),
            is_profile_complete: true,
            created_at: existing.is_none().then(|| now.clone()),
            updated_at: Some(now),
        };

        self.store
            .merge_profile(&self.user.id, &profile)
            .await
            .inspect_err(|e| {
                tracing::error!(user_id = %self.user.id, error = %e, "Error updating user details");
            })?;

        tracing::info!(
            user_id = %self.user.id,
            created = existing.is_none(),
            "Profile saved"
        );

        let created_at = profile
            .created_at
            .clone()
            .or_else(|| existing.and_then(|p| p.created_at));
        Ok(UserProfile {
            created_at,
            ..profile
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDb;
    use crate::testing::test_user;

    fn service(db: Arc<MemoryDb>) -> ProfileService {
        ProfileService::new(db, &Session::signed_in(test_user("user_1")), "+91").unwrap()
    }

    fn form(name: &str, age: &str, phone: &str) -> ProfileForm {
        ProfileForm {
            full_name: name.to_string(),
            email: String::new(),
            age: age.to_string(),
            phone_number: phone.to_string(),
        }
    }

    #[tokio::test]
    async fn test_new_user_form_uses_identity_defaults() {
        let svc = service(Arc::new(MemoryDb::new()));
        let form = svc.load_form().await.unwrap();

        assert_eq!(form.full_name, "Test User");
        assert_eq!(form.email, "user_1@example.com");
        assert_eq!(form.age, "");
        assert_eq!(form.phone_number, "+91");
    }

    #[tokio::test]
    async fn test_created_at_only_on_first_write() {
        let db = Arc::new(MemoryDb::new());
        let svc = service(db.clone());

        let first = svc.update(form("Ada", "36", "+15550001111")).await.unwrap();
        let created = first.created_at.clone().expect("created on first write");

        let second = svc.update(form("Ada L", "37", "+15550001111")).await.unwrap();
        assert_eq!(second.created_at.as_deref(), Some(created.as_str()));

        let stored = db.get_profile("user_1").await.unwrap().unwrap();
        assert_eq!(stored.full_name, "Ada L");
        assert_eq!(stored.age, 37);
        assert_eq!(stored.created_at.as_deref(), Some(created.as_str()));
        assert!(stored.updated_at.is_some());
        assert!(stored.is_profile_complete);
        assert_eq!(stored.profile_image_url, "https://img.example.com/user_1.png");
    }

    #[tokio::test]
    async fn test_missing_field_is_rejected() {
        let db = Arc::new(MemoryDb::new());
        let svc = service(db.clone());

        let err = svc.update(form("Ada", "", "+1555")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(db.write_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        let db = Arc::new(MemoryDb::new());
        let svc = service(db.clone());

        let err = svc.update(form("   ", "30", "  ")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(db.write_count(), 0);
        assert!(db.get_profile("user_1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_numeric_age_is_rejected() {
        let svc = service(Arc::new(MemoryDb::new()));

        for age in ["abc", "0", "200", "-4"] {
            assert!(
                matches!(
                    svc.update(form("Ada", age, "+1555")).await,
                    Err(AppError::BadRequest(_))
                ),
                "age {age:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_stored_profile_prefills_form() {
        let db = Arc::new(MemoryDb::new());
        let svc = service(db);
        svc.update(form("Ada", "36", "+15550001111")).await.unwrap();

        let loaded = svc.load_form().await.unwrap();
        assert_eq!(loaded.full_name, "Ada");
        assert_eq!(loaded.age, "36");
        assert_eq!(loaded.phone_number, "+15550001111");
        assert_eq!(loaded.email, "user_1@example.com");
    }
}
