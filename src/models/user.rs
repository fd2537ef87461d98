//! User identity and profile models.

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Identity of the signed-in user, owned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct User {
    /// Opaque provider user ID (also used as document ID)
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    /// Avatar URL
    pub image_url: Option<String>,
}

/// User profile stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    pub age: u32,
    pub phone_number: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub is_profile_complete: bool,
    /// Set on the first write only (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Set on every write (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Editable profile fields as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct ProfileForm {
    #[validate(length(min = 1, message = "Please fill in all fields."))]
    pub full_name: String,
    /// Read-only; always taken from the stored profile or identity
    #[serde(default)]
    pub email: String,
    /// Accepts a JSON string or number
    #[validate(length(min = 1, message = "Please fill in all fields."))]
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    #[validate(length(min = 1, message = "Please fill in all fields."))]
    pub phone_number: String,
}

impl ProfileForm {
    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            age: self.age.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
