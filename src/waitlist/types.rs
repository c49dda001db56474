//! Signup payloads, their normalized form and the stored waitlist entry.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use sqlx::{postgres::PgRow, FromRow, Row};
use strum_macros::AsRefStr;

/// Database assigned identifier of a waitlist entry.
pub type EntryId = i32;

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable signup.
/// Every field is optional, validation happens when converting into `ValidSignup`.
#[derive(Debug, Default, Deserialize)]
pub struct SignupPayload {
    pub email: Option<String>,
    pub name: Option<String>,
    pub whatsapp: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub notification_preference: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub interest_type: Option<String>,
}

/// A signup with all the fields normalized, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    pub email: WaitlistEmail,
    pub name: String,
    pub whatsapp: String,
    pub notification_preference: NotificationPreference,
    pub interest_type: InterestType,
}

/// Trimmed, lower-cased, non-empty email.
/// Two signups are duplicates iff their `WaitlistEmail`s are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaitlistEmail(String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationPreference {
    #[default]
    Email,
    Whatsapp,
    Both,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum InterestType {
    Vendor,
    Buyer,
    #[default]
    Both,
}

/// A row of the `waitlist_entries` table.
#[derive(Debug, Clone)]
pub struct WaitlistEntry {
    pub id: EntryId,
    pub email: String,
    pub name: String,
    pub whatsapp: String,
    pub notification_preference: NotificationPreference,
    pub interest_type: InterestType,
    pub created_at: NaiveDateTime,
}

// ###################################
// ->   IMPLS
// ###################################
impl TryFrom<SignupPayload> for ValidSignup {
    type Error = SignupError;

    fn try_from(payload: SignupPayload) -> Result<Self, Self::Error> {
        Ok(ValidSignup {
            email: WaitlistEmail::parse(payload.email.as_deref())?,
            name: trimmed_or_empty(payload.name.as_deref()),
            whatsapp: trimmed_or_empty(payload.whatsapp.as_deref()),
            notification_preference: NotificationPreference::from_input(
                payload.notification_preference.as_deref(),
            ),
            interest_type: InterestType::from_input(payload.interest_type.as_deref()),
        })
    }
}

impl AsRef<str> for WaitlistEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl WaitlistEmail {
    pub fn parse(value: Option<&str>) -> Result<Self, SignupError> {
        let email = value.map(str::trim).unwrap_or_default();
        if email.is_empty() {
            return Err(SignupError::EmailMissing);
        }

        Ok(WaitlistEmail(email.to_lowercase()))
    }
}

impl NotificationPreference {
    /// Unknown or missing values fall back to `Email`.
    pub fn from_input(value: Option<&str>) -> Self {
        match value {
            Some("email") => Self::Email,
            Some("whatsapp") => Self::Whatsapp,
            Some("both") => Self::Both,
            _ => Self::default(),
        }
    }
}

impl InterestType {
    /// Unknown or missing values fall back to `Both`.
    pub fn from_input(value: Option<&str>) -> Self {
        match value {
            Some("vendor") => Self::Vendor,
            Some("buyer") => Self::Buyer,
            Some("both") => Self::Both,
            _ => Self::default(),
        }
    }
}

// Columns other than `id` and `email` are nullable, so they are read leniently.
impl<'r> FromRow<'r, PgRow> for WaitlistEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let name: Option<String> = row.try_get("name")?;
        let whatsapp: Option<String> = row.try_get("whatsapp")?;
        let notification_preference: Option<String> = row.try_get("notification_preference")?;
        let interest_type: Option<String> = row.try_get("interest_type")?;

        Ok(WaitlistEntry {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: name.unwrap_or_default(),
            whatsapp: whatsapp.unwrap_or_default(),
            notification_preference: NotificationPreference::from_input(
                notification_preference.as_deref(),
            ),
            interest_type: InterestType::from_input(interest_type.as_deref()),
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Any JSON value that is not a string reads as absent, so it falls back to the default.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}

fn trimmed_or_empty(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_owned()
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignupError {
    #[error("email is missing or empty")]
    EmailMissing,
}
