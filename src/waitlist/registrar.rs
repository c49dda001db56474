use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::utils;

use super::{
    store::{StoreError, WaitlistStore},
    types::{EntryId, SignupError, SignupPayload, ValidSignup},
};

/// Validates signups and records them in a `WaitlistStore`.
#[derive(Clone)]
pub struct Registrar {
    store: Arc<dyn WaitlistStore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

impl Registrar {
    pub fn new(store: Arc<dyn WaitlistStore>) -> Self {
        Self { store }
    }

    /// Normalizes the payload, rejects already registered emails and stores the signup.
    /// Returns the id the store assigned to the new entry.
    ///
    /// The lookup only saves a failing insert. Two concurrent signups with the same email can
    /// both pass it, the store's unique constraint then rejects the second one as a duplicate.
    #[tracing::instrument(
        name = "Registering waitlist signup",
        skip_all,
        fields(id = tracing::field::Empty)
    )]
    pub async fn submit(&self, payload: SignupPayload) -> RegistrarResult<EntryId> {
        let signup = ValidSignup::try_from(payload)?;
        debug!(email = signup.email.as_ref(), "Signup normalized");

        if self.store.find_by_email(&signup.email).await?.is_some() {
            return Err(RegistrarError::Duplicate);
        }

        let id = self.store.insert(&signup).await?;
        tracing::Span::current().record("id", id);
        info!(id, "New waitlist entry added");

        Ok(id)
    }

    pub fn health_check(&self) -> HealthStatus {
        HealthStatus { status: "healthy" }
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type RegistrarResult<T> = core::result::Result<T, RegistrarError>;

#[derive(thiserror::Error)]
pub enum RegistrarError {
    #[error("invalid signup: {0}")]
    Validation(#[from] SignupError),
    #[error("email is already registered")]
    Duplicate,
    #[error("record store failure")]
    Store(#[source] StoreError),
}

impl From<StoreError> for RegistrarError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateEmail => Self::Duplicate,
            other => Self::Store(other),
        }
    }
}

impl std::fmt::Debug for RegistrarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}
