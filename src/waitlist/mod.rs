//! Waitlist signups: validation, normalization and storage.

mod registrar;
mod store;
mod types;

pub use registrar::{HealthStatus, Registrar, RegistrarError, RegistrarResult};
pub use store::{PgWaitlistStore, StoreError, StoreResult, WaitlistStore};
pub use types::{
    EntryId, InterestType, NotificationPreference, SignupError, SignupPayload, ValidSignup,
    WaitlistEmail, WaitlistEntry,
};
