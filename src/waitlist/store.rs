use async_trait::async_trait;
use sqlx::postgres::PgDatabaseError;

use crate::database::DbManager;

use super::types::{EntryId, ValidSignup, WaitlistEmail, WaitlistEntry};

/// Name postgres gives the `UNIQUE` constraint on `waitlist_entries.email`.
const EMAIL_UNIQUE_CONSTRAINT: &str = "waitlist_entries_email_key";
const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Persistence of waitlist entries.
///
/// Implementations must enforce email uniqueness themselves and report a conflicting
/// insert as `StoreError::DuplicateEmail`.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    async fn find_by_email(&self, email: &WaitlistEmail) -> StoreResult<Option<WaitlistEntry>>;

    async fn insert(&self, signup: &ValidSignup) -> StoreResult<EntryId>;
}

/// `WaitlistStore` backed by the `waitlist_entries` table.
/// Every query checks a connection out of the pool and hands it back when it finishes or fails.
#[derive(Debug, Clone)]
pub struct PgWaitlistStore {
    database_mgr: DbManager,
}

impl PgWaitlistStore {
    pub fn new(database_mgr: DbManager) -> Self {
        Self { database_mgr }
    }
}

#[async_trait]
impl WaitlistStore for PgWaitlistStore {
    async fn find_by_email(&self, email: &WaitlistEmail) -> StoreResult<Option<WaitlistEntry>> {
        let entry = sqlx::query_as::<_, WaitlistEntry>(
            r#"SELECT id, email, name, whatsapp, notification_preference, interest_type, created_at
            FROM waitlist_entries
            WHERE email = $1"#,
        )
        .bind(email.as_ref())
        .fetch_optional(self.database_mgr.db())
        .await?;

        Ok(entry)
    }

    async fn insert(&self, signup: &ValidSignup) -> StoreResult<EntryId> {
        let query_result = sqlx::query_scalar::<_, EntryId>(
            r#"
            INSERT INTO waitlist_entries (email, name, whatsapp, notification_preference, interest_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
        "#,
        )
        .bind(signup.email.as_ref())
        .bind(signup.name.as_str())
        .bind(signup.whatsapp.as_str())
        .bind(signup.notification_preference.as_ref())
        .bind(signup.interest_type.as_ref())
        .fetch_one(self.database_mgr.db())
        .await;

        query_result.map_err(map_insert_error)
    }
}

// ###################################
// ->   HELPERS
// ###################################

/// A unique violation on the email constraint means someone registered the same email
/// between our lookup and the insert. Everything else is unexpected.
fn map_insert_error(error: sqlx::Error) -> StoreError {
    let is_email_unique_violation = |er: Option<&PgDatabaseError>| {
        er.is_some_and(|er| {
            er.code() == UNIQUE_VIOLATION_CODE && er.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
        })
    };

    match error {
        sqlx::Error::Database(ref er)
            if is_email_unique_violation(er.try_downcast_ref::<PgDatabaseError>()) =>
        {
            StoreError::DuplicateEmail
        }
        _ => StoreError::Sqlx(error),
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type StoreResult<T> = core::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("an entry with this email already exists")]
    DuplicateEmail,

    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
