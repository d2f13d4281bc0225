use std::time::Duration;

use anyhow::{Context, Result};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use r2d2::CustomizeConnection;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use tracing::warn;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// How long SQLite waits on a locked database before reporting `SQLITE_BUSY`
const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Attempts made by [`with_retry`] before giving up on a busy database
const MAX_RETRIES: u32 = 5;

/// Setup run on every connection the pool opens
///
/// SQLite keeps `foreign_keys` off by default and scopes the pragma to the
/// connection, so it has to be applied here rather than in a migration.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds the connection pool for the given database URL
///
/// ### Errors
///
/// Returns an error if the pool cannot open its initial connections.
pub fn init_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: Duration::from_millis(BUSY_TIMEOUT_MS),
        }))
        .build(manager)
        .with_context(|| format!("Failed to create pool for {}", database_url))
}

/// Returns true when the error is SQLite reporting a locked database
fn is_busy(err: &DieselError) -> bool {
    match err {
        DieselError::DatabaseError(_, info) => {
            let message = info.message();
            message.contains("database is locked") || message.contains("database table is locked")
        }
        _ => false,
    }
}

/// Runs a write operation, retrying with backoff while SQLite reports the
/// database as locked
///
/// The busy timeout covers most contention; this catches the cases where
/// SQLite gives up immediately, e.g. a deferred transaction upgrading to a
/// write lock.
pub async fn with_retry<T, E, F>(mut op: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: AsDieselError,
{
    let mut attempt = 0;
    loop {
        match op() {
            Err(err) if attempt < MAX_RETRIES && err.as_diesel().is_some_and(is_busy) => {
                attempt += 1;
                let backoff = Duration::from_millis(25 * 2u64.pow(attempt));
                warn!("Database busy, retrying in {:?} (attempt {})", backoff, attempt);
                tokio::time::sleep(backoff).await;
            }
            result => return result,
        }
    }
}

/// Gives [`with_retry`] a look at the diesel error behind an operation's
/// error type
pub trait AsDieselError {
    fn as_diesel(&self) -> Option<&DieselError>;
}

impl AsDieselError for DieselError {
    fn as_diesel(&self) -> Option<&DieselError> {
        Some(self)
    }
}

impl AsDieselError for anyhow::Error {
    fn as_diesel(&self) -> Option<&DieselError> {
        self.downcast_ref::<DieselError>()
    }
}
