/// Persistence gateway
///
/// Thin access layer over Postgres. Multi-row mutations run inside a
/// [`sqlx::Transaction`] obtained from [`Store::begin`]; a transaction that is
/// dropped without reaching [`Store::commit`] is rolled back, whichever way
/// the caller exits (error, early return, panic, or a cancelled future).

pub mod groups;
pub mod users;

use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{AppError, DatabaseError};

pub type PgTransaction = Transaction<'static, Postgres>;

#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<PgTransaction, AppError> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to open transaction");
            AppError::Database(DatabaseError::Unexpected(e.to_string()))
        })
    }

    /// A failed commit is reported, never swallowed; the store has already
    /// discarded the transaction's writes at that point.
    pub async fn commit(&self, tx: PgTransaction) -> Result<(), AppError> {
        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to commit transaction");
            AppError::Database(DatabaseError::CommitFailed(e.to_string()))
        })
    }
}
