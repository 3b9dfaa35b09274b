//! Request-scoped transactional session
//!
//! A session owns at most one open transaction. The transaction is opened
//! lazily by the first statement and ended by `commit` or `rollback`; the next
//! statement opens a fresh one. Dropping a session with a pending transaction
//! rolls it back.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::Result;

pub struct Session {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl Session {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, tx: None }
    }

    /// Connection inside the current transaction, opening one if needed.
    pub async fn connection(&mut self) -> Result<&mut PgConnection> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await?,
        };
        Ok(&mut **self.tx.insert(tx))
    }

    /// Whether statements are waiting for a commit or rollback.
    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Durably publish every pending statement.
    pub async fn commit(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    /// Discard every pending statement.
    pub async fn rollback(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("in_transaction", &self.in_transaction())
            .finish()
    }
}
