use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::{
    errors::AppError,
    repositories::store::{Store, StoreTx},
};

#[derive(Clone)]
pub struct SqlxStore {
    pub pool: PgPool,
}

/// A PostgreSQL transaction. Rolled back by sqlx when dropped uncommitted.
pub struct SqlxTx {
    pub tx: Transaction<'static, Postgres>,
}

impl SqlxStore {
    pub fn new(pool: PgPool) -> Self {
        SqlxStore { pool }
    }
}

#[async_trait]
impl Store for SqlxStore {
    type Tx = SqlxTx;

    async fn begin(&self) -> Result<SqlxTx, AppError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from(e).context("starting transaction"))?;

        Ok(SqlxTx { tx })
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }
}

#[async_trait]
impl StoreTx for SqlxTx {
    async fn commit(self) -> Result<(), AppError> {
        self.tx
            .commit()
            .await
            .map_err(|e| AppError::from(e).context("committing transaction"))
    }
}
