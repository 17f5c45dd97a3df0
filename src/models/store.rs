use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt;

use crate::models::master::{self, Periode, Skpd, StatusUsulan};
use crate::models::usulan::{self, NewUsulan, Usulan, UsulanChanges, UsulanPage, UsulanQuery};

#[derive(Debug)]
pub enum StoreError {
    Db(sqlx::Error),
    /// No backend is configured; nothing was attempted.
    Unavailable,
    /// A write failed and rolling it back failed too, so partial data may remain.
    Rollback { cause: sqlx::Error, rollback: sqlx::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(e) => write!(f, "Database error: {e}"),
            StoreError::Unavailable => write!(f, "Database belum dikonfigurasi"),
            StoreError::Rollback { cause, rollback } => {
                write!(f, "Database error: {cause} (rollback gagal: {rollback})")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Db(e)
    }
}

/// Proposal persistence as seen by the HTTP handlers.
#[async_trait]
pub trait UsulanStore: Send + Sync {
    /// Reachability check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn list(&self, query: &UsulanQuery) -> Result<UsulanPage, StoreError>;

    /// `None` when the proposal is absent or soft-deleted.
    async fn find_by_id(&self, id: i64) -> Result<Option<Usulan>, StoreError>;

    /// Does not re-check that `new.gambar` is non-empty; handlers do.
    async fn create(&self, new: &NewUsulan) -> Result<Usulan, StoreError>;

    /// Updates of a missing or deleted id change nothing and return `None`.
    async fn update(&self, id: i64, changes: &UsulanChanges) -> Result<Option<Usulan>, StoreError>;

    /// Returns false when no visible row matched.
    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn list_skpd(&self) -> Result<Vec<Skpd>, StoreError>;
    async fn list_periode(&self) -> Result<Vec<Periode>, StoreError>;
    async fn list_status(&self) -> Result<Vec<StatusUsulan>, StoreError>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgUsulanStore {
    pool: PgPool,
}

impl PgUsulanStore {
    pub fn new(pool: PgPool) -> Self {
        PgUsulanStore { pool }
    }
}

#[async_trait]
impl UsulanStore for PgUsulanStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self, query: &UsulanQuery) -> Result<UsulanPage, StoreError> {
        Ok(usulan::queries::find_paginated(&self.pool, query).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Usulan>, StoreError> {
        Ok(usulan::queries::find_by_id(&self.pool, id).await?)
    }

    async fn create(&self, new: &NewUsulan) -> Result<Usulan, StoreError> {
        usulan::queries::create(&self.pool, new).await
    }

    async fn update(&self, id: i64, changes: &UsulanChanges) -> Result<Option<Usulan>, StoreError> {
        usulan::queries::update(&self.pool, id, changes).await
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(usulan::queries::soft_delete(&self.pool, id).await?)
    }

    async fn list_skpd(&self) -> Result<Vec<Skpd>, StoreError> {
        Ok(master::find_all_skpd(&self.pool).await?)
    }

    async fn list_periode(&self) -> Result<Vec<Periode>, StoreError> {
        Ok(master::find_all_periode(&self.pool).await?)
    }

    async fn list_status(&self) -> Result<Vec<StatusUsulan>, StoreError> {
        Ok(master::find_all_status(&self.pool).await?)
    }
}

/// Stand-in used when no database is configured. Every call reports
/// `StoreError::Unavailable` so callers can tell an outage from an empty result.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

#[async_trait]
impl UsulanStore for UnavailableStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn list(&self, _query: &UsulanQuery) -> Result<UsulanPage, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Usulan>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn create(&self, _new: &NewUsulan) -> Result<Usulan, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn update(&self, _id: i64, _changes: &UsulanChanges) -> Result<Option<Usulan>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn soft_delete(&self, _id: i64) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn list_skpd(&self) -> Result<Vec<Skpd>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn list_periode(&self) -> Result<Vec<Periode>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn list_status(&self) -> Result<Vec<StatusUsulan>, StoreError> {
        Err(StoreError::Unavailable)
    }
}
