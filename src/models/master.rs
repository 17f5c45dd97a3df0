//! Reference data (SKPD, periods, statuses). Read-only from this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Government organizational unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Skpd {
    pub id: i64,
    pub nama: String,
    pub alamat: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Budget year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Periode {
    pub id: i64,
    pub tahun: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Workflow state of a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusUsulan {
    pub id: i64,
    pub nama: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything a proposal form needs to populate its selects.
#[derive(Debug, Clone, Serialize)]
pub struct MasterData {
    pub skpd: Vec<Skpd>,
    pub periode: Vec<Periode>,
    pub status_usulan: Vec<StatusUsulan>,
}

pub async fn find_all_skpd(pool: &PgPool) -> Result<Vec<Skpd>, sqlx::Error> {
    sqlx::query_as::<_, Skpd>(
        "SELECT id, nama, alamat, created_at, updated_at FROM skpd ORDER BY nama ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_all_periode(pool: &PgPool) -> Result<Vec<Periode>, sqlx::Error> {
    sqlx::query_as::<_, Periode>(
        "SELECT id, tahun, created_at, updated_at FROM periode ORDER BY tahun DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_all_status(pool: &PgPool) -> Result<Vec<StatusUsulan>, sqlx::Error> {
    sqlx::query_as::<_, StatusUsulan>(
        "SELECT id, nama, created_at, updated_at FROM status_usulan ORDER BY nama ASC",
    )
    .fetch_all(pool)
    .await
}
