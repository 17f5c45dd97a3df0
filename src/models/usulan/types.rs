use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::master::{Periode, Skpd, StatusUsulan};
use crate::models::pagination::{self, Pagination};

/// Image attached to a proposal. Owned by exactly one proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GambarUsulan {
    pub id: i64,
    pub usulan_id: i64,
    pub file_path: String,
    pub keterangan: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Proposal enriched with its reference data and full image list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usulan {
    pub id: i64,
    pub judul: String,
    pub deskripsi: String,
    pub pengusul: String,
    pub kode_wilayah: String,
    pub latitude: f64,
    pub longitude: f64,
    pub skpd_id: i64,
    pub periode_id: i64,
    pub status_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub skpd: Skpd,
    pub periode: Periode,
    pub status_usulan: StatusUsulan,
    pub gambar_usulan: Vec<GambarUsulan>,
}

/// Image as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGambar {
    pub file_path: String,
    #[serde(default)]
    pub keterangan: String,
}

/// Validated input for creating a proposal together with its images.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUsulan {
    pub judul: String,
    pub deskripsi: String,
    pub pengusul: String,
    pub kode_wilayah: String,
    pub latitude: f64,
    pub longitude: f64,
    pub skpd_id: i64,
    pub periode_id: i64,
    pub status_id: i64,
    pub gambar: Vec<NewGambar>,
}

/// Request body for create and update. Every field is optional on the wire;
/// create checks for completeness, update applies only what is present.
///
/// `gambar: None` leaves images untouched on update; `Some(vec![])` removes them all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsulanChanges {
    pub judul: Option<String>,
    pub deskripsi: Option<String>,
    pub pengusul: Option<String>,
    pub kode_wilayah: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub skpd_id: Option<i64>,
    pub periode_id: Option<i64>,
    pub status_id: Option<i64>,
    pub gambar: Option<Vec<NewGambar>>,
}

/// Listing filters. Always restricted to non-deleted rows, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct UsulanQuery {
    pub tahun: Option<i32>,
    pub status_id: Option<i64>,
    pub skpd_id: Option<i64>,
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

impl Default for UsulanQuery {
    fn default() -> Self {
        UsulanQuery {
            tahun: None,
            status_id: None,
            skpd_id: None,
            search: None,
            page: pagination::DEFAULT_PAGE,
            limit: pagination::DEFAULT_LIMIT,
        }
    }
}

impl UsulanQuery {
    pub fn offset(&self) -> i64 {
        pagination::offset(self.page, self.limit)
    }
}

/// One page of proposals.
#[derive(Debug, Clone, Serialize)]
pub struct UsulanPage {
    pub data: Vec<Usulan>,
    pub pagination: Pagination,
}
