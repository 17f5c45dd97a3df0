//! Shared test infrastructure for the HTTP API tests.
//!
//! - `MemoryStore` - an in-process `UsulanStore` with the same visibility,
//!   ordering and paging rules as the Postgres store
//! - `test_state()` / `bearer()` - app wiring and a valid Authorization header
//! - `usulan_body()` - a complete create request

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};

use usulan::app::AppState;
use usulan::auth::credentials::DemoCredentials;
use usulan::auth::rate_limit::RateLimiter;
use usulan::auth::token::{IdentityClaim, TokenService};
use usulan::config::AppConfig;
use usulan::models::master::{Periode, Skpd, StatusUsulan};
use usulan::models::pagination::Pagination;
use usulan::models::store::{StoreError, UsulanStore};
use usulan::models::usulan::{
    GambarUsulan, NewGambar, NewUsulan, Usulan, UsulanChanges, UsulanPage, UsulanQuery,
};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TEST_SECRET: &str = "test-jwt-secret";
pub const DEMO_EMAIL: &str = "admin@usulan-asmas.com";
pub const DEMO_PASSWORD: &str = "admin123";

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

struct Inner {
    skpd: Vec<Skpd>,
    periode: Vec<Periode>,
    status: Vec<StatusUsulan>,
    rows: Vec<Usulan>,
    next_id: i64,
    next_gambar_id: i64,
    clock: DateTime<Utc>,
}

impl Inner {
    /// Monotonic fake clock: every write happens one second after the last.
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += Duration::seconds(1);
        self.clock
    }

    fn gambar_rows(&mut self, usulan_id: i64, gambar: &[NewGambar]) -> Vec<GambarUsulan> {
        let now = self.tick();
        gambar
            .iter()
            .map(|g| {
                self.next_gambar_id += 1;
                GambarUsulan {
                    id: self.next_gambar_id,
                    usulan_id,
                    file_path: g.file_path.clone(),
                    keterangan: g.keterangan.clone(),
                    created_at: now,
                    updated_at: now,
                }
            })
            .collect()
    }

    fn refs(&self, skpd_id: i64, periode_id: i64, status_id: i64) -> Result<(Skpd, Periode, StatusUsulan), StoreError> {
        let skpd = self.skpd.iter().find(|s| s.id == skpd_id);
        let periode = self.periode.iter().find(|p| p.id == periode_id);
        let status = self.status.iter().find(|s| s.id == status_id);
        match (skpd, periode, status) {
            (Some(s), Some(p), Some(st)) => Ok((s.clone(), p.clone(), st.clone())),
            // Mirrors a foreign-key violation in Postgres.
            _ => Err(StoreError::Db(sqlx::Error::RowNotFound)),
        }
    }
}

pub struct MemoryStore {
    inner: Mutex<Inner>,
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

impl MemoryStore {
    /// Store with three SKPD, three periods (2024-2026) and three statuses.
    pub fn seeded() -> Arc<Self> {
        let t = epoch();
        let skpd = vec![
            Skpd { id: 1, nama: "Dinas Pekerjaan Umum".into(), alamat: "Jl. Merdeka 1".into(), created_at: t, updated_at: t },
            Skpd { id: 2, nama: "Dinas Kesehatan".into(), alamat: "Jl. Diponegoro 7".into(), created_at: t, updated_at: t },
            Skpd { id: 3, nama: "Dinas Pendidikan".into(), alamat: "Jl. Sudirman 12".into(), created_at: t, updated_at: t },
        ];
        let periode = vec![
            Periode { id: 1, tahun: 2024, created_at: t, updated_at: t },
            Periode { id: 2, tahun: 2025, created_at: t, updated_at: t },
            Periode { id: 3, tahun: 2026, created_at: t, updated_at: t },
        ];
        let status = vec![
            StatusUsulan { id: 1, nama: "Diajukan".into(), created_at: t, updated_at: t },
            StatusUsulan { id: 2, nama: "Disetujui".into(), created_at: t, updated_at: t },
            StatusUsulan { id: 3, nama: "Ditolak".into(), created_at: t, updated_at: t },
        ];
        Arc::new(MemoryStore {
            inner: Mutex::new(Inner {
                skpd,
                periode,
                status,
                rows: vec![],
                next_id: 0,
                next_gambar_id: 0,
                clock: t,
            }),
        })
    }

    /// Raw row lookup that ignores soft-delete, for asserting on deleted rows.
    pub fn raw(&self, id: i64) -> Option<Usulan> {
        let inner = self.inner.lock().unwrap();
        inner.rows.iter().find(|u| u.id == id).cloned()
    }

    pub fn row_count(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }
}

#[async_trait]
impl UsulanStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list(&self, query: &UsulanQuery) -> Result<UsulanPage, StoreError> {
        let inner = self.inner.lock().unwrap();
        let needle = query.search.as_ref().map(|s| s.to_lowercase());

        let mut matching: Vec<&Usulan> = inner
            .rows
            .iter()
            .filter(|u| u.deleted_at.is_none())
            .filter(|u| query.tahun.is_none_or(|t| u.periode.tahun == t))
            .filter(|u| query.status_id.is_none_or(|s| u.status_id == s))
            .filter(|u| query.skpd_id.is_none_or(|s| u.skpd_id == s))
            .filter(|u| {
                needle.as_ref().is_none_or(|n| {
                    u.judul.to_lowercase().contains(n) || u.pengusul.to_lowercase().contains(n)
                })
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(UsulanPage {
            data,
            pagination: Pagination::new(query.page, query.limit, total),
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Usulan>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, new: &NewUsulan) -> Result<Usulan, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let (skpd, periode, status_usulan) = inner.refs(new.skpd_id, new.periode_id, new.status_id)?;

        inner.next_id += 1;
        let id = inner.next_id;
        let now = inner.tick();
        let gambar_usulan = inner.gambar_rows(id, &new.gambar);

        let row = Usulan {
            id,
            judul: new.judul.clone(),
            deskripsi: new.deskripsi.clone(),
            pengusul: new.pengusul.clone(),
            kode_wilayah: new.kode_wilayah.clone(),
            latitude: new.latitude,
            longitude: new.longitude,
            skpd_id: new.skpd_id,
            periode_id: new.periode_id,
            status_id: new.status_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            skpd,
            periode,
            status_usulan,
            gambar_usulan,
        };
        inner.rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, changes: &UsulanChanges) -> Result<Option<Usulan>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(pos) = inner.rows.iter().position(|u| u.id == id && u.deleted_at.is_none()) else {
            return Ok(None);
        };

        let current = inner.rows[pos].clone();
        let skpd_id = changes.skpd_id.unwrap_or(current.skpd_id);
        let periode_id = changes.periode_id.unwrap_or(current.periode_id);
        let status_id = changes.status_id.unwrap_or(current.status_id);
        let (skpd, periode, status_usulan) = inner.refs(skpd_id, periode_id, status_id)?;
        let now = inner.tick();
        let gambar_usulan = match &changes.gambar {
            Some(gambar) => inner.gambar_rows(id, gambar),
            None => current.gambar_usulan.clone(),
        };

        let updated = Usulan {
            judul: changes.judul.clone().unwrap_or(current.judul),
            deskripsi: changes.deskripsi.clone().unwrap_or(current.deskripsi),
            pengusul: changes.pengusul.clone().unwrap_or(current.pengusul),
            kode_wilayah: changes.kode_wilayah.clone().unwrap_or(current.kode_wilayah),
            latitude: changes.latitude.unwrap_or(current.latitude),
            longitude: changes.longitude.unwrap_or(current.longitude),
            skpd_id,
            periode_id,
            status_id,
            updated_at: now,
            skpd,
            periode,
            status_usulan,
            gambar_usulan,
            ..current
        };
        inner.rows[pos] = updated.clone();
        Ok(Some(updated))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let now = inner.tick();
        match inner.rows.iter_mut().find(|u| u.id == id && u.deleted_at.is_none()) {
            Some(row) => {
                row.deleted_at = Some(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_skpd(&self) -> Result<Vec<Skpd>, StoreError> {
        let mut skpd = self.inner.lock().unwrap().skpd.clone();
        skpd.sort_by(|a, b| a.nama.cmp(&b.nama));
        Ok(skpd)
    }

    async fn list_periode(&self) -> Result<Vec<Periode>, StoreError> {
        let mut periode = self.inner.lock().unwrap().periode.clone();
        periode.sort_by(|a, b| b.tahun.cmp(&a.tahun));
        Ok(periode)
    }

    async fn list_status(&self) -> Result<Vec<StatusUsulan>, StoreError> {
        let mut status = self.inner.lock().unwrap().status.clone();
        status.sort_by(|a, b| a.nama.cmp(&b.nama));
        Ok(status)
    }
}

// ============================================================================
// APP SETUP
// ============================================================================

/// App state wired to `store`, signing with `TEST_SECRET`.
pub fn test_state(store: Arc<dyn UsulanStore>) -> AppState {
    let config = AppConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    });
    let credentials =
        DemoCredentials::new(DEMO_EMAIL, DEMO_PASSWORD, "1", "admin").expect("hash demo password");
    AppState::new(config, store, credentials, RateLimiter::default())
}

pub fn admin_claim() -> IdentityClaim {
    IdentityClaim {
        user_id: "1".to_string(),
        email: DEMO_EMAIL.to_string(),
        role: Some("admin".to_string()),
    }
}

/// `Authorization` header value carrying a fresh, valid token.
pub fn bearer() -> String {
    let token = TokenService::new(TEST_SECRET)
        .issue(&admin_claim())
        .expect("issue token");
    format!("Bearer {token}")
}

/// A complete create request with one image per `file_paths` entry.
pub fn usulan_body(judul: &str, pengusul: &str, file_paths: &[&str]) -> Value {
    let gambar: Vec<Value> = file_paths
        .iter()
        .map(|p| json!({ "file_path": p, "keterangan": "foto" }))
        .collect();
    json!({
        "judul": judul,
        "deskripsi": "Deskripsi usulan",
        "pengusul": pengusul,
        "kode_wilayah": "01.01",
        "latitude": -6.2,
        "longitude": 106.8,
        "skpd_id": 1,
        "periode_id": 2,
        "status_id": 1,
        "gambar": gambar
    })
}
