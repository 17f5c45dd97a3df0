use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Transaction};

use super::filter::{FilterParam, build_where_clause};
use super::types::*;
use crate::models::master::{Periode, Skpd, StatusUsulan};
use crate::models::pagination::Pagination;
use crate::models::store::StoreError;

/// Proposal columns plus the three joined reference rows, flattened.
const SELECT_USULAN: &str = "\
    SELECT u.id, u.judul, u.deskripsi, u.pengusul, u.kode_wilayah, \
           u.latitude, u.longitude, u.skpd_id, u.periode_id, u.status_id, \
           u.created_at, u.updated_at, u.deleted_at, \
           s.nama AS skpd_nama, s.alamat AS skpd_alamat, \
           s.created_at AS skpd_created_at, s.updated_at AS skpd_updated_at, \
           p.tahun AS periode_tahun, \
           p.created_at AS periode_created_at, p.updated_at AS periode_updated_at, \
           st.nama AS status_nama, \
           st.created_at AS status_created_at, st.updated_at AS status_updated_at \
    FROM usulan u \
    JOIN skpd s ON s.id = u.skpd_id \
    JOIN periode p ON p.id = u.periode_id \
    JOIN status_usulan st ON st.id = u.status_id";

#[derive(sqlx::FromRow)]
struct UsulanRow {
    id: i64,
    judul: String,
    deskripsi: String,
    pengusul: String,
    kode_wilayah: String,
    latitude: f64,
    longitude: f64,
    skpd_id: i64,
    periode_id: i64,
    status_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    skpd_nama: String,
    skpd_alamat: String,
    skpd_created_at: DateTime<Utc>,
    skpd_updated_at: DateTime<Utc>,
    periode_tahun: i32,
    periode_created_at: DateTime<Utc>,
    periode_updated_at: DateTime<Utc>,
    status_nama: String,
    status_created_at: DateTime<Utc>,
    status_updated_at: DateTime<Utc>,
}

impl UsulanRow {
    fn into_usulan(self, gambar_usulan: Vec<GambarUsulan>) -> Usulan {
        Usulan {
            id: self.id,
            judul: self.judul,
            deskripsi: self.deskripsi,
            pengusul: self.pengusul,
            kode_wilayah: self.kode_wilayah,
            latitude: self.latitude,
            longitude: self.longitude,
            skpd_id: self.skpd_id,
            periode_id: self.periode_id,
            status_id: self.status_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
            skpd: Skpd {
                id: self.skpd_id,
                nama: self.skpd_nama,
                alamat: self.skpd_alamat,
                created_at: self.skpd_created_at,
                updated_at: self.skpd_updated_at,
            },
            periode: Periode {
                id: self.periode_id,
                tahun: self.periode_tahun,
                created_at: self.periode_created_at,
                updated_at: self.periode_updated_at,
            },
            status_usulan: StatusUsulan {
                id: self.status_id,
                nama: self.status_nama,
                created_at: self.status_created_at,
                updated_at: self.status_updated_at,
            },
            gambar_usulan,
        }
    }
}

/// Load images for a set of proposals, grouped by proposal id.
async fn find_gambar_for(
    pool: &PgPool,
    usulan_ids: &[i64],
) -> Result<HashMap<i64, Vec<GambarUsulan>>, sqlx::Error> {
    if usulan_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, GambarUsulan>(
        "SELECT id, usulan_id, file_path, keterangan, created_at, updated_at \
         FROM gambar_usulan WHERE usulan_id = ANY($1) ORDER BY id ASC",
    )
    .bind(usulan_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<GambarUsulan>> = HashMap::new();
    for row in rows {
        grouped.entry(row.usulan_id).or_default().push(row);
    }
    Ok(grouped)
}

async fn attach_gambar(pool: &PgPool, rows: Vec<UsulanRow>) -> Result<Vec<Usulan>, sqlx::Error> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut gambar = find_gambar_for(pool, &ids).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let images = gambar.remove(&row.id).unwrap_or_default();
            row.into_usulan(images)
        })
        .collect())
}

/// Filtered, paginated listing of visible proposals, newest first.
pub async fn find_paginated(pool: &PgPool, query: &UsulanQuery) -> Result<UsulanPage, sqlx::Error> {
    let (where_clause, params) = build_where_clause(query, 0);

    let count_sql = format!(
        "SELECT COUNT(*) FROM usulan u \
         JOIN periode p ON p.id = u.periode_id \
         WHERE {where_clause}"
    );
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for param in &params {
        count_query = match param {
            FilterParam::Int(v) => count_query.bind(*v),
            FilterParam::Text(s) => count_query.bind(s.as_str()),
        };
    }
    let total = count_query.fetch_one(pool).await?;

    let n = params.len();
    let data_sql = format!(
        "{SELECT_USULAN} WHERE {where_clause} \
         ORDER BY u.created_at DESC, u.id DESC \
         LIMIT ${} OFFSET ${}",
        n + 1,
        n + 2
    );
    let mut data_query = sqlx::query_as::<_, UsulanRow>(&data_sql);
    for param in &params {
        data_query = match param {
            FilterParam::Int(v) => data_query.bind(*v),
            FilterParam::Text(s) => data_query.bind(s.as_str()),
        };
    }
    let rows = data_query
        .bind(query.limit)
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

    let data = attach_gambar(pool, rows).await?;

    Ok(UsulanPage {
        data,
        pagination: Pagination::new(query.page, query.limit, total),
    })
}

/// A single visible proposal. `None` when absent or soft-deleted.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Usulan>, sqlx::Error> {
    let sql = format!("{SELECT_USULAN} WHERE u.id = $1 AND u.deleted_at IS NULL");
    let row = sqlx::query_as::<_, UsulanRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(attach_gambar(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

async fn insert_gambar(
    conn: &mut PgConnection,
    usulan_id: i64,
    gambar: &[NewGambar],
) -> Result<(), sqlx::Error> {
    if gambar.is_empty() {
        return Ok(());
    }

    let mut builder =
        QueryBuilder::<Postgres>::new("INSERT INTO gambar_usulan (usulan_id, file_path, keterangan) ");
    builder.push_values(gambar, |mut row, img| {
        row.push_bind(usulan_id)
            .push_bind(img.file_path.clone())
            .push_bind(img.keterangan.clone());
    });
    builder.build().execute(conn).await?;
    Ok(())
}

/// Roll back after `cause`; a failing rollback is reported alongside the cause.
async fn abort(tx: Transaction<'_, Postgres>, cause: sqlx::Error) -> StoreError {
    match tx.rollback().await {
        Ok(()) => StoreError::Db(cause),
        Err(rollback) => {
            log::error!("Rollback failed after {cause}: {rollback}");
            StoreError::Rollback { cause, rollback }
        }
    }
}

/// Insert a proposal and all of its images in one transaction, then re-read it
/// with its reference data joined.
pub async fn create(pool: &PgPool, new: &NewUsulan) -> Result<Usulan, StoreError> {
    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO usulan \
             (judul, deskripsi, pengusul, kode_wilayah, latitude, longitude, \
              skpd_id, periode_id, status_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING id",
    )
    .bind(&new.judul)
    .bind(&new.deskripsi)
    .bind(&new.pengusul)
    .bind(&new.kode_wilayah)
    .bind(new.latitude)
    .bind(new.longitude)
    .bind(new.skpd_id)
    .bind(new.periode_id)
    .bind(new.status_id)
    .fetch_one(&mut *tx)
    .await?;

    if let Err(e) = insert_gambar(&mut tx, id, &new.gambar).await {
        return Err(abort(tx, e).await);
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or(StoreError::Db(sqlx::Error::RowNotFound))
}

/// Apply the supplied fields to a visible proposal and, when `gambar` is
/// present, replace its whole image set. Both happen in one transaction.
///
/// Targeting a missing or soft-deleted id changes nothing and yields `Ok(None)`.
pub async fn update(pool: &PgPool, id: i64, changes: &UsulanChanges) -> Result<Option<Usulan>, StoreError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE usulan SET \
             judul = COALESCE($2, judul), \
             deskripsi = COALESCE($3, deskripsi), \
             pengusul = COALESCE($4, pengusul), \
             kode_wilayah = COALESCE($5, kode_wilayah), \
             latitude = COALESCE($6, latitude), \
             longitude = COALESCE($7, longitude), \
             skpd_id = COALESCE($8, skpd_id), \
             periode_id = COALESCE($9, periode_id), \
             status_id = COALESCE($10, status_id), \
             updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .bind(changes.judul.as_deref())
    .bind(changes.deskripsi.as_deref())
    .bind(changes.pengusul.as_deref())
    .bind(changes.kode_wilayah.as_deref())
    .bind(changes.latitude)
    .bind(changes.longitude)
    .bind(changes.skpd_id)
    .bind(changes.periode_id)
    .bind(changes.status_id)
    .execute(&mut *tx)
    .await;

    let rows_affected = match updated {
        Ok(result) => result.rows_affected(),
        Err(e) => return Err(abort(tx, e).await),
    };

    if rows_affected > 0 {
        if let Some(gambar) = &changes.gambar {
            if let Err(e) = replace_gambar(&mut tx, id, gambar).await {
                return Err(abort(tx, e).await);
            }
        }
    }

    tx.commit().await?;

    Ok(find_by_id(pool, id).await?)
}

async fn replace_gambar(
    conn: &mut PgConnection,
    usulan_id: i64,
    gambar: &[NewGambar],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM gambar_usulan WHERE usulan_id = $1")
        .bind(usulan_id)
        .execute(&mut *conn)
        .await?;
    insert_gambar(conn, usulan_id, gambar).await
}

/// Mark a visible proposal as deleted. Images are kept. Returns false when
/// nothing matched (absent or already deleted).
pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE usulan SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
