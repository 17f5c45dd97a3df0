// src/models/usulan/filter.rs

use super::types::UsulanQuery;

/// A value bound to a `$N` placeholder in a generated WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterParam {
    Int(i64),
    Text(String),
}

/// Build the parameterized WHERE fragment for a proposal listing.
/// Returns (sql_fragment, params_vec).
/// param_offset: the $N index to start from (so callers can append LIMIT/OFFSET).
///
/// Column aliases expected by the fragment: `u` = usulan, `p` = periode.
/// The soft-delete predicate is always present.
pub fn build_where_clause(query: &UsulanQuery, param_offset: usize) -> (String, Vec<FilterParam>) {
    let mut parts = vec!["u.deleted_at IS NULL".to_string()];
    let mut params: Vec<FilterParam> = vec![];

    if let Some(tahun) = query.tahun {
        params.push(FilterParam::Int(i64::from(tahun)));
        parts.push(format!("p.tahun = ${}", param_offset + params.len()));
    }
    if let Some(status_id) = query.status_id {
        params.push(FilterParam::Int(status_id));
        parts.push(format!("u.status_id = ${}", param_offset + params.len()));
    }
    if let Some(skpd_id) = query.skpd_id {
        params.push(FilterParam::Int(skpd_id));
        parts.push(format!("u.skpd_id = ${}", param_offset + params.len()));
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        params.push(FilterParam::Text(format!("%{}%", escape_like(search))));
        let n = param_offset + params.len();
        parts.push(format!("(u.judul ILIKE ${n} OR u.pengusul ILIKE ${n})"));
    }

    (parts.join(" AND "), params)
}

/// Escape LIKE metacharacters so user input only ever matches literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
