use crate::models::usulan::{NewGambar, NewUsulan, UsulanChanges};

pub const MSG_GAMBAR_REQUIRED: &str = "Minimal 1 gambar diperlukan untuk usulan";

const MAX_JUDUL: usize = 255;
const MAX_PENGUSUL: usize = 255;
const MAX_KODE_WILAYAH: usize = 50;

/// Pulls required values out of a request body, remembering which were absent.
/// Blank strings count as absent.
#[derive(Default)]
struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    fn text(&mut self, value: &Option<String>, name: &'static str) -> String {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    fn value<T: Default>(&mut self, value: Option<T>, name: &'static str) -> T {
        value.unwrap_or_else(|| {
            self.missing.push(name);
            T::default()
        })
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|v| v.trim().to_string())
}

fn validate_max_len(value: &Option<String>, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.as_deref()?.trim();
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} maksimal {max_len} karakter"));
    }
    None
}

fn validate_not_blank(value: &Option<String>, field_name: &str) -> Option<String> {
    match value {
        Some(v) if v.trim().is_empty() => Some(format!("{field_name} tidak boleh kosong")),
        _ => None,
    }
}

fn validate_range(value: Option<f64>, field_name: &str, bound: f64) -> Option<String> {
    let v = value?;
    if !v.is_finite() || v < -bound || v > bound {
        return Some(format!("{field_name} harus di antara -{bound} dan {bound}"));
    }
    None
}

fn validate_id(value: Option<i64>, field_name: &str) -> Option<String> {
    match value {
        Some(v) if v <= 0 => Some(format!("{field_name} harus berupa angka positif")),
        _ => None,
    }
}

fn validate_gambar(gambar: &[NewGambar]) -> Vec<String> {
    gambar
        .iter()
        .enumerate()
        .filter(|(_, img)| img.file_path.trim().is_empty())
        .map(|(i, _)| format!("file_path gambar ke-{} diperlukan", i + 1))
        .collect()
}

/// Checks that apply to every field that is present, on create and update alike.
fn value_errors(body: &UsulanChanges) -> Vec<String> {
    let mut errors = Vec::new();
    errors.extend(validate_not_blank(&body.judul, "judul"));
    errors.extend(validate_not_blank(&body.deskripsi, "deskripsi"));
    errors.extend(validate_not_blank(&body.pengusul, "pengusul"));
    errors.extend(validate_not_blank(&body.kode_wilayah, "kode_wilayah"));
    errors.extend(validate_max_len(&body.judul, "judul", MAX_JUDUL));
    errors.extend(validate_max_len(&body.pengusul, "pengusul", MAX_PENGUSUL));
    errors.extend(validate_max_len(&body.kode_wilayah, "kode_wilayah", MAX_KODE_WILAYAH));
    errors.extend(validate_range(body.latitude, "latitude", 90.0));
    errors.extend(validate_range(body.longitude, "longitude", 180.0));
    errors.extend(validate_id(body.skpd_id, "skpd_id"));
    errors.extend(validate_id(body.periode_id, "periode_id"));
    errors.extend(validate_id(body.status_id, "status_id"));
    if let Some(gambar) = &body.gambar {
        errors.extend(validate_gambar(gambar));
    }
    errors
}

/// Turn a create request into a complete proposal, or a user-facing message.
pub fn validate_create(body: &UsulanChanges) -> Result<NewUsulan, String> {
    let mut required = Required::default();
    let new = NewUsulan {
        judul: required.text(&body.judul, "judul"),
        deskripsi: required.text(&body.deskripsi, "deskripsi"),
        pengusul: required.text(&body.pengusul, "pengusul"),
        kode_wilayah: required.text(&body.kode_wilayah, "kode_wilayah"),
        latitude: required.value(body.latitude, "latitude"),
        longitude: required.value(body.longitude, "longitude"),
        skpd_id: required.value(body.skpd_id, "skpd_id"),
        periode_id: required.value(body.periode_id, "periode_id"),
        status_id: required.value(body.status_id, "status_id"),
        gambar: body.gambar.clone().unwrap_or_default(),
    };
    if !required.missing.is_empty() {
        return Err(format!("Field berikut diperlukan: {}", required.missing.join(", ")));
    }

    if new.gambar.is_empty() {
        return Err(MSG_GAMBAR_REQUIRED.to_string());
    }

    let errors = value_errors(body);
    if !errors.is_empty() {
        return Err(errors.join("; "));
    }

    Ok(new)
}

/// Partial update: only the supplied fields are checked. Returns the changes
/// with text fields trimmed, the same way create stores them.
pub fn validate_update(body: &UsulanChanges) -> Result<UsulanChanges, String> {
    let errors = value_errors(body);
    if !errors.is_empty() {
        return Err(errors.join("; "));
    }

    Ok(UsulanChanges {
        judul: trimmed(&body.judul),
        deskripsi: trimmed(&body.deskripsi),
        pengusul: trimmed(&body.pengusul),
        kode_wilayah: trimmed(&body.kode_wilayah),
        ..body.clone()
    })
}
