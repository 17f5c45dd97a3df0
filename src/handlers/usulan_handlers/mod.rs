pub mod crud;
pub mod list;
pub mod validate;

pub use crud::{create, delete, read, update};
pub use list::list;

pub const MSG_NOT_FOUND: &str = "Usulan tidak ditemukan";
pub const MSG_INVALID_ID: &str = "ID usulan tidak valid";
