pub mod master;
pub mod pagination;
pub mod store;
pub mod usulan;
