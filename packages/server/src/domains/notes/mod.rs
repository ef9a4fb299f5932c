//! Notes domain - user-scoped note storage

pub mod models;

pub use models::Note;
