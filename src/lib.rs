// BreakMyWallet - vehicle maintenance log with SQLite storage and JSON export/import

pub mod catalog;
pub mod config;
pub mod error;
pub mod exchange;
pub mod models;
pub mod store;
pub mod view;

// Re-export main types for convenience
pub use catalog::{DefaultTask, Vehicle, find_vehicle, list_default_tasks, list_vehicles};
pub use config::Config;
pub use error::{Error, ErrorKind, ImportCause, Result};
pub use models::{MaintenanceRecord, RecordRow};
pub use store::Store;
