// Demerit Registry - Core Library
// Exposes all modules for use in the CLI and tests

pub mod validators;
pub mod temporal;
pub mod person;
pub mod rules;
pub mod error;
pub mod store;
pub mod db;
pub mod service;
pub mod import;
pub mod config;

// Re-export commonly used types
pub use validators::{
    is_valid_identifier, is_valid_address, is_valid_date, parse_date, format_date,
    DELIMITER, DATE_FORMAT,
};
pub use person::{PersonRecord, DemeritEntry};
pub use rules::{Amendment, check_amendment};
pub use error::{RuleViolation, RecordError, RecordResult};
pub use store::{RecordStore, MemoryRecordStore, FileRecordStore};
pub use db::SqliteRecordStore;
pub use service::{PersonRecordService, Accrual, AccrualResult};
pub use import::{load_people_csv, import_people, ImportSummary};
pub use config::{RegistryConfig, Backend};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
