//! # Record Service
//!
//! Catalog browsing and the CRUD protocol for part master records.
//!
//! - [`RecordService`] - the operations, one session per call
//! - [`Part`], [`TableEntry`] - response shapes
//! - [`ServiceError`] - validation, not-found, conflict and connection outcomes
//! - [`MemoryStore`] - in-memory backing store for tests and local runs

pub mod catalog;
pub mod errors;
pub mod memory;
pub mod part;
pub mod service;
pub mod statements;

pub use catalog::{TableEntry, TableListing};
pub use errors::{ServiceError, ServiceResult};
pub use memory::MemoryStore;
pub use part::{NewPart, Part, PartListing, PartUpdate};
pub use service::RecordService;
pub use statements::PartStatements;
