//! # HTTP Server Module
//!
//! Axum server exposing the record service.
//!
//! # Endpoints
//!
//! - `/`, `/health` - Liveness
//! - `/api/test-connection` - Backing-store reachability
//! - `/api/tables?library=` - Catalog listing
//! - `/api/buhin[/{code}]` - Part master CRUD

pub mod catalog_routes;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod part_routes;
pub mod server;
mod worker;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{build_router, HttpServer};
