//! Catalog HTTP Routes
//!
//! Connectivity check and schema table listing.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::records::{RecordService, TableListing};

use super::errors::ApiResult;
use super::worker::run_blocking;

#[derive(Debug, Serialize)]
pub struct ConnectionStatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct LibraryQuery {
    pub library: String,
}

/// Create catalog routes
pub fn catalog_routes(service: Arc<RecordService>) -> Router {
    Router::new()
        .route("/test-connection", get(test_connection_handler))
        .route("/tables", get(list_tables_handler))
        .with_state(service)
}

async fn test_connection_handler(
    State(service): State<Arc<RecordService>>,
) -> ApiResult<Json<ConnectionStatusResponse>> {
    info!(connection = %service.describe_connection(), "testing connection");
    run_blocking(&service, |s| s.test_connection()).await?;
    info!("connection successful");

    Ok(Json(ConnectionStatusResponse {
        status: "connected".to_string(),
    }))
}

async fn list_tables_handler(
    State(service): State<Arc<RecordService>>,
    query: Result<Query<LibraryQuery>, QueryRejection>,
) -> ApiResult<Json<TableListing>> {
    let Query(LibraryQuery { library }) = query?;
    let listing = run_blocking(&service, move |s| s.list_tables(&library)).await?;
    Ok(Json(listing))
}
