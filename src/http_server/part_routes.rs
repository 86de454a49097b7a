//! Part HTTP Routes
//!
//! CRUD endpoints for the part master (`/buhin`).

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::records::{NewPart, Part, PartListing, PartUpdate, RecordService};

use super::errors::ApiResult;
use super::worker::run_blocking;

/// Optional lower bound on the part number
#[derive(Debug, Default, Deserialize)]
pub struct PartFilter {
    pub buno: Option<i32>,
}

/// Create part routes
pub fn part_routes(service: Arc<RecordService>) -> Router {
    Router::new()
        .route("/buhin", get(list_parts_handler).post(create_part_handler))
        .route(
            "/buhin/:code",
            get(get_part_handler)
                .put(update_part_handler)
                .delete(delete_part_handler),
        )
        .with_state(service)
}

async fn list_parts_handler(
    State(service): State<Arc<RecordService>>,
    filter: Result<Query<PartFilter>, QueryRejection>,
) -> ApiResult<Json<PartListing>> {
    let Query(filter) = filter?;
    let listing = run_blocking(&service, move |s| s.list_parts(filter.buno)).await?;
    Ok(Json(listing))
}

async fn get_part_handler(
    State(service): State<Arc<RecordService>>,
    code: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Part>> {
    let Path(code) = code?;
    let part = run_blocking(&service, move |s| s.get_part(code)).await?;
    Ok(Json(part))
}

async fn create_part_handler(
    State(service): State<Arc<RecordService>>,
    body: Result<Json<NewPart>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Part>)> {
    let Json(new_part) = body?;
    let part = run_blocking(&service, move |s| s.create_part(new_part)).await?;
    Ok((StatusCode::CREATED, Json(part)))
}

async fn update_part_handler(
    State(service): State<Arc<RecordService>>,
    code: Result<Path<i32>, PathRejection>,
    body: Result<Json<PartUpdate>, JsonRejection>,
) -> ApiResult<Json<Part>> {
    let Path(code) = code?;
    let Json(update) = body?;
    let part = run_blocking(&service, move |s| s.update_part(code, update)).await?;
    Ok(Json(part))
}

async fn delete_part_handler(
    State(service): State<Arc<RecordService>>,
    code: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(code) = code?;
    run_blocking(&service, move |s| s.delete_part(code)).await?;
    Ok(StatusCode::NO_CONTENT)
}
