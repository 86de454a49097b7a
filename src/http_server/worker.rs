//! Runs record service calls on the blocking pool
//!
//! ODBC calls block the calling thread, so each request's session lives
//! entirely inside one `spawn_blocking` task.

use std::sync::Arc;

use crate::records::{RecordService, ServiceResult};

use super::errors::{ApiError, ApiResult};

pub(crate) async fn run_blocking<T, F>(service: &Arc<RecordService>, op: F) -> ApiResult<T>
where
    F: FnOnce(&RecordService) -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(service);
    let outcome = tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))?;
    Ok(outcome?)
}
