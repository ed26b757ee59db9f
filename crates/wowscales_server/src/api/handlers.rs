//! Verification and health endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use log::{error, info, warn};
use serde::Serialize;
use wowscales_core::{
    current_timestamp, RepoError, ServiceResult, VerificationDetail, VerificationId,
    VerificationPayload, VerificationRepository, VerificationService, VerificationServiceError,
    VerificationSummary,
};

use super::error::{ApiError, GET_FAILED_MESSAGE, LIST_FAILED_MESSAGE, SAVE_FAILED_MESSAGE};
use crate::store::AppState;

pub const HEALTH_MESSAGE: &str = "WOW Scales API is healthy";
pub const SAVED_MESSAGE: &str = "Verification saved successfully";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct VerificationListResponse {
    pub verifications: Vec<VerificationSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub verification_id: VerificationId,
    pub message: &'static str,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE,
        timestamp: current_timestamp(),
    })
}

/// GET /api/verifications
pub async fn list_verifications(
    State(state): State<AppState>,
) -> Result<Json<VerificationListResponse>, ApiError> {
    let started = Instant::now();
    let result = run_blocking(&state, VerificationServiceError::ReadFailure, |repo| {
        VerificationService::new(repo).list_all()
    })
    .await;

    match result {
        Ok(verifications) => {
            info!(
                "event=verification_list module=api status=ok count={} duration_ms={}",
                verifications.len(),
                started.elapsed().as_millis()
            );
            Ok(Json(VerificationListResponse { verifications }))
        }
        Err(err) => Err(reject("verification_list", &err, LIST_FAILED_MESSAGE)),
    }
}

/// POST /api/verifications
///
/// The body is decoded here rather than through `Json<_>` so a malformed
/// payload takes the same failure path as a failed write.
pub async fn create_verification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let started = Instant::now();
    let payload = VerificationPayload::from_json(&body)
        .map_err(VerificationServiceError::from)
        .map_err(|err| reject("verification_create", &err, SAVE_FAILED_MESSAGE))?;

    let result = run_blocking(&state, VerificationServiceError::WriteFailure, move |repo| {
        VerificationService::new(repo).submit(payload)
    })
    .await;

    match result {
        Ok(verification_id) => {
            info!(
                "event=verification_create module=api status=ok verification_id={} duration_ms={}",
                verification_id,
                started.elapsed().as_millis()
            );
            Ok(Json(SubmitResponse {
                success: true,
                verification_id,
                message: SAVED_MESSAGE,
            }))
        }
        Err(err) => Err(reject("verification_create", &err, SAVE_FAILED_MESSAGE)),
    }
}

/// GET /api/verifications/:id
///
/// An id that is not an integer cannot exist, so it is reported as 404.
pub async fn get_verification(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<VerificationDetail>, ApiError> {
    let Ok(id) = raw_id.trim().parse::<VerificationId>() else {
        info!("event=verification_get module=api status=not_found reason=unparsable_id");
        return Err(ApiError::NotFound);
    };

    let started = Instant::now();
    let result = run_blocking(&state, VerificationServiceError::ReadFailure, move |repo| {
        VerificationService::new(repo).get_by_id(id)
    })
    .await;

    match result {
        Ok(detail) => {
            info!(
                "event=verification_get module=api status=ok verification_id={} duration_ms={}",
                id,
                started.elapsed().as_millis()
            );
            Ok(Json(detail))
        }
        Err(err) => Err(reject("verification_get", &err, GET_FAILED_MESSAGE)),
    }
}

/// Runs a service call on the blocking pool with a repository from the
/// shared store. Store-level failures are wrapped with `on_store_error`.
pub(crate) async fn run_blocking<T, F>(
    state: &AppState,
    on_store_error: fn(RepoError) -> VerificationServiceError,
    op: F,
) -> ServiceResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn VerificationRepository) -> ServiceResult<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    match tokio::task::spawn_blocking(move || store.with_repo(op)).await {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => Err(on_store_error(err)),
        Err(join_err) => {
            error!("event=store_task module=api status=error error={join_err}");
            Err(on_store_error(RepoError::Unavailable("store task aborted")))
        }
    }
}

fn reject(event: &str, err: &VerificationServiceError, failure_message: &'static str) -> ApiError {
    let api_err = ApiError::from_service(err, failure_message);
    match err {
        VerificationServiceError::NotFound(_) => {
            info!("event={event} module=api status=not_found error={err}");
        }
        VerificationServiceError::MalformedInput(_) => {
            warn!("event={event} module=api status=rejected error={err}");
        }
        VerificationServiceError::WriteFailure(_) | VerificationServiceError::ReadFailure(_) => {
            error!("event={event} module=api status=error error={err}");
        }
    }
    api_err
}
