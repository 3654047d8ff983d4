//! Tenant-scoped show and episode handlers.
//!
//! The tenant always comes from [`TrustedTenant`]; a show owned by another
//! tenant is reported exactly like a missing one.

use axum::extract::{Path, State};
use podhost_core::data::{Episode, Show};
use podhost_core::types::ShowId;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::middleware::{RequestId, TrustedTenant};
use crate::response::ApiResponse;
use crate::state::AppState;

pub(crate) fn parse_show_id(raw: String) -> ApiResult<ShowId> {
    ShowId::new(raw).map_err(|_| ApiError::NotFound("show".to_string()))
}

/// List the tenant's shows.
///
/// GET /api/shows
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
    TrustedTenant(tenant): TrustedTenant,
    request_id: RequestId,
) -> ApiResult<ApiResponse<Vec<Show>>> {
    let shows = state.content().list_shows(&tenant).await?;
    Ok(ApiResponse::success(shows).with_request_id(request_id.0))
}

/// Get a show by ID.
///
/// GET /api/shows/{show_id}
pub async fn get_show(
    State(state): State<Arc<AppState>>,
    TrustedTenant(tenant): TrustedTenant,
    request_id: RequestId,
    Path(show_id): Path<String>,
) -> ApiResult<ApiResponse<Show>> {
    let show_id = parse_show_id(show_id)?;
    let show = state
        .content()
        .show(&tenant, &show_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("show {show_id}")))?;

    Ok(ApiResponse::success(show).with_request_id(request_id.0))
}

/// List a show's episodes, newest first.
///
/// GET /api/shows/{show_id}/episodes
pub async fn list_episodes(
    State(state): State<Arc<AppState>>,
    TrustedTenant(tenant): TrustedTenant,
    request_id: RequestId,
    Path(show_id): Path<String>,
) -> ApiResult<ApiResponse<Vec<Episode>>> {
    let show_id = parse_show_id(show_id)?;
    let episodes = state
        .content()
        .list_episodes(&tenant, &show_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("show {show_id}")))?;

    Ok(ApiResponse::success(episodes).with_request_id(request_id.0))
}
