//! Tenant page models.
//!
//! These handlers serve the tenant namespace (`/tenant/{tenant_id}/...`)
//! that the routing middleware rewrites user-facing paths into. The tenant in
//! the path must match the trusted tenant; otherwise the page does not exist.

use axum::extract::{Path, State};
use podhost_core::data::{Episode, Show, TenantProfile};
use podhost_core::types::TenantId;
use serde::Serialize;
use std::sync::Arc;

use super::shows::parse_show_id;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{RequestId, TrustedTenant};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Tenant home page model.
#[derive(Debug, Serialize)]
pub struct TenantPage {
    /// Tenant profile and branding
    pub tenant: TenantProfile,
    /// The tenant's shows
    pub shows: Vec<Show>,
}

/// Show page model.
#[derive(Debug, Serialize)]
pub struct ShowPage {
    /// Tenant profile and branding
    pub tenant: TenantProfile,
    /// The show
    pub show: Show,
    /// The show's episodes, newest first
    pub episodes: Vec<Episode>,
}

fn ensure_same_tenant(trusted: &TenantId, from_path: &str) -> ApiResult<()> {
    if trusted.as_str() == from_path {
        Ok(())
    } else {
        Err(ApiError::NotFound("page".to_string()))
    }
}

async fn profile(state: &AppState, tenant: &TenantId) -> ApiResult<TenantProfile> {
    state
        .content()
        .tenant(tenant)
        .await?
        .ok_or(ApiError::TenantNotFound)
}

/// Tenant home page.
///
/// GET /tenant/{tenant_id}
pub async fn tenant_home(
    State(state): State<Arc<AppState>>,
    TrustedTenant(tenant): TrustedTenant,
    request_id: RequestId,
    Path(path_tenant): Path<String>,
) -> ApiResult<ApiResponse<TenantPage>> {
    ensure_same_tenant(&tenant, &path_tenant)?;

    let profile = profile(&state, &tenant).await?;
    let shows = state.content().list_shows(&tenant).await?;

    Ok(ApiResponse::success(TenantPage {
        tenant: profile,
        shows,
    })
    .with_request_id(request_id.0))
}

/// Show page.
///
/// GET /tenant/{tenant_id}/shows/{show_id}
pub async fn show_page(
    State(state): State<Arc<AppState>>,
    TrustedTenant(tenant): TrustedTenant,
    request_id: RequestId,
    Path((path_tenant, show_id)): Path<(String, String)>,
) -> ApiResult<ApiResponse<ShowPage>> {
    ensure_same_tenant(&tenant, &path_tenant)?;
    let show_id = parse_show_id(show_id)?;

    let profile = profile(&state, &tenant).await?;
    let content = state.content();
    let show = content
        .show(&tenant, &show_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("show {show_id}")))?;
    let episodes = content
        .list_episodes(&tenant, &show_id)
        .await?
        .unwrap_or_default();

    Ok(ApiResponse::success(ShowPage {
        tenant: profile,
        show,
        episodes,
    })
    .with_request_id(request_id.0))
}
