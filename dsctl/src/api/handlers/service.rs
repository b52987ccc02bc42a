//! HTTP handler for the service root.

use crate::api::models::service::ServiceInfo;
use axum::response::Json;

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    summary = "Service banner",
    responses(
        (status = 200, description = "Service name, status and version", body = ServiceInfo),
    )
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}
