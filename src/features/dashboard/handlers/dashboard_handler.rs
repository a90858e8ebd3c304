use axum::{extract::State, Json};
use std::sync::Arc;

use crate::features::auth::model::SessionUser;
use crate::features::dashboard::dtos::DashboardOverviewDto;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

/// Booking counts, income figures and recent bookings of the signed-in driver
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard overview", body = ApiResponse<DashboardOverviewDto>),
        (status = 303, description = "No session, redirect to login")
    ),
    security(
        ("session_cookie" = [])
    )
)]
pub async fn get_overview(
    user: SessionUser,
    State(service): State<Arc<DashboardService>>,
) -> Json<ApiResponse<DashboardOverviewDto>> {
    let overview = service.get_overview(user.user_id).await;
    Json(ApiResponse::success(Some(overview), None, None))
}
