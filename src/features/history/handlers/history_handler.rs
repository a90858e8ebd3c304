use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::SessionUser;
use crate::features::history::dtos::{HistoryQuery, HistoryResponseDto, HistoryTab, ReportDetailDto};
use crate::features::history::services::HistoryService;
use crate::shared::types::{ApiResponse, Meta};

/// Reports filed against the driver, or their finished bookings
#[utoipa::path(
    get,
    path = "/api/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History tab", body = ApiResponse<HistoryResponseDto>),
        (status = 400, description = "Unknown tab")
    ),
    security(("session_cookie" = [])),
    tag = "history"
)]
pub async fn get_history(
    user: SessionUser,
    State(service): State<Arc<HistoryService>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryResponseDto>>> {
    let tab = match query.tab.as_deref() {
        None | Some("") => HistoryTab::Reports,
        Some(raw) => raw.parse::<HistoryTab>()?,
    };

    let history = service.get_tab(user.user_id, tab).await;
    let total = match tab {
        HistoryTab::Reports => history.reports.len(),
        HistoryTab::Transactions => history.transactions.len(),
    };
    Ok(Json(ApiResponse::success(
        Some(history),
        None,
        Some(Meta::total(total)),
    )))
}

/// Full text of a single report
#[utoipa::path(
    get,
    path = "/api/history/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailDto>),
        (status = 404, description = "Report not found")
    ),
    security(("session_cookie" = [])),
    tag = "history"
)]
pub async fn get_report(
    user: SessionUser,
    State(service): State<Arc<HistoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportDetailDto>>> {
    let report = service.get_report(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}
