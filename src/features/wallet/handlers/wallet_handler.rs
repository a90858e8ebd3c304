use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::model::SessionUser;
use crate::features::wallet::dtos::{WalletPeriod, WalletQuery, WalletSummaryDto};
use crate::features::wallet::services::WalletService;
use crate::shared::types::ApiResponse;

/// Earnings of the signed-in driver over a period
#[utoipa::path(
    get,
    path = "/api/wallet",
    params(WalletQuery),
    responses(
        (status = 200, description = "Wallet summary", body = ApiResponse<WalletSummaryDto>),
        (status = 400, description = "Unknown period")
    ),
    security(("session_cookie" = [])),
    tag = "wallet"
)]
pub async fn get_wallet(
    user: SessionUser,
    State(service): State<Arc<WalletService>>,
    Query(query): Query<WalletQuery>,
) -> Result<Json<ApiResponse<WalletSummaryDto>>> {
    let period = match query.period.as_deref() {
        None | Some("") => WalletPeriod::SevenDays,
        Some(raw) => raw.parse::<WalletPeriod>()?,
    };

    let summary = service.get_summary(user.user_id, period).await;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}
