use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::wallet::handlers;
use crate::features::wallet::services::WalletService;

pub fn routes(wallet_service: Arc<WalletService>) -> Router {
    Router::new()
        .route("/api/wallet", get(handlers::get_wallet))
        .with_state(wallet_service)
}
