use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::history::handlers;
use crate::features::history::services::HistoryService;

pub fn routes(history_service: Arc<HistoryService>) -> Router {
    Router::new()
        .route("/api/history", get(handlers::get_history))
        .route("/api/history/reports/{id}", get(handlers::get_report))
        .with_state(history_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_session_user, with_session, InMemoryBookings, InMemoryComplaints};
    use axum::http::StatusCode;
    use axum_test::TestServer;

    fn server() -> TestServer {
        let service = Arc::new(HistoryService::new(
            Arc::new(InMemoryComplaints::default()),
            Arc::new(InMemoryBookings::default()),
        ));
        TestServer::new(with_session(routes(service), test_session_user())).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_to_reports_tab() {
        let response = server().get("/api/history").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["tab"], "reports");
    }

    #[tokio::test]
    async fn test_unknown_tab_is_rejected() {
        let response = server().get("/api/history?tab=archive").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }
}
