use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::schedule::handlers;
use crate::features::schedule::services::ScheduleService;

/// Create schedule routes (behind the session gate)
pub fn routes(schedule_service: Arc<ScheduleService>) -> Router {
    Router::new()
        .route("/api/schedule", get(handlers::get_board))
        .route("/api/schedule/events", get(handlers::stream_events))
        .route(
            "/api/schedule/bookings/{id}/details",
            get(handlers::get_details),
        )
        .route(
            "/api/schedule/bookings/{id}/accept",
            post(handlers::accept_booking),
        )
        .route(
            "/api/schedule/bookings/{id}/arrive",
            post(handlers::confirm_arrival),
        )
        .route(
            "/api/schedule/bookings/{id}/drop-off",
            post(handlers::confirm_drop_off),
        )
        .route(
            "/api/schedule/bookings/{id}/cancel",
            post(handlers::cancel_booking),
        )
        .route(
            "/api/schedule/bookings/{id}/contact",
            post(handlers::contact_passenger),
        )
        .route(
            "/api/schedule/overlays/{container}",
            delete(handlers::close_overlay),
        )
        .with_state(schedule_service)
}
