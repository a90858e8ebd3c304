use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    Json,
};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::SessionUser;
use crate::features::schedule::board::BoardAction;
use crate::features::schedule::dtos::{
    BoardDto, BookingDetailsDto, CancelBookingDto, ContactPassengerDto, OverlayClosedDto,
    TransitionDto,
};
use crate::features::schedule::services::{BoardEvent, ScheduleService};
use crate::shared::types::ApiResponse;

// ============================================================================
// Board
// ============================================================================

/// The driver's new and ongoing bookings
#[utoipa::path(
    get,
    path = "/api/schedule",
    responses(
        (status = 200, description = "Booking board", body = ApiResponse<BoardDto>)
    ),
    security(("session_cookie" = [])),
    tag = "schedule"
)]
pub async fn get_board(
    user: SessionUser,
    State(service): State<Arc<ScheduleService>>,
) -> Json<ApiResponse<BoardDto>> {
    let board = service.board(user.user_id).await;
    Json(ApiResponse::success(Some(board), None, None))
}

fn sse_event(event: &BoardEvent) -> std::result::Result<Event, axum::Error> {
    Event::default()
        .event(event.name())
        .json_data(TransitionDto::from(&event.transition))
}

/// Live board changes of the signed-in driver
#[utoipa::path(
    get,
    path = "/api/schedule/events",
    responses(
        (status = 200, description = "SSE stream of board transitions", content_type = "text/event-stream")
    ),
    security(("session_cookie" = [])),
    tag = "schedule"
)]
pub async fn stream_events(
    user: SessionUser,
    State(service): State<Arc<ScheduleService>>,
) -> Response {
    let driver_id = user.user_id;
    let stream = BroadcastStream::new(service.subscribe()).filter_map(move |message| {
        match message {
            Ok(event) if event.driver_id == driver_id => Some(sse_event(&event)),
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!("Board event stream for {} lagged by {}", driver_id, skipped);
                None
            }
        }
    });

    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("ping"),
        )
        .into_response()
}

// ============================================================================
// Booking actions
// ============================================================================

#[utoipa::path(
    get,
    path = "/api/schedule/bookings/{id}/details",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking details with map overlay", body = ApiResponse<BookingDetailsDto>),
        (status = 400, description = "Booking has invalid coordinates"),
        (status = 404, description = "Booking not on the board")
    ),
    security(("session_cookie" = [])),
    tag = "schedule"
)]
pub async fn get_details(
    user: SessionUser,
    State(service): State<Arc<ScheduleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingDetailsDto>>> {
    let details = service.details(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(Some(details), None, None)))
}

async fn transition(
    service: &ScheduleService,
    user: &SessionUser,
    id: Uuid,
    action: BoardAction,
    confirmed: bool,
    message: &str,
) -> Result<Json<ApiResponse<TransitionDto>>> {
    let transition = service.apply(user.user_id, id, action, confirmed).await?;
    Ok(Json(ApiResponse::success(
        Some(transition),
        Some(message.to_string()),
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/schedule/bookings/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking accepted", body = ApiResponse<TransitionDto>),
        (status = 400, description = "Booking has invalid coordinates"),
        (status = 404, description = "Booking not on the board"),
        (status = 409, description = "Booking is not new")
    ),
    security(("session_cookie" = [])),
    tag = "schedule"
)]
pub async fn accept_booking(
    user: SessionUser,
    State(service): State<Arc<ScheduleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransitionDto>>> {
    transition(&service, &user, id, BoardAction::Accept, false, "Ride confirmed").await
}

#[utoipa::path(
    post,
    path = "/api/schedule/bookings/{id}/arrive",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Arrival confirmed (repeat is a no-op)", body = ApiResponse<TransitionDto>),
        (status = 404, description = "Booking not on the board"),
        (status = 409, description = "Booking is not accepted")
    ),
    security(("session_cookie" = [])),
    tag = "schedule"
)]
pub async fn confirm_arrival(
    user: SessionUser,
    State(service): State<Arc<ScheduleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransitionDto>>> {
    transition(
        &service,
        &user,
        id,
        BoardAction::Arrive,
        false,
        "Arrival confirmed! Passenger has been notified.",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/schedule/bookings/{id}/drop-off",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Passenger dropped off", body = ApiResponse<TransitionDto>),
        (status = 404, description = "Booking not on the board"),
        (status = 409, description = "Arrival not confirmed yet")
    ),
    security(("session_cookie" = [])),
    tag = "schedule"
)]
pub async fn confirm_drop_off(
    user: SessionUser,
    State(service): State<Arc<ScheduleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransitionDto>>> {
    transition(&service, &user, id, BoardAction::DropOff, false, "Drop-off confirmed").await
}

#[utoipa::path(
    post,
    path = "/api/schedule/bookings/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    request_body = CancelBookingDto,
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<TransitionDto>),
        (status = 400, description = "Cancellation not confirmed"),
        (status = 404, description = "Booking not on the board"),
        (status = 409, description = "Booking can no longer be cancelled")
    ),
    security(("session_cookie" = [])),
    tag = "schedule"
)]
pub async fn cancel_booking(
    user: SessionUser,
    State(service): State<Arc<ScheduleService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CancelBookingDto>,
) -> Result<Json<ApiResponse<TransitionDto>>> {
    transition(
        &service,
        &user,
        id,
        BoardAction::Cancel,
        dto.confirmed,
        "Booking cancelled",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/schedule/bookings/{id}/contact",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Conversation with the passenger", body = ApiResponse<ContactPassengerDto>),
        (status = 404, description = "Booking not on the board")
    ),
    security(("session_cookie" = [])),
    tag = "schedule"
)]
pub async fn contact_passenger(
    user: SessionUser,
    State(service): State<Arc<ScheduleService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ContactPassengerDto>>> {
    let contact = service.contact_passenger(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(Some(contact), None, None)))
}

// ============================================================================
// Overlays
// ============================================================================

#[utoipa::path(
    delete,
    path = "/api/schedule/overlays/{container}",
    params(
        ("container" = String, Path, description = "Map container id")
    ),
    responses(
        (status = 200, description = "Overlay torn down (no-op when none was open)", body = ApiResponse<OverlayClosedDto>)
    ),
    security(("session_cookie" = [])),
    tag = "schedule"
)]
pub async fn close_overlay(
    user: SessionUser,
    State(service): State<Arc<ScheduleService>>,
    Path(container): Path<String>,
) -> Json<ApiResponse<OverlayClosedDto>> {
    let closed = service.close_overlay(user.user_id, &container).await;
    Json(ApiResponse::success(
        Some(OverlayClosedDto { container, closed }),
        None,
        None,
    ))
}
