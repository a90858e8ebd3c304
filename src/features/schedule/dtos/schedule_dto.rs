use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::schedule::board::{
    BoardAction, BoardEntry, BoardTab, BookingCard, BookingStage, DriverBoard, SecondaryAction,
    Transition,
};
use crate::features::schedule::overlay::MapOverlay;
use crate::shared::format::{card_datetime, distance_label, duration_label, format_money};

/// Booking card as displayed; coordinates are passed through untouched
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingCardDto {
    pub id: Uuid,
    #[schema(example = "BK-3131")]
    pub reference: String,
    pub passenger: String,
    pub phone: String,
    pub pickup: String,
    pub pickup_lat: String,
    pub pickup_lng: String,
    pub dropoff: String,
    pub dropoff_lat: String,
    pub dropoff_lng: String,
    #[schema(example = "4.2 km")]
    pub distance: String,
    #[schema(example = "45 mins")]
    pub time: String,
    #[schema(example = "Sep 15, 2025 08:30 AM")]
    pub datetime: String,
    pub payment: String,
    #[schema(example = "₱126.00")]
    pub fare: String,
}

impl From<&BookingCard> for BookingCardDto {
    fn from(card: &BookingCard) -> Self {
        Self {
            id: card.id,
            reference: card.reference.clone(),
            passenger: card.passenger_name.clone(),
            phone: card.passenger_phone.clone(),
            pickup: card.pickup_location.clone(),
            pickup_lat: card.pickup_lat.clone(),
            pickup_lng: card.pickup_lng.clone(),
            dropoff: card.dropoff_location.clone(),
            dropoff_lat: card.dropoff_lat.clone(),
            dropoff_lng: card.dropoff_lng.clone(),
            distance: distance_label(card.distance_km),
            time: duration_label(card.duration_minutes),
            datetime: card_datetime(card.scheduled_at),
            payment: card.payment_method.clone(),
            fare: format_money(card.fare),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardEntryDto {
    pub booking: BookingCardDto,
    pub stage: BookingStage,
    pub status_label: String,
    pub arrival_enabled: bool,
    pub secondary_action: SecondaryAction,
}

impl From<&BoardEntry> for BoardEntryDto {
    fn from(entry: &BoardEntry) -> Self {
        Self {
            booking: BookingCardDto::from(&entry.card),
            stage: entry.stage,
            status_label: entry.status_label.clone(),
            arrival_enabled: entry.arrival_enabled,
            secondary_action: entry.secondary_action,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardDto {
    pub active_tab: BoardTab,
    pub new_bookings: Vec<BoardEntryDto>,
    /// Most recently accepted first
    pub ongoing: Vec<BoardEntryDto>,
    /// Containers that currently hold a map overlay
    pub open_overlays: Vec<String>,
}

impl BoardDto {
    pub fn new(board: &DriverBoard, open_overlays: Vec<String>) -> Self {
        Self {
            active_tab: board.active_tab,
            new_bookings: board.new_bookings.iter().map(BoardEntryDto::from).collect(),
            ongoing: board.ongoing.iter().map(BoardEntryDto::from).collect(),
            open_overlays,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDto {
    pub booking_id: Uuid,
    pub action: BoardAction,
    pub stage: BookingStage,
    /// `false` when the action was a repeat with no effect
    pub changed: bool,
    pub active_tab: BoardTab,
    /// Absent once the booking has left the board
    pub entry: Option<BoardEntryDto>,
}

impl From<&Transition> for TransitionDto {
    fn from(transition: &Transition) -> Self {
        Self {
            booking_id: transition.booking_id,
            action: transition.action,
            stage: transition.stage,
            changed: transition.changed,
            active_tab: transition.active_tab,
            entry: transition.entry.as_ref().map(BoardEntryDto::from),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CancelBookingDto {
    #[serde(default)]
    pub confirmed: bool,
}

/// Read view of one booking with its freshly opened map overlay
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailsDto {
    pub booking: BookingCardDto,
    pub stage: BookingStage,
    pub overlay: MapOverlay,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactPassengerDto {
    pub conversation_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OverlayClosedDto {
    pub container: String,
    /// `false` when nothing was open in that container
    pub closed: bool,
}
