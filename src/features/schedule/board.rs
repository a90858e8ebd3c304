//! Per-driver booking board: a reducer over the `new` and `ongoing` collections.
//!
//! All transitions are pure and synchronous; locking and event fan-out live in the
//! service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::bookings::models::{Booking, BookingStatus};

pub const ACCEPTED_LABEL: &str = "Accepted";
pub const NEW_LABEL: &str = "New";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both parts must parse as finite numbers
    pub fn parse(lat: &str, lng: &str) -> Option<Self> {
        let lat = lat.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        let lng = lng.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some(Self { lat, lng })
    }

    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.lat + d_lat, self.lng + d_lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEndpoints {
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
}

/// Booking attributes as delivered by dispatch; coordinates stay raw until a map needs them
#[derive(Debug, Clone, PartialEq)]
pub struct BookingCard {
    pub id: Uuid,
    pub reference: String,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub pickup_location: String,
    pub pickup_lat: String,
    pub pickup_lng: String,
    pub dropoff_location: String,
    pub dropoff_lat: String,
    pub dropoff_lng: String,
    pub scheduled_at: DateTime<Utc>,
    pub distance_km: f64,
    pub duration_minutes: i32,
    pub payment_method: String,
    pub fare: Decimal,
}

impl From<&Booking> for BookingCard {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            reference: booking.reference.clone(),
            passenger_name: booking.passenger_name.clone(),
            passenger_phone: booking.passenger_phone.clone(),
            pickup_location: booking.pickup_location.clone(),
            pickup_lat: booking.pickup_lat.clone(),
            pickup_lng: booking.pickup_lng.clone(),
            dropoff_location: booking.dropoff_location.clone(),
            dropoff_lat: booking.dropoff_lat.clone(),
            dropoff_lng: booking.dropoff_lng.clone(),
            scheduled_at: booking.scheduled_at,
            distance_km: booking.distance_km,
            duration_minutes: booking.duration_minutes,
            payment_method: booking.payment_method.clone(),
            fare: booking.fare,
        }
    }
}

impl BookingCard {
    pub fn endpoints(&self) -> Result<RouteEndpoints, BoardError> {
        let pickup = Coordinate::parse(&self.pickup_lat, &self.pickup_lng);
        let dropoff = Coordinate::parse(&self.dropoff_lat, &self.dropoff_lng);
        match (pickup, dropoff) {
            (Some(pickup), Some(dropoff)) => Ok(RouteEndpoints { pickup, dropoff }),
            _ => Err(BoardError::InvalidCoordinates(self.reference.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStage {
    New,
    Accepted,
    Arrived,
    DroppedOff,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryAction {
    Cancel,
    ConfirmDropOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BoardTab {
    New,
    Ongoing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardEntry {
    pub card: BookingCard,
    pub stage: BookingStage,
    pub status_label: String,
    pub arrival_enabled: bool,
    pub secondary_action: SecondaryAction,
}

impl BoardEntry {
    fn new_booking(card: BookingCard) -> Self {
        Self {
            card,
            stage: BookingStage::New,
            status_label: NEW_LABEL.to_string(),
            arrival_enabled: false,
            secondary_action: SecondaryAction::Cancel,
        }
    }

    fn accepted(card: BookingCard) -> Self {
        Self {
            card,
            stage: BookingStage::Accepted,
            status_label: ACCEPTED_LABEL.to_string(),
            arrival_enabled: true,
            secondary_action: SecondaryAction::Cancel,
        }
    }

    fn mark_arrived(&mut self) {
        self.stage = BookingStage::Arrived;
        self.arrival_enabled = false;
        self.secondary_action = SecondaryAction::ConfirmDropOff;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BoardAction {
    Accept,
    Arrive,
    DropOff,
    Cancel,
}

impl BoardAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardAction::Accept => "accept",
            BoardAction::Arrive => "arrive",
            BoardAction::DropOff => "drop_off",
            BoardAction::Cancel => "cancel",
        }
    }
}

/// Result of applying an action; `entry` is `None` once the booking has left the board
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub booking_id: Uuid,
    pub action: BoardAction,
    pub stage: BookingStage,
    pub changed: bool,
    pub active_tab: BoardTab,
    pub entry: Option<BoardEntry>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("Booking {0} not found")]
    NotFound(Uuid),

    #[error("Booking {0} has invalid coordinates")]
    InvalidCoordinates(String),

    #[error("Cannot {action} a booking that is {stage:?}")]
    InvalidTransition {
        action: &'static str,
        stage: BookingStage,
    },

    #[error("Cancelling a booking must be confirmed")]
    ConfirmationRequired,
}

impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::NotFound(_) => AppError::NotFound(err.to_string()),
            BoardError::InvalidCoordinates(_) => AppError::Validation(err.to_string()),
            BoardError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            BoardError::ConfirmationRequired => AppError::BadRequest(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverBoard {
    pub new_bookings: Vec<BoardEntry>,
    /// Head is the most recently accepted booking
    pub ongoing: Vec<BoardEntry>,
    pub active_tab: BoardTab,
}

impl Default for DriverBoard {
    fn default() -> Self {
        Self {
            new_bookings: Vec::new(),
            ongoing: Vec::new(),
            active_tab: BoardTab::New,
        }
    }
}

impl DriverBoard {
    /// `pending` bookings become new, `accepted` and `ongoing` ones start in the ongoing tab
    pub fn seeded(bookings: &[Booking]) -> Self {
        let mut board = Self::default();
        for booking in bookings {
            let card = BookingCard::from(booking);
            match booking.status {
                BookingStatus::Pending => board.new_bookings.push(BoardEntry::new_booking(card)),
                BookingStatus::Accepted => board.ongoing.push(BoardEntry::accepted(card)),
                BookingStatus::Ongoing => {
                    let mut entry = BoardEntry::accepted(card);
                    entry.mark_arrived();
                    board.ongoing.push(entry);
                }
                BookingStatus::Completed | BookingStatus::Cancelled => {}
            }
        }
        board
    }

    pub fn find(&self, booking_id: Uuid) -> Option<&BoardEntry> {
        self.new_bookings
            .iter()
            .chain(self.ongoing.iter())
            .find(|e| e.card.id == booking_id)
    }

    fn position(&self, booking_id: Uuid) -> Option<(BoardTab, usize)> {
        if let Some(index) = self.new_bookings.iter().position(|e| e.card.id == booking_id) {
            return Some((BoardTab::New, index));
        }
        self.ongoing
            .iter()
            .position(|e| e.card.id == booking_id)
            .map(|index| (BoardTab::Ongoing, index))
    }

    /// Entry and parsed endpoints for the details view
    pub fn details(&self, booking_id: Uuid) -> Result<(&BoardEntry, RouteEndpoints), BoardError> {
        let entry = self
            .find(booking_id)
            .ok_or(BoardError::NotFound(booking_id))?;
        let endpoints = entry.card.endpoints()?;
        Ok((entry, endpoints))
    }

    /// `confirmed` only matters for `Cancel`
    pub fn apply(
        &mut self,
        booking_id: Uuid,
        action: BoardAction,
        confirmed: bool,
    ) -> Result<Transition, BoardError> {
        let (tab, index) = self
            .position(booking_id)
            .ok_or(BoardError::NotFound(booking_id))?;
        let stage = match tab {
            BoardTab::New => self.new_bookings[index].stage,
            BoardTab::Ongoing => self.ongoing[index].stage,
        };
        let invalid = || BoardError::InvalidTransition {
            action: action.as_str(),
            stage,
        };

        match (action, tab) {
            (BoardAction::Accept, BoardTab::New) => {
                self.new_bookings[index].card.endpoints()?;
                let entry = self.new_bookings.remove(index);
                let accepted = BoardEntry::accepted(entry.card);
                self.ongoing.insert(0, accepted.clone());
                self.active_tab = BoardTab::Ongoing;
                Ok(self.transition(booking_id, action, BookingStage::Accepted, true, Some(accepted)))
            }
            (BoardAction::Arrive, BoardTab::Ongoing) => {
                let entry = &mut self.ongoing[index];
                let changed = match entry.stage {
                    BookingStage::Accepted => {
                        entry.mark_arrived();
                        true
                    }
                    BookingStage::Arrived => false,
                    _ => return Err(invalid()),
                };
                let entry = entry.clone();
                Ok(self.transition(booking_id, action, BookingStage::Arrived, changed, Some(entry)))
            }
            (BoardAction::DropOff, BoardTab::Ongoing) if stage == BookingStage::Arrived => {
                self.ongoing.remove(index);
                Ok(self.transition(booking_id, action, BookingStage::DroppedOff, true, None))
            }
            (BoardAction::Cancel, _)
                if matches!(stage, BookingStage::New | BookingStage::Accepted) =>
            {
                if !confirmed {
                    return Err(BoardError::ConfirmationRequired);
                }
                match tab {
                    BoardTab::New => self.new_bookings.remove(index),
                    BoardTab::Ongoing => self.ongoing.remove(index),
                };
                Ok(self.transition(booking_id, action, BookingStage::Cancelled, true, None))
            }
            _ => Err(invalid()),
        }
    }

    fn transition(
        &self,
        booking_id: Uuid,
        action: BoardAction,
        stage: BookingStage,
        changed: bool,
        entry: Option<BoardEntry>,
    ) -> Transition {
        Transition {
            booking_id,
            action,
            stage,
            changed,
            active_tab: self.active_tab,
            entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_booking;

    fn board_with(statuses: &[BookingStatus]) -> (DriverBoard, Vec<Uuid>) {
        let driver = Uuid::now_v7();
        let bookings: Vec<Booking> = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                sample_booking(driver, &format!("BK-{}", i + 1), *status, "126", Utc::now())
            })
            .collect();
        let ids = bookings.iter().map(|b| b.id).collect();
        (DriverBoard::seeded(&bookings), ids)
    }

    #[test]
    fn test_seeding_maps_statuses() {
        let (board, ids) = board_with(&[
            BookingStatus::Pending,
            BookingStatus::Accepted,
            BookingStatus::Ongoing,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ]);

        assert_eq!(board.new_bookings.len(), 1);
        assert_eq!(board.ongoing.len(), 2);
        assert_eq!(board.active_tab, BoardTab::New);

        let accepted = board.find(ids[1]).unwrap();
        assert_eq!(accepted.stage, BookingStage::Accepted);
        assert!(accepted.arrival_enabled);

        let arrived = board.find(ids[2]).unwrap();
        assert_eq!(arrived.stage, BookingStage::Arrived);
        assert_eq!(arrived.secondary_action, SecondaryAction::ConfirmDropOff);
        assert!(board.find(ids[3]).is_none());
    }

    #[test]
    fn test_accept_moves_to_head_of_ongoing() {
        let (mut board, ids) = board_with(&[
            BookingStatus::Pending,
            BookingStatus::Pending,
            BookingStatus::Accepted,
        ]);

        let transition = board.apply(ids[1], BoardAction::Accept, false).unwrap();

        assert!(transition.changed);
        assert_eq!(transition.active_tab, BoardTab::Ongoing);
        assert_eq!(board.new_bookings.len(), 1);
        assert_eq!(board.new_bookings[0].card.id, ids[0]);
        assert_eq!(board.ongoing.len(), 2);
        assert_eq!(board.ongoing[0].card.id, ids[1]);
        assert_eq!(board.ongoing[0].status_label, "Accepted");
        assert_eq!(board.ongoing[0].secondary_action, SecondaryAction::Cancel);
        assert_eq!(
            board
                .ongoing
                .iter()
                .filter(|e| e.card.id == ids[1])
                .count(),
            1
        );
    }

    #[test]
    fn test_accept_with_bad_coordinates_changes_nothing() {
        let (mut board, ids) = board_with(&[BookingStatus::Pending]);
        board.new_bookings[0].card.pickup_lat = "north-ish".to_string();
        let before = board.clone();

        let err = board.apply(ids[0], BoardAction::Accept, false).unwrap_err();
        assert_eq!(err, BoardError::InvalidCoordinates("BK-1".to_string()));
        assert_eq!(board, before);

        assert!(matches!(
            board.details(ids[0]).unwrap_err(),
            BoardError::InvalidCoordinates(_)
        ));
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        assert!(Coordinate::parse("NaN", "121.0").is_none());
        assert!(Coordinate::parse("14.6", "inf").is_none());
        assert!(Coordinate::parse("", "121.0").is_none());
        assert_eq!(
            Coordinate::parse(" 14.6560 ", "121.0320"),
            Some(Coordinate::new(14.656, 121.032))
        );
    }

    #[test]
    fn test_arrival_twice_is_noop() {
        let (mut board, ids) = board_with(&[BookingStatus::Accepted]);

        let first = board.apply(ids[0], BoardAction::Arrive, false).unwrap();
        assert!(first.changed);
        let entry = first.entry.unwrap();
        assert!(!entry.arrival_enabled);
        assert_eq!(entry.secondary_action, SecondaryAction::ConfirmDropOff);

        let snapshot = board.clone();
        let second = board.apply(ids[0], BoardAction::Arrive, false).unwrap();
        assert!(!second.changed);
        assert_eq!(second.stage, BookingStage::Arrived);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_drop_off_removes_entry() {
        let (mut board, ids) = board_with(&[BookingStatus::Accepted]);

        let err = board.apply(ids[0], BoardAction::DropOff, false).unwrap_err();
        assert!(matches!(err, BoardError::InvalidTransition { .. }));

        board.apply(ids[0], BoardAction::Arrive, false).unwrap();
        let transition = board.apply(ids[0], BoardAction::DropOff, false).unwrap();

        assert_eq!(transition.stage, BookingStage::DroppedOff);
        assert!(transition.entry.is_none());
        assert!(board.ongoing.is_empty());
        assert_eq!(
            board.apply(ids[0], BoardAction::Arrive, false).unwrap_err(),
            BoardError::NotFound(ids[0])
        );
    }

    #[test]
    fn test_cancel_requires_confirmation_and_allowed_stage() {
        let (mut board, ids) = board_with(&[
            BookingStatus::Pending,
            BookingStatus::Accepted,
            BookingStatus::Ongoing,
        ]);

        assert_eq!(
            board.apply(ids[0], BoardAction::Cancel, false).unwrap_err(),
            BoardError::ConfirmationRequired
        );
        assert_eq!(board.new_bookings.len(), 1);

        board.apply(ids[0], BoardAction::Cancel, true).unwrap();
        board.apply(ids[1], BoardAction::Cancel, true).unwrap();
        assert!(board.new_bookings.is_empty());
        assert_eq!(board.ongoing.len(), 1);

        let err = board.apply(ids[2], BoardAction::Cancel, true).unwrap_err();
        assert!(matches!(
            err,
            BoardError::InvalidTransition {
                stage: BookingStage::Arrived,
                ..
            }
        ));
    }

    #[test]
    fn test_accepting_twice_is_invalid() {
        let (mut board, ids) = board_with(&[BookingStatus::Pending]);
        board.apply(ids[0], BoardAction::Accept, false).unwrap();

        let err = board.apply(ids[0], BoardAction::Accept, false).unwrap_err();
        assert!(matches!(err, BoardError::InvalidTransition { .. }));
        assert!(matches!(AppError::from(err), AppError::Conflict(_)));
    }
}
