use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::SessionStore;
use crate::features::bookings::BookingRepository;
use crate::features::messages::{MessageService, PassengerContact};
use crate::features::schedule::board::{
    BoardAction, BoardError, BookingStage, DriverBoard, Transition,
};
use crate::features::schedule::dtos::{
    BoardDto, BookingCardDto, BookingDetailsDto, ContactPassengerDto, TransitionDto,
};
use crate::features::schedule::overlay::{MapOverlay, OverlayRegistry, OverlayVariant};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A successful board change, fanned out to every subscriber
#[derive(Debug, Clone)]
pub struct BoardEvent {
    pub driver_id: Uuid,
    pub transition: Transition,
}

impl BoardEvent {
    pub fn name(&self) -> &'static str {
        self.transition.action.as_str()
    }
}

/// Booking boards and map overlays of every signed-in driver.
///
/// Boards are seeded from the booking store on first access and live in memory until the
/// driver's last session ends; transitions are not written back.
pub struct ScheduleService {
    bookings: Arc<dyn BookingRepository>,
    messages: Arc<MessageService>,
    boards: RwLock<HashMap<Uuid, DriverBoard>>,
    overlays: RwLock<HashMap<Uuid, OverlayRegistry>>,
    events: broadcast::Sender<BoardEvent>,
}

impl ScheduleService {
    pub fn new(bookings: Arc<dyn BookingRepository>, messages: Arc<MessageService>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            bookings,
            messages,
            boards: RwLock::new(HashMap::new()),
            overlays: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Seeds the driver's board unless it already exists. A failing store leaves the
    /// board unseeded so the next request retries.
    async fn ensure_board(&self, driver_id: Uuid) {
        if self.boards.read().await.contains_key(&driver_id) {
            return;
        }

        let bookings = match self.bookings.list_for_driver(driver_id).await {
            Ok(bookings) => bookings,
            Err(e) => {
                tracing::warn!("Could not seed board for driver {}: {}", driver_id, e);
                return;
            }
        };

        let board = DriverBoard::seeded(&bookings);
        tracing::debug!(
            new = board.new_bookings.len(),
            ongoing = board.ongoing.len(),
            "Seeded board for driver {}",
            driver_id
        );
        self.boards.write().await.entry(driver_id).or_insert(board);
    }

    pub async fn board(&self, driver_id: Uuid) -> BoardDto {
        self.ensure_board(driver_id).await;

        let open_overlays = self
            .overlays
            .read()
            .await
            .get(&driver_id)
            .map(OverlayRegistry::containers)
            .unwrap_or_default();

        let boards = self.boards.read().await;
        match boards.get(&driver_id) {
            Some(board) => BoardDto::new(board, open_overlays),
            None => BoardDto::new(&DriverBoard::default(), open_overlays),
        }
    }

    pub async fn apply(
        &self,
        driver_id: Uuid,
        booking_id: Uuid,
        action: BoardAction,
        confirmed: bool,
    ) -> Result<TransitionDto> {
        self.ensure_board(driver_id).await;

        let transition = {
            let mut boards = self.boards.write().await;
            let board = boards
                .get_mut(&driver_id)
                .ok_or(BoardError::NotFound(booking_id))?;
            board.apply(booking_id, action, confirmed)?
        };

        if transition.entry.is_none() {
            if let Some(registry) = self.overlays.write().await.get_mut(&driver_id) {
                registry.close_for_booking(booking_id);
            }
        }

        let dto = TransitionDto::from(&transition);
        if transition.changed {
            tracing::info!(
                "Driver {} applied {} to booking {} ({:?})",
                driver_id,
                action.as_str(),
                booking_id,
                transition.stage
            );
            // Sending only fails when nobody is subscribed
            let _ = self.events.send(BoardEvent {
                driver_id,
                transition,
            });
        }

        Ok(dto)
    }

    /// Read view of a booking. Opens its map overlay, replacing whatever held the container.
    pub async fn details(&self, driver_id: Uuid, booking_id: Uuid) -> Result<BookingDetailsDto> {
        self.ensure_board(driver_id).await;

        let (card, stage, endpoints) = {
            let boards = self.boards.read().await;
            let board = boards
                .get(&driver_id)
                .ok_or(BoardError::NotFound(booking_id))?;
            let (entry, endpoints) = board.details(booking_id)?;
            (entry.card.clone(), entry.stage, endpoints)
        };

        let variant = if stage == BookingStage::New {
            OverlayVariant::Details
        } else {
            OverlayVariant::Ongoing
        };
        let overlay = MapOverlay::build(
            variant.default_container(),
            booking_id,
            variant,
            endpoints,
            &card.pickup_location,
            &card.dropoff_location,
        );

        let displaced = self
            .overlays
            .write()
            .await
            .entry(driver_id)
            .or_default()
            .open(overlay.clone());
        if let Some(previous) = displaced {
            tracing::debug!(
                "Tore down overlay for booking {} in {}",
                previous.booking_id,
                previous.container
            );
        }

        Ok(BookingDetailsDto {
            booking: BookingCardDto::from(&card),
            stage,
            overlay,
        })
    }

    /// Returns whether anything was open in `container`
    pub async fn close_overlay(&self, driver_id: Uuid, container: &str) -> bool {
        self.overlays
            .write()
            .await
            .get_mut(&driver_id)
            .and_then(|registry| registry.close(container))
            .is_some()
    }

    /// Hands the booking's passenger off to messaging
    pub async fn contact_passenger(
        &self,
        driver_id: Uuid,
        booking_id: Uuid,
    ) -> Result<ContactPassengerDto> {
        self.ensure_board(driver_id).await;

        let contact = {
            let boards = self.boards.read().await;
            let entry = boards
                .get(&driver_id)
                .and_then(|board| board.find(booking_id))
                .ok_or(BoardError::NotFound(booking_id))?;
            PassengerContact {
                booking_id,
                booking_reference: entry.card.reference.clone(),
                name: entry.card.passenger_name.clone(),
                phone: entry.card.passenger_phone.clone(),
            }
        };

        let conversation_id = self.messages.open_for_passenger(driver_id, &contact).await;
        Ok(ContactPassengerDto { conversation_id })
    }

    /// Drops the driver's board, overlays and conversations. Returns whether a board was held.
    pub async fn evict(&self, driver_id: Uuid) -> bool {
        let board = self.boards.write().await.remove(&driver_id).is_some();
        self.overlays.write().await.remove(&driver_id);
        self.messages.evict(driver_id).await;
        board
    }

    /// Evicts a driver once their last session is destroyed or expires
    pub fn spawn_eviction_task(self: &Arc<Self>, sessions: Arc<SessionStore>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let mut ended = sessions.subscribe_ended();
        tokio::spawn(async move {
            loop {
                match ended.recv().await {
                    Ok(driver_id) => {
                        if !sessions.has_live_session(driver_id).await
                            && service.evict(driver_id).await
                        {
                            tracing::debug!("Evicted board of driver {}", driver_id);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Eviction task skipped {} ended sessions", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    #[cfg(test)]
    async fn holds_state_for(&self, driver_id: Uuid) -> bool {
        self.boards.read().await.contains_key(&driver_id)
            || self.overlays.read().await.contains_key(&driver_id)
    }
}
