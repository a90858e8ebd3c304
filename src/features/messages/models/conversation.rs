use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Sent,
    Received,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub direction: MessageDirection,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}

/// Passenger handed off from a booking to messaging
#[derive(Debug, Clone)]
pub struct PassengerContact {
    pub booking_id: Uuid,
    pub booking_reference: String,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: Uuid,
    pub booking_id: Option<Uuid>,
    pub booking_reference: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub pinned: bool,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn for_passenger(contact: &PassengerContact, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            booking_id: Some(contact.booking_id),
            booking_reference: Some(contact.booking_reference.clone()),
            contact_name: contact.name.clone(),
            contact_phone: contact.phone.clone(),
            pinned: false,
            messages: Vec::new(),
            created_at: now,
        }
    }

    pub fn unread_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.direction == MessageDirection::Received && !m.read)
            .count()
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Time of the latest activity, used for ordering
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_message()
            .map(|m| m.sent_at)
            .unwrap_or(self.created_at)
    }

    /// Case-insensitive match on contact name or latest message
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.contact_name.to_lowercase().contains(&needle)
            || self
                .last_message()
                .is_some_and(|m| m.text.to_lowercase().contains(&needle))
    }

    pub fn mark_read(&mut self) {
        for message in &mut self.messages {
            message.read = true;
        }
    }
}
