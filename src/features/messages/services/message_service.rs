use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::messages::dtos::{
    ConversationDto, ConversationListDto, ConversationSummaryDto, MessageDto, MessageTab,
    PinStateDto,
};
use crate::features::messages::models::{
    ChatMessage, Conversation, MessageDirection, PassengerContact,
};

/// Conversations per driver, held in memory until the driver's last session ends
#[derive(Default)]
pub struct MessageService {
    conversations: RwLock<HashMap<Uuid, Vec<Conversation>>>,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Conversation {} not found", id))
}

fn find_mut(conversations: &mut [Conversation], id: Uuid) -> Result<&mut Conversation> {
    conversations
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| not_found(id))
}

impl MessageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(
        &self,
        driver_id: Uuid,
        tab: MessageTab,
        search: Option<&str>,
    ) -> ConversationListDto {
        let store = self.conversations.read().await;
        let mut visible: Vec<&Conversation> = store
            .get(&driver_id)
            .map(|list| list.iter().collect())
            .unwrap_or_default();

        if let Some(needle) = search.map(str::trim).filter(|s| !s.is_empty()) {
            visible.retain(|c| c.matches(needle));
        }
        visible.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));

        let (pinned, conversations) = match tab {
            MessageTab::All => {
                let (pinned, rest): (Vec<&Conversation>, Vec<&Conversation>) =
                    visible.into_iter().partition(|c| c.pinned);
                (pinned, rest)
            }
            MessageTab::Inbox => (
                Vec::new(),
                visible.into_iter().filter(|c| c.unread_count() > 0).collect(),
            ),
        };

        ConversationListDto {
            tab,
            pinned: pinned.into_iter().map(ConversationSummaryDto::from).collect(),
            conversations: conversations
                .into_iter()
                .map(ConversationSummaryDto::from)
                .collect(),
        }
    }

    /// Opening a conversation marks everything in it as read
    pub async fn open(&self, driver_id: Uuid, id: Uuid) -> Result<ConversationDto> {
        let mut store = self.conversations.write().await;
        let list = store.get_mut(&driver_id).ok_or_else(|| not_found(id))?;
        let conversation = find_mut(list, id)?;
        conversation.mark_read();
        Ok(ConversationDto::from(&*conversation))
    }

    pub async fn send(&self, driver_id: Uuid, id: Uuid, text: &str) -> Result<MessageDto> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Message cannot be empty".to_string()));
        }

        let mut store = self.conversations.write().await;
        let list = store.get_mut(&driver_id).ok_or_else(|| not_found(id))?;
        let conversation = find_mut(list, id)?;

        let message = ChatMessage {
            id: Uuid::now_v7(),
            direction: MessageDirection::Sent,
            text: text.to_string(),
            sent_at: Utc::now(),
            read: true,
        };
        let dto = MessageDto::from(&message);
        conversation.messages.push(message);

        tracing::debug!("Driver {} sent a message in conversation {}", driver_id, id);
        Ok(dto)
    }

    pub async fn toggle_pin(&self, driver_id: Uuid, id: Uuid) -> Result<PinStateDto> {
        let mut store = self.conversations.write().await;
        let list = store.get_mut(&driver_id).ok_or_else(|| not_found(id))?;
        let conversation = find_mut(list, id)?;
        conversation.pinned = !conversation.pinned;

        Ok(PinStateDto {
            id,
            pinned: conversation.pinned,
        })
    }

    pub async fn delete(&self, driver_id: Uuid, id: Uuid) -> Result<()> {
        let mut store = self.conversations.write().await;
        let list = store.get_mut(&driver_id).ok_or_else(|| not_found(id))?;
        let before = list.len();
        list.retain(|c| c.id != id);
        if list.len() == before {
            return Err(not_found(id));
        }

        tracing::info!("Driver {} deleted conversation {}", driver_id, id);
        Ok(())
    }

    /// Drops every conversation of the driver
    pub async fn evict(&self, driver_id: Uuid) -> bool {
        self.conversations.write().await.remove(&driver_id).is_some()
    }

    /// Conversation for the passenger of a booking, created on first contact
    pub async fn open_for_passenger(&self, driver_id: Uuid, contact: &PassengerContact) -> Uuid {
        let mut store = self.conversations.write().await;
        let list = store.entry(driver_id).or_default();

        if let Some(existing) = list
            .iter()
            .find(|c| c.booking_id == Some(contact.booking_id))
        {
            return existing.id;
        }

        let conversation = Conversation::for_passenger(contact, Utc::now());
        let id = conversation.id;
        list.push(conversation);

        tracing::info!(
            "Opened conversation {} with passenger of booking {}",
            id,
            contact.booking_reference
        );
        id
    }

    #[cfg(test)]
    pub async fn receive(&self, driver_id: Uuid, id: Uuid, text: &str) {
        let mut store = self.conversations.write().await;
        if let Some(conversation) = store
            .get_mut(&driver_id)
            .and_then(|list| list.iter_mut().find(|c| c.id == id))
        {
            conversation.messages.push(ChatMessage {
                id: Uuid::now_v7(),
                direction: MessageDirection::Received,
                text: text.to_string(),
                sent_at: Utc::now(),
                read: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, reference: &str) -> PassengerContact {
        PassengerContact {
            booking_id: Uuid::now_v7(),
            booking_reference: reference.to_string(),
            name: name.to_string(),
            phone: "09434325223".to_string(),
        }
    }

    #[tokio::test]
    async fn test_contact_reuses_conversation_per_booking() {
        let service = MessageService::new();
        let driver = Uuid::now_v7();
        let juan = contact("Juan Dela Cruz", "BK-1");

        let first = service.open_for_passenger(driver, &juan).await;
        let again = service.open_for_passenger(driver, &juan).await;
        let other = service
            .open_for_passenger(driver, &contact("Maria Santos", "BK-2"))
            .await;

        assert_eq!(first, again);
        assert_ne!(first, other);
        let list = service.list(driver, MessageTab::All, None).await;
        assert_eq!(list.conversations.len(), 2);
    }

    #[tokio::test]
    async fn test_open_marks_read_and_builds_header() {
        let service = MessageService::new();
        let driver = Uuid::now_v7();
        let id = service
            .open_for_passenger(driver, &contact("Juan Dela Cruz", "BK-1"))
            .await;
        service.receive(driver, id, "I'm at the gate").await;

        let inbox = service.list(driver, MessageTab::Inbox, None).await;
        assert_eq!(inbox.conversations.len(), 1);
        assert_eq!(inbox.conversations[0].unread, 1);

        let opened = service.open(driver, id).await.unwrap();
        assert_eq!(opened.initials, "JD");
        assert_eq!(opened.booking_reference.as_deref(), Some("BK-1"));
        assert!(opened.messages.iter().all(|m| m.read));

        let inbox = service.list(driver, MessageTab::Inbox, None).await;
        assert!(inbox.conversations.is_empty());
    }

    #[tokio::test]
    async fn test_send_trims_and_rejects_blank() {
        let service = MessageService::new();
        let driver = Uuid::now_v7();
        let id = service
            .open_for_passenger(driver, &contact("Juan Dela Cruz", "BK-1"))
            .await;

        let sent = service.send(driver, id, "  On my way  ").await.unwrap();
        assert_eq!(sent.text, "On my way");
        assert_eq!(sent.direction, MessageDirection::Sent);

        let err = service.send(driver, id, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let opened = service.open(driver, id).await.unwrap();
        assert_eq!(opened.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_pinning_moves_between_sections() {
        let service = MessageService::new();
        let driver = Uuid::now_v7();
        let id = service
            .open_for_passenger(driver, &contact("Juan Dela Cruz", "BK-1"))
            .await;

        assert!(service.toggle_pin(driver, id).await.unwrap().pinned);
        let list = service.list(driver, MessageTab::All, None).await;
        assert_eq!(list.pinned.len(), 1);
        assert!(list.conversations.is_empty());

        assert!(!service.toggle_pin(driver, id).await.unwrap().pinned);
        let list = service.list(driver, MessageTab::All, None).await;
        assert!(list.pinned.is_empty());
        assert_eq!(list.conversations.len(), 1);
    }

    #[tokio::test]
    async fn test_search_and_delete() {
        let service = MessageService::new();
        let driver = Uuid::now_v7();
        let juan = service
            .open_for_passenger(driver, &contact("Juan Dela Cruz", "BK-1"))
            .await;
        service
            .open_for_passenger(driver, &contact("Maria Santos", "BK-2"))
            .await;

        let found = service.list(driver, MessageTab::All, Some("MARIA")).await;
        assert_eq!(found.conversations.len(), 1);
        assert_eq!(found.conversations[0].contact_name, "Maria Santos");

        service.delete(driver, juan).await.unwrap();
        assert!(matches!(
            service.open(driver, juan).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_conversations_are_per_driver() {
        let service = MessageService::new();
        let id = service
            .open_for_passenger(Uuid::now_v7(), &contact("Juan Dela Cruz", "BK-1"))
            .await;

        let err = service.open(Uuid::now_v7(), id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_evict_drops_only_that_driver() {
        let service = MessageService::new();
        let gone = Uuid::now_v7();
        let kept = Uuid::now_v7();
        let id = service
            .open_for_passenger(gone, &contact("Juan Dela Cruz", "BK-1"))
            .await;
        service
            .open_for_passenger(kept, &contact("Maria Santos", "BK-2"))
            .await;

        assert!(service.evict(gone).await);
        assert!(!service.evict(gone).await);

        assert!(service.list(gone, MessageTab::All, None).await.conversations.is_empty());
        assert!(service.open(gone, id).await.is_err());
        assert_eq!(service.list(kept, MessageTab::All, None).await.conversations.len(), 1);
    }
}
