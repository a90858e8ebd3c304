use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::messages::models::{ChatMessage, Conversation, MessageDirection};
use crate::shared::format::{initials, message_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageTab {
    All,
    Inbox,
}

impl std::str::FromStr for MessageTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(MessageTab::All),
            "inbox" => Ok(MessageTab::Inbox),
            other => Err(AppError::BadRequest(format!("Unknown messages tab: {}", other))),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MessageListQuery {
    /// `all` (default) or `inbox`
    pub tab: Option<String>,
    /// Filter on contact name or latest message
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationSummaryDto {
    pub id: Uuid,
    pub contact_name: String,
    pub initials: String,
    pub preview: String,
    /// Time of the latest message, empty for a new conversation
    pub time: String,
    pub unread: usize,
    pub pinned: bool,
}

impl From<&Conversation> for ConversationSummaryDto {
    fn from(conversation: &Conversation) -> Self {
        let last = conversation.last_message();
        Self {
            id: conversation.id,
            contact_name: conversation.contact_name.clone(),
            initials: initials(&conversation.contact_name),
            preview: last.map(|m| m.text.clone()).unwrap_or_default(),
            time: last.map(|m| message_time(m.sent_at)).unwrap_or_default(),
            unread: conversation.unread_count(),
            pinned: conversation.pinned,
        }
    }
}

/// `all` fills `pinned` and `conversations`; `inbox` fills `conversations` only
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationListDto {
    pub tab: MessageTab,
    pub pinned: Vec<ConversationSummaryDto>,
    pub conversations: Vec<ConversationSummaryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub id: Uuid,
    pub direction: MessageDirection,
    pub text: String,
    #[schema(example = "2:30 PM")]
    pub time: String,
    pub read: bool,
}

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id,
            direction: message.direction,
            text: message.text.clone(),
            time: message_time(message.sent_at),
            read: message.read,
        }
    }
}

/// Opened conversation: header plus the full thread
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationDto {
    pub id: Uuid,
    pub contact_name: String,
    pub initials: String,
    pub contact_phone: String,
    pub booking_reference: Option<String>,
    pub pinned: bool,
    pub messages: Vec<MessageDto>,
}

impl From<&Conversation> for ConversationDto {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id,
            contact_name: conversation.contact_name.clone(),
            initials: initials(&conversation.contact_name),
            contact_phone: conversation.contact_phone.clone(),
            booking_reference: conversation.booking_reference.clone(),
            pinned: conversation.pinned,
            messages: conversation.messages.iter().map(MessageDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SendMessageDto {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PinStateDto {
    pub id: Uuid,
    pub pinned: bool,
}
