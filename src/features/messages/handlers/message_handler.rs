use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::SessionUser;
use crate::features::messages::dtos::{
    ConversationDto, ConversationListDto, MessageDto, MessageListQuery, MessageTab, PinStateDto,
    SendMessageDto,
};
use crate::features::messages::services::MessageService;
use crate::shared::types::{ApiResponse, Meta};

/// Conversations of the signed-in driver
#[utoipa::path(
    get,
    path = "/api/messages",
    params(MessageListQuery),
    responses(
        (status = 200, description = "Conversation list", body = ApiResponse<ConversationListDto>),
        (status = 400, description = "Unknown tab")
    ),
    security(("session_cookie" = [])),
    tag = "messages"
)]
pub async fn list_conversations(
    user: SessionUser,
    State(service): State<Arc<MessageService>>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<ApiResponse<ConversationListDto>>> {
    let tab = match query.tab.as_deref() {
        None | Some("") => MessageTab::All,
        Some(raw) => raw.parse::<MessageTab>()?,
    };

    let list = service.list(user.user_id, tab, query.q.as_deref()).await;
    let total = list.pinned.len() + list.conversations.len();
    Ok(Json(ApiResponse::success(
        Some(list),
        None,
        Some(Meta::total(total)),
    )))
}

/// Open a conversation and mark it read
#[utoipa::path(
    get,
    path = "/api/messages/{id}",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Conversation", body = ApiResponse<ConversationDto>),
        (status = 404, description = "Conversation not found")
    ),
    security(("session_cookie" = [])),
    tag = "messages"
)]
pub async fn open_conversation(
    user: SessionUser,
    State(service): State<Arc<MessageService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ConversationDto>>> {
    let conversation = service.open(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(Some(conversation), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/messages/{id}",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    request_body = SendMessageDto,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<MessageDto>),
        (status = 400, description = "Empty message"),
        (status = 404, description = "Conversation not found")
    ),
    security(("session_cookie" = [])),
    tag = "messages"
)]
pub async fn send_message(
    user: SessionUser,
    State(service): State<Arc<MessageService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SendMessageDto>,
) -> Result<(StatusCode, Json<ApiResponse<MessageDto>>)> {
    let message = service.send(user.user_id, id, &dto.text).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(message), None, None)),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/messages/{id}/pin",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Pin state toggled", body = ApiResponse<PinStateDto>),
        (status = 404, description = "Conversation not found")
    ),
    security(("session_cookie" = [])),
    tag = "messages"
)]
pub async fn toggle_pin(
    user: SessionUser,
    State(service): State<Arc<MessageService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PinStateDto>>> {
    let state = service.toggle_pin(user.user_id, id).await?;
    let message = if state.pinned {
        "Conversation pinned to top"
    } else {
        "Conversation unpinned"
    };
    Ok(Json(ApiResponse::success(
        Some(state),
        Some(message.to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Conversation deleted"),
        (status = 404, description = "Conversation not found")
    ),
    security(("session_cookie" = [])),
    tag = "messages"
)]
pub async fn delete_conversation(
    user: SessionUser,
    State(service): State<Arc<MessageService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Conversation deleted".to_string()),
        None,
    )))
}
