use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

use crate::features::messages::handlers;
use crate::features::messages::services::MessageService;

pub fn routes(message_service: Arc<MessageService>) -> Router {
    Router::new()
        .route("/api/messages", get(handlers::list_conversations))
        .route(
            "/api/messages/{id}",
            get(handlers::open_conversation)
                .post(handlers::send_message)
                .delete(handlers::delete_conversation),
        )
        .route("/api/messages/{id}/pin", patch(handlers::toggle_pin))
        .with_state(message_service)
}
