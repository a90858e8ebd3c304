pub mod message_handler;

pub use message_handler::{
    __path_delete_conversation, __path_list_conversations, __path_open_conversation,
    __path_send_message, __path_toggle_pin, delete_conversation, list_conversations,
    open_conversation, send_message, toggle_pin,
};
