pub mod schedule_handler;

pub use schedule_handler::{
    __path_accept_booking, __path_cancel_booking, __path_close_overlay, __path_confirm_arrival,
    __path_confirm_drop_off, __path_contact_passenger, __path_get_board, __path_get_details,
    __path_stream_events, accept_booking, cancel_booking, close_overlay, confirm_arrival,
    confirm_drop_off, contact_passenger, get_board, get_details, stream_events,
};
