use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{self, dtos as auth_dtos};
use crate::features::bookings::models as bookings_models;
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::history::{dtos as history_dtos, handlers as history_handlers};
use crate::features::messages::{
    dtos as messages_dtos, handlers as messages_handlers, models as messages_models,
};
use crate::features::schedule::{
    board as schedule_board, dtos as schedule_dtos, handlers as schedule_handlers,
    overlay as schedule_overlay,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::features::wallet::{dtos as wallet_dtos, handlers as wallet_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::login,
        auth::handlers::logout,
        auth::handlers::register,
        auth::handlers::get_me,
        // Profile
        users_handlers::get_profile,
        users_handlers::apply_profile_action,
        // Dashboard
        dashboard_handlers::get_overview,
        // Schedule
        schedule_handlers::get_board,
        schedule_handlers::stream_events,
        schedule_handlers::get_details,
        schedule_handlers::accept_booking,
        schedule_handlers::confirm_arrival,
        schedule_handlers::confirm_drop_off,
        schedule_handlers::cancel_booking,
        schedule_handlers::contact_passenger,
        schedule_handlers::close_overlay,
        // Wallet
        wallet_handlers::get_wallet,
        // History
        history_handlers::get_history,
        history_handlers::get_report,
        // Messages
        messages_handlers::list_conversations,
        messages_handlers::open_conversation,
        messages_handlers::send_message,
        messages_handlers::toggle_pin,
        messages_handlers::delete_conversation,
    ),
    components(
        schemas(
            // Shared
            Meta,
            users_models::AccountStatus,
            bookings_models::BookingStatus,
            // Auth
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::AuthUserDto,
            auth_dtos::MeResponseDto,
            auth_dtos::RegistrationStepDto,
            auth_dtos::RegisterFormDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::MeResponseDto>,
            ApiResponse<auth_dtos::RegistrationStepDto>,
            // Profile
            users_dtos::ProfileResponseDto,
            users_dtos::DriverProfileDto,
            users_dtos::ProfileActionFormDto,
            users_dtos::ProfileActionResponseDto,
            ApiResponse<users_dtos::ProfileResponseDto>,
            ApiResponse<users_dtos::ProfileActionResponseDto>,
            // Dashboard
            dashboard_dtos::DashboardOverviewDto,
            dashboard_dtos::BookingStatsDto,
            dashboard_dtos::IncomeSummaryDto,
            dashboard_dtos::RecentBookingDto,
            ApiResponse<dashboard_dtos::DashboardOverviewDto>,
            // Schedule
            schedule_board::Coordinate,
            schedule_board::BookingStage,
            schedule_board::SecondaryAction,
            schedule_board::BoardTab,
            schedule_board::BoardAction,
            schedule_overlay::OverlayVariant,
            schedule_overlay::MarkerKind,
            schedule_overlay::MapMarker,
            schedule_overlay::RoutePath,
            schedule_overlay::Bounds,
            schedule_overlay::Viewport,
            schedule_overlay::MapOverlay,
            schedule_dtos::BookingCardDto,
            schedule_dtos::BoardEntryDto,
            schedule_dtos::BoardDto,
            schedule_dtos::TransitionDto,
            schedule_dtos::CancelBookingDto,
            schedule_dtos::BookingDetailsDto,
            schedule_dtos::ContactPassengerDto,
            schedule_dtos::OverlayClosedDto,
            ApiResponse<schedule_dtos::BoardDto>,
            ApiResponse<schedule_dtos::TransitionDto>,
            ApiResponse<schedule_dtos::BookingDetailsDto>,
            ApiResponse<schedule_dtos::ContactPassengerDto>,
            ApiResponse<schedule_dtos::OverlayClosedDto>,
            // Wallet
            wallet_dtos::WalletPeriod,
            wallet_dtos::WalletSummaryDto,
            wallet_dtos::WalletTransactionDto,
            ApiResponse<wallet_dtos::WalletSummaryDto>,
            // History
            history_dtos::HistoryTab,
            history_dtos::ReportRowDto,
            history_dtos::ReportDetailDto,
            history_dtos::TransactionRowDto,
            history_dtos::HistoryResponseDto,
            ApiResponse<history_dtos::HistoryResponseDto>,
            ApiResponse<history_dtos::ReportDetailDto>,
            // Messages
            messages_models::MessageDirection,
            messages_dtos::MessageTab,
            messages_dtos::ConversationSummaryDto,
            messages_dtos::ConversationListDto,
            messages_dtos::MessageDto,
            messages_dtos::ConversationDto,
            messages_dtos::SendMessageDto,
            messages_dtos::PinStateDto,
            ApiResponse<messages_dtos::ConversationListDto>,
            ApiResponse<messages_dtos::ConversationDto>,
            ApiResponse<messages_dtos::MessageDto>,
            ApiResponse<messages_dtos::PinStateDto>,
        )
    ),
    tags(
        (name = "auth", description = "Login, logout and driver registration"),
        (name = "profile", description = "Driver profile and documents"),
        (name = "dashboard", description = "Booking statistics and income overview"),
        (name = "schedule", description = "Booking board, ride lifecycle and route maps"),
        (name = "wallet", description = "Earnings by period"),
        (name = "history", description = "Complaint reports and past transactions"),
        (name = "messages", description = "Passenger conversations"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Journeolink Driver API",
        version = "0.1.0",
        description = "API documentation for the Journeolink driver portal",
    )
)]
pub struct ApiDoc;

/// Adds the session cookie security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("journeolink_session"))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
