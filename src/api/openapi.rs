//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, games, health, rooms, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alcove API",
        version = "1.0.0",
        description = "Library Space & Board Game Reservation REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Alcove Team", email = "contact@alcove.org")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Rooms
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        // Board games
        games::list_games,
        games::get_game,
        games::create_game,
        games::update_game,
        games::delete_game,
        // Bookings
        bookings::list_bookings,
        bookings::create_booking,
        bookings::get_booking,
        bookings::approve_booking,
        bookings::reject_booking,
        bookings::cancel_booking,
        bookings::get_user_bookings,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Rooms
            crate::models::room::Room,
            crate::models::room::CreateRoom,
            crate::models::room::UpdateRoom,
            // Board games
            crate::models::game::BoardGame,
            crate::models::game::CreateBoardGame,
            crate::models::game::UpdateBoardGame,
            // Bookings
            crate::models::booking::BookingRequest,
            crate::models::booking::BookingDetails,
            crate::models::booking::CreateBookingRequest,
            crate::models::booking::RejectBooking,
            crate::models::enums::RequestStatus,
            crate::models::enums::ResourceKind,
            crate::models::enums::Role,
            crate::models::user::UserShort,
            bookings::BookingListResponse,
            bookings::DecisionResponse,
            // Stats
            stats::StatsResponse,
            stats::BookingStats,
            stats::ResourceStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rooms", description = "Study room management"),
        (name = "games", description = "Board game management"),
        (name = "bookings", description = "Booking request lifecycle"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
