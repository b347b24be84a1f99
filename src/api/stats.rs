//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

/// Statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    /// Booking request statistics
    pub bookings: BookingStats,
    /// Resource totals
    pub resources: ResourceStats,
    /// Total number of users
    pub users: i64,
}

#[derive(Serialize, ToSchema)]
pub struct BookingStats {
    /// Requests awaiting a decision
    pub pending: i64,
    /// Approved requests
    pub approved: i64,
    /// Rejected requests
    pub rejected: i64,
    /// Cancelled requests
    pub cancelled: i64,
    /// Approved bookings for today
    pub approved_today: i64,
}

#[derive(Serialize, ToSchema)]
pub struct ResourceStats {
    /// Total number of rooms
    pub rooms: i64,
    /// Total number of board games
    pub games: i64,
}

/// Get booking statistics (admin dashboard)
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Booking statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    claims.require_admin()?;
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
