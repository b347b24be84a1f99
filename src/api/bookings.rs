//! Booking request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::booking::{
        BookingDetails, BookingQuery, BookingRequest, CreateBookingRequest, RejectBooking,
    },
};

use super::AuthenticatedUser;

/// Paginated booking request list
#[derive(Serialize, ToSchema)]
pub struct BookingListResponse {
    pub items: Vec<BookingDetails>,
    pub total: i64,
}

/// Decision response for approve/reject/cancel
#[derive(Serialize, ToSchema)]
pub struct DecisionResponse {
    /// Resulting status
    pub status: String,
    /// Updated booking request
    pub request: BookingRequest,
}

/// List booking requests
///
/// Members only see their own requests; admins see everything.
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(BookingQuery),
    responses(
        (status = 200, description = "Booking request list", body = BookingListResponse)
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(mut query): Query<BookingQuery>,
) -> AppResult<Json<BookingListResponse>> {
    if !claims.is_admin() {
        query.user_id = Some(claims.user_id);
    }
    let (items, total) = state.services.bookings.list(&query).await?;
    Ok(Json(BookingListResponse { items, total }))
}

/// Create a booking request
///
/// The request is created in pending state. Creation fails with 409 when the
/// slot already conflicts with an approved booking for the same resource and
/// date; in that case nothing is persisted.
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking request created", body = BookingRequest),
        (status = 400, description = "Invalid date or time range"),
        (status = 404, description = "Resource not found"),
        (status = 409, description = "Slot conflicts with an approved booking"),
        (status = 422, description = "Board game unavailable")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingRequest>)> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let request = state
        .services
        .bookings
        .create_request(claims.user_id, &data)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Get a booking request
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking request ID")),
    responses(
        (status = 200, description = "Booking request details", body = BookingDetails),
        (status = 404, description = "Booking request not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingDetails>> {
    let request = state.services.bookings.get_by_id(id).await?;
    claims.require_self_or_admin(request.user_id)?;
    let details = state.services.bookings.get_details(id).await?;
    Ok(Json(details))
}

/// Approve a pending booking request
///
/// The conflict check re-runs at approval time: approvals granted since the
/// request was created may have claimed the slot. On conflict the request
/// stays pending and the response is 409.
#[utoipa::path(
    post,
    path = "/bookings/{id}/approve",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking request ID")),
    responses(
        (status = 200, description = "Booking request approved", body = DecisionResponse),
        (status = 404, description = "Booking request not found"),
        (status = 409, description = "Slot conflicts with an approved booking"),
        (status = 422, description = "Request is not pending")
    )
)]
pub async fn approve_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DecisionResponse>> {
    claims.require_admin()?;
    let request = state.services.bookings.approve(id, claims.user_id).await?;
    Ok(Json(DecisionResponse {
        status: "approved".to_string(),
        request,
    }))
}

/// Reject a pending booking request
#[utoipa::path(
    post,
    path = "/bookings/{id}/reject",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking request ID")),
    request_body = RejectBooking,
    responses(
        (status = 200, description = "Booking request rejected", body = DecisionResponse),
        (status = 404, description = "Booking request not found"),
        (status = 422, description = "Request is not pending")
    )
)]
pub async fn reject_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<RejectBooking>,
) -> AppResult<Json<DecisionResponse>> {
    claims.require_admin()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let request = state
        .services
        .bookings
        .reject(id, claims.user_id, data.reason.as_deref())
        .await?;
    Ok(Json(DecisionResponse {
        status: "rejected".to_string(),
        request,
    }))
}

/// Cancel a pending booking request (requester only)
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking request ID")),
    responses(
        (status = 200, description = "Booking request cancelled", body = DecisionResponse),
        (status = 403, description = "Caller is not the requester"),
        (status = 404, description = "Booking request not found"),
        (status = 422, description = "Request is not pending")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DecisionResponse>> {
    let request = state.services.bookings.cancel(id, claims.user_id).await?;
    Ok(Json(DecisionResponse {
        status: "cancelled".to_string(),
        request,
    }))
}

/// Get booking requests for a specific user
#[utoipa::path(
    get,
    path = "/users/{id}/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID"),
        BookingQuery
    ),
    responses(
        (status = 200, description = "User's booking requests", body = BookingListResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<BookingListResponse>> {
    claims.require_self_or_admin(user_id)?;
    let (items, total) = state
        .services
        .bookings
        .get_user_requests(user_id, &query)
        .await?;
    Ok(Json(BookingListResponse { items, total }))
}
