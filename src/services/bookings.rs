//! Booking request service
//!
//! Orchestrates the request lifecycle: validation and resource checks before
//! the repository runs the conflict query. Rejection and cancellation never
//! run a conflict check; they only ever vacate a slot.

use chrono::{NaiveDate, NaiveTime};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{
            BookingDetails, BookingQuery, BookingRequest, CreateBookingRequest, TimeSlot,
        },
        enums::ResourceKind,
    },
    repository::{bookings::NewBooking, Repository},
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a booking request on behalf of the authenticated requester.
    ///
    /// Creation is checked against approved bookings only; pending requests
    /// for the same slot are allowed to coexist and compete at approval time.
    pub async fn create_request(
        &self,
        user_id: i32,
        data: &CreateBookingRequest,
    ) -> AppResult<BookingRequest> {
        let booking_date = NaiveDate::parse_from_str(&data.booking_date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid booking_date (use YYYY-MM-DD)".to_string()))?;
        let start = NaiveTime::parse_from_str(&data.start_time, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid start_time (use HH:MM)".to_string()))?;
        let end = NaiveTime::parse_from_str(&data.end_time, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid end_time (use HH:MM)".to_string()))?;

        let slot = TimeSlot::new(start, end).ok_or_else(|| {
            AppError::Validation("end_time must be strictly after start_time".to_string())
        })?;

        // Verify requester and resource exist before touching booking state
        self.repository.users.get_by_id(user_id).await?;
        match data.resource_kind {
            ResourceKind::Room => {
                self.repository.rooms.get_by_id(data.resource_id).await?;
            }
            ResourceKind::Game => {
                let game = self.repository.games.get_by_id(data.resource_id).await?;
                if !game.is_available {
                    return Err(AppError::BusinessRule(
                        "Board game is currently unavailable".to_string(),
                    ));
                }
            }
        }

        self.repository
            .bookings
            .create(&NewBooking {
                user_id,
                resource_kind: data.resource_kind,
                resource_id: data.resource_id,
                booking_date,
                slot,
                purpose: data.purpose.clone(),
                attendees: data.attendees,
            })
            .await
    }

    /// Approve a pending request (conflict check re-runs inside the
    /// repository transaction)
    pub async fn approve(&self, id: i32, approver_id: i32) -> AppResult<BookingRequest> {
        self.repository.bookings.approve(id, approver_id).await
    }

    /// Reject a pending request
    pub async fn reject(
        &self,
        id: i32,
        approver_id: i32,
        reason: Option<&str>,
    ) -> AppResult<BookingRequest> {
        self.repository.bookings.reject(id, approver_id, reason).await
    }

    /// Cancel a pending request; only its requester may do so
    pub async fn cancel(&self, id: i32, user_id: i32) -> AppResult<BookingRequest> {
        let request = self.repository.bookings.get_by_id(id).await?;
        if request.user_id != user_id {
            return Err(AppError::Authorization(
                "Only the requester can cancel a booking request".to_string(),
            ));
        }
        self.repository.bookings.cancel(id).await
    }

    /// List booking requests with filters and pagination
    pub async fn list(&self, query: &BookingQuery) -> AppResult<(Vec<BookingDetails>, i64)> {
        self.repository.bookings.list(query).await
    }

    /// Get a single booking request with details
    pub async fn get_details(&self, id: i32) -> AppResult<BookingDetails> {
        self.repository.bookings.get_details(id).await
    }

    /// Get a single booking request row
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookingRequest> {
        self.repository.bookings.get_by_id(id).await
    }

    /// List booking requests of one user
    pub async fn get_user_requests(
        &self,
        user_id: i32,
        query: &BookingQuery,
    ) -> AppResult<(Vec<BookingDetails>, i64)> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;
        let scoped = BookingQuery {
            user_id: Some(user_id),
            status: query.status,
            resource_kind: query.resource_kind,
            resource_id: query.resource_id,
            date: query.date.clone(),
            page: query.page,
            per_page: query.per_page,
        };
        self.repository.bookings.list(&scoped).await
    }
}
