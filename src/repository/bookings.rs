//! Booking requests repository
//!
//! All conflict decisions go through [`conflict_exists`], which applies the
//! shared `TimeSlot::overlaps` predicate to the approved requests of one
//! resource on one date. Approval re-runs the check inside a transaction
//! holding a row lock on the resource, so two concurrent approvals of
//! overlapping requests cannot both commit.

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{BookingDetails, BookingQuery, BookingRequest, TimeSlot},
        enums::{RequestStatus, ResourceKind},
        user::UserShort,
    },
};

/// New booking request, validated by the service layer
#[derive(Debug)]
pub struct NewBooking {
    pub user_id: i32,
    pub resource_kind: ResourceKind,
    pub resource_id: i32,
    pub booking_date: NaiveDate,
    pub slot: TimeSlot,
    pub purpose: Option<String>,
    pub attendees: Option<i32>,
}

/// Check a candidate slot against the approved requests of a resource/date.
///
/// Takes any executor so the same check runs against the pool (creation path)
/// and inside the approval transaction. `exclude_request_id` keeps a request
/// from being compared against itself when re-checked at approval time.
async fn conflict_exists<'e, E>(
    executor: E,
    kind: ResourceKind,
    resource_id: i32,
    date: NaiveDate,
    slot: TimeSlot,
    exclude_request_id: Option<i32>,
) -> AppResult<bool>
where
    E: sqlx::PgExecutor<'e>,
{
    let approved: Vec<(NaiveTime, NaiveTime)> = sqlx::query_as(
        r#"
        SELECT start_time, end_time FROM booking_requests
        WHERE resource_kind = $1 AND resource_id = $2 AND booking_date = $3
          AND status = 'approved'
          AND ($4::int4 IS NULL OR id <> $4)
        "#,
    )
    .bind(kind)
    .bind(resource_id)
    .bind(date)
    .bind(exclude_request_id)
    .fetch_all(executor)
    .await?;

    Ok(approved
        .into_iter()
        .any(|(start, end)| slot.overlaps(&TimeSlot { start, end })))
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookingRequest> {
        sqlx::query_as::<_, BookingRequest>("SELECT * FROM booking_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking request {} not found", id)))
    }

    /// Check a candidate slot for conflicts with approved bookings
    pub async fn has_conflict(
        &self,
        kind: ResourceKind,
        resource_id: i32,
        date: NaiveDate,
        slot: TimeSlot,
        exclude_request_id: Option<i32>,
    ) -> AppResult<bool> {
        conflict_exists(&self.pool, kind, resource_id, date, slot, exclude_request_id).await
    }

    /// Create a booking request in pending state.
    ///
    /// Fails closed: when the slot already conflicts with an approved booking
    /// no row is persisted.
    pub async fn create(&self, booking: &NewBooking) -> AppResult<BookingRequest> {
        if conflict_exists(
            &self.pool,
            booking.resource_kind,
            booking.resource_id,
            booking.booking_date,
            booking.slot,
            None,
        )
        .await?
        {
            return Err(AppError::Conflict(
                "Time slot is already booked for this resource".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, BookingRequest>(
            r#"
            INSERT INTO booking_requests (
                resource_kind, resource_id, user_id, booking_date,
                start_time, end_time, status, purpose, attendees
            ) VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8)
            RETURNING *
            "#,
        )
        .bind(booking.resource_kind)
        .bind(booking.resource_id)
        .bind(booking.user_id)
        .bind(booking.booking_date)
        .bind(booking.slot.start)
        .bind(booking.slot.end)
        .bind(&booking.purpose)
        .bind(booking.attendees)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Approve a pending request.
    ///
    /// The conflict check runs again here: other requests may have been
    /// approved since this one was created. Request row, resource row lock,
    /// re-check and status update share one transaction; any early return
    /// rolls it back.
    pub async fn approve(&self, id: i32, approver_id: i32) -> AppResult<BookingRequest> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, BookingRequest>(
            "SELECT * FROM booking_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking request {} not found", id)))?;

        if request.status != RequestStatus::Pending {
            return Err(AppError::BusinessRule(format!(
                "Only pending requests can be approved (status: {})",
                request.status
            )));
        }

        // Lock the resource row: concurrent approvals for the same resource
        // serialize here, so each one re-checks against a committed snapshot.
        match request.resource_kind {
            ResourceKind::Room => {
                sqlx::query_scalar::<_, i32>("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
                    .bind(request.resource_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Room {} not found", request.resource_id))
                    })?;
            }
            ResourceKind::Game => {
                let is_available: bool = sqlx::query_scalar(
                    "SELECT is_available FROM board_games WHERE id = $1 FOR UPDATE",
                )
                .bind(request.resource_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Board game {} not found", request.resource_id))
                })?;

                if !is_available {
                    return Err(AppError::BusinessRule(
                        "Board game is currently unavailable".to_string(),
                    ));
                }
            }
        }

        if conflict_exists(
            &mut *tx,
            request.resource_kind,
            request.resource_id,
            request.booking_date,
            request.slot(),
            Some(id),
        )
        .await?
        {
            return Err(AppError::Conflict(
                "Time slot conflicts with an approved booking".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, BookingRequest>(
            r#"
            UPDATE booking_requests
            SET status = 'approved', decided_by = $2, decided_date = $3, modif_date = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approver_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Reject a pending request
    pub async fn reject(
        &self,
        id: i32,
        approver_id: i32,
        reason: Option<&str>,
    ) -> AppResult<BookingRequest> {
        let now = Utc::now();
        let updated = sqlx::query_as::<_, BookingRequest>(
            r#"
            UPDATE booking_requests
            SET status = 'rejected', decided_by = $2, decided_date = $3, modif_date = $3,
                rejection_reason = $4
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approver_id)
        .bind(now)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(row) => Ok(row),
            None => {
                let existing = self.get_by_id(id).await?;
                Err(AppError::BusinessRule(format!(
                    "Only pending requests can be rejected (status: {})",
                    existing.status
                )))
            }
        }
    }

    /// Cancel a pending request (requester withdrawal)
    pub async fn cancel(&self, id: i32) -> AppResult<BookingRequest> {
        let now = Utc::now();
        let updated = sqlx::query_as::<_, BookingRequest>(
            r#"
            UPDATE booking_requests
            SET status = 'cancelled', modif_date = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(row) => Ok(row),
            None => {
                let existing = self.get_by_id(id).await?;
                Err(AppError::BusinessRule(format!(
                    "Only pending requests can be cancelled (status: {})",
                    existing.status
                )))
            }
        }
    }

    /// List booking requests with optional filters and pagination
    pub async fn list(&self, query: &BookingQuery) -> AppResult<(Vec<BookingDetails>, i64)> {
        let page = query.page.unwrap_or(1);
        let per_page = query.per_page.unwrap_or(50);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("br.status = ${}", idx));
            idx += 1;
        }
        if query.resource_kind.is_some() {
            conditions.push(format!("br.resource_kind = ${}", idx));
            idx += 1;
        }
        if query.resource_id.is_some() {
            conditions.push(format!("br.resource_id = ${}", idx));
            idx += 1;
        }
        if query.user_id.is_some() {
            conditions.push(format!("br.user_id = ${}", idx));
            idx += 1;
        }
        if query.date.is_some() {
            conditions.push(format!("br.booking_date = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let date = query
            .date
            .as_ref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        // Count total
        let count_q = format!("SELECT COUNT(*) FROM booking_requests br {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(status) = query.status {
            count_builder = count_builder.bind(status);
        }
        if let Some(kind) = query.resource_kind {
            count_builder = count_builder.bind(kind);
        }
        if let Some(rid) = query.resource_id {
            count_builder = count_builder.bind(rid);
        }
        if let Some(uid) = query.user_id {
            count_builder = count_builder.bind(uid);
        }
        if let Some(d) = date {
            count_builder = count_builder.bind(d);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        // Fetch rows with resource and requester details
        let select_q = format!(
            r#"
            SELECT br.*, COALESCE(r.name, g.name) AS resource_name,
                   u.id AS requester_id, u.firstname AS requester_firstname,
                   u.lastname AS requester_lastname, u.role AS requester_role
            FROM booking_requests br
            LEFT JOIN rooms r ON br.resource_kind = 'room' AND r.id = br.resource_id
            LEFT JOIN board_games g ON br.resource_kind = 'game' AND g.id = br.resource_id
            LEFT JOIN users u ON u.id = br.user_id
            {}
            ORDER BY br.booking_date DESC, br.start_time
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query(&select_q);
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(kind) = query.resource_kind {
            builder = builder.bind(kind);
        }
        if let Some(rid) = query.resource_id {
            builder = builder.bind(rid);
        }
        if let Some(uid) = query.user_id {
            builder = builder.bind(uid);
        }
        if let Some(d) = date {
            builder = builder.bind(d);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        let details = rows.iter().map(details_from_row).collect::<AppResult<Vec<_>>>()?;
        Ok((details, total))
    }

    /// Get booking request with display details
    pub async fn get_details(&self, id: i32) -> AppResult<BookingDetails> {
        let row = sqlx::query(
            r#"
            SELECT br.*, COALESCE(r.name, g.name) AS resource_name,
                   u.id AS requester_id, u.firstname AS requester_firstname,
                   u.lastname AS requester_lastname, u.role AS requester_role
            FROM booking_requests br
            LEFT JOIN rooms r ON br.resource_kind = 'room' AND r.id = br.resource_id
            LEFT JOIN board_games g ON br.resource_kind = 'game' AND g.id = br.resource_id
            LEFT JOIN users u ON u.id = br.user_id
            WHERE br.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking request {} not found", id)))?;

        details_from_row(&row)
    }

    /// Count requests grouped by status (for stats)
    pub async fn count_by_status(&self) -> AppResult<Vec<(RequestStatus, i64)>> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS count FROM booking_requests GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut counts = Vec::new();
        for row in rows {
            let status: RequestStatus = row.try_get("status")?;
            let count: i64 = row.try_get("count")?;
            counts.push((status, count));
        }
        Ok(counts)
    }

    /// Count approved bookings on a given date (for stats)
    pub async fn count_approved_on(&self, date: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM booking_requests WHERE status = 'approved' AND booking_date = $1",
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

/// Map a joined row to booking details
fn details_from_row(row: &sqlx::postgres::PgRow) -> AppResult<BookingDetails> {
    let requester_id: Option<i32> = row.try_get("requester_id")?;
    let user = requester_id.map(|uid| {
        let role: Option<String> = row.get("requester_role");
        UserShort {
            id: uid,
            firstname: row.get("requester_firstname"),
            lastname: row.get("requester_lastname"),
            role: role
                .and_then(|r| r.parse().ok())
                .unwrap_or(crate::models::enums::Role::Member),
        }
    });

    let resource_name: Option<String> = row.try_get("resource_name")?;

    Ok(BookingDetails {
        id: row.try_get("id")?,
        resource_kind: row.try_get("resource_kind")?,
        resource_id: row.try_get("resource_id")?,
        resource_name: resource_name.unwrap_or_default(),
        booking_date: row.try_get("booking_date")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        status: row.try_get("status")?,
        purpose: row.try_get("purpose")?,
        attendees: row.try_get("attendees")?,
        user,
        decided_by: row.try_get("decided_by")?,
        decided_date: row.try_get("decided_date")?,
        rejection_reason: row.try_get("rejection_reason")?,
        crea_date: row.try_get("crea_date")?,
    })
}
