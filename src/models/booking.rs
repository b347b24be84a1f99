//! Booking request model and the time-slot conflict core

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{RequestStatus, ResourceKind};
use super::user::UserShort;

/// Half-open wall-clock interval `[start, end)` on a single calendar day.
///
/// Two bookings that touch at a boundary (one ends at 11:00, the next starts
/// at 11:00) do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Build a slot, refusing empty or inverted intervals (`end <= start`).
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        if end > start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Standard half-open interval intersection test.
    ///
    /// `[s1,e1)` and `[s2,e2)` intersect iff `s1 < e2 && s2 < e1`. This covers
    /// a candidate starting during the other slot, ending during it, and
    /// fully containing it.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Booking request row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookingRequest {
    pub id: i32,
    pub resource_kind: ResourceKind,
    pub resource_id: i32,
    /// Requester
    pub user_id: i32,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: RequestStatus,
    /// Stated purpose (group study, game night, ...)
    pub purpose: Option<String>,
    /// Expected number of attendees
    pub attendees: Option<i32>,
    /// Admin who approved or rejected the request
    pub decided_by: Option<i32>,
    pub decided_date: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

impl BookingRequest {
    /// The request's interval as a slot for conflict checks.
    pub fn slot(&self) -> TimeSlot {
        TimeSlot {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// Create booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub resource_kind: ResourceKind,
    pub resource_id: i32,
    /// Booking date (YYYY-MM-DD)
    pub booking_date: String,
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM), strictly after start_time
    pub end_time: String,
    #[validate(length(max = 500))]
    pub purpose: Option<String>,
    #[validate(range(min = 1))]
    pub attendees: Option<i32>,
}

/// Reject booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectBooking {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Booking request with display details
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDetails {
    pub id: i32,
    pub resource_kind: ResourceKind,
    pub resource_id: i32,
    /// Room or game name
    pub resource_name: String,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: RequestStatus,
    pub purpose: Option<String>,
    pub attendees: Option<i32>,
    pub user: Option<UserShort>,
    pub decided_by: Option<i32>,
    pub decided_date: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Query parameters for booking requests
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookingQuery {
    /// Filter by status
    pub status: Option<RequestStatus>,
    /// Filter by resource kind
    pub resource_kind: Option<ResourceKind>,
    /// Filter by resource ID (with resource_kind)
    pub resource_id: Option<i32>,
    /// Filter by requester
    pub user_id: Option<i32>,
    /// Filter by booking date (YYYY-MM-DD)
    pub date: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(s: (u32, u32), e: (u32, u32)) -> TimeSlot {
        TimeSlot::new(t(s.0, s.1), t(e.0, e.1)).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted_intervals() {
        assert!(TimeSlot::new(t(10, 0), t(10, 0)).is_none());
        assert!(TimeSlot::new(t(11, 0), t(10, 0)).is_none());
        assert!(TimeSlot::new(t(10, 0), t(10, 1)).is_some());
    }

    #[test]
    fn touching_boundaries_do_not_overlap() {
        let a = slot((10, 0), (11, 0));
        let b = slot((11, 0), (12, 0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn disjoint_slots_do_not_overlap() {
        let a = slot((9, 0), (10, 0));
        let b = slot((14, 0), (15, 30));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn candidate_starting_during_existing_overlaps() {
        let existing = slot((10, 0), (11, 0));
        let candidate = slot((10, 30), (11, 30));
        assert!(candidate.overlaps(&existing));
    }

    #[test]
    fn candidate_ending_during_existing_overlaps() {
        let existing = slot((10, 0), (11, 0));
        let candidate = slot((9, 30), (10, 30));
        assert!(candidate.overlaps(&existing));
    }

    #[test]
    fn fully_contained_candidate_overlaps() {
        let existing = slot((9, 0), (13, 0));
        let candidate = slot((10, 0), (12, 0));
        assert!(candidate.overlaps(&existing));
    }

    #[test]
    fn candidate_containing_existing_overlaps() {
        let existing = slot((10, 30), (10, 45));
        let candidate = slot((10, 0), (11, 0));
        assert!(candidate.overlaps(&existing));
    }

    #[test]
    fn identical_slots_overlap() {
        let a = slot((10, 0), (11, 0));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (slot((10, 0), (11, 0)), slot((10, 30), (10, 45))),
            (slot((10, 0), (11, 0)), slot((11, 0), (12, 0))),
            (slot((8, 0), (9, 15)), slot((9, 0), (10, 0))),
            (slot((6, 0), (7, 0)), slot((20, 0), (21, 0))),
        ];
        for (a, b) in cases {
            assert_eq!(a.overlaps(&b), b.overlaps(&a), "{:?} vs {:?}", a, b);
        }
    }
}
