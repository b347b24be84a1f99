//! Statistics service

use chrono::Utc;

use crate::{
    api::stats::{BookingStats, ResourceStats, StatsResponse},
    error::AppResult,
    models::enums::RequestStatus,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get booking and resource statistics for the admin dashboard
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let by_status = self.repository.bookings.count_by_status().await?;

        let mut bookings = BookingStats {
            pending: 0,
            approved: 0,
            rejected: 0,
            cancelled: 0,
            approved_today: 0,
        };
        for (status, count) in by_status {
            match status {
                RequestStatus::Pending => bookings.pending = count,
                RequestStatus::Approved => bookings.approved = count,
                RequestStatus::Rejected => bookings.rejected = count,
                RequestStatus::Cancelled => bookings.cancelled = count,
            }
        }

        let today = Utc::now().date_naive();
        bookings.approved_today = self.repository.bookings.count_approved_on(today).await?;

        let resources = ResourceStats {
            rooms: self.repository.rooms.count().await?,
            games: self.repository.games.count().await?,
        };

        let users = self.repository.users.count().await?;

        Ok(StatsResponse {
            bookings,
            resources,
            users,
        })
    }
}
