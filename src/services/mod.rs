//! Business logic services

pub mod bookings;
pub mod games;
pub mod rooms;
pub mod stats;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub rooms: rooms::RoomsService,
    pub games: games::GamesService,
    pub bookings: bookings::BookingsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            rooms: rooms::RoomsService::new(repository.clone()),
            games: games::GamesService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
