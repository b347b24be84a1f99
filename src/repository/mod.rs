//! Repository layer for database operations

pub mod bookings;
pub mod games;
pub mod rooms;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub rooms: rooms::RoomsRepository,
    pub games: games::GamesRepository,
    pub bookings: bookings::BookingsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            rooms: rooms::RoomsRepository::new(pool.clone()),
            games: games::GamesRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}
