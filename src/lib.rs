//! Alcove Library Reservation System
//!
//! A Rust implementation of the Alcove reservation server, providing a REST
//! JSON API for booking library study rooms and board games, with admin
//! approval and conflict detection on time slots.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
