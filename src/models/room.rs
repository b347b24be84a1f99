//! Study room model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Study room record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Room {
    pub id: i32,
    /// Room name (e.g. "Reading Room 2")
    pub name: String,
    /// Floor or wing within the library
    pub location: Option<String>,
    /// Seats available; informational, does not gate bookings
    pub capacity: Option<i32>,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create room request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoom {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub location: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    pub notes: Option<String>,
}

/// Update room request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoom {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    pub notes: Option<String>,
}
