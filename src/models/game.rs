//! Board game model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Board game record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BoardGame {
    pub id: i32,
    /// Game title
    pub name: String,
    /// Category (strategy, party, card, ...)
    pub category: Option<String>,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    /// Set by staff; an unavailable game cannot be requested or approved
    pub is_available: bool,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create board game request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBoardGame {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub category: Option<String>,
    #[validate(range(min = 1))]
    pub min_players: Option<i32>,
    #[validate(range(min = 1))]
    pub max_players: Option<i32>,
    /// Defaults to available when omitted
    pub is_available: Option<bool>,
    pub notes: Option<String>,
}

/// Update board game request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBoardGame {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 1))]
    pub min_players: Option<i32>,
    #[validate(range(min = 1))]
    pub max_players: Option<i32>,
    pub is_available: Option<bool>,
    pub notes: Option<String>,
}
