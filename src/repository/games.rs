//! Board games repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::game::{BoardGame, CreateBoardGame, UpdateBoardGame},
};

#[derive(Clone)]
pub struct GamesRepository {
    pool: Pool<Postgres>,
}

impl GamesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all board games
    pub async fn list(&self) -> AppResult<Vec<BoardGame>> {
        let rows = sqlx::query_as::<_, BoardGame>("SELECT * FROM board_games ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get board game by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BoardGame> {
        sqlx::query_as::<_, BoardGame>("SELECT * FROM board_games WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Board game {} not found", id)))
    }

    /// Create a board game
    pub async fn create(&self, data: &CreateBoardGame) -> AppResult<BoardGame> {
        let row = sqlx::query_as::<_, BoardGame>(
            r#"
            INSERT INTO board_games (name, category, min_players, max_players, is_available, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.category)
        .bind(data.min_players)
        .bind(data.max_players)
        .bind(data.is_available.unwrap_or(true))
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a board game
    pub async fn update(&self, id: i32, data: &UpdateBoardGame) -> AppResult<BoardGame> {
        let now = Utc::now();
        let mut sets = vec!["modif_date = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.category, "category");
        add_field!(data.min_players, "min_players");
        add_field!(data.max_players, "max_players");
        add_field!(data.is_available, "is_available");
        add_field!(data.notes, "notes");

        let query = format!(
            "UPDATE board_games SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, BoardGame>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.category);
        bind_field!(data.min_players);
        bind_field!(data.max_players);
        bind_field!(data.is_available);
        bind_field!(data.notes);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Board game {} not found", id)))
    }

    /// Delete a board game, unless it still has approved future bookings
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let has_future_bookings: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM booking_requests
                WHERE resource_kind = 'game' AND resource_id = $1
                  AND status = 'approved' AND booking_date >= CURRENT_DATE
            )
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if has_future_bookings {
            return Err(AppError::BusinessRule(
                "Board game has approved upcoming bookings".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM board_games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Board game {} not found", id)));
        }
        Ok(())
    }

    /// Count board games (for stats)
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM board_games")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
