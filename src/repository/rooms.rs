//! Rooms repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::room::{CreateRoom, Room, UpdateRoom},
};

#[derive(Clone)]
pub struct RoomsRepository {
    pool: Pool<Postgres>,
}

impl RoomsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all rooms
    pub async fn list(&self) -> AppResult<Vec<Room>> {
        let rows = sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get room by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Room> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", id)))
    }

    /// Create a room
    pub async fn create(&self, data: &CreateRoom) -> AppResult<Room> {
        let row = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (name, location, capacity, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.location)
        .bind(data.capacity)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a room
    pub async fn update(&self, id: i32, data: &UpdateRoom) -> AppResult<Room> {
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
        add_field!(data.location, "location");
        add_field!(data.capacity, "capacity");
        add_field!(data.notes, "notes");

        let query = format!("UPDATE rooms SET {} WHERE id = {} RETURNING *", sets.join(", "), id);

        let mut builder = sqlx::query_as::<_, Room>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.location);
        bind_field!(data.capacity);
        bind_field!(data.notes);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", id)))
    }

    /// Delete a room, unless it still has approved future bookings
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let has_future_bookings: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM booking_requests
                WHERE resource_kind = 'room' AND resource_id = $1
                  AND status = 'approved' AND booking_date >= CURRENT_DATE
            )
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if has_future_bookings {
            return Err(AppError::BusinessRule(
                "Room has approved upcoming bookings".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Room {} not found", id)));
        }
        Ok(())
    }

    /// Count rooms (for stats)
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
