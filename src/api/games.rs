//! Board game management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::game::{BoardGame, CreateBoardGame, UpdateBoardGame},
};

use super::AuthenticatedUser;

/// List all board games
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Board game list", body = Vec<BoardGame>)
    )
)]
pub async fn list_games(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BoardGame>>> {
    let games = state.services.games.list().await?;
    Ok(Json(games))
}

/// Get board game by ID
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Board game ID")),
    responses(
        (status = 200, description = "Board game details", body = BoardGame),
        (status = 404, description = "Board game not found")
    )
)]
pub async fn get_game(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BoardGame>> {
    let game = state.services.games.get_by_id(id).await?;
    Ok(Json(game))
}

/// Create board game
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    security(("bearer_auth" = [])),
    request_body = CreateBoardGame,
    responses(
        (status = 201, description = "Board game created", body = BoardGame)
    )
)]
pub async fn create_game(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBoardGame>,
) -> AppResult<(StatusCode, Json<BoardGame>)> {
    claims.require_admin()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let game = state.services.games.create(&data).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// Update board game
#[utoipa::path(
    put,
    path = "/games/{id}",
    tag = "games",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Board game ID")),
    request_body = UpdateBoardGame,
    responses(
        (status = 200, description = "Board game updated", body = BoardGame),
        (status = 404, description = "Board game not found")
    )
)]
pub async fn update_game(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBoardGame>,
) -> AppResult<Json<BoardGame>> {
    claims.require_admin()?;
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let game = state.services.games.update(id, &data).await?;
    Ok(Json(game))
}

/// Delete board game
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Board game ID")),
    responses(
        (status = 204, description = "Board game deleted"),
        (status = 404, description = "Board game not found"),
        (status = 422, description = "Board game has approved upcoming bookings")
    )
)]
pub async fn delete_game(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.games.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
