//! Board games service

use crate::{
    error::AppResult,
    models::game::{BoardGame, CreateBoardGame, UpdateBoardGame},
    repository::Repository,
};

#[derive(Clone)]
pub struct GamesService {
    repository: Repository,
}

impl GamesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<BoardGame>> {
        self.repository.games.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<BoardGame> {
        self.repository.games.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateBoardGame) -> AppResult<BoardGame> {
        self.repository.games.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateBoardGame) -> AppResult<BoardGame> {
        self.repository.games.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.games.delete(id).await
    }
}
