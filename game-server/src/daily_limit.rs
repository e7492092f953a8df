use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::debug;

use game_core::{count_completed, local_day_start};
use game_persistence::repositories::GameRepository;
use game_types::{GameId, UserId};

/// Gates new games on how many games a user has completed since local
/// midnight. Nothing is cached: every call reads the store again.
pub struct DailyLimiter {
    games: Arc<GameRepository>,
    limit: u32,
}

impl DailyLimiter {
    pub fn new(games: Arc<GameRepository>, limit: u32) -> Self {
        Self { games, limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub async fn completed_games_today(&self, user_id: UserId) -> Result<u32> {
        self.completed_games_today_at(user_id, Local::now()).await
    }

    pub async fn completed_games_today_at(
        &self,
        user_id: UserId,
        now: DateTime<Local>,
    ) -> Result<u32> {
        let since = local_day_start(now);
        let games = self.games.games_since(user_id, since).await?;
        let game_ids: Vec<GameId> = games.iter().map(|game| game.id).collect();
        let progress = self.games.progress_for_games(&game_ids).await?;

        let completed = count_completed(progress.into_values());
        debug!(
            "User {} has {} of {} games completed since {}",
            user_id,
            completed,
            game_ids.len(),
            since
        );
        Ok(completed)
    }

    pub async fn can_start_or_continue(&self, user_id: UserId) -> Result<bool> {
        self.can_start_or_continue_at(user_id, Local::now()).await
    }

    pub async fn can_start_or_continue_at(
        &self,
        user_id: UserId,
        now: DateTime<Local>,
    ) -> Result<bool> {
        Ok(self.completed_games_today_at(user_id, now).await? < self.limit)
    }
}
