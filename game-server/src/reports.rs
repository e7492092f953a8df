use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local};

use game_core::local_day_start;
use game_persistence::repositories::{GameRepository, UserRepository};
use game_types::{DailyReport, GameId, UserGameReport, UserReport};

/// Read-only aggregates for administrators.
pub struct ReportService {
    users: Arc<UserRepository>,
    games: Arc<GameRepository>,
}

fn display_date(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map(|date| date.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}

impl ReportService {
    pub fn new(users: Arc<UserRepository>, games: Arc<GameRepository>) -> Self {
        Self { users, games }
    }

    pub async fn daily_report(&self) -> Result<DailyReport> {
        self.daily_report_at(Local::now()).await
    }

    /// Players and correct guesses on games created since local midnight.
    pub async fn daily_report_at(&self, now: DateTime<Local>) -> Result<DailyReport> {
        let since = local_day_start(now);

        Ok(DailyReport {
            date: now.format("%Y-%m-%d").to_string(),
            users_today: self.games.count_players_since(since).await?,
            correct_guesses_today: self.games.count_correct_guesses_since(since).await?,
        })
    }

    /// Every game of one user, newest first. `None` for an unknown username.
    pub async fn user_report(&self, username: &str) -> Result<Option<UserReport>> {
        let Some(user) = self.users.find_by_username(username).await? else {
            return Ok(None);
        };

        let games = self.games.games_for_user(user.id).await?;
        let game_ids: Vec<GameId> = games.iter().map(|game| game.id).collect();
        let progress = self.games.progress_for_games(&game_ids).await?;

        let games = games
            .into_iter()
            .map(|game| {
                let stats = progress.get(&game.id).copied().unwrap_or_default();
                UserGameReport {
                    game_id: game.id,
                    date: display_date(&game.created_at),
                    words_tried: stats.guess_count as u64,
                    // A game stops at its first correct guess
                    correct_guesses: u64::from(stats.won),
                }
            })
            .collect();

        Ok(Some(UserReport { user, games }))
    }
}
