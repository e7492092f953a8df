use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{games, guesses, prelude::*};
use game_core::GameProgress;
use game_types::{Game, GameId, Guess, UserId, WordId};

/// Games and their guesses. Every decision the game rules make is based on
/// rows read fresh from here.
pub struct GameRepository {
    db: DatabaseConnection,
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_game(model: games::Model) -> Game {
        Game {
            id: model.id,
            user_id: model.user_id,
            word_id: model.word_id,
            created_at: model.created_at.to_rfc3339(),
            win: model.win,
        }
    }

    fn model_to_guess(model: guesses::Model) -> Guess {
        Guess {
            id: model.id,
            game_id: model.game_id,
            guess_word: model.guess_word,
            created_at: model.created_at.to_rfc3339(),
            is_correct: model.is_correct,
        }
    }

    pub async fn create_game(&self, user_id: UserId, word_id: WordId) -> Result<Game> {
        self.create_game_at(user_id, word_id, Utc::now()).await
    }

    /// Create a game with an explicit creation time.
    pub async fn create_game_at(
        &self,
        user_id: UserId,
        word_id: WordId,
        created_at: DateTime<Utc>,
    ) -> Result<Game> {
        let game_model = games::ActiveModel {
            id: sea_orm::ActiveValue::Set(Uuid::new_v4()),
            user_id: sea_orm::ActiveValue::Set(user_id),
            word_id: sea_orm::ActiveValue::Set(word_id),
            created_at: sea_orm::ActiveValue::Set(created_at.into()),
            win: sea_orm::ActiveValue::Set(false),
        };

        let saved = game_model.insert(&self.db).await?;
        Ok(Self::model_to_game(saved))
    }

    pub async fn find_by_id(&self, game_id: GameId) -> Result<Option<Game>> {
        let game_model = Games::find_by_id(game_id).one(&self.db).await?;
        Ok(game_model.map(Self::model_to_game))
    }

    /// Games of one user created at or after `since`.
    pub async fn games_since(&self, user_id: UserId, since: DateTime<Utc>) -> Result<Vec<Game>> {
        let since: sea_orm::prelude::DateTimeWithTimeZone = since.into();
        let models = Games::find()
            .filter(games::Column::UserId.eq(user_id))
            .filter(games::Column::CreatedAt.gte(since))
            .order_by_asc(games::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_game).collect())
    }

    /// All games of one user, newest first.
    pub async fn games_for_user(&self, user_id: UserId) -> Result<Vec<Game>> {
        let models = Games::find()
            .filter(games::Column::UserId.eq(user_id))
            .order_by_desc(games::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_game).collect())
    }

    /// Guesses of one game in submission order.
    pub async fn guesses_for_game(&self, game_id: GameId) -> Result<Vec<Guess>> {
        let models = Guesses::find()
            .filter(guesses::Column::GameId.eq(game_id))
            .order_by_asc(guesses::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_guess).collect())
    }

    pub async fn count_guesses(&self, game_id: GameId) -> Result<u64> {
        let count = Guesses::find()
            .filter(guesses::Column::GameId.eq(game_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Progress of each listed game, recomputed from its guess rows. Games
    /// without guesses are present with zero progress.
    pub async fn progress_for_games(
        &self,
        game_ids: &[GameId],
    ) -> Result<HashMap<GameId, GameProgress>> {
        let mut progress: HashMap<GameId, GameProgress> = game_ids
            .iter()
            .map(|id| (*id, GameProgress::new(0, false)))
            .collect();

        if game_ids.is_empty() {
            return Ok(progress);
        }

        let models = Guesses::find()
            .filter(guesses::Column::GameId.is_in(game_ids.iter().copied()))
            .all(&self.db)
            .await?;

        for guess in models {
            if let Some(entry) = progress.get_mut(&guess.game_id) {
                entry.guess_count += 1;
                entry.won |= guess.is_correct;
            }
        }

        Ok(progress)
    }

    /// Append a guess and, for a correct one, set the game's win flag in the
    /// same transaction.
    pub async fn record_guess(
        &self,
        game_id: GameId,
        guess_word: &str,
        is_correct: bool,
    ) -> Result<Guess> {
        let txn = self.db.begin().await?;

        let guess_model = guesses::ActiveModel {
            game_id: sea_orm::ActiveValue::Set(game_id),
            guess_word: sea_orm::ActiveValue::Set(guess_word.to_string()),
            created_at: sea_orm::ActiveValue::Set(Utc::now().into()),
            is_correct: sea_orm::ActiveValue::Set(is_correct),
            ..Default::default()
        };
        let saved = guess_model.insert(&txn).await?;

        if is_correct {
            Games::update_many()
                .col_expr(games::Column::Win, Expr::value(true))
                .filter(games::Column::Id.eq(game_id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        debug!("Recorded guess {} for game {}", saved.id, game_id);

        Ok(Self::model_to_guess(saved))
    }

    /// Distinct users with a game created at or after `since`.
    pub async fn count_players_since(&self, since: DateTime<Utc>) -> Result<u64> {
        let since: sea_orm::prelude::DateTimeWithTimeZone = since.into();
        let user_ids: Vec<Uuid> = Games::find()
            .select_only()
            .column(games::Column::UserId)
            .distinct()
            .filter(games::Column::CreatedAt.gte(since))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(user_ids.len() as u64)
    }

    /// Correct guesses on games created at or after `since`.
    pub async fn count_correct_guesses_since(&self, since: DateTime<Utc>) -> Result<u64> {
        let since: sea_orm::prelude::DateTimeWithTimeZone = since.into();
        let count = Guesses::find()
            .join(JoinType::InnerJoin, guesses::Relation::Games.def())
            .filter(guesses::Column::IsCorrect.eq(true))
            .filter(games::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
