use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameId, GuessRejection, GuessRow, LetterResult, User};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRequest {
    pub guess: String,
}

/// Why no game can be played right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameOverState {
    DailyLimitReached { completed_today: u32 },
    NoWordsAvailable,
}

/// Result of a play request. The target word is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSnapshot {
    pub game_id: Option<GameId>,
    pub prior_guesses: Vec<GuessRow>,
    pub guesses_remaining: i32,
    pub game_over: Option<GameOverState>,
}

impl GameSnapshot {
    pub fn unavailable(state: GameOverState) -> Self {
        Self {
            game_id: None,
            prior_guesses: Vec::new(),
            guesses_remaining: 0,
            game_over: Some(state),
        }
    }
}

/// Result of a guess submission.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessOutcome {
    pub accepted: bool,
    pub letters: Option<Vec<LetterResult>>,
    pub game_over: bool,
    pub won: Option<bool>,
    pub revealed_word: Option<String>,
    pub guesses_remaining: Option<i32>,
    pub error_reason: Option<GuessRejection>,
}

impl GuessOutcome {
    pub fn rejected(reason: GuessRejection) -> Self {
        Self {
            accepted: false,
            letters: None,
            game_over: matches!(
                reason,
                GuessRejection::LimitReached | GuessRejection::NoWords | GuessRejection::GameCompleted
            ),
            won: None,
            revealed_word: None,
            guesses_remaining: None,
            error_reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyReport {
    pub date: String,
    pub users_today: u64,
    pub correct_guesses_today: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserGameReport {
    pub game_id: GameId,
    pub date: String,
    pub words_tried: u64,
    pub correct_guesses: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserReport {
    pub user: User,
    pub games: Vec<UserGameReport>,
}
