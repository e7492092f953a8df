use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::GameId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    InvalidGuessLength { length: usize },
    InvalidGuessCharacters { guess: String },
    DailyLimitReached { completed_today: u32 },
    EmptyWordBank,
    SessionGameMismatch { game_id: GameId },
    GameAlreadyCompleted { game_id: GameId },
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidGuessLength { length } => {
                write!(f, "Guess must be a 5-letter word, got {} characters", length)
            }
            GameError::InvalidGuessCharacters { guess } => {
                write!(f, "Guess '{}' must contain only letters A-Z", guess)
            }
            GameError::DailyLimitReached { completed_today } => write!(
                f,
                "Daily limit reached: {} games completed today",
                completed_today
            ),
            GameError::EmptyWordBank => write!(f, "No words available"),
            GameError::SessionGameMismatch { game_id } => {
                write!(f, "Session is bound to game {} which is not playable", game_id)
            }
            GameError::GameAlreadyCompleted { game_id } => {
                write!(f, "Game {} is already completed", game_id)
            }
        }
    }
}

impl std::error::Error for GameError {}

impl GameError {
    /// Short machine-readable code for the rejection reasons clients see.
    pub fn reason(&self) -> GuessRejection {
        match self {
            GameError::InvalidGuessLength { .. } => GuessRejection::BadLength,
            GameError::InvalidGuessCharacters { .. } => GuessRejection::BadCharacters,
            GameError::DailyLimitReached { .. } => GuessRejection::LimitReached,
            GameError::EmptyWordBank => GuessRejection::NoWords,
            GameError::SessionGameMismatch { .. } | GameError::GameAlreadyCompleted { .. } => {
                GuessRejection::GameCompleted
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum GuessRejection {
    BadLength,
    BadCharacters,
    LimitReached,
    NoWords,
    GameCompleted,
}
