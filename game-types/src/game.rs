use crate::{GameId, GuessId, UserId, WordId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A target word from the word bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Word {
    pub id: WordId,
    pub text: String,
}

/// A persisted game row. `win` mirrors the guess rows; completion is always
/// recomputed from the guesses themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Game {
    pub id: GameId,
    pub user_id: UserId,
    pub word_id: WordId,
    pub created_at: String, // ISO 8601 string
    pub win: bool,
}

/// A persisted guess row. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Guess {
    pub id: GuessId,
    pub game_id: GameId,
    pub guess_word: String,
    pub created_at: String, // ISO 8601 string
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LetterResult {
    pub letter: String,
    pub status: LetterStatus,
    pub position: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LetterStatus {
    Correct, // Green - correct letter in correct position
    Present, // Orange - correct letter in wrong position
    Absent,  // Grey - letter not in word
}

/// One row of the board: a previous guess with its colors derived from the
/// target on demand.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRow {
    pub word: String,
    pub letters: Vec<LetterResult>,
    pub is_correct: bool,
}
