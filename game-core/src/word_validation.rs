use game_types::{GameError, Word};
use rand::seq::IndexedRandom;

use crate::WORD_LENGTH;

/// Reference seed set for a fresh database.
pub const DEFAULT_WORDS: [&str; 20] = [
    "APPLE", "BRAVE", "CRANE", "DREAM", "ELITE", "FLAME", "GRAPE", "HOUSE", "INPUT", "JOKER",
    "KNIFE", "LEMON", "MONEY", "NURSE", "OCEAN", "PLANT", "QUEEN", "ROBOT", "SUGAR", "TIGER",
];

/// Trim and uppercase raw user input.
pub fn normalize_word(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Check if word contains only ASCII letters
pub fn is_alphabetic(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_alphabetic())
}

/// Normalize and validate a submitted guess.
pub fn validate_guess(raw: &str) -> Result<String, GameError> {
    let guess = normalize_word(raw);
    let length = guess.chars().count();

    if length != WORD_LENGTH {
        return Err(GameError::InvalidGuessLength { length });
    }
    if !is_alphabetic(&guess) {
        return Err(GameError::InvalidGuessCharacters { guess });
    }

    Ok(guess)
}

/// Whether a seed entry is usable as a target word.
pub fn is_valid_target(word: &str) -> bool {
    word.len() == WORD_LENGTH && is_alphabetic(word)
}

/// The set of target words a new game may draw from.
pub struct WordBank {
    words: Vec<Word>,
}

impl WordBank {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Uniformly random word from the whole bank.
    pub fn pick_random(&self) -> Result<&Word, GameError> {
        self.words
            .choose(&mut rand::rng())
            .ok_or(GameError::EmptyWordBank)
    }

    pub fn contains(&self, text: &str) -> bool {
        let text = normalize_word(text);
        self.words.iter().any(|word| word.text == text)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<Vec<Word>> for WordBank {
    fn from(words: Vec<Word>) -> Self {
        Self::new(words)
    }
}
