use game_types::{LetterResult, LetterStatus};

use crate::WORD_LENGTH;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Evaluate a guess against the target word.
    ///
    /// Exact matches are resolved first and consume their target letter, then
    /// the remaining letters are matched against whatever is left of the
    /// target, one occurrence at a time. A letter is therefore never marked
    /// correct or present more often than it occurs in the target.
    ///
    /// Both inputs must already be validated to `WORD_LENGTH` letters.
    pub fn evaluate_guess(guess: &str, target: &str) -> Vec<LetterResult> {
        let guess_chars: Vec<char> = guess.to_uppercase().chars().collect();
        let statuses = Self::statuses(guess, target);

        guess_chars
            .iter()
            .zip(statuses)
            .enumerate()
            .map(|(i, (ch, status))| LetterResult {
                letter: ch.to_string(),
                status,
                position: i as i32,
            })
            .collect()
    }

    /// Status-only form of [`ScoringEngine::evaluate_guess`].
    pub fn statuses(guess: &str, target: &str) -> [LetterStatus; WORD_LENGTH] {
        let guess_chars: Vec<char> = guess.to_uppercase().chars().collect();
        // Consumed target letters become None so they cannot match twice
        let mut pool: Vec<Option<char>> = target.to_uppercase().chars().map(Some).collect();
        let mut statuses = [LetterStatus::Absent; WORD_LENGTH];

        // First pass: exact positions
        for (i, &ch) in guess_chars.iter().enumerate().take(WORD_LENGTH) {
            if pool.get(i).copied().flatten() == Some(ch) {
                statuses[i] = LetterStatus::Correct;
                pool[i] = None;
            }
        }

        // Second pass: letters present elsewhere in the unmatched pool
        for (i, &ch) in guess_chars.iter().enumerate().take(WORD_LENGTH) {
            if statuses[i] == LetterStatus::Correct {
                continue;
            }

            if let Some(slot) = pool.iter_mut().find(|slot| **slot == Some(ch)) {
                statuses[i] = LetterStatus::Present;
                *slot = None;
            }
        }

        statuses
    }

    pub fn is_exact_match(guess: &str, target: &str) -> bool {
        guess.to_uppercase() == target.to_uppercase()
    }
}
