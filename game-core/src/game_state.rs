use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use game_types::{Guess, GuessRow};

use crate::ScoringEngine;

pub const WORD_LENGTH: usize = 5;
pub const MAX_GUESSES: usize = 5;
pub const DEFAULT_DAILY_GAME_LIMIT: u32 = 3;

/// Where a single game stands, derived from its guess rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameProgress {
    pub guess_count: usize,
    pub won: bool,
}

impl GameProgress {
    pub fn new(guess_count: usize, won: bool) -> Self {
        Self { guess_count, won }
    }

    /// Recompute progress from the stored guesses. The game's own win flag is
    /// not consulted, so a win is never lost if that flag failed to persist.
    pub fn from_guesses(guesses: &[Guess]) -> Self {
        Self {
            guess_count: guesses.len(),
            won: guesses.iter().any(|g| g.is_correct),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.won || self.guess_count >= MAX_GUESSES
    }

    pub fn guesses_remaining(&self) -> usize {
        if self.won {
            0
        } else {
            MAX_GUESSES.saturating_sub(self.guess_count)
        }
    }
}

/// Count the completed games among per-game progress values.
pub fn count_completed<I>(progress: I) -> u32
where
    I: IntoIterator<Item = GameProgress>,
{
    progress.into_iter().filter(GameProgress::is_completed).count() as u32
}

/// Rebuild the board for display. Colors are always recomputed against the
/// target rather than stored.
pub fn build_board(guesses: &[Guess], target: &str) -> Vec<GuessRow> {
    guesses
        .iter()
        .map(|guess| GuessRow {
            word: guess.guess_word.clone(),
            letters: ScoringEngine::evaluate_guess(&guess.guess_word, target),
            is_correct: guess.is_correct,
        })
        .collect()
}

/// Start of the local calendar day containing `now`, as a UTC instant.
pub fn local_day_start(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);

    // Midnight can be skipped by a DST transition; fall back to shifting it
    // by the offset in effect now.
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| {
            let offset = Duration::seconds(i64::from(now.offset().local_minus_utc()));
            Utc.from_utc_datetime(&(midnight - offset))
        })
}
