use game_core::ScoringEngine;
use game_types::{GameId, Guess, Word};

/// Builds the stored guess rows a game would have after `words` were played
pub fn guesses_for(game_id: GameId, target: &str, words: &[&str]) -> Vec<Guess> {
    words
        .iter()
        .enumerate()
        .map(|(index, word)| Guess {
            id: index as i32 + 1,
            game_id,
            guess_word: word.to_uppercase(),
            created_at: chrono::Utc::now().to_rfc3339(),
            is_correct: ScoringEngine::is_exact_match(word, target),
        })
        .collect()
}

/// Word bank entries with sequential ids
pub fn create_test_words(words: &[&str]) -> Vec<Word> {
    words
        .iter()
        .enumerate()
        .map(|(index, text)| Word {
            id: index as i32 + 1,
            text: text.to_string(),
        })
        .collect()
}
