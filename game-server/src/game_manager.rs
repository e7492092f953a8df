use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::daily_limit::DailyLimiter;
use game_core::{
    GameProgress, MAX_GUESSES, ScoringEngine, SessionBinding, WordBank, build_board,
    validate_guess,
};
use game_persistence::repositories::{GameRepository, WordRepository};
use game_types::{
    Game, GameError, GameOverState, GameSnapshot, Guess, GuessOutcome, GuessRejection, User, Word,
};

pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// A game that is bound to the session and still accepts guesses.
#[derive(Debug)]
struct ActiveGame {
    game: Game,
    word: Word,
    guesses: Vec<Guess>,
}

/// Drives one user's game through a session: resolve or create the active
/// game, score guesses, and release the session binding once the game is over.
pub struct GameManager {
    games: Arc<GameRepository>,
    words: Arc<WordRepository>,
    limiter: DailyLimiter,
    clock: Clock,
}

impl GameManager {
    pub fn new(games: Arc<GameRepository>, words: Arc<WordRepository>, daily_limit: u32) -> Self {
        Self {
            limiter: DailyLimiter::new(games.clone(), daily_limit),
            games,
            words,
            clock: Arc::new(Local::now),
        }
    }

    /// Replace the wall clock used for the daily limit.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn limiter(&self) -> &DailyLimiter {
        &self.limiter
    }

    /// Handle a play request: resume the bound game or start a new one.
    pub async fn start_or_resume(
        &self,
        user: &User,
        session: &mut impl SessionBinding,
    ) -> Result<GameSnapshot> {
        if let Err(state) = self.check_daily_limit(user).await? {
            return Ok(GameSnapshot::unavailable(state));
        }

        let active = match self.resolve_or_start(user, session).await? {
            Ok(active) => active,
            Err(GameError::EmptyWordBank) => {
                return Ok(GameSnapshot::unavailable(GameOverState::NoWordsAvailable));
            }
            Err(other) => return Err(other.into()),
        };

        let progress = GameProgress::from_guesses(&active.guesses);
        Ok(GameSnapshot {
            game_id: Some(active.game.id),
            prior_guesses: build_board(&active.guesses, &active.word.text),
            guesses_remaining: progress.guesses_remaining() as i32,
            game_over: None,
        })
    }

    /// Handle a guess submission against the session's active game.
    pub async fn submit_guess(
        &self,
        user: &User,
        session: &mut impl SessionBinding,
        raw_guess: &str,
    ) -> Result<GuessOutcome> {
        if self.check_daily_limit(user).await?.is_err() {
            return Ok(GuessOutcome::rejected(GuessRejection::LimitReached));
        }

        let guess = match validate_guess(raw_guess) {
            Ok(guess) => guess,
            Err(e) => {
                debug!("Rejected guess from {}: {}", user.username, e);
                return Ok(GuessOutcome::rejected(e.reason()));
            }
        };

        let active = match self.resolve_or_start(user, session).await? {
            Ok(active) => active,
            Err(e) => return Ok(GuessOutcome::rejected(e.reason())),
        };
        let game_id = active.game.id;
        let target = active.word.text;

        // Re-read right before deciding; another request may have landed since
        let guess_count = self.games.count_guesses(game_id).await? as usize;
        if guess_count >= MAX_GUESSES {
            warn!("{}", GameError::GameAlreadyCompleted { game_id });
            session.clear_game();
            return Ok(GuessOutcome::rejected(GuessRejection::GameCompleted));
        }

        let is_correct = ScoringEngine::is_exact_match(&guess, &target);
        let letters = ScoringEngine::evaluate_guess(&guess, &target);
        self.games.record_guess(game_id, &guess, is_correct).await?;

        let progress = GameProgress::new(guess_count + 1, is_correct);
        debug!(
            "Game {}: guess {} of {} by {}",
            game_id, progress.guess_count, MAX_GUESSES, user.username
        );

        if !progress.is_completed() {
            return Ok(GuessOutcome {
                accepted: true,
                letters: Some(letters),
                game_over: false,
                won: Some(false),
                revealed_word: None,
                guesses_remaining: Some(progress.guesses_remaining() as i32),
                error_reason: None,
            });
        }

        session.clear_game();
        if progress.won {
            info!(
                "User {} won game {} in {} guesses",
                user.username, game_id, progress.guess_count
            );
        } else {
            info!("User {} lost game {}", user.username, game_id);
        }

        Ok(GuessOutcome {
            accepted: true,
            letters: Some(letters),
            game_over: true,
            won: Some(progress.won),
            revealed_word: Some(target),
            guesses_remaining: Some(0),
            error_reason: None,
        })
    }

    async fn check_daily_limit(&self, user: &User) -> Result<Result<u32, GameOverState>> {
        let completed_today = self
            .limiter
            .completed_games_today_at(user.id, (self.clock)())
            .await?;

        if completed_today >= self.limiter.limit() {
            debug!("{}", GameError::DailyLimitReached { completed_today });
            return Ok(Err(GameOverState::DailyLimitReached { completed_today }));
        }

        Ok(Ok(completed_today))
    }

    async fn resolve_or_start(
        &self,
        user: &User,
        session: &mut impl SessionBinding,
    ) -> Result<Result<ActiveGame, GameError>> {
        if let Some(active) = self.resolve_bound_game(user, session).await? {
            return Ok(Ok(active));
        }
        self.start_new_game(user, session).await
    }

    /// The session's bound game, if it exists, belongs to `user` and is not
    /// completed. Any other binding is cleared.
    async fn resolve_bound_game(
        &self,
        user: &User,
        session: &mut impl SessionBinding,
    ) -> Result<Option<ActiveGame>> {
        let Some(game_id) = session.current_game() else {
            return Ok(None);
        };

        let game = match self.games.find_by_id(game_id).await? {
            Some(game) if game.user_id == user.id => game,
            _ => {
                warn!(
                    "Discarding binding for {}: {}",
                    user.username,
                    GameError::SessionGameMismatch { game_id }
                );
                session.clear_game();
                return Ok(None);
            }
        };

        let guesses = self.games.guesses_for_game(game_id).await?;
        if GameProgress::from_guesses(&guesses).is_completed() {
            debug!("Bound game {} is already completed", game_id);
            session.clear_game();
            return Ok(None);
        }

        let Some(word) = self.words.find_by_id(game.word_id).await? else {
            warn!("Game {} references missing word {}", game_id, game.word_id);
            session.clear_game();
            return Ok(None);
        };

        Ok(Some(ActiveGame {
            game,
            word,
            guesses,
        }))
    }

    async fn start_new_game(
        &self,
        user: &User,
        session: &mut impl SessionBinding,
    ) -> Result<Result<ActiveGame, GameError>> {
        let bank = WordBank::new(self.words.all_words().await?);
        let word = match bank.pick_random() {
            Ok(word) => word.clone(),
            Err(e) => {
                warn!("Cannot start a game for {}: {}", user.username, e);
                return Ok(Err(e));
            }
        };

        let game = self.games.create_game(user.id, word.id).await?;
        session.bind_game(game.id);
        info!("Created game {} for user {}", game.id, user.username);

        Ok(Ok(ActiveGame {
            game,
            word,
            guesses: Vec::new(),
        }))
    }
}
