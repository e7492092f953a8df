use game_types::GameId;

/// Read/write access to the "current game" slot of one user's session.
///
/// Handed to the game session manager for the duration of a request, so the
/// manager never reaches for ambient session state.
pub trait SessionBinding {
    fn current_game(&self) -> Option<GameId>;
    fn bind_game(&mut self, game_id: GameId);
    fn clear_game(&mut self);
}

/// A bare slot, used where no session store is involved.
impl SessionBinding for Option<GameId> {
    fn current_game(&self) -> Option<GameId> {
        *self
    }

    fn bind_game(&mut self, game_id: GameId) {
        *self = Some(game_id);
    }

    fn clear_game(&mut self) {
        *self = None;
    }
}
