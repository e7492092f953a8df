use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;
use rand::Rng;
use tracing::debug;

use game_core::SessionBinding;
use game_types::{GameId, User};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone)]
struct SessionData {
    user: User,
    current_game: Option<GameId>,
    last_seen: Instant,
}

/// Server-side sessions keyed by an opaque token. Expiry is checked when a
/// session is touched and swept whenever a new one is created.
pub struct SessionStore {
    sessions: DashMap<String, SessionData>,
    timeout: Duration,
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

impl SessionStore {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            timeout,
        }
    }

    pub fn create_session(&self, user: User) -> String {
        self.purge_expired();

        let token = generate_token();
        self.sessions.insert(
            token.clone(),
            SessionData {
                user,
                current_game: None,
                last_seen: Instant::now(),
            },
        );
        token
    }

    /// The user behind a live session, refreshing its activity time.
    pub fn authenticate(&self, token: &str) -> Option<User> {
        {
            let mut session = self.sessions.get_mut(token)?;
            if session.last_seen.elapsed() < self.timeout {
                session.last_seen = Instant::now();
                return Some(session.user.clone());
            }
        }

        debug!("Session expired");
        self.sessions.remove(token);
        None
    }

    pub fn remove_session(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.last_seen.elapsed() < self.timeout);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!("Purged {} expired sessions", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Per-request accessor for the session's current-game slot.
    pub fn binding(self: &Arc<Self>, token: &str) -> SessionHandle {
        SessionHandle {
            store: Arc::clone(self),
            token: token.to_string(),
        }
    }

    fn current_game(&self, token: &str) -> Option<GameId> {
        self.sessions.get(token).and_then(|s| s.current_game)
    }

    fn set_current_game(&self, token: &str, game_id: Option<GameId>) {
        if let Some(mut session) = self.sessions.get_mut(token) {
            session.current_game = game_id;
        }
    }
}

pub struct SessionHandle {
    store: Arc<SessionStore>,
    token: String,
}

impl SessionBinding for SessionHandle {
    fn current_game(&self) -> Option<GameId> {
        self.store.current_game(&self.token)
    }

    fn bind_game(&mut self, game_id: GameId) {
        self.store.set_current_game(&self.token, Some(game_id));
    }

    fn clear_game(&mut self) {
        self.store.set_current_game(&self.token, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            is_admin: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_create_and_authenticate() {
        let store = SessionStore::new(Duration::from_secs(60));
        let user = test_user();

        let token = store.create_session(user.clone());
        assert_eq!(store.authenticate(&token), Some(user));
        assert_eq!(store.authenticate("unknown"), None);

        assert!(store.remove_session(&token));
        assert_eq!(store.authenticate(&token), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.create_session(test_user());
        let b = store.create_session(test_user());
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_expired_session_is_dropped() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create_session(test_user());

        assert_eq!(store.authenticate(&token), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_binding_reads_and_writes_current_game() {
        let store = Arc::new(SessionStore::new(Duration::from_secs(60)));
        let token = store.create_session(test_user());
        let game_id = Uuid::new_v4();

        let mut binding = store.binding(&token);
        assert_eq!(binding.current_game(), None);

        binding.bind_game(game_id);
        assert_eq!(store.binding(&token).current_game(), Some(game_id));

        binding.clear_game();
        assert_eq!(binding.current_game(), None);
    }
}
