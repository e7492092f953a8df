use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use regex::Regex;
use tracing::{info, warn};

use game_persistence::repositories::UserRepository;
use game_types::User;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{5,}$").expect("valid username pattern"));
static PASSWORD_ALPHABET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\d$%*@]{5,}$").expect("valid password pattern"));

const PASSWORD_SPECIALS: [char; 4] = ['$', '%', '*', '@'];

/// At least 5 ASCII letters and nothing else.
pub fn validate_username(username: &str) -> bool {
    USERNAME_PATTERN.is_match(username)
}

/// At least 5 characters from letters, digits and `$ % * @`, using at least
/// one of each group.
pub fn validate_password(password: &str) -> bool {
    PASSWORD_ALPHABET.is_match(password)
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(&c))
}

/// Hash a password using Argon2id with a random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub struct AuthService {
    users: Arc<UserRepository>,
    admin_usernames: HashSet<String>,
}

impl AuthService {
    pub fn new(users: Arc<UserRepository>, admin_usernames: Vec<String>) -> Self {
        Self {
            users,
            admin_usernames: admin_usernames.into_iter().collect(),
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        if !validate_username(username) {
            return Err(AuthError::InvalidUsername);
        }
        if !validate_password(password) {
            return Err(AuthError::InvalidPassword);
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let hash = hash_password(password).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AuthError::Hashing
        })?;
        let is_admin = self.admin_usernames.contains(username);
        let user = self.users.create_user(username, &hash, is_admin).await?;

        info!("Registered user {} (admin: {})", user.username, user.is_admin);
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let credentials = self.users.find_credentials(username.trim()).await?;

        match credentials {
            Some((user, hash)) if verify_password(password, &hash) => {
                info!("User {} logged in", user.username);
                Ok(user)
            }
            _ => {
                warn!("Failed login attempt for '{}'", username);
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username must be at least 5 letters (A-Z, a-z)")]
    InvalidUsername,
    #[error("Password must be at least 5 characters with letters, numbers and one of $ % * @")]
    InvalidPassword,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Failed to hash password")]
    Hashing,
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}
