use std::env;

use game_core::{DEFAULT_DAILY_GAME_LIMIT, DEFAULT_WORDS};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub daily_game_limit: u32,
    pub session_timeout_seconds: u64,
    pub admin_usernames: Vec<String>,
    pub seed_words: Vec<String>,
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://wordle_daily.db?mode=rwc".to_string()),
            daily_game_limit: env::var("DAILY_GAME_LIMIT")
                .unwrap_or_else(|_| DEFAULT_DAILY_GAME_LIMIT.to_string())
                .parse()
                .expect("Invalid DAILY_GAME_LIMIT"),
            session_timeout_seconds: env::var("SESSION_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .expect("Invalid SESSION_TIMEOUT_SECONDS"),
            admin_usernames: env::var("ADMIN_USERNAMES")
                .map(|value| parse_list(&value))
                .unwrap_or_default(),
            seed_words: env::var("SEED_WORDS")
                .map(|value| parse_list(&value))
                .unwrap_or_else(|_| DEFAULT_WORDS.iter().map(|w| w.to_string()).collect()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
