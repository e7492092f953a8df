pub mod game_state;
pub mod scoring;
pub mod session;
pub mod word_validation;

// Re-export main components
pub use game_state::*;
pub use scoring::*;
pub use session::*;
pub use word_validation::*;
