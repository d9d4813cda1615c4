// Library interface for wordwiz
// This allows integration tests to access internal modules

pub mod cli;
pub mod error;
pub mod feedback;
pub mod game_state;
pub mod logging;
pub mod session;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use error::{GameError, WordSourceError};
pub use feedback::{Classification, LetterFeedback, ScoringMode, evaluate, evaluate_with};
pub use game_state::{GameInterface, RoundResult, UserAction, game_loop};
pub use session::{
    AttemptRecord, Attempts, GameSession, GameSettings, GuessOutcome, HintResult, RoundState,
};
pub use wordbank::{
    FixedWord, WordBank, WordSource, load_wordbank_from_file, load_wordbank_from_str,
};
