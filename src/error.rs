use thiserror::Error;

/// The errors a round of WordWiz can produce.
#[derive(Debug, Error)]
pub enum GameError {
    /// The guess does not have as many letters as the target word.
    #[error("please enter a {expected}-letter word (got {actual} letters)")]
    InvalidLength { expected: usize, actual: usize },

    /// The guess was already submitted this round.
    #[error("you've already guessed \"{0}\"")]
    DuplicateGuess(String),

    /// The round has already been won or lost.
    #[error("the round is already over")]
    RoundOver,

    /// The word handed to a new session cannot be played.
    #[error("\"{0}\" is not a playable word")]
    InvalidWord(String),

    /// No word could be obtained, so the round never started.
    #[error("failed to fetch word: {0}")]
    WordSourceFailure(#[from] WordSourceError),
}

impl GameError {
    /// Whether the player can simply try again in the same round.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidLength { .. } | Self::DuplicateGuess(_) | Self::RoundOver
        )
    }
}

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("word length must be at least 1")]
    ZeroLength,

    #[error("no {0}-letter words are available")]
    NoWordOfLength(usize),

    #[error("could not read word bank: {0}")]
    Io(#[from] std::io::Error),
}
