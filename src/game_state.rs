use crate::error::GameError;
use crate::session::{
    AttemptRecord, Attempts, GameSession, GameSettings, GuessOutcome, HintResult, RoundState,
};
use crate::wordbank::WordSource;
use crate::{debug_log, info_log};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use std::time::Duration;

/// What the player asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Hint,
    NewGame,
    Exit,
}

/// Shown once when a round begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundInfo {
    pub word_length: usize,
    pub attempts: Attempts,
    pub first_letter: Option<char>,
}

/// Snapshot of the board after an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReport {
    pub outcome: GuessOutcome,
    pub history: Vec<AttemptRecord>,
}

impl GuessReport {
    #[must_use]
    pub const fn incorrect_letters(&self) -> &BTreeSet<char> {
        &self.outcome.incorrect_letters
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundResult {
    Won {
        attempts_used: usize,
        elapsed: Duration,
    },
    Lost {
        word: String,
    },
    Abandoned,
    /// No word could be fetched; `reason` is the word source's error message.
    WordSourceFailure {
        reason: String,
    },
    /// The word source handed back something that cannot be played.
    InvalidWord {
        word: String,
    },
}

impl RoundResult {
    /// Why the round could not start, if it could not.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::WordSourceFailure { reason } => Some(format!("Failed to fetch word: {reason}")),
            Self::InvalidWord { word } => Some(format!(
                "Word source returned an unplayable word: \"{word}\""
            )),
            _ => None,
        }
    }
}

/// Trait abstracting the presentation layer.
///
/// `read_action` returns `None` when input is exhausted, which ends the game.
pub trait GameInterface {
    fn display_round_start(&mut self, info: &RoundInfo);
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_guess(&mut self, report: &GuessReport);
    fn display_error(&mut self, error: &GameError);
    fn display_hint(&mut self, hint: &HintResult);
    fn display_win(&mut self, elapsed: Duration, attempts_used: usize);
    fn display_loss(&mut self, word: &str);
    fn ask_play_again(&mut self) -> bool;
    fn display_exit_message(&mut self);
}

enum RoundEnd {
    Finished(RoundResult),
    Restart,
    Quit,
}

/// Play rounds until the player stops or no word can be fetched.
///
/// Each round draws its hint randomness from `rng`, so a seeded `rng` makes
/// the whole game reproducible.
pub fn game_loop<S, I>(
    settings: &GameSettings,
    source: &mut S,
    interface: &mut I,
    rng: &mut StdRng,
) -> Vec<RoundResult>
where
    S: WordSource + ?Sized,
    I: GameInterface + ?Sized,
{
    let mut results = Vec::new();

    loop {
        let word = match source.fetch_word(settings.word_length) {
            Ok(word) => word,
            Err(e) => {
                info_log!("game_loop() - Could not fetch word: {}", e);
                let reason = e.to_string();
                interface.display_error(&GameError::from(e));
                results.push(RoundResult::WordSourceFailure { reason });
                break;
            }
        };

        let round_rng = StdRng::from_rng(&mut *rng);
        let session = match GameSession::with_rng(&word, settings, round_rng) {
            Ok(session) => session,
            Err(e) => {
                info_log!("game_loop() - Could not start round: {}", e);
                interface.display_error(&e);
                results.push(RoundResult::InvalidWord { word });
                break;
            }
        };

        match play_round(session, interface) {
            RoundEnd::Finished(result) => {
                results.push(result);
                if !interface.ask_play_again() {
                    break;
                }
            }
            RoundEnd::Restart => {
                results.push(RoundResult::Abandoned);
            }
            RoundEnd::Quit => {
                results.push(RoundResult::Abandoned);
                break;
            }
        }
    }

    interface.display_exit_message();
    results
}

fn play_round<I>(mut session: GameSession, interface: &mut I) -> RoundEnd
where
    I: GameInterface + ?Sized,
{
    interface.display_round_start(&RoundInfo {
        word_length: session.word_length(),
        attempts: session.attempts_remaining(),
        first_letter: session.first_letter(),
    });

    loop {
        let Some(action) = interface.read_action() else {
            debug_log!("play_round() - Input exhausted");
            return RoundEnd::Quit;
        };

        match action {
            UserAction::Exit => return RoundEnd::Quit,
            UserAction::NewGame => return RoundEnd::Restart,
            UserAction::Hint => {
                let hint = session.request_hint();
                interface.display_hint(&hint);
            }
            UserAction::Guess(guess) => match session.submit_guess(guess.trim()) {
                Ok(outcome) => {
                    let state = outcome.state.clone();
                    interface.display_guess(&GuessReport {
                        outcome,
                        history: session.history().cloned().collect(),
                    });
                    match state {
                        RoundState::Active => {}
                        RoundState::Won {
                            elapsed,
                            attempts_used,
                        } => {
                            interface.display_win(elapsed, attempts_used);
                            return RoundEnd::Finished(RoundResult::Won {
                                attempts_used,
                                elapsed,
                            });
                        }
                        RoundState::Lost { word } => {
                            interface.display_loss(&word);
                            return RoundEnd::Finished(RoundResult::Lost { word });
                        }
                    }
                }
                Err(e) => interface.display_error(&e),
            },
        }
    }
}
