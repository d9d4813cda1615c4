//! Round state for a single WordWiz game.
//!
//! A [`GameSession`] is created once per round with the target word and the
//! player's [`GameSettings`], and is only ever changed through
//! [`GameSession::submit_guess`] and [`GameSession::request_hint`].
//!
//! # State Machine
//! - `Active` → `Won` on an exact match
//! - `Active` → `Lost` when bounded attempts reach zero
//! - `Won` and `Lost` are terminal; a new round needs a new session

use crate::error::GameError;
use crate::feedback::{LetterFeedback, ScoringMode, evaluate_with};
use crate::{debug_log, info_log};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

pub const MAX_ATTEMPTS: u32 = 6;
pub const HISTORY_LIMIT: usize = 5;
pub const DEFAULT_WORD_LENGTH: usize = 5;

/// Options chosen before a round starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSettings {
    pub word_length: usize,
    pub first_letter_hint: bool,
    pub unlimited_attempts: bool,
    pub scoring: ScoringMode,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            word_length: DEFAULT_WORD_LENGTH,
            first_letter_hint: false,
            unlimited_attempts: false,
            scoring: ScoringMode::default(),
        }
    }
}

impl GameSettings {
    #[must_use]
    pub const fn initial_attempts(&self) -> Attempts {
        if self.unlimited_attempts {
            Attempts::Unlimited
        } else {
            Attempts::Limited(MAX_ATTEMPTS)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attempts {
    Limited(u32),
    Unlimited,
}

impl fmt::Display for Attempts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(n) => write!(f, "{n}"),
            Self::Unlimited => f.write_str("Unlimited"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundState {
    Active,
    Won {
        elapsed: Duration,
        attempts_used: usize,
    },
    /// Carries the target word so it can be revealed.
    Lost { word: String },
}

impl RoundState {
    #[must_use]
    pub const fn is_over(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptRecord {
    pub guess: String,
    pub feedback: Vec<LetterFeedback>,
}

/// Everything the presentation layer needs after an accepted guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessOutcome {
    pub feedback: Vec<LetterFeedback>,
    pub incorrect_letters: BTreeSet<char>,
    pub attempts_remaining: Attempts,
    pub state: RoundState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintResult {
    /// `position` is zero-based.
    Revealed { position: usize, letter: char },
    Exhausted,
}

pub struct GameSession<R = StdRng> {
    word: String,
    letters: Vec<char>,
    scoring: ScoringMode,
    first_letter_hint: bool,
    attempts: Attempts,
    previous_guesses: HashSet<String>,
    incorrect_letters: BTreeSet<char>,
    history: VecDeque<AttemptRecord>,
    correct_positions: BTreeSet<usize>,
    hints: BTreeSet<usize>,
    started: Instant,
    state: RoundState,
    rng: R,
}

impl GameSession<StdRng> {
    /// Start a round with an OS-seeded random source for hints.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidWord`] if `word` is empty or contains
    /// non-alphabetic characters.
    pub fn new(word: &str, settings: &GameSettings) -> Result<Self, GameError> {
        Self::with_rng(word, settings, StdRng::from_os_rng())
    }
}

impl<R: Rng> GameSession<R> {
    /// Start a round using `rng` to pick hint positions.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidWord`] if `word` is empty or contains
    /// non-alphabetic characters.
    pub fn with_rng(word: &str, settings: &GameSettings, rng: R) -> Result<Self, GameError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() || !word.chars().all(char::is_alphabetic) {
            return Err(GameError::InvalidWord(word));
        }
        let letters: Vec<char> = word.chars().collect();
        info_log!(
            "GameSession::with_rng() - New {}-letter round, attempts: {}",
            letters.len(),
            settings.initial_attempts()
        );

        Ok(Self {
            word,
            letters,
            scoring: settings.scoring,
            first_letter_hint: settings.first_letter_hint,
            attempts: settings.initial_attempts(),
            previous_guesses: HashSet::new(),
            incorrect_letters: BTreeSet::new(),
            history: VecDeque::with_capacity(HISTORY_LIMIT + 1),
            correct_positions: BTreeSet::new(),
            hints: BTreeSet::new(),
            started: Instant::now(),
            state: RoundState::Active,
            rng,
        })
    }

    /// Score a guess and advance the round.
    ///
    /// The guess is compared case-insensitively. Rejected guesses leave the
    /// session untouched.
    ///
    /// # Errors
    /// - [`GameError::RoundOver`] once the round has been won or lost
    /// - [`GameError::InvalidLength`] if the guess is not exactly as long as the word
    /// - [`GameError::DuplicateGuess`] if the guess was already submitted
    pub fn submit_guess(&mut self, raw: &str) -> Result<GuessOutcome, GameError> {
        if self.state.is_over() {
            return Err(GameError::RoundOver);
        }

        let guess = raw.to_lowercase();
        let guess_chars: Vec<char> = guess.chars().collect();
        if guess_chars.len() != self.letters.len() {
            debug_log!(
                "submit_guess() - Rejecting '{}': {} letters, expected {}",
                guess,
                guess_chars.len(),
                self.letters.len()
            );
            return Err(GameError::InvalidLength {
                expected: self.letters.len(),
                actual: guess_chars.len(),
            });
        }
        if self.previous_guesses.contains(&guess) {
            debug_log!("submit_guess() - Rejecting duplicate '{}'", guess);
            return Err(GameError::DuplicateGuess(guess));
        }

        self.previous_guesses.insert(guess.clone());
        let feedback = evaluate_with(&guess, &self.word, self.scoring);

        for (i, (&g, &w)) in guess_chars.iter().zip(&self.letters).enumerate() {
            if g == w {
                self.correct_positions.insert(i);
            }
        }
        if guess_chars.iter().all(|c| !self.letters.contains(c)) {
            self.incorrect_letters.extend(guess_chars.iter().copied());
        }

        self.history.push_back(AttemptRecord {
            guess: guess.clone(),
            feedback: feedback.clone(),
        });
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }

        if guess == self.word {
            self.state = RoundState::Won {
                elapsed: self.started.elapsed(),
                attempts_used: self.previous_guesses.len(),
            };
            info_log!(
                "submit_guess() - Word guessed after {} attempts",
                self.previous_guesses.len()
            );
        } else if let Attempts::Limited(remaining) = &mut self.attempts {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.state = RoundState::Lost {
                    word: self.word.clone(),
                };
                info_log!("submit_guess() - Out of attempts");
            }
        }

        Ok(GuessOutcome {
            feedback,
            incorrect_letters: self.incorrect_letters.clone(),
            attempts_remaining: self.attempts,
            state: self.state.clone(),
        })
    }

    /// Reveal one letter the player has not yet placed correctly.
    ///
    /// Positions already hinted, or already guessed correctly in any earlier
    /// attempt, are never chosen. Hints do not cost an attempt.
    pub fn request_hint(&mut self) -> HintResult {
        let eligible: Vec<usize> = (0..self.letters.len())
            .filter(|i| !self.hints.contains(i) && !self.correct_positions.contains(i))
            .collect();

        match eligible.choose(&mut self.rng).copied() {
            Some(position) => {
                self.hints.insert(position);
                debug_log!("request_hint() - Revealing position {}", position);
                HintResult::Revealed {
                    position,
                    letter: self.letters[position],
                }
            }
            None => HintResult::Exhausted,
        }
    }
}

impl<R> GameSession<R> {
    #[must_use]
    pub fn word_length(&self) -> usize {
        self.letters.len()
    }

    #[must_use]
    pub const fn attempts_remaining(&self) -> Attempts {
        self.attempts
    }

    /// The most recent attempts, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &AttemptRecord> {
        self.history.iter()
    }

    #[must_use]
    pub const fn incorrect_letters(&self) -> &BTreeSet<char> {
        &self.incorrect_letters
    }

    #[must_use]
    pub const fn hinted_positions(&self) -> &BTreeSet<usize> {
        &self.hints
    }

    #[must_use]
    pub const fn previous_guesses(&self) -> &HashSet<String> {
        &self.previous_guesses
    }

    #[must_use]
    pub const fn state(&self) -> &RoundState {
        &self.state
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.state.is_over()
    }

    #[must_use]
    pub const fn scoring(&self) -> ScoringMode {
        self.scoring
    }

    /// The first letter, if the round was started with the first-letter hint.
    #[must_use]
    pub fn first_letter(&self) -> Option<char> {
        if self.first_letter_hint {
            self.letters.first().copied()
        } else {
            None
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// The target word, only once the round is over.
    #[must_use]
    pub fn revealed_word(&self) -> Option<&str> {
        self.state.is_over().then_some(self.word.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Classification;

    type Snapshot = (
        Attempts,
        Vec<String>,
        Vec<AttemptRecord>,
        BTreeSet<char>,
        BTreeSet<usize>,
        RoundState,
    );

    fn session(word: &str, settings: GameSettings) -> GameSession {
        GameSession::with_rng(word, &settings, StdRng::seed_from_u64(7)).unwrap()
    }

    fn snapshot<R>(s: &GameSession<R>) -> Snapshot {
        let mut guesses: Vec<String> = s.previous_guesses().iter().cloned().collect();
        guesses.sort();
        (
            s.attempts_remaining(),
            guesses,
            s.history().cloned().collect(),
            s.incorrect_letters().clone(),
            s.hinted_positions().clone(),
            s.state().clone(),
        )
    }

    #[test]
    fn test_new_session_is_active() {
        let s = session("apple", GameSettings::default());
        assert_eq!(s.word_length(), 5);
        assert_eq!(s.attempts_remaining(), Attempts::Limited(MAX_ATTEMPTS));
        assert_eq!(s.state(), &RoundState::Active);
        assert_eq!(s.first_letter(), None);
        assert_eq!(s.revealed_word(), None);
    }

    #[test]
    fn test_word_is_lowercased() {
        let mut s = session("APPLE", GameSettings::default());
        let outcome = s.submit_guess("apple").unwrap();
        assert!(matches!(outcome.state, RoundState::Won { .. }));
    }

    #[test]
    fn test_invalid_words_rejected() {
        let settings = GameSettings::default();
        assert!(matches!(
            GameSession::new("", &settings),
            Err(GameError::InvalidWord(_))
        ));
        assert!(matches!(
            GameSession::new("ap-le", &settings),
            Err(GameError::InvalidWord(_))
        ));
    }

    #[test]
    fn test_winning_guess() {
        let mut s = session("apple", GameSettings::default());
        s.submit_guess("crane").unwrap();
        let outcome = s.submit_guess("APPLE").unwrap();
        assert!(
            outcome
                .feedback
                .iter()
                .all(|f| f.classification == Classification::Correct)
        );
        match outcome.state {
            RoundState::Won { attempts_used, .. } => assert_eq!(attempts_used, 2),
            other => panic!("Expected Won, got {other:?}"),
        }
        // Winning does not consume an attempt
        assert_eq!(outcome.attempts_remaining, Attempts::Limited(MAX_ATTEMPTS - 1));
        assert_eq!(s.revealed_word(), Some("apple"));
    }

    #[test]
    fn test_invalid_length_leaves_state_unchanged() {
        let mut s = session("apple", GameSettings::default());
        s.submit_guess("crane").unwrap();
        let before = snapshot(&s);

        for _ in 0..2 {
            match s.submit_guess("app") {
                Err(GameError::InvalidLength { expected, actual }) => {
                    assert_eq!(expected, 5);
                    assert_eq!(actual, 3);
                }
                other => panic!("Expected InvalidLength, got {other:?}"),
            }
            assert_eq!(snapshot(&s), before);
        }
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut s = session("apple", GameSettings::default());
        assert!(s.submit_guess("äpple").is_ok());
    }

    #[test]
    fn test_duplicate_guess_leaves_state_unchanged() {
        let mut s = session("apple", GameSettings::default());
        s.submit_guess("crane").unwrap();
        let before = snapshot(&s);

        match s.submit_guess("CRANE") {
            Err(GameError::DuplicateGuess(guess)) => assert_eq!(guess, "crane"),
            other => panic!("Expected DuplicateGuess, got {other:?}"),
        }
        assert_eq!(snapshot(&s), before);
    }

    #[test]
    fn test_attempts_decrement_until_lost() {
        let mut s = session("apple", GameSettings::default());
        let guesses = ["crane", "slate", "moist", "bound", "dirty", "fuzzy"];
        for (i, guess) in guesses.iter().enumerate() {
            let outcome = s.submit_guess(guess).unwrap();
            let left = MAX_ATTEMPTS - u32::try_from(i + 1).unwrap();
            assert_eq!(outcome.attempts_remaining, Attempts::Limited(left));
            if left > 0 {
                assert_eq!(outcome.state, RoundState::Active);
            } else {
                assert_eq!(
                    outcome.state,
                    RoundState::Lost {
                        word: "apple".to_string()
                    }
                );
            }
        }
        assert!(matches!(s.submit_guess("apple"), Err(GameError::RoundOver)));
    }

    #[test]
    fn test_last_attempt_loses_and_reveals_word() {
        let mut s = session("apple", GameSettings::default());
        for guess in ["crane", "slate", "moist", "bound", "dirty"] {
            s.submit_guess(guess).unwrap();
        }
        assert_eq!(s.attempts_remaining(), Attempts::Limited(1));
        let outcome = s.submit_guess("fuzzy").unwrap();
        assert_eq!(
            outcome.state,
            RoundState::Lost {
                word: "apple".to_string()
            }
        );
        assert_eq!(s.revealed_word(), Some("apple"));
    }

    #[test]
    fn test_unlimited_attempts_never_lose() {
        let settings = GameSettings {
            unlimited_attempts: true,
            ..GameSettings::default()
        };
        let mut s = session("apple", settings);
        for a in 'a'..='z' {
            let guess: String = std::iter::repeat_n(a, 5).collect();
            let outcome = s.submit_guess(&guess).unwrap();
            assert_eq!(outcome.attempts_remaining, Attempts::Unlimited);
            assert_eq!(outcome.state, RoundState::Active);
        }
    }

    #[test]
    fn test_incorrect_letters_only_from_fully_absent_guesses() {
        let mut s = session("apple", GameSettings::default());
        let outcome = s.submit_guess("dumbo").unwrap();
        assert_eq!(
            outcome.incorrect_letters,
            ['b', 'd', 'm', 'o', 'u'].into_iter().collect()
        );
        // 'e' is in the word, so none of this guess's letters are recorded
        let outcome = s.submit_guess("tiger").unwrap();
        assert_eq!(outcome.incorrect_letters.len(), 5);
        assert!(!outcome.incorrect_letters.contains(&'t'));
    }

    #[test]
    fn test_history_keeps_last_five() {
        let settings = GameSettings {
            unlimited_attempts: true,
            ..GameSettings::default()
        };
        let mut s = session("apple", settings);
        let guesses = ["crane", "slate", "moist", "bound", "dirty", "fuzzy", "pious"];
        for guess in guesses {
            s.submit_guess(guess).unwrap();
        }
        let kept: Vec<&str> = s.history().map(|r| r.guess.as_str()).collect();
        assert_eq!(kept, vec!["moist", "bound", "dirty", "fuzzy", "pious"]);
        // Trimmed guesses still count as duplicates
        assert!(matches!(
            s.submit_guess("crane"),
            Err(GameError::DuplicateGuess(_))
        ));
    }

    #[test]
    fn test_first_letter_hint() {
        let settings = GameSettings {
            first_letter_hint: true,
            ..GameSettings::default()
        };
        let s = session("apple", settings);
        assert_eq!(s.first_letter(), Some('a'));
    }

    #[test]
    fn test_hint_reveals_unsolved_positions_only() {
        let mut s = session("apple", GameSettings::default());
        // a, p, p, l correct; only index 4 remains
        s.submit_guess("apply").unwrap();
        assert_eq!(
            s.request_hint(),
            HintResult::Revealed {
                position: 4,
                letter: 'e'
            }
        );
        assert_eq!(s.request_hint(), HintResult::Exhausted);
    }

    #[test]
    fn test_hints_exhaust_without_repeats() {
        let mut s = session("apple", GameSettings::default());
        let mut seen = BTreeSet::new();
        for _ in 0..5 {
            match s.request_hint() {
                HintResult::Revealed { position, letter } => {
                    assert!(seen.insert(position), "position {position} revealed twice");
                    assert_eq!(letter, "apple".chars().nth(position).unwrap());
                }
                HintResult::Exhausted => panic!("Ran out of hints early"),
            }
        }
        let before = s.hinted_positions().clone();
        assert_eq!(s.request_hint(), HintResult::Exhausted);
        assert_eq!(s.hinted_positions(), &before);
    }

    #[test]
    fn test_hint_does_not_consume_attempt() {
        let mut s = session("apple", GameSettings::default());
        s.request_hint();
        assert_eq!(s.attempts_remaining(), Attempts::Limited(MAX_ATTEMPTS));
        assert_eq!(s.state(), &RoundState::Active);
    }

    #[test]
    fn test_hints_reproducible_with_seed() {
        let settings = GameSettings::default();
        let hints = |seed| {
            let mut s =
                GameSession::with_rng("planet", &settings, StdRng::seed_from_u64(seed)).unwrap();
            (0..6).map(|_| s.request_hint()).collect::<Vec<_>>()
        };
        assert_eq!(hints(42), hints(42));
    }

    #[test]
    fn test_occurrence_limited_scoring() {
        let settings = GameSettings {
            scoring: ScoringMode::OccurrenceLimited,
            ..GameSettings::default()
        };
        let mut s = session("apple", settings);
        let outcome = s.submit_guess("allee").unwrap();
        assert_eq!(crate::feedback::pattern(&outcome.feedback), "GYXXG");
    }

    #[test]
    fn test_attempts_display() {
        assert_eq!(Attempts::Limited(3).to_string(), "3");
        assert_eq!(Attempts::Unlimited.to_string(), "Unlimited");
    }
}
