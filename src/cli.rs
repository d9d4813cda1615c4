use crate::error::GameError;
use crate::feedback::{LetterFeedback, ScoringMode};
use crate::game_state::{GameInterface, GuessReport, RoundInfo, UserAction};
use crate::session::{Attempts, GameSettings, HintResult};
use clap::Parser;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

const MAX_WORD_LENGTH: i64 = 32;

/// WordWiz: guess the hidden word from per-letter color feedback
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of letters in the word
    #[arg(
        short = 'l',
        long = "length",
        default_value_t = 5,
        value_parser = clap::value_parser!(u8).range(1..=MAX_WORD_LENGTH)
    )]
    pub word_length: u8,

    /// Reveal the first letter of the word at the start of each round
    #[arg(short = 'f', long = "first-letter")]
    pub first_letter: bool,

    /// Allow unlimited attempts instead of six
    #[arg(short = 'u', long = "unlimited")]
    pub unlimited: bool,

    /// How repeated letters are scored
    #[arg(long, value_enum, default_value_t = ScoringMode::Simple)]
    pub scoring: ScoringMode,

    /// Path to a newline-delimited wordbank file
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<PathBuf>,

    /// Seed for word choice and hints, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the full-screen terminal interface
    #[arg(long)]
    pub tui: bool,

    /// Append log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            word_length: usize::from(self.word_length),
            first_letter_hint: self.first_letter,
            unlimited_attempts: self.unlimited,
            scoring: self.scoring,
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

pub enum LineInput {
    Action(UserAction),
    Help,
    Empty,
}

pub fn parse_line(line: &str) -> LineInput {
    let input = line.trim();
    match input.to_lowercase().as_str() {
        "" => LineInput::Empty,
        "/hint" => LineInput::Action(UserAction::Hint),
        "/new" => LineInput::Action(UserAction::NewGame),
        "/quit" | "/exit" => LineInput::Action(UserAction::Exit),
        "/help" => LineInput::Help,
        _ => LineInput::Action(UserAction::Guess(input.to_string())),
    }
}

#[must_use]
pub fn format_letters(feedback: &[LetterFeedback]) -> String {
    feedback
        .iter()
        .map(|f| f.letter.to_uppercase().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn format_symbols(feedback: &[LetterFeedback]) -> String {
    feedback
        .iter()
        .map(|f| f.classification.symbol().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn format_incorrect_letters(letters: &BTreeSet<char>) -> String {
    letters
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[must_use]
pub fn format_hint(hint: &HintResult) -> String {
    match hint {
        HintResult::Revealed { position, letter } => {
            format!("Hint: The letter at position {} is '{letter}'", position + 1)
        }
        HintResult::Exhausted => "No more hints available.".to_string(),
    }
}

#[must_use]
pub fn format_attempts(attempts: Attempts) -> String {
    format!("Attempts remaining: {attempts}")
}

fn print_help<W: Write>(out: &mut W) {
    let _ = writeln!(out, "Type a guess and press ENTER.");
    let _ = writeln!(out, "  /hint  reveal one letter");
    let _ = writeln!(out, "  /new   abandon this round and start another");
    let _ = writeln!(out, "  /quit  leave the game");
    let _ = writeln!(
        out,
        "Feedback: G = right letter, right spot; Y = in the word; X = not in the word"
    );
}

/// Line-oriented implementation of the `GameInterface` trait
///
/// Reads commands from any `BufRead` and writes prompts to any `Write`, so it
/// can be driven by stdin/stdout or by an in-memory script.
pub struct CliInterface<R: BufRead, W: Write> {
    reader: R,
    out: W,
}

impl<R: BufRead> CliInterface<R, std::io::Stdout> {
    pub fn new(reader: R) -> Self {
        Self::with_output(reader, std::io::stdout())
    }
}

impl<R: BufRead, W: Write> CliInterface<R, W> {
    pub fn with_output(reader: R, out: W) -> Self {
        Self { reader, out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Next line of input, or `None` at end of input or on a read failure.
    /// Lines that are not valid UTF-8 are reported and skipped.
    fn read_line(&mut self) -> Option<String> {
        loop {
            let mut buf = Vec::new();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => return None,
                Ok(_) => match String::from_utf8(buf) {
                    Ok(line) => return Some(line),
                    Err(e) => {
                        log::warn!("Ignoring input line: {e}");
                        let _ = writeln!(
                            self.out,
                            "Error: input is not valid UTF-8, line ignored"
                        );
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read input: {e}");
                    let _ = writeln!(self.out, "Error: failed to read input: {e}");
                    return None;
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> GameInterface for CliInterface<R, W> {
    fn display_round_start(&mut self, info: &RoundInfo) {
        let attempts = match info.attempts {
            Attempts::Limited(n) => n.to_string(),
            Attempts::Unlimited => "unlimited".to_string(),
        };
        let _ = writeln!(self.out, "\nWelcome to WordWiz!");
        let _ = writeln!(
            self.out,
            "You have {attempts} attempts to guess the {}-letter word.",
            info.word_length
        );
        if let Some(letter) = info.first_letter {
            let _ = writeln!(self.out, "The first letter is: {letter}");
        }
        let _ = writeln!(self.out, "Type /help for commands.");
    }

    fn read_action(&mut self) -> Option<UserAction> {
        loop {
            let _ = write!(self.out, "\nEnter your guess: ");
            let _ = self.out.flush();
            let line = self.read_line()?;
            match parse_line(&line) {
                LineInput::Action(action) => return Some(action),
                LineInput::Help => print_help(&mut self.out),
                LineInput::Empty => {}
            }
        }
    }

    fn display_guess(&mut self, report: &GuessReport) {
        for record in &report.history {
            let _ = writeln!(self.out, "  {}", format_letters(&record.feedback));
            let _ = writeln!(self.out, "  {}", format_symbols(&record.feedback));
        }
        let _ = writeln!(
            self.out,
            "Incorrect letters: {}",
            format_incorrect_letters(report.incorrect_letters())
        );
        let _ = writeln!(self.out, "{}", format_attempts(report.outcome.attempts_remaining));
    }

    fn display_error(&mut self, error: &GameError) {
        let _ = writeln!(self.out, "Error: {error}");
    }

    fn display_hint(&mut self, hint: &HintResult) {
        let _ = writeln!(self.out, "{}", format_hint(hint));
    }

    fn display_win(&mut self, elapsed: Duration, attempts_used: usize) {
        let _ = writeln!(
            self.out,
            "Congratulations! You've guessed the word in {:.2} seconds ({attempts_used} attempts)!",
            elapsed.as_secs_f64()
        );
    }

    fn display_loss(&mut self, word: &str) {
        let _ = writeln!(
            self.out,
            "Sorry, you've run out of attempts. The word was: {word}"
        );
    }

    fn ask_play_again(&mut self) -> bool {
        loop {
            let _ = write!(self.out, "Do you want to play again? (y/n): ");
            let _ = self.out.flush();
            let Some(line) = self.read_line() else {
                return false;
            };
            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => {}
            }
        }
    }

    fn display_exit_message(&mut self) {
        let _ = writeln!(self.out, "Thanks for playing WordWiz!");
    }
}
