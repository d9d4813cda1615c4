//! TUI (Terminal User Interface) module for WordWiz
//!
//! This module provides a full-screen terminal interface using Ratatui.
//!
//! # Architecture
//! - `ViewState`: everything that is drawn, independent of the terminal
//! - `TuiInterface`: owns the terminal, handles input and implements `GameInterface`
//!
//! # State Machine
//! - `EnteringGuess` → (`Won` | `Lost` from the game loop) → `RoundOver`
//! - `RoundOver` → `EnteringGuess` when the player starts another round

use crate::cli::{format_attempts, format_hint, format_incorrect_letters};
use crate::error::GameError;
use crate::feedback::Classification;
use crate::game_state::{GameInterface, GuessReport, RoundInfo, UserAction};
use crate::session::{AttemptRecord, Attempts, HISTORY_LIMIT, HintResult};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
#[allow(clippy::cast_possible_truncation)]
const BOARD_HEIGHT: u16 = (HISTORY_LIMIT as u16 + 1) * ROW_SPACING + 2;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

fn cell_colors(classification: Classification) -> (Color, Color) {
    match classification {
        Classification::Correct => (Color::Green, Color::Black),
        Classification::Present => (Color::Yellow, Color::Black),
        Classification::Absent => (Color::Gray, Color::White),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    EnteringGuess,
    /// Round finished; waiting for the play-again answer
    RoundOver,
}

/// Everything the screen shows.
#[derive(Debug, Clone)]
pub struct ViewState {
    state: TuiState,
    word_length: usize,
    attempts: Attempts,
    first_letter: Option<char>,
    history: Vec<AttemptRecord>,
    current_input: String,
    incorrect_letters: String,
    hints: Vec<String>,
    message: String,
    error_message: String,
    status: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            state: TuiState::EnteringGuess,
            word_length: 0,
            attempts: Attempts::Unlimited,
            first_letter: None,
            history: Vec::new(),
            current_input: String::new(),
            incorrect_letters: String::new(),
            hints: Vec::new(),
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        }
    }
}

impl ViewState {
    fn start_round(&mut self, info: &RoundInfo) {
        *self = Self {
            word_length: info.word_length,
            attempts: info.attempts,
            first_letter: info.first_letter,
            message: format!("Guess the {}-letter word!", info.word_length),
            status: "Enter your first guess".to_string(),
            ..Self::default()
        };
    }
}

/// Render the complete UI layout.
pub fn render(f: &mut Frame, view: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Title
            Constraint::Length(BOARD_HEIGHT), // Game board
            Constraint::Min(8),               // Info panel
            Constraint::Length(3),            // Status line
            Constraint::Length(3),            // Instructions
        ])
        .split(f.area());

    render_title(f, chunks[0]);
    render_board(f, chunks[1], view);
    render_info(f, chunks[2], view);
    render_status(f, chunks[3], &view.status);
    render_instructions(f, chunks[4], view.state);
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("WORDWIZ")
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_board(f: &mut Frame, area: Rect, view: &ViewState) {
    let block = Block::default()
        .title(format!("Last {HISTORY_LIMIT} guesses"))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    for (row, record) in view.history.iter().enumerate() {
        let mut spans = vec![Span::raw("  ")];
        for letter in &record.feedback {
            let (bg, fg) = cell_colors(letter.classification);
            spans.push(Span::styled(
                format!(" {} ", letter.letter.to_ascii_uppercase()),
                Style::default().fg(fg).bg(bg),
            ));
            spans.push(Span::raw(" "));
        }
        render_line(f, inner, row, spans);
    }

    if view.state == TuiState::EnteringGuess {
        let mut spans = vec![Span::raw("  ")];
        let typed: Vec<char> = view.current_input.chars().collect();
        for i in 0..view.word_length {
            let letter = typed.get(i).copied().unwrap_or(' ');
            spans.push(Span::styled(
                format!(" {} ", letter.to_ascii_uppercase()),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ));
            spans.push(Span::raw(" "));
        }
        render_line(f, inner, view.history.len(), spans);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_line(f: &mut Frame, area: Rect, row_index: usize, spans: Vec<Span>) {
    let y = area.y + (row_index as u16 * ROW_SPACING);
    if y >= area.y + area.height {
        return;
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1,
        },
    );
}

fn render_info(f: &mut Frame, area: Rect, view: &ViewState) {
    let mut lines = vec![Line::from(vec![Span::styled(
        format_attempts(view.attempts),
        INFO_STYLE,
    )])];

    if let Some(letter) = view.first_letter {
        lines.push(Line::from(format!("The first letter is: {letter}")));
    }
    lines.push(Line::from(format!(
        "Incorrect letters: {}",
        view.incorrect_letters
    )));
    for hint in &view.hints {
        lines.push(Line::from(vec![Span::styled(hint.as_str(), SUCCESS_STYLE)]));
    }
    lines.push(Line::from(""));

    if !view.message.is_empty() {
        lines.push(Line::from(vec![Span::styled(
            view.message.as_str(),
            MESSAGE_STYLE,
        )]));
    }
    if !view.error_message.is_empty() {
        lines.push(Line::from(vec![Span::styled(
            view.error_message.as_str(),
            ERROR_STYLE,
        )]));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Information").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_status(f: &mut Frame, area: Rect, status: &str) {
    let status_text = if status.is_empty() { "Ready" } else { status };
    let paragraph = Paragraph::new(status_text)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
    let text = match state {
        TuiState::EnteringGuess => {
            "Type your guess | ENTER: Submit | TAB: Hint | CTRL+N: New round | ESC: Quit"
        }
        TuiState::RoundOver => "Y: Play again | N/ESC: Quit",
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

/// Main TUI interface component.
///
/// Run `setup`, calling `undo` before handing back its error.
fn undo_on_error<T>(setup: impl FnOnce() -> io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    setup().inspect_err(|_| undo())
}

/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    view: ViewState,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let terminal = undo_on_error(
            || {
                let mut stdout = io::stdout();
                execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
                Terminal::new(CrosstermBackend::new(stdout))
            },
            || {
                let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
                let _ = disable_raw_mode();
            },
        )?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            view: ViewState::default(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        self.terminal.draw(|f| render(f, &self.view))?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Wait briefly for one key press, filtering out everything else.
    fn next_key(&mut self) -> Result<Option<KeyEvent>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        // Garbage from escape sequences when alt-tabbing
        if let KeyCode::Char(c) = key.code
            && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
        {
            debug_log!("next_key() - Ignoring invalid character: {:?}", c);
            return Ok(None);
        }
        Ok(Some(key))
    }

    fn handle_guess_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        let has_ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let has_alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('n' | 'N') if has_ctrl => return Some(UserAction::NewGame),
            KeyCode::Char(_) if has_ctrl || has_alt => {
                debug_log!(
                    "handle_guess_input() - Ignoring character with modifier: {:?}",
                    key.modifiers
                );
            }
            KeyCode::Char(c) if c.is_alphabetic() => {
                self.view.error_message.clear();
                if self.view.current_input.chars().count() < self.view.word_length {
                    self.view.current_input.extend(c.to_lowercase());
                }
            }
            KeyCode::Char(c) => {
                self.view.error_message =
                    format!("Only letters are allowed! ('{c}' is not a letter)");
            }
            KeyCode::Backspace => {
                self.view.current_input.pop();
            }
            KeyCode::Enter => {
                let guess = std::mem::take(&mut self.view.current_input);
                info_log!("handle_guess_input() - Submitting '{}'", guess);
                return Some(UserAction::Guess(guess));
            }
            KeyCode::Tab => return Some(UserAction::Hint),
            KeyCode::Esc => return Some(UserAction::Exit),
            _ => {}
        }
        None
    }
}

impl GameInterface for TuiInterface {
    fn display_round_start(&mut self, info: &RoundInfo) {
        self.view.start_round(info);
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        self.view.state = TuiState::EnteringGuess;
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }
            match self.next_key() {
                Ok(Some(key)) => {
                    if let Some(action) = self.handle_guess_input(key) {
                        return Some(action);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    info_log!("read_action() - Input error: {}, returning Exit", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_guess(&mut self, report: &GuessReport) {
        self.view.history.clone_from(&report.history);
        self.view.attempts = report.outcome.attempts_remaining;
        self.view.incorrect_letters = format_incorrect_letters(report.incorrect_letters());
        self.view.error_message.clear();
        let last = report.history.last().map_or("", |r| r.guess.as_str());
        self.view.status = format!("{last} guessed");
        self.draw_or_log();
    }

    fn display_error(&mut self, error: &GameError) {
        self.view.error_message = format!("Error: {error}");
        self.draw_or_log();
    }

    fn display_hint(&mut self, hint: &HintResult) {
        self.view.hints.push(format_hint(hint));
        self.draw_or_log();
    }

    fn display_win(&mut self, elapsed: Duration, attempts_used: usize) {
        self.view.state = TuiState::RoundOver;
        self.view.message = format!(
            "✓ You've guessed the word in {:.2} seconds ({attempts_used} attempts)!",
            elapsed.as_secs_f64()
        );
        self.view.status = "Congratulations!".to_string();
        self.draw_or_log();
    }

    fn display_loss(&mut self, word: &str) {
        self.view.state = TuiState::RoundOver;
        self.view.message = format!("Sorry, you've run out of attempts. The word was: {word}");
        self.view.status = "Game Over".to_string();
        self.draw_or_log();
    }

    fn ask_play_again(&mut self) -> bool {
        self.view.state = TuiState::RoundOver;
        self.view.status = "Play again? (Y/N)".to_string();
        loop {
            if self.draw().is_err() {
                return false;
            }
            match self.next_key() {
                Ok(Some(key)) => match key.code {
                    KeyCode::Char('y' | 'Y') => return true,
                    KeyCode::Char('n' | 'N') | KeyCode::Esc => return false,
                    _ => {}
                },
                Ok(None) => {}
                Err(e) => {
                    debug_log!("ask_play_again() - Input error: {}", e);
                    return false;
                }
            }
        }
    }

    fn display_exit_message(&mut self) {
        self.view.message = "Exiting...".to_string();
        self.view.status = "Thanks for playing WordWiz!".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
