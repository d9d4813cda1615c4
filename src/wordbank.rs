use crate::error::WordSourceError;
use crate::info_log;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

const WORDBANK_FILE_NAME: &str = "wordbank.txt";
const APP_DIR_NAME: &str = "wordwiz";

/// Something that can hand out a target word of a requested length.
pub trait WordSource {
    /// # Errors
    /// Returns a [`WordSourceError`] when no word of `length` letters can be produced.
    fn fetch_word(&mut self, length: usize) -> Result<String, WordSourceError>;
}

fn normalize(line: &str) -> Option<String> {
    let word = line.trim().to_lowercase();
    (!word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())).then_some(word)
}

fn dedup(words: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .into_iter()
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

pub fn load_wordbank_from_str(data: &str) -> Vec<String> {
    dedup(data.lines().filter_map(normalize))
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize(&line?) {
            words.push(word);
        }
    }
    Ok(dedup(words))
}

/// The per-user word bank location, e.g. `~/.config/wordwiz/wordbank.txt`.
#[must_use]
pub fn get_default_wordbank_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(WORDBANK_FILE_NAME))
}

/// A list of candidate words, picked from uniformly by length.
#[derive(Debug)]
pub struct WordBank {
    words: Vec<String>,
    rng: StdRng,
}

impl WordBank {
    #[must_use]
    pub fn new(words: Vec<String>) -> Self {
        Self::with_rng(words, StdRng::from_os_rng())
    }

    #[must_use]
    pub fn with_rng(words: Vec<String>, rng: StdRng) -> Self {
        Self { words, rng }
    }

    #[must_use]
    pub fn embedded() -> Self {
        Self::new(load_wordbank_from_str(EMBEDDED_WORDBANK))
    }

    /// # Errors
    /// Returns [`WordSourceError::Io`] if the file cannot be opened or read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WordSourceError> {
        Ok(Self::new(load_wordbank_from_file(path)?))
    }

    /// Load `path` if given, otherwise the per-user word bank if present,
    /// otherwise the embedded list.
    ///
    /// # Errors
    /// Returns [`WordSourceError::Io`] if the chosen file cannot be read.
    pub fn locate(path: Option<&Path>) -> Result<Self, WordSourceError> {
        if let Some(path) = path {
            info_log!("WordBank::locate() - Loading {}", path.display());
            return Self::from_file(path);
        }
        if let Some(default) = get_default_wordbank_path().filter(|p| p.is_file()) {
            info_log!("WordBank::locate() - Loading {}", default.display());
            return Self::from_file(default);
        }
        info_log!("WordBank::locate() - Using embedded word bank");
        Ok(Self::embedded())
    }

    /// Reseed the picker, for reproducible word choice.
    #[must_use]
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words_of_length(&self, length: usize) -> impl Iterator<Item = &String> {
        self.words
            .iter()
            .filter(move |word| word.chars().count() == length)
    }
}

impl WordSource for WordBank {
    fn fetch_word(&mut self, length: usize) -> Result<String, WordSourceError> {
        if length == 0 {
            return Err(WordSourceError::ZeroLength);
        }
        let matching: Vec<&String> = self
            .words
            .iter()
            .filter(|word| word.chars().count() == length)
            .collect();
        matching
            .choose(&mut self.rng)
            .map(|word| (*word).clone())
            .ok_or(WordSourceError::NoWordOfLength(length))
    }
}

/// Always offers the same word; useful for scripted play and tests.
#[derive(Clone, Debug)]
pub struct FixedWord(String);

impl FixedWord {
    #[must_use]
    pub fn new(word: &str) -> Self {
        Self(word.trim().to_lowercase())
    }
}

impl WordSource for FixedWord {
    fn fetch_word(&mut self, length: usize) -> Result<String, WordSourceError> {
        if length == 0 {
            return Err(WordSourceError::ZeroLength);
        }
        if self.0.chars().count() == length {
            Ok(self.0.clone())
        } else {
            Err(WordSourceError::NoWordOfLength(length))
        }
    }
}
