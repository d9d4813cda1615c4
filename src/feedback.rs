use clap::ValueEnum;

/// How a single guessed letter relates to the target word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    Correct, // Green
    Present, // Yellow
    Absent,  // Gray
}

impl Classification {
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Correct => 'G',
            Self::Present => 'Y',
            Self::Absent => 'X',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LetterFeedback {
    pub classification: Classification,
    pub letter: char,
}

impl LetterFeedback {
    #[must_use]
    pub const fn new(classification: Classification, letter: char) -> Self {
        Self {
            classification,
            letter,
        }
    }
}

/// Rule used to decide when a misplaced letter counts as `Present`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ScoringMode {
    /// Any letter found elsewhere in the word is `Present`, however often it repeats.
    #[default]
    Simple,
    /// `Present` is capped by the occurrences not already claimed by a `Correct`
    /// or an earlier `Present`.
    OccurrenceLimited,
}

/// Compare `guess` against `word` position by position.
///
/// The caller guarantees both have the same number of characters. A letter is
/// `Correct` when it sits in the same position, `Present` when it occurs
/// anywhere else in the word, `Absent` otherwise. Repeated letters are not
/// capped, so `allee` against `apple` marks both `l`s as `Present`.
#[must_use]
pub fn evaluate(guess: &str, word: &str) -> Vec<LetterFeedback> {
    let word_chars: Vec<char> = word.chars().collect();
    guess
        .chars()
        .zip(word_chars.iter().copied())
        .map(|(g, w)| {
            let classification = if g == w {
                Classification::Correct
            } else if word_chars.contains(&g) {
                Classification::Present
            } else {
                Classification::Absent
            };
            LetterFeedback::new(classification, g)
        })
        .collect()
}

#[must_use]
pub fn evaluate_with(guess: &str, word: &str, mode: ScoringMode) -> Vec<LetterFeedback> {
    match mode {
        ScoringMode::Simple => evaluate(guess, word),
        ScoringMode::OccurrenceLimited => evaluate_occurrence_limited(guess, word),
    }
}

fn evaluate_occurrence_limited(guess: &str, word: &str) -> Vec<LetterFeedback> {
    let guess_chars: Vec<char> = guess.chars().collect();
    let mut remaining: Vec<Option<char>> = word.chars().map(Some).collect();
    let len = guess_chars.len().min(remaining.len());

    let mut feedback: Vec<LetterFeedback> = guess_chars[..len]
        .iter()
        .map(|&c| LetterFeedback::new(Classification::Absent, c))
        .collect();

    // First pass: greens
    for i in 0..len {
        if remaining[i] == Some(guess_chars[i]) {
            feedback[i].classification = Classification::Correct;
            remaining[i] = None;
        }
    }
    // Second pass: yellows, each consuming one unmatched occurrence
    for i in 0..len {
        if feedback[i].classification == Classification::Correct {
            continue;
        }
        if let Some(pos) = remaining.iter().position(|&c| c == Some(guess_chars[i])) {
            feedback[i].classification = Classification::Present;
            remaining[pos] = None;
        }
    }
    feedback
}

#[must_use]
pub fn is_solved(feedback: &[LetterFeedback]) -> bool {
    !feedback.is_empty()
        && feedback
            .iter()
            .all(|f| f.classification == Classification::Correct)
}

/// Render the classifications as a `G`/`Y`/`X` pattern string.
#[must_use]
pub fn pattern(feedback: &[LetterFeedback]) -> String {
    feedback.iter().map(|f| f.classification.symbol()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Classification::{Absent, Correct, Present};

    fn classes(feedback: &[LetterFeedback]) -> Vec<Classification> {
        feedback.iter().map(|f| f.classification).collect()
    }

    #[test]
    fn test_exact_match_is_all_correct() {
        let feedback = evaluate("crane", "crane");
        assert_eq!(classes(&feedback), vec![Correct; 5]);
        assert!(is_solved(&feedback));
    }

    #[test]
    fn test_apply_against_apple() {
        let feedback = evaluate("apply", "apple");
        assert_eq!(
            feedback,
            vec![
                LetterFeedback::new(Correct, 'a'),
                LetterFeedback::new(Correct, 'p'),
                LetterFeedback::new(Correct, 'p'),
                LetterFeedback::new(Correct, 'l'),
                LetterFeedback::new(Absent, 'y'),
            ]
        );
        assert!(!is_solved(&feedback));
    }

    #[test]
    fn test_repeated_letters_not_capped() {
        let feedback = evaluate("allee", "apple");
        assert_eq!(
            classes(&feedback),
            vec![Correct, Present, Present, Present, Correct]
        );
    }

    #[test]
    fn test_occurrence_limited_caps_repeats() {
        let feedback = evaluate_with("allee", "apple", ScoringMode::OccurrenceLimited);
        assert_eq!(
            classes(&feedback),
            vec![Correct, Present, Absent, Absent, Correct]
        );
    }

    #[test]
    fn test_occurrence_limited_prefers_exact_matches() {
        // The 'e' at index 4 is green, so the earlier 'e' has nothing left to claim.
        let feedback = evaluate_with("eerie", "crane", ScoringMode::OccurrenceLimited);
        assert_eq!(classes(&feedback), vec![Absent, Absent, Present, Absent, Correct]);
    }

    #[test]
    fn test_simple_mode_matches_evaluate() {
        assert_eq!(
            evaluate_with("allee", "apple", ScoringMode::Simple),
            evaluate("allee", "apple")
        );
    }

    #[test]
    fn test_disjoint_letters_all_absent() {
        let feedback = evaluate("dumbo", "knitz");
        assert_eq!(classes(&feedback), vec![Absent; 5]);
    }

    #[test]
    fn test_pattern_string() {
        assert_eq!(pattern(&evaluate("apply", "apple")), "GGGGX");
        assert_eq!(pattern(&evaluate("leapt", "apple")), "YYYYX");
    }

    #[test]
    fn test_empty_feedback_is_not_solved() {
        assert!(!is_solved(&[]));
    }
}
