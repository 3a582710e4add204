//! Typing: words-per-minute test
//!
//! Event-driven. Each text intent carries the whole input field; typing the
//! shown word exactly completes it and draws the next one.

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::effect::Effects;
use crate::config::TypingConfig;

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone)]
pub struct TypingState {
    pub word: String,
    pub input: String,
    /// Words completed
    pub words: u32,
    /// Characters in completed words
    pub correct: u32,
    /// Input changes seen
    pub total: u32,
    pub wpm: u32,
    /// Percent
    pub accuracy: u32,
    pub active: bool,
    started_at: u64,
    pool: Vec<String>,
    rng: Pcg32,
}

impl TypingState {
    pub fn new(config: &TypingConfig, seed: u64) -> Self {
        Self {
            word: String::new(),
            input: String::new(),
            words: 0,
            correct: 0,
            total: 0,
            wpm: 0,
            accuracy: 100,
            active: false,
            started_at: 0,
            pool: config.words.iter().filter(|w| !w.is_empty()).cloned().collect(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn next_word(&mut self) {
        self.word = self.pool.choose(&mut self.rng).cloned().unwrap_or_default();
        self.input.clear();
    }
}

/// Reset stats and show the first word
pub fn begin(state: &mut TypingState, now: u64) -> Effects {
    state.active = true;
    state.words = 0;
    state.correct = 0;
    state.total = 0;
    state.wpm = 0;
    state.accuracy = 100;
    state.started_at = now;
    state.next_word();
    Vec::new()
}

/// Input field changed to `text`
pub fn type_text(state: &mut TypingState, text: &str, now: u64) -> Effects {
    if !state.active {
        return Vec::new();
    }
    state.input = text.to_string();
    state.total += 1;

    if state.word.is_empty() || state.input != state.word {
        return Vec::new();
    }

    state.words += 1;
    state.correct += state.word.chars().count() as u32;
    let minutes = now.saturating_sub(state.started_at) as f64 / MS_PER_MINUTE;
    state.wpm = if minutes > 0.0 {
        (f64::from(state.words) / minutes).round() as u32
    } else {
        0
    };
    let accuracy = (f64::from(state.correct) / f64::from(state.total)) * 100.0;
    state.accuracy = (accuracy.round() as u32).min(100);
    state.next_word();
    Vec::new()
}
