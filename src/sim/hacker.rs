//! Hacker: scripted terminal intrusion
//!
//! Event-driven. A start prints the scripted messages one at a time, each
//! after a random pause, sometimes followed by a hex dump line. Every line is
//! its own delayed transition, so stopping mid-run cancels the rest of the
//! chain. A completed run bumps the hacked-systems counter.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effect::{DelayToken, Effect, Effects, TokenSource};
use crate::config::HackerConfig;

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CODE_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "line", rename_all = "lowercase")]
pub enum HackerLine {
    /// `[code] text`
    Message { code: String, text: String },
    /// Space-separated hex bytes
    Data { bytes: String },
}

#[derive(Debug, Clone)]
pub struct HackerState {
    pub lines: Vec<HackerLine>,
    /// Completed runs
    pub hacks: u32,
    /// A run is in progress; starts are rejected meanwhile
    pub hacking: bool,
    /// Index of the next message to print
    pub next: usize,
    pending: Option<DelayToken>,
    tokens: TokenSource,
    config: HackerConfig,
    rng: Pcg32,
}

impl HackerState {
    pub fn new(config: &HackerConfig, seed: u64) -> Self {
        Self {
            lines: Vec::new(),
            hacks: 0,
            hacking: false,
            next: 0,
            pending: None,
            tokens: TokenSource::default(),
            config: config.clone(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Carry the counter over from an earlier run
    pub fn with_hacks(mut self, hacks: u32) -> Self {
        self.hacks = hacks;
        self
    }

    fn schedule_next(&mut self) -> Effect {
        let min = self.config.min_delay_ms.min(self.config.max_delay_ms);
        let delay_ms = self.rng.random_range(min..=self.config.max_delay_ms);
        let token = self.tokens.issue();
        self.pending = Some(token);
        Effect::Schedule { token, delay_ms }
    }

    fn code(&mut self) -> String {
        (0..CODE_LEN)
            .map(|_| {
                let i = self.rng.random_range(0..CODE_ALPHABET.len());
                char::from(CODE_ALPHABET[i])
            })
            .collect()
    }

    fn data(&mut self) -> String {
        (0..self.config.data_bytes)
            .map(|_| format!("{:02x}", self.rng.random::<u8>()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Start action. Ignored while a run is in progress.
pub fn begin(state: &mut HackerState) -> Effects {
    if state.hacking || state.config.messages.is_empty() {
        return Vec::new();
    }
    state.hacking = true;
    state.lines.clear();
    state.next = 0;
    vec![state.schedule_next()]
}

/// Print the next line once its pause elapsed
pub fn fire(state: &mut HackerState, token: DelayToken) -> Effects {
    if state.pending != Some(token) || !state.hacking {
        return Vec::new();
    }
    state.pending = None;

    let Some(text) = state.config.messages.get(state.next).cloned() else {
        state.hacking = false;
        return Vec::new();
    };
    let code = state.code();
    state.lines.push(HackerLine::Message { code, text });
    let chance = state.config.data_chance.clamp(0.0, 1.0);
    if state.rng.random_bool(chance) {
        let bytes = state.data();
        state.lines.push(HackerLine::Data { bytes });
    }
    state.next += 1;

    if state.next < state.config.messages.len() {
        return vec![state.schedule_next()];
    }

    state.hacking = false;
    state.hacks += 1;
    log::info!("Hacker run complete ({} systems hacked)", state.hacks);
    vec![Effect::Record(u64::from(state.hacks))]
}
