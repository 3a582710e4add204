//! Timing: reaction test
//!
//! Phase-based. A start arms the test and schedules the go signal after a
//! random delay; clicking too early cancels that schedule.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effect::{DelayToken, Effect, Effects, TokenSource};
use crate::config::TimingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingPhase {
    /// Idle until started
    Waiting,
    /// Go signal scheduled
    Armed,
    /// Go signal shown, measuring
    Go,
    /// Latency recorded
    Result,
}

#[derive(Debug, Clone)]
pub struct TimingState {
    pub phase: TimingPhase,
    /// When the go signal is (or was) due, in session clock ms
    pub go_at: Option<u64>,
    pub latency: Option<u64>,
    pub best: Option<u64>,
    /// Clicks that landed before the go signal
    pub early_clicks: u32,
    /// Whether the last round ended with an early click
    pub too_soon: bool,
    pending: Option<DelayToken>,
    tokens: TokenSource,
    min_delay_ms: u64,
    max_delay_ms: u64,
    rng: Pcg32,
}

impl TimingState {
    pub fn new(config: &TimingConfig, seed: u64) -> Self {
        Self {
            phase: TimingPhase::Waiting,
            go_at: None,
            latency: None,
            best: None,
            early_clicks: 0,
            too_soon: false,
            pending: None,
            tokens: TokenSource::default(),
            min_delay_ms: config.min_delay_ms.min(config.max_delay_ms),
            max_delay_ms: config.max_delay_ms,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Carry a best latency over from an earlier run
    pub fn with_best(mut self, best: Option<u64>) -> Self {
        self.best = best;
        self
    }

    pub fn with_early_clicks(mut self, early_clicks: u32) -> Self {
        self.early_clicks = early_clicks;
        self
    }
}

/// Start action: arm the test and schedule the go signal. Any go signal
/// still pending from an earlier arm is cancelled first.
pub fn arm(state: &mut TimingState, now: u64) -> Effects {
    let mut effects = Vec::with_capacity(2);
    if let Some(stale) = state.pending.take() {
        effects.push(Effect::Cancel(stale));
    }

    let delay_ms = state.rng.random_range(state.min_delay_ms..=state.max_delay_ms);
    let token = state.tokens.issue();
    state.pending = Some(token);
    state.phase = TimingPhase::Armed;
    state.go_at = Some(now + delay_ms);
    state.latency = None;
    state.too_soon = false;
    log::debug!("Timing armed, go in {delay_ms}ms");

    effects.push(Effect::Schedule { token, delay_ms });
    effects
}

/// Scheduled go signal
pub fn fire(state: &mut TimingState, token: DelayToken, now: u64) -> Effects {
    if state.pending != Some(token) || state.phase != TimingPhase::Armed {
        return Vec::new();
    }
    state.pending = None;
    state.phase = TimingPhase::Go;
    state.go_at = Some(now);
    Vec::new()
}

/// Player click
pub fn click(state: &mut TimingState, now: u64) -> Effects {
    match state.phase {
        TimingPhase::Waiting => Vec::new(),
        TimingPhase::Armed => {
            state.early_clicks += 1;
            state.too_soon = true;
            state.phase = TimingPhase::Waiting;
            state.go_at = None;
            state
                .pending
                .take()
                .map(Effect::Cancel)
                .into_iter()
                .collect()
        }
        TimingPhase::Go => {
            let latency = now.saturating_sub(state.go_at.unwrap_or(now));
            state.latency = Some(latency);
            if state.best.is_none_or(|best| latency < best) {
                state.best = Some(latency);
            }
            state.phase = TimingPhase::Result;
            log::info!("Reaction time {latency}ms (best {:?})", state.best);
            vec![Effect::Record(latency)]
        }
        TimingPhase::Result => arm(state, now),
    }
}
