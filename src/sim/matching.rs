//! Matching: memory pairs
//!
//! Turn-based. Flips arrive as discrete intents; the only timed element is the
//! delay that keeps a mismatched pair face up before hiding it again.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effect::{DelayToken, Effect, Effects, TokenSource};
use crate::config::MatchConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: usize,
    pub symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// No unmatched card face up
    Idle,
    OneFlipped,
    /// Mismatched pair visible, waiting for the reset delay
    Comparing,
    /// Every pair found
    Resolved,
}

#[derive(Debug, Clone)]
pub struct MatchState {
    /// Shuffled deck; a card's id is its position
    pub cards: Vec<Card>,
    /// Face-up, not yet matched (at most two)
    pub flipped: Vec<usize>,
    pub matched: BTreeSet<usize>,
    pub moves: u32,
    /// Reset the mismatched pair is waiting on
    pending: Option<DelayToken>,
    tokens: TokenSource,
    mismatch_delay_ms: u64,
}

impl MatchState {
    pub fn new(config: &MatchConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut symbols: Vec<&String> = config.symbols.iter().chain(config.symbols.iter()).collect();
        symbols.shuffle(&mut rng);
        let cards = symbols
            .into_iter()
            .enumerate()
            .map(|(id, symbol)| Card {
                id,
                symbol: symbol.clone(),
            })
            .collect();

        Self {
            cards,
            flipped: Vec::with_capacity(2),
            matched: BTreeSet::new(),
            moves: 0,
            pending: None,
            tokens: TokenSource::default(),
            mismatch_delay_ms: config.mismatch_delay_ms,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        if !self.cards.is_empty() && self.matched.len() == self.cards.len() {
            MatchPhase::Resolved
        } else {
            match self.flipped.len() {
                0 => MatchPhase::Idle,
                1 => MatchPhase::OneFlipped,
                _ => MatchPhase::Comparing,
            }
        }
    }

    pub fn pairs_found(&self) -> usize {
        self.matched.len() / 2
    }

    pub fn pairs_total(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn is_face_up(&self, id: usize) -> bool {
        self.flipped.contains(&id) || self.matched.contains(&id)
    }
}

/// Flip card `id`. Ignored while a pair is pending, after the board is
/// solved, or for cards already face up or out of range.
pub fn flip(state: &mut MatchState, id: usize) -> Effects {
    if !matches!(state.phase(), MatchPhase::Idle | MatchPhase::OneFlipped)
        || id >= state.cards.len()
        || state.is_face_up(id)
    {
        return Vec::new();
    }

    state.flipped.push(id);
    if state.flipped.len() < 2 {
        return Vec::new();
    }

    state.moves += 1;
    let (first, second) = (state.flipped[0], state.flipped[1]);
    if state.cards[first].symbol == state.cards[second].symbol {
        state.matched.insert(first);
        state.matched.insert(second);
        state.flipped.clear();
        if state.phase() == MatchPhase::Resolved {
            log::info!("Matching solved in {} moves", state.moves);
            return vec![Effect::Record(u64::from(state.moves)), Effect::Stop];
        }
        Vec::new()
    } else {
        let token = state.tokens.issue();
        state.pending = Some(token);
        vec![Effect::Schedule {
            token,
            delay_ms: state.mismatch_delay_ms,
        }]
    }
}

/// Delayed hide of a mismatched pair
pub fn resolve(state: &mut MatchState, token: DelayToken) -> Effects {
    if state.pending != Some(token) {
        return Vec::new();
    }
    state.pending = None;
    state.flipped.clear();
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> MatchState {
        MatchState::new(&MatchConfig::default(), 11)
    }

    /// Ids of two cards sharing a symbol, and one that does not
    fn pair_and_other(state: &MatchState) -> (usize, usize, usize) {
        let a = 0;
        let b = (1..state.cards.len())
            .find(|&i| state.cards[i].symbol == state.cards[a].symbol)
            .unwrap();
        let c = (1..state.cards.len())
            .find(|&i| state.cards[i].symbol != state.cards[a].symbol)
            .unwrap();
        (a, b, c)
    }

    #[test]
    fn test_deck_has_pairs() {
        let state = deck();
        assert_eq!(state.cards.len(), 16);
        for card in &state.cards {
            let count = state.cards.iter().filter(|c| c.symbol == card.symbol).count();
            assert_eq!(count, 2);
        }
        assert!(state.cards.iter().enumerate().all(|(i, c)| c.id == i));
        assert_eq!(state.phase(), MatchPhase::Idle);
    }

    #[test]
    fn test_match_resolves_immediately() {
        let mut state = deck();
        let (a, b, _) = pair_and_other(&state);
        assert!(flip(&mut state, a).is_empty());
        assert_eq!(state.phase(), MatchPhase::OneFlipped);
        let effects = flip(&mut state, b);
        assert!(effects.is_empty());
        assert!(state.matched.contains(&a) && state.matched.contains(&b));
        assert!(state.flipped.is_empty());
        assert_eq!(state.moves, 1);
    }

    #[test]
    fn test_mismatch_waits_for_delay() {
        let mut state = deck();
        let (a, _, c) = pair_and_other(&state);
        flip(&mut state, a);
        let effects = flip(&mut state, c);
        let token = match effects.as_slice() {
            [Effect::Schedule { token, delay_ms }] => {
                assert_eq!(*delay_ms, crate::consts::MATCH_MISMATCH_DELAY_MS);
                *token
            }
            other => panic!("unexpected effects {other:?}"),
        };
        assert_eq!(state.phase(), MatchPhase::Comparing);
        assert_eq!(state.moves, 1);

        // Third flip rejected while the pair is visible
        let third = (0..state.cards.len()).find(|i| *i != a && *i != c).unwrap();
        assert!(flip(&mut state, third).is_empty());
        assert_eq!(state.flipped, vec![a, c]);

        resolve(&mut state, token);
        assert!(state.flipped.is_empty());
        assert_eq!(state.phase(), MatchPhase::Idle);
    }

    #[test]
    fn test_stale_token_ignored() {
        let mut state = deck();
        let (a, _, c) = pair_and_other(&state);
        flip(&mut state, a);
        flip(&mut state, c);
        resolve(&mut state, DelayToken(99));
        assert_eq!(state.flipped.len(), 2);
    }

    #[test]
    fn test_invalid_flips_ignored() {
        let mut state = deck();
        let (a, b, _) = pair_and_other(&state);
        flip(&mut state, a);
        // Same card twice
        flip(&mut state, a);
        assert_eq!(state.flipped, vec![a]);
        // Out of range
        flip(&mut state, 999);
        assert_eq!(state.flipped, vec![a]);
        flip(&mut state, b);
        // Already matched
        assert!(flip(&mut state, a).is_empty());
        assert!(state.flipped.is_empty());
        assert_eq!(state.moves, 1);
    }

    #[test]
    fn test_solving_stops_and_records() {
        let config = MatchConfig {
            symbols: vec!["&&".to_string()],
            mismatch_delay_ms: 10,
        };
        let mut state = MatchState::new(&config, 1);
        flip(&mut state, 0);
        let effects = flip(&mut state, 1);
        assert_eq!(effects, vec![Effect::Record(1), Effect::Stop]);
        assert_eq!(state.phase(), MatchPhase::Resolved);
        assert!(flip(&mut state, 0).is_empty());
    }
}
