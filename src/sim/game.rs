//! Game kinds and the per-session game value
//!
//! [`Game`] wraps one state machine and routes ticks, intents and delayed
//! transitions to it. It owns no timers; it only returns [`Effects`].

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::chase::{self, ChaseState, ChaseStatus};
use super::collision::Cell;
use super::duel::{self, DuelState};
use super::effect::{DelayToken, Effects};
use super::hacker::{self, HackerLine, HackerState};
use super::intent::{Direction, Intent, IntentKind};
use super::matching::{self, MatchPhase, MatchState};
use super::timing::{self, TimingPhase, TimingState};
use super::typing::{self, TypingState};
use crate::config::RuntimeConfig;
use crate::highscores::Ranking;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Chase,
    Duel,
    Matching,
    Timing,
    Typing,
    Hacker,
}

impl GameKind {
    pub const ALL: [GameKind; 6] = [
        GameKind::Chase,
        GameKind::Duel,
        GameKind::Matching,
        GameKind::Timing,
        GameKind::Typing,
        GameKind::Hacker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Chase => "chase",
            GameKind::Duel => "duel",
            GameKind::Matching => "matching",
            GameKind::Timing => "timing",
            GameKind::Typing => "typing",
            GameKind::Hacker => "hacker",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chase" | "snake" => Some(GameKind::Chase),
            "duel" | "pong" => Some(GameKind::Duel),
            "matching" | "memory" => Some(GameKind::Matching),
            "timing" | "reaction" => Some(GameKind::Timing),
            "typing" => Some(GameKind::Typing),
            "hacker" | "hack" => Some(GameKind::Hacker),
            _ => None,
        }
    }

    /// Continuous games advance on a repeating tick and buffer their input
    pub fn is_continuous(&self) -> bool {
        matches!(self, GameKind::Chase | GameKind::Duel)
    }

    /// Input the game listens to
    pub fn intents(&self) -> &'static [IntentKind] {
        match self {
            GameKind::Chase => &[IntentKind::Direction],
            GameKind::Duel => &[IntentKind::Pointer, IntentKind::Direction],
            GameKind::Matching => &[IntentKind::Flip],
            GameKind::Timing => &[IntentKind::Click],
            GameKind::Typing => &[IntentKind::Text],
            GameKind::Hacker => &[IntentKind::Click],
        }
    }

    /// How results rank on the best-result board
    pub fn ranking(&self) -> Ranking {
        match self {
            GameKind::Chase | GameKind::Duel | GameKind::Typing | GameKind::Hacker => {
                Ranking::HigherIsBetter
            }
            GameKind::Matching | GameKind::Timing => Ranking::LowerIsBetter,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One card as the host should draw it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: usize,
    /// `None` while face down
    pub symbol: Option<String>,
    pub matched: bool,
}

/// Drawable, read-only projection of a game
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum View {
    Chase {
        width: i32,
        height: i32,
        /// Head first
        body: Vec<Cell>,
        heading: Direction,
        food: Option<Cell>,
        bonus: Option<Cell>,
        interval_ms: u64,
    },
    Duel {
        width: f32,
        height: f32,
        ball: Vec2,
        ball_radius: f32,
        player_y: f32,
        opponent_y: f32,
        paddle_width: f32,
        paddle_height: f32,
        player_score: u32,
        opponent_score: u32,
    },
    Matching {
        cards: Vec<CardView>,
        moves: u32,
        pairs_found: usize,
        pairs_total: usize,
    },
    Timing {
        phase: TimingPhase,
        latency: Option<u64>,
        best: Option<u64>,
        early_clicks: u32,
    },
    Typing {
        word: String,
        input: String,
        wpm: u32,
        accuracy: u32,
    },
    Hacker {
        lines: Vec<HackerLine>,
        hacks: u32,
        hacking: bool,
    },
}

/// What a game reports after each step
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub score: u64,
    pub status: String,
    pub terminal: bool,
    pub view: View,
}

/// One running game of any kind
#[derive(Debug, Clone)]
pub enum Game {
    Chase(ChaseState),
    Duel(DuelState),
    Matching(MatchState),
    Timing(TimingState),
    Typing(TypingState),
    Hacker(HackerState),
}

impl Game {
    pub fn new(kind: GameKind, config: &RuntimeConfig, seed: u64) -> Self {
        match kind {
            GameKind::Chase => Game::Chase(ChaseState::new(&config.chase, seed)),
            GameKind::Duel => Game::Duel(DuelState::new(&config.duel, seed)),
            GameKind::Matching => Game::Matching(MatchState::new(&config.matching, seed)),
            GameKind::Timing => Game::Timing(TimingState::new(&config.timing, seed)),
            GameKind::Typing => Game::Typing(TypingState::new(&config.typing, seed)),
            GameKind::Hacker => Game::Hacker(HackerState::new(&config.hacker, seed)),
        }
    }

    /// Carry counters over from the previous session on the same handle
    /// and the handle's best recorded result
    pub fn carry_over(self, previous: Option<&Game>, best: Option<u64>) -> Self {
        match (self, previous) {
            (Game::Timing(s), Some(Game::Timing(prev))) => {
                Game::Timing(s.with_best(best).with_early_clicks(prev.early_clicks))
            }
            (Game::Timing(s), _) => Game::Timing(s.with_best(best)),
            (Game::Hacker(s), Some(Game::Hacker(prev))) => Game::Hacker(s.with_hacks(prev.hacks)),
            (other, _) => other,
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Game::Chase(_) => GameKind::Chase,
            Game::Duel(_) => GameKind::Duel,
            Game::Matching(_) => GameKind::Matching,
            Game::Timing(_) => GameKind::Timing,
            Game::Typing(_) => GameKind::Typing,
            Game::Hacker(_) => GameKind::Hacker,
        }
    }

    /// Repeating tick interval for continuous games
    pub fn tick_interval(&self) -> Option<u64> {
        match self {
            Game::Chase(s) => Some(s.interval_ms),
            Game::Duel(s) => Some(s.config().tick_ms.max(1)),
            _ => None,
        }
    }

    /// Start action, applied once right after the session is wired up
    pub fn start(&mut self, now: u64) -> Effects {
        match self {
            Game::Timing(s) => timing::arm(s, now),
            Game::Typing(s) => typing::begin(s, now),
            Game::Hacker(s) => hacker::begin(s),
            _ => Vec::new(),
        }
    }

    /// One tick of a continuous game with the intents buffered since the last
    pub fn tick(&mut self, intents: &[Intent]) -> Effects {
        match self {
            Game::Chase(s) => chase::tick(s, intents),
            Game::Duel(s) => duel::tick(s, intents),
            _ => Vec::new(),
        }
    }

    /// A discrete intent for an event-driven game
    pub fn apply(&mut self, intent: &Intent, now: u64) -> Effects {
        match (self, intent) {
            (Game::Matching(s), Intent::Flip(id)) => matching::flip(s, *id),
            (Game::Timing(s), Intent::Click) => timing::click(s, now),
            (Game::Typing(s), Intent::Text(text)) => typing::type_text(s, text, now),
            (Game::Hacker(s), Intent::Click) => hacker::begin(s),
            _ => Vec::new(),
        }
    }

    /// A delayed transition came due
    pub fn fire(&mut self, token: DelayToken, now: u64) -> Effects {
        match self {
            Game::Matching(s) => matching::resolve(s, token),
            Game::Timing(s) => timing::fire(s, token, now),
            Game::Hacker(s) => hacker::fire(s, token),
            _ => Vec::new(),
        }
    }

    /// Result to record when a session is torn down without having
    /// recorded one itself
    pub fn closing_result(&self) -> Option<u64> {
        match self {
            Game::Duel(s) => Some(u64::from(s.player_score)),
            Game::Typing(s) if s.words > 0 => Some(u64::from(s.wpm)),
            _ => None,
        }
    }

    pub fn frame(&self) -> Frame {
        match self {
            Game::Chase(s) => Frame {
                score: s.score,
                status: match s.status {
                    ChaseStatus::Running => format!("Score: {}", s.score),
                    ChaseStatus::Crashed => format!("GAME OVER - Score: {}", s.score),
                    ChaseStatus::Cleared => format!("BOARD CLEARED - Score: {}", s.score),
                },
                terminal: !s.is_running(),
                view: View::Chase {
                    width: s.grid.width,
                    height: s.grid.height,
                    body: s.body.iter().copied().collect(),
                    heading: s.heading,
                    food: s.food,
                    bonus: s.bonus.map(|b| b.cell),
                    interval_ms: s.interval_ms,
                },
            },
            Game::Duel(s) => {
                let c = s.config();
                Frame {
                    score: u64::from(s.player_score),
                    status: format!("{} - {}", s.player_score, s.opponent_score),
                    terminal: false,
                    view: View::Duel {
                        width: c.field_width,
                        height: c.field_height,
                        ball: s.ball.pos,
                        ball_radius: s.ball.radius,
                        player_y: s.player_y,
                        opponent_y: s.opponent_y,
                        paddle_width: c.paddle_width,
                        paddle_height: c.paddle_height,
                        player_score: s.player_score,
                        opponent_score: s.opponent_score,
                    },
                }
            }
            Game::Matching(s) => {
                let phase = s.phase();
                Frame {
                    score: u64::from(s.moves),
                    status: if phase == MatchPhase::Resolved {
                        format!("Solved in {} moves!", s.moves)
                    } else {
                        format!(
                            "Moves: {} | Pairs: {}/{}",
                            s.moves,
                            s.pairs_found(),
                            s.pairs_total()
                        )
                    },
                    terminal: phase == MatchPhase::Resolved,
                    view: View::Matching {
                        cards: s
                            .cards
                            .iter()
                            .map(|card| CardView {
                                id: card.id,
                                symbol: s.is_face_up(card.id).then(|| card.symbol.clone()),
                                matched: s.matched.contains(&card.id),
                            })
                            .collect(),
                        moves: s.moves,
                        pairs_found: s.pairs_found(),
                        pairs_total: s.pairs_total(),
                    },
                }
            }
            Game::Timing(s) => Frame {
                score: s.latency.unwrap_or(0),
                status: match s.phase {
                    TimingPhase::Waiting if s.too_soon => "Too soon! Press start to retry".to_string(),
                    TimingPhase::Waiting => "Press start".to_string(),
                    TimingPhase::Armed => "Wait for it...".to_string(),
                    TimingPhase::Go => "CLICK!".to_string(),
                    TimingPhase::Result => match (s.latency, s.best) {
                        (Some(latency), Some(best)) => format!("{latency} ms (best {best} ms)"),
                        (Some(latency), None) => format!("{latency} ms"),
                        _ => "Click to try again".to_string(),
                    },
                },
                terminal: false,
                view: View::Timing {
                    phase: s.phase,
                    latency: s.latency,
                    best: s.best,
                    early_clicks: s.early_clicks,
                },
            },
            Game::Typing(s) => Frame {
                score: u64::from(s.words),
                status: format!("WPM: {} | Accuracy: {}%", s.wpm, s.accuracy),
                terminal: false,
                view: View::Typing {
                    word: s.word.clone(),
                    input: s.input.clone(),
                    wpm: s.wpm,
                    accuracy: s.accuracy,
                },
            },
            Game::Hacker(s) => Frame {
                score: u64::from(s.hacks),
                status: if s.hacking {
                    format!("HACKING... | Systems Hacked: {}", s.hacks)
                } else {
                    format!("Systems Hacked: {}", s.hacks)
                },
                terminal: false,
                view: View::Hacker {
                    lines: s.lines.clone(),
                    hacks: s.hacks,
                    hacking: s.hacking,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_name(kind.as_str()), Some(kind));
            assert_eq!(Game::new(kind, &RuntimeConfig::default(), 1).kind(), kind);
        }
        assert_eq!(GameKind::from_name("Snake"), Some(GameKind::Chase));
        assert_eq!(GameKind::from_name("tetris"), None);
    }

    #[test]
    fn test_only_continuous_games_tick() {
        let config = RuntimeConfig::default();
        for kind in GameKind::ALL {
            let game = Game::new(kind, &config, 1);
            assert_eq!(game.tick_interval().is_some(), kind.is_continuous());
        }
    }

    #[test]
    fn test_mismatched_intent_ignored() {
        let mut game = Game::new(GameKind::Matching, &RuntimeConfig::default(), 1);
        assert!(game.apply(&Intent::Click, 0).is_empty());
        assert!(game.apply(&Intent::Text("x".into()), 0).is_empty());
    }

    #[test]
    fn test_face_down_cards_hide_symbols() {
        let mut game = Game::new(GameKind::Matching, &RuntimeConfig::default(), 4);
        game.apply(&Intent::Flip(3), 0);
        let View::Matching { cards, .. } = game.frame().view else {
            panic!("expected matching view");
        };
        assert!(cards[3].symbol.is_some());
        assert_eq!(cards.iter().filter(|c| c.symbol.is_some()).count(), 1);
    }
}
