//! Game state machines
//!
//! Everything here is clock-free and host-free:
//! - Time arrives as ticks or as an explicit `now` in session milliseconds
//! - Randomness comes from a per-game seeded RNG
//! - Timers and output are requested through [`Effect`] values

pub mod chase;
pub mod collision;
pub mod duel;
pub mod effect;
pub mod game;
pub mod hacker;
pub mod intent;
pub mod matching;
pub mod timing;
pub mod typing;

pub use chase::{ChaseState, ChaseStatus};
pub use collision::{Cell, CollisionResult, Grid, GridHit, Rect, ball_rect_collision, grid_collision};
pub use duel::{DuelState, Side};
pub use effect::{DelayToken, Effect, Effects};
pub use game::{CardView, Frame, Game, GameKind, View};
pub use hacker::{HackerLine, HackerState};
pub use intent::{Direction, Intent, IntentKind};
pub use matching::{Card, MatchPhase, MatchState};
pub use timing::{TimingPhase, TimingState};
pub use typing::TypingState;
