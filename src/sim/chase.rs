//! Chase: grid snake
//!
//! Continuous game. Each tick applies buffered direction intents, moves the
//! head one cell, then resolves walls, self-hits, food and the bonus item.

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand::seq::IteratorRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Cell, Grid, GridHit, grid_collision};
use super::effect::{Effect, Effects};
use super::intent::{Direction, Intent};
use crate::config::ChaseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChaseStatus {
    Running,
    /// Hit a wall or itself
    Crashed,
    /// No free cell left for food
    Cleared,
}

/// Short-lived high-value pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub cell: Cell,
    pub ttl_ticks: u32,
}

#[derive(Debug, Clone)]
pub struct ChaseState {
    pub grid: Grid,
    /// Head first
    pub body: VecDeque<Cell>,
    /// Heading for the next move
    pub heading: Direction,
    /// Heading of the last committed move; reversal is judged against this
    last_moved: Direction,
    pub food: Option<Cell>,
    pub bonus: Option<Bonus>,
    pub score: u64,
    /// Current tick interval
    pub interval_ms: u64,
    pub status: ChaseStatus,
    pub ticks: u64,
    config: ChaseConfig,
    rng: Pcg32,
}

impl ChaseState {
    pub fn new(config: &ChaseConfig, seed: u64) -> Self {
        let grid = Grid {
            width: config.grid_width.max(1),
            height: config.grid_height.max(1),
        };
        let mut state = Self {
            grid,
            body: VecDeque::from([grid.center()]),
            heading: Direction::Right,
            last_moved: Direction::Right,
            food: None,
            bonus: None,
            score: 0,
            interval_ms: config.tick_ms.max(1),
            status: ChaseStatus::Running,
            ticks: 0,
            config: config.clone(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.food = state.free_cell();
        if state.food.is_none() {
            state.status = ChaseStatus::Cleared;
        }
        state
    }

    pub fn is_running(&self) -> bool {
        self.status == ChaseStatus::Running
    }

    pub fn head(&self) -> Cell {
        // The body is created with one segment and never shrinks below it
        self.body.front().copied().unwrap_or(self.grid.center())
    }

    /// Request a heading change. Reversing along the current axis is
    /// rejected; returns whether the heading was accepted.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if dir.is_opposite(self.last_moved) {
            return false;
        }
        self.heading = dir;
        true
    }

    /// Random cell not covered by the body, food or bonus
    fn free_cell(&mut self) -> Option<Cell> {
        let body = &self.body;
        let food = self.food;
        let bonus = self.bonus.map(|b| b.cell);
        self.grid
            .cells()
            .filter(|c| !body.contains(c) && Some(*c) != food && Some(*c) != bonus)
            .choose(&mut self.rng)
    }

    fn finish(&mut self, status: ChaseStatus) -> Effects {
        self.status = status;
        log::info!(
            "Chase ended ({:?}) with score {} after {} ticks",
            status,
            self.score,
            self.ticks
        );
        vec![Effect::Record(self.score), Effect::Stop]
    }
}

/// Advance the chase by one tick
pub fn tick(state: &mut ChaseState, intents: &[Intent]) -> Effects {
    if !state.is_running() {
        return Vec::new();
    }

    for intent in intents {
        if let Intent::Direction(dir) = intent {
            state.steer(*dir);
        }
    }

    state.ticks += 1;
    let head = state.head().step(state.heading);

    match grid_collision(&state.grid, &state.body, head) {
        GridHit::Wall | GridHit::Body => return state.finish(ChaseStatus::Crashed),
        GridHit::Clear => {}
    }

    state.body.push_front(head);
    state.last_moved = state.heading;

    let mut effects = Vec::new();

    if let Some(bonus) = state.bonus {
        if bonus.cell == head {
            state.score += state.config.bonus_score;
            state.bonus = None;
        } else if bonus.ttl_ticks <= 1 {
            state.bonus = None;
        } else {
            state.bonus = Some(Bonus {
                ttl_ticks: bonus.ttl_ticks - 1,
                ..bonus
            });
        }
    }

    if state.food == Some(head) {
        // Grow: the tail stays this tick
        state.score += state.config.food_score;
        state.food = None;
        state.food = state.free_cell();
        if state.food.is_none() {
            effects.extend(state.finish(ChaseStatus::Cleared));
            return effects;
        }

        let chance = state.config.bonus_chance.clamp(0.0, 1.0);
        if state.bonus.is_none() && state.rng.random_bool(chance) {
            state.bonus = state.free_cell().map(|cell| Bonus {
                cell,
                ttl_ticks: state.config.bonus_ttl_ticks.max(1),
            });
        }

        let floor = state.config.min_tick_ms.max(1);
        let faster = state
            .interval_ms
            .saturating_sub(state.config.speedup_ms)
            .max(floor);
        if faster < state.interval_ms {
            log::debug!("Chase speed-up: {}ms -> {}ms", state.interval_ms, faster);
            state.interval_ms = faster;
            effects.push(Effect::Retime {
                interval_ms: faster,
            });
        }
    } else {
        state.body.pop_back();
    }

    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_config() -> ChaseConfig {
        ChaseConfig {
            grid_width: 10,
            grid_height: 8,
            bonus_chance: 0.0,
            ..ChaseConfig::default()
        }
    }

    #[test]
    fn test_initial_state() {
        let state = ChaseState::new(&ChaseConfig::default(), 1);
        assert_eq!(state.body.len(), 1);
        assert_eq!(state.head(), Cell::new(14, 10));
        assert_eq!(state.score, 0);
        assert!(state.is_running());
        let food = state.food.expect("food placed");
        assert!(state.grid.contains(food));
        assert_ne!(food, state.head());
    }

    #[test]
    fn test_reverse_rejected() {
        let mut state = ChaseState::new(&small_config(), 1);
        assert_eq!(state.heading, Direction::Right);
        assert!(!state.steer(Direction::Left));
        assert_eq!(state.heading, Direction::Right);
        assert!(state.steer(Direction::Up));
        assert_eq!(state.heading, Direction::Up);

        let mut state = ChaseState::new(&small_config(), 1);
        assert!(state.steer(Direction::Down));
        assert_eq!(state.heading, Direction::Down);
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        let mut state = ChaseState::new(&small_config(), 1);
        state.food = None;
        // Up then Left within one tick: Left is judged against the committed
        // Right heading and rejected
        tick(
            &mut state,
            &[Intent::Direction(Direction::Up), Intent::Direction(Direction::Left)],
        );
        assert_eq!(state.heading, Direction::Up);
        assert!(state.is_running());
    }

    #[test]
    fn test_move_without_food_keeps_length() {
        let mut state = ChaseState::new(&small_config(), 3);
        state.food = Some(Cell::new(0, 0));
        let start = state.head();
        let effects = tick(&mut state, &[]);
        assert!(effects.is_empty());
        assert_eq!(state.head(), start.step(Direction::Right));
        assert_eq!(state.body.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_eating_food_grows_and_scores() {
        let mut state = ChaseState::new(&small_config(), 3);
        let start = state.head();
        state.food = Some(start.step(Direction::Right));
        let effects = tick(&mut state, &[]);
        assert_eq!(state.score, CHASE_FOOD);
        assert_eq!(state.body.len(), 2);
        assert_eq!(state.body.back().copied(), Some(start));
        let food = state.food.expect("food relocated");
        assert!(!state.body.contains(&food));
        assert!(effects.contains(&Effect::Retime {
            interval_ms: state.interval_ms
        }));
    }

    const CHASE_FOOD: u64 = crate::consts::CHASE_FOOD_SCORE;

    #[test]
    fn test_speedup_respects_floor() {
        let config = ChaseConfig {
            tick_ms: 52,
            min_tick_ms: 50,
            speedup_ms: 5,
            ..small_config()
        };
        let mut state = ChaseState::new(&config, 9);
        state.food = Some(state.head().step(Direction::Right));
        tick(&mut state, &[]);
        assert_eq!(state.interval_ms, 50);

        state.food = Some(state.head().step(Direction::Right));
        let effects = tick(&mut state, &[]);
        assert_eq!(state.interval_ms, 50);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Retime { .. })));
    }

    #[test]
    fn test_wall_crash_is_terminal() {
        let mut state = ChaseState::new(&small_config(), 5);
        state.food = None;
        let mut effects = Vec::new();
        for _ in 0..20 {
            effects = tick(&mut state, &[]);
            if !state.is_running() {
                break;
            }
        }
        assert_eq!(state.status, ChaseStatus::Crashed);
        assert_eq!(effects, vec![Effect::Record(0), Effect::Stop]);
        // Head stays on the last valid cell
        assert_eq!(state.head(), Cell::new(9, 4));

        let ticks = state.ticks;
        assert!(tick(&mut state, &[Intent::Direction(Direction::Up)]).is_empty());
        assert_eq!(state.ticks, ticks);
    }

    #[test]
    fn test_self_collision() {
        let mut state = ChaseState::new(&small_config(), 5);
        state.food = None;
        // A coiled body: head at (5,4) moving right into (6,4)
        state.body = VecDeque::from([
            Cell::new(5, 4),
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 4),
            Cell::new(7, 4),
        ]);
        tick(&mut state, &[]);
        assert_eq!(state.status, ChaseStatus::Crashed);
    }

    #[test]
    fn test_bonus_scores_and_expires() {
        let mut state = ChaseState::new(&small_config(), 5);
        state.food = Some(Cell::new(0, 0));
        let head = state.head();
        state.bonus = Some(Bonus {
            cell: head.step(Direction::Right),
            ttl_ticks: 5,
        });
        tick(&mut state, &[]);
        assert_eq!(state.score, crate::consts::CHASE_BONUS_SCORE);
        assert_eq!(state.body.len(), 1);
        assert!(state.bonus.is_none());

        state.bonus = Some(Bonus {
            cell: Cell::new(0, 7),
            ttl_ticks: 1,
        });
        tick(&mut state, &[]);
        assert!(state.bonus.is_none());
    }

    #[test]
    fn test_full_board_clears() {
        let config = ChaseConfig {
            grid_width: 2,
            grid_height: 1,
            ..small_config()
        };
        let mut state = ChaseState::new(&config, 1);
        // 2x1 grid: head at (1,0), only free cell is (0,0)
        assert_eq!(state.food, Some(Cell::new(0, 0)));
        state.last_moved = Direction::Left;
        state.heading = Direction::Left;
        let effects = tick(&mut state, &[]);
        assert_eq!(state.status, ChaseStatus::Cleared);
        assert!(effects.contains(&Effect::Stop));
    }

    proptest! {
        #[test]
        fn prop_head_stays_in_grid(dirs in proptest::collection::vec(0u8..4, 0..200), seed in any::<u64>()) {
            let mut state = ChaseState::new(&small_config(), seed);
            for d in dirs {
                let dir = match d {
                    0 => Direction::Up,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Right,
                };
                tick(&mut state, &[Intent::Direction(dir)]);
                if state.is_running() {
                    prop_assert!(state.grid.contains(state.head()));
                    let unique: std::collections::HashSet<_> = state.body.iter().collect();
                    prop_assert_eq!(unique.len(), state.body.len());
                }
            }
        }

        #[test]
        fn prop_food_grows_by_one(dirs in proptest::collection::vec(0u8..4, 0..150), seed in any::<u64>()) {
            let mut state = ChaseState::new(&small_config(), seed);
            for d in dirs {
                if !state.is_running() {
                    break;
                }
                let dir = [Direction::Up, Direction::Down, Direction::Left, Direction::Right][d as usize];
                let score = state.score;
                let len = state.body.len();
                let tail = state.body.back().copied();
                let food = state.food;
                tick(&mut state, &[Intent::Direction(dir)]);
                if state.is_running() {
                    if food == Some(state.head()) {
                        prop_assert_eq!(state.score, score + CHASE_FOOD);
                        prop_assert_eq!(state.body.len(), len + 1);
                        prop_assert_eq!(state.body.back().copied(), tail);
                    } else {
                        prop_assert_eq!(state.score, score);
                        prop_assert_eq!(state.body.len(), len);
                    }
                }
            }
        }
    }
}
