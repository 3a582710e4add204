//! Game tuning and runtime configuration
//!
//! Every value has a default from [`crate::consts`]; a host may override any
//! subset through JSON. Nothing here is persisted between runs.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, RuntimeError};

/// Chase (grid snake) tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    /// Grid size in cells
    pub grid_width: i32,
    pub grid_height: i32,
    /// Starting tick interval
    pub tick_ms: u64,
    /// Interval reduction per food eaten (0 disables speed-up)
    pub speedup_ms: u64,
    /// Interval floor for speed-up
    pub min_tick_ms: u64,
    pub food_score: u64,
    pub bonus_score: u64,
    /// Probability (0-1) that eating food spawns a bonus item
    pub bonus_chance: f64,
    /// Ticks before an uneaten bonus item disappears
    pub bonus_ttl_ticks: u32,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            grid_width: CHASE_GRID_WIDTH,
            grid_height: CHASE_GRID_HEIGHT,
            tick_ms: CHASE_TICK_MS,
            speedup_ms: CHASE_SPEEDUP_MS,
            min_tick_ms: CHASE_MIN_TICK_MS,
            food_score: CHASE_FOOD_SCORE,
            bonus_score: CHASE_BONUS_SCORE,
            bonus_chance: CHASE_BONUS_CHANCE,
            bonus_ttl_ticks: CHASE_BONUS_TTL_TICKS,
        }
    }
}

/// Duel (paddle vs scripted opponent) tuning. Distances in pixels, speeds in
/// pixels per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    pub tick_ms: u64,
    pub field_width: f32,
    pub field_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between each paddle and its side wall
    pub paddle_inset: f32,
    /// Player paddle movement per direction key
    pub key_step: f32,
    pub ball_radius: f32,
    pub serve_speed: f32,
    /// Multiplier applied on every paddle contact
    pub speed_up: f32,
    pub max_speed: f32,
    pub opponent_speed: f32,
    /// Max random vertical kick off the player paddle
    pub spin: f32,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            tick_ms: DUEL_TICK_MS,
            field_width: DUEL_FIELD_WIDTH,
            field_height: DUEL_FIELD_HEIGHT,
            paddle_width: DUEL_PADDLE_WIDTH,
            paddle_height: DUEL_PADDLE_HEIGHT,
            paddle_inset: DUEL_PADDLE_INSET,
            key_step: DUEL_KEY_STEP,
            ball_radius: DUEL_BALL_RADIUS,
            serve_speed: DUEL_SERVE_SPEED,
            speed_up: DUEL_SPEED_UP,
            max_speed: DUEL_MAX_SPEED,
            opponent_speed: DUEL_OPPONENT_SPEED,
            spin: DUEL_SPIN,
        }
    }
}

impl DuelConfig {
    /// Highest top edge a paddle may reach
    pub fn paddle_travel(&self) -> f32 {
        (self.field_height - self.paddle_height).max(0.0)
    }
}

/// Matching (memory pairs) tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Each symbol appears on exactly two cards
    pub symbols: Vec<String>,
    /// How long a mismatched pair stays face up
    pub mismatch_delay_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            symbols: MATCH_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            mismatch_delay_ms: MATCH_MISMATCH_DELAY_MS,
        }
    }
}

/// Timing (reaction test) tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: TIMING_MIN_DELAY_MS,
            max_delay_ms: TIMING_MAX_DELAY_MS,
        }
    }
}

/// Typing speed test tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub words: Vec<String>,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            words: TYPING_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Scripted intrusion sequence tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HackerConfig {
    /// Lines printed in order, one per delay
    pub messages: Vec<String>,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Probability (0-1) that a hex data line follows a message
    pub data_chance: f64,
    /// Bytes per hex data line
    pub data_bytes: usize,
}

impl Default for HackerConfig {
    fn default() -> Self {
        Self {
            messages: HACKER_MESSAGES.iter().map(|s| s.to_string()).collect(),
            min_delay_ms: HACKER_MIN_DELAY_MS,
            max_delay_ms: HACKER_MAX_DELAY_MS,
            data_chance: HACKER_DATA_CHANCE,
            data_bytes: HACKER_DATA_BYTES,
        }
    }
}

/// Configuration shared by every game a host mounts
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Fixed RNG seed for reproducible runs. `None` draws a fresh seed per mount.
    pub seed: Option<u64>,
    pub chase: ChaseConfig,
    pub duel: DuelConfig,
    pub matching: MatchConfig,
    pub timing: TimingConfig,
    pub typing: TypingConfig,
    pub hacker: HackerConfig,
}

impl RuntimeConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse `json` if given, falling back to defaults on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("Using default runtime config");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded runtime config");
                config
            }
            Err(e) => {
                log::warn!("Ignoring runtime config: {e}");
                Self::default()
            }
        }
    }

    /// Reject values that would make a game unplayable
    pub fn validate(&self) -> Result<()> {
        let chase = &self.chase;
        if chase.grid_width <= 0 || chase.grid_height <= 0 {
            return Err(invalid("chase grid must be at least 1x1"));
        }
        if chase.tick_ms == 0 || chase.min_tick_ms == 0 {
            return Err(invalid("chase tick intervals must be positive"));
        }
        if chase.min_tick_ms > chase.tick_ms {
            return Err(invalid("chase min_tick_ms exceeds tick_ms"));
        }
        if !(0.0..=1.0).contains(&chase.bonus_chance) {
            return Err(invalid("chase bonus_chance must be within 0..=1"));
        }

        let duel = &self.duel;
        if duel.tick_ms == 0 {
            return Err(invalid("duel tick_ms must be positive"));
        }
        if duel.paddle_height >= duel.field_height || duel.field_width <= 0.0 {
            return Err(invalid("duel paddles must fit inside the field"));
        }
        if duel.ball_radius <= 0.0 || duel.serve_speed <= 0.0 {
            return Err(invalid("duel ball radius and serve speed must be positive"));
        }
        if duel.max_speed < duel.serve_speed {
            return Err(invalid("duel max_speed is below serve_speed"));
        }
        if duel.opponent_speed >= duel.serve_speed {
            return Err(invalid("duel opponent must be slower than the ball"));
        }

        if self.matching.symbols.is_empty() {
            return Err(invalid("matching needs at least one symbol"));
        }
        if self.timing.min_delay_ms > self.timing.max_delay_ms {
            return Err(invalid("timing min_delay_ms exceeds max_delay_ms"));
        }
        if self.typing.words.iter().all(|w| w.is_empty()) {
            return Err(invalid("typing needs at least one non-empty word"));
        }

        let hacker = &self.hacker;
        if hacker.messages.is_empty() {
            return Err(invalid("hacker needs at least one message"));
        }
        if hacker.min_delay_ms > hacker.max_delay_ms {
            return Err(invalid("hacker min_delay_ms exceeds max_delay_ms"));
        }
        if !(0.0..=1.0).contains(&hacker.data_chance) {
            return Err(invalid("hacker data_chance must be within 0..=1"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> RuntimeError {
    RuntimeError::InvalidConfig(msg.to_string())
}
