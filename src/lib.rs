//! Arcade Panel - runtime for small games embedded in a host page
//!
//! Core modules:
//! - `sim`: Game state machines and collision checks (no clocks, no host types)
//! - `runtime`: Scheduler, input channel, snapshot bridge and session lifecycle
//! - `config`: Data-driven game tuning with documented defaults
//! - `highscores`: Per-handle best results (in memory only)

pub mod config;
pub mod error;
pub mod highscores;
pub mod runtime;
pub mod sim;

pub use config::RuntimeConfig;
pub use error::RuntimeError;
pub use highscores::HighScores;
pub use runtime::{
    Bounds, Container, LifecycleStats, RawEvent, SessionHandle, Snapshot, SubscriberId,
    mount_game,
};
pub use sim::{Direction, GameKind, Intent, View};

/// Default tuning values. Every field of [`RuntimeConfig`] falls back to these.
pub mod consts {
    /// Maximum times a repeating timer fires per `advance` before its backlog
    /// is dropped (prevents spiral of death after a stalled host)
    pub const MAX_CATCH_UP_TICKS: u32 = 8;

    /// Chase grid (280x200 canvas at 10px cells)
    pub const CHASE_GRID_WIDTH: i32 = 28;
    pub const CHASE_GRID_HEIGHT: i32 = 20;
    pub const CHASE_TICK_MS: u64 = 100;
    /// Speed-up on every food, down to the floor
    pub const CHASE_SPEEDUP_MS: u64 = 2;
    pub const CHASE_MIN_TICK_MS: u64 = 50;
    pub const CHASE_FOOD_SCORE: u64 = 10;
    pub const CHASE_BONUS_SCORE: u64 = 50;
    /// Chance that eating food spawns a bonus item
    pub const CHASE_BONUS_CHANCE: f64 = 0.1;
    pub const CHASE_BONUS_TTL_TICKS: u32 = 60;

    /// Duel field and paddles (pixels)
    pub const DUEL_TICK_MS: u64 = 16;
    pub const DUEL_FIELD_WIDTH: f32 = 400.0;
    pub const DUEL_FIELD_HEIGHT: f32 = 300.0;
    pub const DUEL_PADDLE_WIDTH: f32 = 10.0;
    pub const DUEL_PADDLE_HEIGHT: f32 = 60.0;
    pub const DUEL_PADDLE_INSET: f32 = 10.0;
    /// Player paddle movement per direction key press
    pub const DUEL_KEY_STEP: f32 = 12.0;

    /// Duel ball (pixels, pixels per tick)
    pub const DUEL_BALL_RADIUS: f32 = 6.0;
    pub const DUEL_SERVE_SPEED: f32 = 4.0;
    /// Speed boost on paddle contact (multiplicative)
    pub const DUEL_SPEED_UP: f32 = 1.05;
    pub const DUEL_MAX_SPEED: f32 = 9.0;
    /// Scripted opponent tracking speed. Kept below the serve speed so
    /// rallies stay winnable.
    pub const DUEL_OPPONENT_SPEED: f32 = 3.2;
    /// Max vertical perturbation added off the player paddle
    pub const DUEL_SPIN: f32 = 1.5;

    /// Matching
    pub const MATCH_MISMATCH_DELAY_MS: u64 = 1000;
    pub const MATCH_SYMBOLS: [&str; 8] = ["{ }", "[ ]", "( )", "< >", "&&", "||", "=>", "::"];

    /// Timing: random delay range before the go signal
    pub const TIMING_MIN_DELAY_MS: u64 = 1500;
    pub const TIMING_MAX_DELAY_MS: u64 = 4000;

    /// Typing word pool
    pub const TYPING_WORDS: [&str; 10] = [
        "function",
        "variable",
        "const",
        "return",
        "async",
        "await",
        "import",
        "export",
        "class",
        "interface",
    ];

    /// Hacker: random pause before each scripted line
    pub const HACKER_MIN_DELAY_MS: u64 = 300;
    pub const HACKER_MAX_DELAY_MS: u64 = 800;
    /// Chance that a message is followed by a hex dump line
    pub const HACKER_DATA_CHANCE: f64 = 0.5;
    pub const HACKER_DATA_BYTES: usize = 20;
    pub const HACKER_MESSAGES: [&str; 12] = [
        "Initializing backdoor protocol...",
        "Bypassing firewall...",
        "Accessing mainframe...",
        "Decrypting password hash...",
        "Password found: ********",
        "Establishing SSH tunnel...",
        "Uploading payload...",
        "Executing remote shell...",
        "Extracting database...",
        "Covering tracks...",
        "ACCESS GRANTED",
        "System compromised successfully!",
    ];
}
