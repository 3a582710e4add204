//! Side effects requested by the state machines
//!
//! Games never touch timers or the host directly. They return effects and the
//! session applies them, so every timer handle stays owned by the session.

/// Names one delayed transition. The game keeps the token it is waiting for
/// and ignores any other that fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DelayToken(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the repeating tick with one at a new interval
    Retime { interval_ms: u64 },
    /// Deliver `token` back to the game after `delay_ms`
    Schedule { token: DelayToken, delay_ms: u64 },
    /// Drop a delayed transition that has not fired yet
    Cancel(DelayToken),
    /// Record a finished result on the handle's board
    Record(u64),
    /// Terminal state reached
    Stop,
}

pub type Effects = Vec<Effect>;

/// Hands out unique delay tokens for one game instance
#[derive(Debug, Clone, Default)]
pub struct TokenSource {
    next: u32,
}

impl TokenSource {
    pub fn issue(&mut self) -> DelayToken {
        let token = DelayToken(self.next);
        self.next = self.next.wrapping_add(1);
        token
    }
}
