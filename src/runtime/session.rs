//! Session lifecycle
//!
//! A [`SessionHandle`] is what the host holds for one mounted game. Each
//! `start` builds a fresh session (game, scheduler, input channel) and every
//! teardown path goes through one routine that cancels timers, drops input
//! subscriptions and clears the live flag together.

use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::bridge::{Snapshot, SnapshotBridge, SubscriberId};
use super::input::{Bounds, InputChannel, PointerTravel, RawEvent};
use super::scheduler::{Scheduler, TimerHandle, TimerTag};
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::highscores::HighScores;
use crate::sim::{DelayToken, Effect, Effects, Game, GameKind};

/// Where the host mounts a game
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Container {
    pub bounds: Bounds,
}

impl Container {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }
}

/// Teardown bookkeeping, for hosts and tests that need to see that cleanup
/// ran exactly once per started session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LifecycleStats {
    pub starts: u64,
    pub teardowns: u64,
    pub timers_released: u64,
    pub subscriptions_released: u64,
}

#[derive(Debug)]
struct Session {
    id: u64,
    game: Game,
    scheduler: Scheduler,
    input: InputChannel,
    tick: Option<TimerHandle>,
    delays: HashMap<DelayToken, TimerHandle>,
    live: bool,
}

impl Session {
    /// Timer bookkeeping for one effect; results and stops are handled by
    /// the handle
    fn apply_timer_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Retime { interval_ms } => {
                if let Some(old) = self.tick.take() {
                    self.scheduler.cancel(old);
                }
                self.tick = Some(self.scheduler.start(interval_ms, TimerTag::Tick));
                log::debug!("Session {} tick interval now {interval_ms}ms", self.id);
            }
            Effect::Schedule { token, delay_ms } => {
                let handle = self.scheduler.schedule_once(delay_ms, TimerTag::Delay(token));
                if let Some(old) = self.delays.insert(token, handle) {
                    self.scheduler.cancel(old);
                }
            }
            Effect::Cancel(token) => {
                if let Some(handle) = self.delays.remove(&token) {
                    self.scheduler.cancel(handle);
                }
            }
            Effect::Record(_) | Effect::Stop => {}
        }
    }
}

/// Host-facing handle for one mounted game
pub struct SessionHandle {
    kind: GameKind,
    container: Container,
    config: RuntimeConfig,
    seeder: Pcg32,
    session: Option<Session>,
    bridge: SnapshotBridge,
    board: HighScores,
    stats: LifecycleStats,
    /// Id for the next started session, unique within this handle
    next_session: u64,
    disposed: bool,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("kind", &self.kind)
            .field("session", &self.session.as_ref().map(|s| s.id))
            .field("running", &self.is_running())
            .field("disposed", &self.disposed)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Mount a game in `container`. Nothing runs until [`SessionHandle::start`].
/// An invalid config is replaced by the defaults (keeping its seed).
pub fn mount_game(kind: GameKind, container: Container, config: &RuntimeConfig) -> SessionHandle {
    let config = match config.validate() {
        Ok(()) => config.clone(),
        Err(e) => {
            log::warn!("Mounting {kind} with default config: {e}");
            RuntimeConfig {
                seed: config.seed,
                ..RuntimeConfig::default()
            }
        }
    };
    let seeder = Pcg32::seed_from_u64(config.seed.unwrap_or_else(rand::random));
    log::info!("Mounted {kind} game");

    SessionHandle {
        kind,
        container,
        config,
        seeder,
        session: None,
        bridge: SnapshotBridge::default(),
        board: HighScores::new(kind.ranking()),
        stats: LifecycleStats::default(),
        next_session: 1,
        disposed: false,
    }
}

impl SessionHandle {
    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// Begin a new session. A running session is torn down first, so
    /// restarting never leaves two schedulers alive.
    pub fn start(&mut self) -> Result<()> {
        if self.disposed {
            return Err(RuntimeError::Disposed { kind: self.kind });
        }
        self.teardown();

        let id = self.next_session;
        self.next_session += 1;
        let previous = self.session.take().map(|s| s.game);
        let game = Game::new(self.kind, &self.config, self.seeder.next_u64())
            .carry_over(previous.as_ref(), self.board.best());

        let mut input = InputChannel::new(self.container.bounds);
        if self.kind == GameKind::Duel {
            input = input.with_pointer_travel(PointerTravel {
                field_height: self.config.duel.field_height,
                paddle_height: self.config.duel.paddle_height,
            });
        }
        for kind in self.kind.intents() {
            input.subscribe(*kind);
        }

        let mut scheduler = Scheduler::new();
        let tick = game
            .tick_interval()
            .map(|interval| scheduler.start(interval, TimerTag::Tick));

        self.session = Some(Session {
            id,
            game,
            scheduler,
            input,
            tick,
            delays: HashMap::new(),
            live: true,
        });
        self.stats.starts += 1;
        log::info!("Started {} session {id}", self.kind);

        let effects = match self.session.as_mut() {
            Some(session) => {
                let now = session.scheduler.now();
                session.game.start(now)
            }
            None => Vec::new(),
        };
        self.apply(effects);
        if self.session.as_ref().is_some_and(|s| s.game.frame().terminal) {
            self.teardown();
        }
        self.publish();
        Ok(())
    }

    /// Stop the running session. Safe to call any number of times.
    pub fn stop(&mut self) {
        if self.teardown() {
            self.publish();
        }
    }

    /// Stop, then drop the session and every snapshot subscriber. The last
    /// snapshot stays readable through [`SessionHandle::latest`]. Later
    /// starts fail.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stop();
        self.session = None;
        let released = self.bridge.clear();
        self.disposed = true;
        log::info!("Disposed {} handle ({released} subscribers released)", self.kind);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn on_snapshot(&mut self, callback: impl FnMut(&Snapshot) + 'static) -> SubscriberId {
        self.bridge.subscribe(Box::new(callback))
    }

    pub fn off_snapshot(&mut self, id: SubscriberId) -> bool {
        self.bridge.unsubscribe(id)
    }

    /// Feed one host event. Continuous games see it on their next tick;
    /// event-driven games react immediately.
    pub fn dispatch(&mut self, event: RawEvent) {
        let Some(session) = self.session.as_mut().filter(|s| s.live) else {
            return;
        };
        let Some(intent) = session.input.accept(&event) else {
            return;
        };
        if self.kind.is_continuous() {
            session.input.buffer(intent);
            return;
        }
        let now = session.scheduler.now();
        let effects = session.game.apply(&intent, now);
        self.apply(effects);
        self.publish();
    }

    /// Move the session clock forward and run every timer that came due,
    /// publishing after each one
    pub fn advance(&mut self, elapsed_ms: u64) {
        let Some(session) = self.session.as_mut().filter(|s| s.live) else {
            return;
        };
        session.scheduler.advance(elapsed_ms);

        loop {
            let Some(session) = self.session.as_mut().filter(|s| s.live) else {
                break;
            };
            let Some(fired) = session.scheduler.poll() else {
                break;
            };
            let effects = match fired.tag {
                TimerTag::Tick => {
                    let intents = session.input.drain();
                    session.game.tick(&intents)
                }
                TimerTag::Delay(token) => {
                    session.delays.remove(&token);
                    session.game.fire(token, fired.at_ms)
                }
            };
            self.apply(effects);
            self.publish();
        }
    }

    fn apply(&mut self, effects: Effects) {
        let mut stop = false;
        for effect in effects {
            match effect {
                Effect::Record(value) => self.record(value),
                Effect::Stop => stop = true,
                other => {
                    if let Some(session) = self.session.as_mut() {
                        session.apply_timer_effect(other);
                    }
                }
            }
        }
        if stop {
            self.teardown();
        }
    }

    fn record(&mut self, value: u64) {
        let session = self.session.as_ref().map_or(0, |s| s.id);
        if let Some(rank) = self.board.add_score(value, session) {
            log::info!("{} result {value} ranked #{rank}", self.kind);
        }
    }

    /// Cancel timers, unsubscribe input and clear the live flag. Returns
    /// false when there was no live session.
    fn teardown(&mut self) -> bool {
        let Some(session) = self.session.as_mut().filter(|s| s.live) else {
            return false;
        };
        session.live = false;
        let timers = session.scheduler.cancel_all();
        let released = session.scheduler.released();
        let subscriptions = session.input.unsubscribe_all();
        session.tick = None;
        session.delays.clear();
        let id = session.id;
        let closing = session.game.closing_result();

        self.stats.teardowns += 1;
        self.stats.timers_released += released;
        self.stats.subscriptions_released += subscriptions as u64;
        if let Some(value) = closing {
            self.record(value);
        }
        log::info!(
            "Stopped {} session {id} ({timers} timers, {subscriptions} subscriptions released)",
            self.kind
        );
        true
    }

    fn publish(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let frame = session.game.frame();
        let snapshot = Snapshot {
            session: session.id,
            kind: self.kind,
            seq: 0,
            score: frame.score,
            status: frame.status,
            running: session.live,
            terminal: frame.terminal,
            best: self.board.best(),
            view: frame.view,
        };
        self.bridge.publish(snapshot);
    }

    /// Teardown counters. `timers_released` also counts timers the live
    /// session cancelled on its own (retimes, cancelled delays).
    pub fn lifecycle(&self) -> LifecycleStats {
        let mut stats = self.stats;
        if let Some(session) = self.session.as_ref().filter(|s| s.live) {
            stats.timers_released += session.scheduler.released();
        }
        stats
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.bridge.latest()
    }

    pub fn best(&self) -> Option<u64> {
        self.board.best()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.board
    }

    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.live)
    }

    /// Current repeating tick interval of a running continuous game
    pub fn tick_interval(&self) -> Option<u64> {
        self.session
            .as_ref()
            .filter(|s| s.live)
            .and_then(|s| s.game.tick_interval())
    }

    /// Session clock in milliseconds
    pub fn now(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.scheduler.now())
    }

    pub fn pending_timers(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.scheduler.pending())
    }

    pub fn input_subscriptions(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.input.subscriptions())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
