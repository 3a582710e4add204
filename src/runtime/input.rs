//! Host events to game intents
//!
//! The channel maps raw key, pointer, click and text events to [`Intent`]s,
//! drops anything the game did not subscribe to, and buffers intents for
//! continuous games until their next tick. Clearing the live flag makes the
//! channel deaf, so events racing a teardown cannot reach a stopped game.

use serde::{Deserialize, Serialize};

use crate::sim::{Direction, Intent, IntentKind};

/// Buffered intents kept between ticks; the oldest are dropped beyond this
pub const MAX_BUFFERED_INTENTS: usize = 32;

/// Event as delivered by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawEvent {
    /// Key name as the browser reports it (`"ArrowUp"`, `"w"`, ...)
    KeyDown(String),
    /// Pointer position in page coordinates
    PointerMove { x: f32, y: f32 },
    Click,
    CardClick(usize),
    TextInput(String),
}

/// Container rectangle in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(
            0.0,
            0.0,
            crate::consts::DUEL_FIELD_WIDTH,
            crate::consts::DUEL_FIELD_HEIGHT,
        )
    }
}

/// Field geometry used to map pointer height to a paddle position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTravel {
    pub field_height: f32,
    pub paddle_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u32);

#[derive(Debug)]
pub struct InputChannel {
    bounds: Bounds,
    travel: Option<PointerTravel>,
    subscriptions: Vec<(Subscription, IntentKind)>,
    next_subscription: u32,
    live: bool,
    buffer: Vec<Intent>,
}

impl InputChannel {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            travel: None,
            subscriptions: Vec::new(),
            next_subscription: 0,
            live: false,
            buffer: Vec::new(),
        }
    }

    /// Enable pointer mapping for a paddle field
    pub fn with_pointer_travel(mut self, travel: PointerTravel) -> Self {
        self.travel = Some(travel);
        self
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Listen for one intent kind. The first subscription makes the channel live.
    pub fn subscribe(&mut self, kind: IntentKind) -> Subscription {
        let sub = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push((sub, kind));
        self.live = true;
        sub
    }

    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|(s, _)| *s != sub);
        self.subscriptions.len() != before
    }

    /// Drop every subscription, clear the live flag and any buffered intents.
    /// Returns how many subscriptions were released.
    pub fn unsubscribe_all(&mut self) -> usize {
        let released = self.subscriptions.len();
        self.subscriptions.clear();
        self.buffer.clear();
        self.live = false;
        released
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Map a raw event to an intent, ignoring subscriptions
    pub fn normalize(&self, event: &RawEvent) -> Option<Intent> {
        match event {
            RawEvent::KeyDown(key) => key_direction(key).map(Intent::Direction),
            RawEvent::PointerMove { y, .. } => {
                let travel = self.travel?;
                if self.bounds.height <= 0.0 {
                    return None;
                }
                let field_y = (y - self.bounds.top) / self.bounds.height * travel.field_height
                    - travel.paddle_height / 2.0;
                let max = (travel.field_height - travel.paddle_height).max(0.0);
                Some(Intent::Pointer(field_y.clamp(0.0, max)))
            }
            RawEvent::Click => Some(Intent::Click),
            RawEvent::CardClick(id) => Some(Intent::Flip(*id)),
            RawEvent::TextInput(text) => Some(Intent::Text(text.clone())),
        }
    }

    /// Normalize and filter an event. `None` when the channel is not live,
    /// the event maps to nothing, or nobody listens for that intent kind.
    pub fn accept(&self, event: &RawEvent) -> Option<Intent> {
        if !self.live {
            return None;
        }
        let intent = self.normalize(event)?;
        let kind = intent.kind();
        self.subscriptions
            .iter()
            .any(|(_, k)| *k == kind)
            .then_some(intent)
    }

    /// Hold an intent for the next tick. Pointer moves coalesce so only the
    /// latest survives; everything else keeps arrival order.
    pub fn buffer(&mut self, intent: Intent) {
        if !self.live {
            return;
        }
        if matches!(intent, Intent::Pointer(_)) {
            self.buffer.retain(|i| !matches!(i, Intent::Pointer(_)));
        }
        if self.buffer.len() >= MAX_BUFFERED_INTENTS {
            self.buffer.remove(0);
            log::trace!("Input buffer full, dropped oldest intent");
        }
        self.buffer.push(intent);
    }

    pub fn drain(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.buffer)
    }
}

fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}
