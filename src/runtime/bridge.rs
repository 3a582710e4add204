//! Snapshot fan-out to the presentation layer
//!
//! The session is the only writer. Every publish stamps the next sequence
//! number and hands the same immutable snapshot to each subscriber in
//! subscription order.

use serde::Serialize;

use crate::error::Result;
use crate::sim::{GameKind, View};

/// Read-only state of one session at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub session: u64,
    pub kind: GameKind,
    /// Increases by one per publish on the handle
    pub seq: u64,
    pub score: u64,
    pub status: String,
    pub running: bool,
    /// Game reached an end state on its own
    pub terminal: bool,
    /// Best recorded result on this handle
    pub best: Option<u64>,
    pub view: View,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u32);

pub type SnapshotCallback = Box<dyn FnMut(&Snapshot)>;

#[derive(Default)]
pub struct SnapshotBridge {
    subscribers: Vec<(SubscriberId, SnapshotCallback)>,
    next_id: u32,
    seq: u64,
    latest: Option<Snapshot>,
}

impl std::fmt::Debug for SnapshotBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotBridge")
            .field("subscribers", &self.subscribers.len())
            .field("seq", &self.seq)
            .finish()
    }
}

impl SnapshotBridge {
    pub fn subscribe(&mut self, callback: SnapshotCallback) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, callback));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(s, _)| *s != id);
        self.subscribers.len() != before
    }

    pub fn subscribers(&self) -> usize {
        self.subscribers.len()
    }

    /// Stamp the next sequence number and deliver synchronously
    pub fn publish(&mut self, mut snapshot: Snapshot) {
        self.seq += 1;
        snapshot.seq = self.seq;
        for (_, callback) in &mut self.subscribers {
            callback(&snapshot);
        }
        self.latest = Some(snapshot);
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    /// Drop every subscriber, returning how many there were
    pub fn clear(&mut self) -> usize {
        let count = self.subscribers.len();
        self.subscribers.clear();
        count
    }
}
