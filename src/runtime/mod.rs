//! Host-facing runtime
//!
//! Owns everything with a lifetime: timers, input subscriptions and snapshot
//! subscribers. The host drives it with events and elapsed time.

pub mod bridge;
pub mod input;
pub mod scheduler;
pub mod session;

pub use bridge::{Snapshot, SnapshotBridge, SubscriberId};
pub use input::{Bounds, InputChannel, PointerTravel, RawEvent, Subscription};
pub use scheduler::{Fired, Scheduler, TimerHandle, TimerTag};
pub use session::{Container, LifecycleStats, SessionHandle, mount_game};
