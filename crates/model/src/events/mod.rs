pub mod migration;

use std::fmt::Debug;

/// A trait for events emitted while a migration runs.
pub trait Event: Send + Sync + Debug + 'static {
    /// Returns a unique identifier for this event type.
    fn event_type(&self) -> &'static str;
}
