//! Observer seam for pool notifications.

use crate::domain::PoolEvent;

/// Receives [`PoolEvent`]s after the operation that produced them commits.
///
/// Delivery is synchronous and in commit order. A sink must not call back
/// into the exchange that is publishing to it.
pub trait EventSink: Send + Sync {
    /// Handles one event.
    fn publish(&self, event: &PoolEvent);
}
