//! Event fan-out and an in-memory event sink.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::PoolEvent;
use crate::traits::EventSink;

/// The set of sinks an exchange publishes to.
#[derive(Default, Clone)]
pub(crate) struct Subscribers {
    sinks: Arc<RwLock<Vec<Arc<dyn EventSink>>>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&self, sink: Arc<dyn EventSink>) {
        self.sinks.write().push(sink);
    }

    pub(crate) fn publish(&self, event: &PoolEvent) {
        tracing::trace!(event = event.name(), "publishing pool event");
        for sink in self.sinks.read().iter() {
            sink.publish(event);
        }
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.sinks.read().len()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("sinks", &self.len())
            .finish()
    }
}

/// An [`EventSink`] that records every event in publication order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pair_amm::events::EventLog;
///
/// let log = Arc::new(EventLog::new());
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventLog {
    events: RwLock<Vec<PoolEvent>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event.
    #[must_use]
    pub fn events(&self) -> Vec<PoolEvent> {
        self.events.read().clone()
    }

    /// Returns the most recent event.
    #[must_use]
    pub fn last(&self) -> Option<PoolEvent> {
        self.events.read().last().cloned()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Removes and returns every recorded event.
    pub fn drain(&self) -> Vec<PoolEvent> {
        std::mem::take(&mut *self.events.write())
    }
}

impl EventSink for EventLog {
    fn publish(&self, event: &PoolEvent) {
        self.events.write().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeeRate, PoolEvent};

    fn fee_event() -> PoolEvent {
        PoolEvent::FeeUpdated {
            previous: FeeRate::DEFAULT,
            current: FeeRate::MAX,
        }
    }

    #[test]
    fn every_subscriber_receives_events() {
        let subscribers = Subscribers::default();
        let first = Arc::new(EventLog::new());
        let second = Arc::new(EventLog::new());
        subscribers.subscribe(first.clone());
        subscribers.subscribe(second.clone());

        subscribers.publish(&fee_event());

        assert_eq!(subscribers.len(), 2);
        assert_eq!(first.events(), vec![fee_event()]);
        assert_eq!(second.last(), Some(fee_event()));
    }

    #[test]
    fn drain_empties_the_log() {
        let log = EventLog::new();
        log.publish(&fee_event());
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
    }
}
