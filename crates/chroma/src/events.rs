//! # Event Bus
//!
//! Synchronous pub-sub for game-flow events. Subscribing returns an
//! explicit [`SubscriptionId`] that the listener uses to unsubscribe, so
//! listener lifetime is visible at the call site instead of being tied to
//! entity destruction order. Delivery is deterministic: subscribers are
//! invoked in subscription order.

/// Game-flow events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh run started.
    GameStarted,
    /// The star count changed (fired with the new total, including the
    /// reset to zero at game start).
    StarCountChanged(u32),
    /// The player hit a mismatched obstacle part or fell behind. Fired at
    /// most once per run.
    PlayerDied,
    /// The run ended. Fired at most once per run.
    GameOver,
}

/// Handle returned by [`EventBus::subscribe`]; used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Single-threaded synchronous event bus with deterministic delivery.
#[derive(Default)]
pub struct EventBus {
    /// Subscribers in subscription order.
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(&GameEvent)>)>,
    /// Next handle value.
    next_id: u64,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener; events are delivered in subscription order.
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if the handle was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Delivers `event` to every live subscriber, in subscription order.
    pub fn publish(&mut self, event: &GameEvent) {
        for (_, listener) in &mut self.subscribers {
            listener(event);
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
