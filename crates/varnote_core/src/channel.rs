//! Typed message channels across the capability boundary.
//!
//! # Responsibility
//! - Replace a process-global message handler with explicit subscriptions.
//! - Deliver an owned copy of every published message to each subscriber.
//!
//! # Invariants
//! - Subscription ids are unique for the channel lifetime.
//! - Dropped receivers are pruned on the next publish.
//! - Publishing never blocks.

use crate::protocol::{HostMessage, UiCommand};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Identifier of one channel subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// Receiving end handed to one subscriber.
#[derive(Debug)]
pub struct Subscription<T> {
    id: SubscriptionId,
    receiver: UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next message; `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.next().await
    }

    /// Returns an already-delivered message without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_next().ok().flatten()
    }

    /// Drains every already-delivered message.
    pub fn drain(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Multi-subscriber channel for one message direction.
#[derive(Debug)]
pub struct MessageChannel<T> {
    subscribers: Mutex<Vec<(SubscriptionId, UnboundedSender<T>)>>,
    next_id: AtomicU64,
}

impl<T> Default for MessageChannel<T> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<T: Clone> MessageChannel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> Subscription<T> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = unbounded();
        self.lock().push((id, sender));
        Subscription { id, receiver }
    }

    /// Removes a subscriber. Returns whether it was registered.
    ///
    /// Messages already delivered stay readable from the subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|(entry_id, _)| *entry_id != id);
        subscribers.len() != before
    }

    /// Delivers a copy of `message` to every live subscriber.
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, message: T) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|(id, sender)| {
            let delivered = sender.unbounded_send(message.clone()).is_ok();
            if !delivered {
                debug!("event=subscriber_pruned module=channel subscription={}", id.0);
            }
            delivered
        });
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(SubscriptionId, UnboundedSender<T>)>> {
        // Sender list stays consistent even if a holder panicked.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Pair of channels connecting one presentation surface to one controller.
#[derive(Debug, Default)]
pub struct PluginBridge {
    /// Presentation -> controller.
    pub commands: MessageChannel<UiCommand>,
    /// Controller -> presentation.
    pub messages: MessageChannel<HostMessage>,
}

impl PluginBridge {
    pub fn new() -> Self {
        Self::default()
    }
}
