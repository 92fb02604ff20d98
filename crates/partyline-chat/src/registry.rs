// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime registry of live WebSocket connections and their subscriptions.
//!
//! The registry is process-local and holds no persisted state: it maps
//! connection ids to outbound event senders and channel names to subscriber
//! sets. Publishing clones the event to every subscriber's queue via
//! `try_send`, so a slow or dead consumer never blocks the publisher.

use std::collections::HashSet;

use dashmap::DashMap;
use partyline_core::events::{ChannelName, ChatEvent};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// State held for one live connection.
struct Registration {
    sender: mpsc::Sender<ChatEvent>,
    channels: HashSet<ChannelName>,
}

/// Tracks which connection listens on which channel.
///
/// All methods are `&self` and safe to call from any task. The two maps are
/// never locked at the same time, so no access ordering can deadlock.
pub struct ConnectionRegistry {
    connections: DashMap<String, Registration>,
    channels: DashMap<ChannelName, HashSet<String>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            channels: DashMap::new(),
        }
    }

    /// Registers a connection and the sender for its outbound event queue.
    ///
    /// A re-used id replaces the previous connection; its old subscriptions
    /// are dropped.
    pub fn register(&self, conn_id: &str, sender: mpsc::Sender<ChatEvent>) {
        self.deregister(conn_id);
        self.connections.insert(
            conn_id.to_string(),
            Registration {
                sender,
                channels: HashSet::new(),
            },
        );
        debug!(conn_id, "connection registered");
    }

    /// Removes a connection and every subscription it held.
    ///
    /// Idempotent; the gateway calls this from the socket task's exit path,
    /// which runs on graceful close, protocol error, and transport failure
    /// alike.
    pub fn deregister(&self, conn_id: &str) {
        let Some((_, registration)) = self.connections.remove(conn_id) else {
            return;
        };
        for channel in &registration.channels {
            if let Some(mut subscribers) = self.channels.get_mut(channel) {
                subscribers.remove(conn_id);
            }
            self.channels
                .remove_if(channel, |_, subscribers| subscribers.is_empty());
        }
        debug!(
            conn_id,
            channels = registration.channels.len(),
            "connection deregistered"
        );
    }

    /// Subscribes a connection to a channel. Subscribing twice is a no-op.
    pub fn subscribe(&self, channel: ChannelName, conn_id: &str) {
        let Some(mut registration) = self.connections.get_mut(conn_id) else {
            warn!(conn_id, channel = %channel, "subscribe for unknown connection ignored");
            return;
        };
        let newly_added = registration.channels.insert(channel.clone());
        drop(registration);

        if newly_added {
            self.channels
                .entry(channel)
                .or_default()
                .insert(conn_id.to_string());
            debug!(conn_id, "subscribed");
        }
    }

    /// Unsubscribes a connection from a channel. Unknown pairs are a no-op.
    pub fn unsubscribe(&self, channel: &ChannelName, conn_id: &str) {
        let Some(mut registration) = self.connections.get_mut(conn_id) else {
            return;
        };
        let was_subscribed = registration.channels.remove(channel);
        drop(registration);

        if was_subscribed {
            if let Some(mut subscribers) = self.channels.get_mut(channel) {
                subscribers.remove(conn_id);
            }
            self.channels
                .remove_if(channel, |_, subscribers| subscribers.is_empty());
            debug!(conn_id, "unsubscribed");
        }
    }

    /// Sends the event to every subscriber of `channel` and returns how many
    /// queues accepted it.
    ///
    /// Delivery is at-most-once: a full or closed outbound queue drops the
    /// event for that connection only. No subscribers is not an error.
    pub fn publish(&self, channel: &ChannelName, event: &ChatEvent) -> usize {
        let subscribers: Vec<String> = match self.channels.get(channel) {
            Some(entry) => entry.iter().cloned().collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for conn_id in &subscribers {
            let Some(registration) = self.connections.get(conn_id) else {
                continue;
            };
            match registration.sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(conn_id, channel = %channel, "outbound queue full, event dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(conn_id, channel = %channel, "receiver gone, event dropped");
                }
            }
        }
        delivered
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of connections subscribed to `channel`.
    pub fn subscriber_count(&self, channel: &ChannelName) -> usize {
        self.channels.get(channel).map(|s| s.len()).unwrap_or(0)
    }

    /// Whether `conn_id` currently holds a subscription to `channel`.
    pub fn is_subscribed(&self, channel: &ChannelName, conn_id: &str) -> bool {
        self.connections
            .get(conn_id)
            .is_some_and(|r| r.channels.contains(channel))
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
