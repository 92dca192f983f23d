//! Event bus for dashboard loads using tokio::broadcast
//!
//! The TUI subscribes to redraw and to drop its spinner when a load settles.

use tokio::sync::broadcast;

/// Events emitted by the data layer
#[derive(Debug, Clone, PartialEq)]
pub enum DataEvent {
    /// A fetch was issued with this generation
    LoadStarted { generation: u64 },
    /// The latest fetch was applied
    LoadCompleted { generation: u64, materials: usize },
    /// The latest fetch failed
    LoadFailed { generation: u64, message: String },
    /// A response arrived after a newer request had been issued
    StaleResponseDiscarded { generation: u64, latest: u64 },
}

impl DataEvent {
    pub fn generation(&self) -> u64 {
        match self {
            DataEvent::LoadStarted { generation }
            | DataEvent::LoadCompleted { generation, .. }
            | DataEvent::LoadFailed { generation, .. }
            | DataEvent::StaleResponseDiscarded { generation, .. } => *generation,
        }
    }

    /// Whether this event ends the loading spinner
    pub fn settles_load(&self) -> bool {
        matches!(
            self,
            DataEvent::LoadCompleted { .. } | DataEvent::LoadFailed { .. }
        )
    }
}

/// Multi-consumer broadcast of [`DataEvent`]s
pub struct EventBus {
    sender: broadcast::Sender<DataEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 64 events; loads are infrequent
    pub fn default_capacity() -> Self {
        Self::new(64)
    }

    pub fn publish(&self, event: DataEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DataEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe_in_order() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.publish(DataEvent::LoadStarted { generation: 1 });
        bus.publish(DataEvent::LoadCompleted {
            generation: 1,
            materials: 30,
        });

        let first = rx.recv().await.unwrap();
        assert_eq!(first, DataEvent::LoadStarted { generation: 1 });
        assert!(!first.settles_load());

        let second = rx.recv().await.unwrap();
        assert!(second.settles_load());
        assert_eq!(second.generation(), 1);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::default_capacity();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.clone().subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(DataEvent::StaleResponseDiscarded {
            generation: 1,
            latest: 2,
        });

        assert_eq!(rx1.recv().await.unwrap().generation(), 1);
        assert_eq!(rx2.recv().await.unwrap().generation(), 1);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default_capacity();
        bus.publish(DataEvent::LoadStarted { generation: 7 });
    }
}
