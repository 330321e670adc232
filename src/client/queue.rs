//! Bounded per-client message queue with drop-oldest overflow
//!
//! Written by the broadcaster, drained by the client's sender task.
//! When full, the newest message displaces the oldest: for live viewing
//! the freshest frame matters most, and the broadcaster must never
//! block on a slow client.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Result of offering a message to an [`OutputQueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Message enqueued, queue had room
    Enqueued,
    /// Message enqueued after evicting the oldest pending message
    Evicted,
    /// Message discarded, queue is closed
    Dropped,
}

/// Bounded FIFO of encoded messages for one client
///
/// Single producer (the broadcaster), single consumer (the client's
/// sender). Closing the queue is the sender's termination signal:
/// [`OutputQueue::pop`] returns `None` once closed.
#[derive(Debug)]
pub struct OutputQueue {
    capacity: usize,
    ring: Mutex<VecDeque<Bytes>>,
    notify: Notify,
    closed: AtomicBool,
}

impl OutputQueue {
    /// Create a queue holding at most `capacity` messages
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            ring: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Offer a message without blocking
    ///
    /// On overflow the oldest pending message is evicted to make room.
    pub fn push(&self, message: Bytes) -> PushOutcome {
        if self.closed.load(Ordering::Acquire) {
            return PushOutcome::Dropped;
        }

        let outcome = {
            let mut ring = self.ring.lock();
            if ring.len() < self.capacity {
                ring.push_back(message);
                PushOutcome::Enqueued
            } else {
                ring.pop_front();
                ring.push_back(message);
                PushOutcome::Evicted
            }
        };

        self.notify.notify_one();
        outcome
    }

    /// Wait for the next message in delivery order
    ///
    /// Returns `None` once the queue has been closed. An empty queue
    /// suspends the caller; it never spuriously returns `None`.
    pub async fn pop(&self) -> Option<Bytes> {
        loop {
            {
                let mut ring = self.ring.lock();
                if let Some(message) = ring.pop_front() {
                    return Some(message);
                }
            }

            if self.closed.load(Ordering::Acquire) {
                return None;
            }

            // notify_one stores a permit, so a push between the check
            // above and this await still wakes us
            self.notify.notified().await;
        }
    }

    /// Close the queue and discard anything still pending
    ///
    /// Wakes the consumer; subsequent pushes are dropped. Idempotent.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.ring.lock().clear();
        self.notify.notify_one();
    }

    /// Whether the queue has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of messages currently pending
    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    /// Whether no messages are pending
    pub fn is_empty(&self) -> bool {
        self.ring.lock().is_empty()
    }

    /// Maximum number of pending messages
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    fn message(n: u8) -> Bytes {
        Bytes::copy_from_slice(&[n])
    }

    #[tokio::test]
    async fn test_delivery_order() {
        let queue = OutputQueue::new(4);

        assert_eq!(queue.push(message(1)), PushOutcome::Enqueued);
        assert_eq!(queue.push(message(2)), PushOutcome::Enqueued);

        assert_eq!(queue.pop().await.unwrap()[0], 1);
        assert_eq!(queue.pop().await.unwrap()[0], 2);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_overflow_evicts_oldest() {
        let queue = OutputQueue::new(4);

        for n in 1..=5 {
            queue.push(message(n));
        }
        assert_eq!(queue.len(), 4);

        // Message 1 was evicted; 2..=5 remain in order
        for expected in 2..=5 {
            assert_eq!(queue.pop().await.unwrap()[0], expected);
        }
    }

    #[tokio::test]
    async fn test_overflow_outcome() {
        let queue = OutputQueue::new(1);

        assert_eq!(queue.push(message(1)), PushOutcome::Enqueued);
        assert_eq!(queue.push(message(2)), PushOutcome::Evicted);
    }

    #[tokio::test]
    async fn test_pop_waits_for_push() {
        let queue = Arc::new(OutputQueue::new(4));

        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.push(message(7));

        let received = consumer.await.unwrap();
        assert_eq!(received.unwrap()[0], 7);
    }

    #[tokio::test]
    async fn test_close_wakes_consumer() {
        let queue = Arc::new(OutputQueue::new(4));

        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.close();

        assert!(consumer.await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_close_discards_pending() {
        let queue = OutputQueue::new(4);

        queue.push(message(1));
        queue.push(message(2));
        queue.close();

        assert!(queue.is_empty());
        assert!(queue.pop().await.is_none());
    }

    #[tokio::test]
    async fn test_push_after_close_dropped() {
        let queue = OutputQueue::new(4);

        queue.close();
        assert_eq!(queue.push(message(1)), PushOutcome::Dropped);
        assert!(queue.pop().await.is_none());
    }

    #[tokio::test]
    async fn test_zero_capacity_clamped() {
        let queue = OutputQueue::new(0);
        assert_eq!(queue.capacity(), 1);

        queue.push(message(1));
        assert_eq!(queue.pop().await.unwrap()[0], 1);
    }
}
