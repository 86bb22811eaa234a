//! Event queue between the host callbacks and the app thread.
//!
//! Any number of producers enqueue; exactly one consumer (the app thread)
//! dequeues. One mutex guards the buffer, with two condition variables:
//! `item_added` wakes the consumer, `drained` wakes synchronous producers.
//!
//! Producers are never back-pressured. When the queue is full the new event is
//! dropped and logged, so a stalled app thread can never freeze the UI thread.
//!
//! A synchronous enqueue returns once the consumer has found the queue empty
//! at least once after the event went in. That is a global drain, not a
//! per-event acknowledgment: every event queued before it (by anyone) has been
//! applied by then. An event still queued when the queue closes was never
//! applied, so its synchronous producer gets [`QueueError::Closed`] instead.


use std::collections::VecDeque;
use std::fmt;

use log::{error, warn};
use parking_lot::{Condvar, Mutex};

use crate::event::Event;

/// How a producer hands an event over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryMode {
    /// Return as soon as the event is queued.
    FireAndForget,
    /// Block until the consumer has drained the queue.
    Synchronous,
}

/// What happened to an enqueued event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enqueued {
    Queued,
    /// Queue was at capacity; the event was discarded.
    Dropped,
}

/// Why the consumer stopped accepting events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// Destroy was processed.
    Finished,
    /// The app thread hit an unrecoverable error.
    Failed(String),
}

/// Errors returned to producers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The consumer has processed Destroy; nothing more will be delivered.
    Closed,
    /// The consumer stopped on an error.
    Failed(String),
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Event queue is closed"),
            Self::Failed(reason) => write!(f, "App thread failed: {}", reason),
        }
    }
}

impl std::error::Error for QueueError {}

impl From<&CloseReason> for QueueError {
    fn from(reason: &CloseReason) -> Self {
        match reason {
            CloseReason::Finished => Self::Closed,
            CloseReason::Failed(msg) => Self::Failed(msg.clone()),
        }
    }
}

/// Queue statistics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    pub len: usize,
    pub capacity: usize,
    /// Events discarded because the queue was full.
    pub dropped: u64,
    /// Number of times the consumer has observed an empty queue.
    pub drains: u64,
}

impl QueueStats {
    pub fn utilization(self) -> f32 {
        if self.capacity == 0 {
            0.0
        } else {
            (self.len as f32 / self.capacity as f32) * 100.0
        }
    }
}

struct Inner {
    /// Events tagged with their enqueue sequence number.
    events: VecDeque<(u64, Event)>,
    capacity: usize,
    next_seq: u64,
    /// Sequence number of the last event handed to the consumer.
    last_dequeued: u64,
    drain_generation: u64,
    dropped: u64,
    closed: Option<CloseReason>,
}

/// Bounded FIFO mailbox from producers to the app thread.
pub struct EventQueue {
    inner: Mutex<Inner>,
    item_added: Condvar,
    drained: Condvar,
}

impl EventQueue {
    /// Create a queue holding at most `capacity` events (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                events: VecDeque::with_capacity(capacity),
                capacity,
                next_seq: 1,
                last_dequeued: 0,
                drain_generation: 0,
                dropped: 0,
                closed: None,
            }),
            item_added: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    /// Append `event` at the tail.
    ///
    /// A full queue drops the event and reports [`Enqueued::Dropped`]; that is
    /// not an error. In [`DeliveryMode::Synchronous`] the call then waits for
    /// the next drain, whether or not the event itself made it in.
    ///
    /// # Errors
    /// Fails once the queue is closed. A synchronous call also fails when the
    /// consumer stops on an error while it is waiting, or when the queue is
    /// closed before its event reached the consumer.
    pub fn enqueue(&self, event: Event, mode: DeliveryMode) -> Result<Enqueued, QueueError> {
        let mut inner = self.inner.lock();
        if let Some(reason) = &inner.closed {
            return Err(reason.into());
        }

        let seq = inner.next_seq;
        let outcome = if inner.events.len() >= inner.capacity {
            inner.dropped += 1;
            error!(
                "Event queue full ({} events), dropping {}",
                inner.capacity,
                event.name()
            );
            Enqueued::Dropped
        } else {
            inner.next_seq += 1;
            inner.events.push_back((seq, event));
            self.item_added.notify_one();
            Enqueued::Queued
        };

        if mode == DeliveryMode::Synchronous {
            let generation = inner.drain_generation;
            while inner.drain_generation == generation {
                if let Some(reason) = &inner.closed {
                    // Closed without a drain: only an event the consumer
                    // already took (the Destroy itself) counts as delivered.
                    let delivered = outcome == Enqueued::Queued && seq <= inner.last_dequeued;
                    return match reason {
                        CloseReason::Failed(msg) => Err(QueueError::Failed(msg.clone())),
                        CloseReason::Finished if delivered => Ok(outcome),
                        CloseReason::Finished => Err(QueueError::Closed),
                    };
                }
                self.drained.wait(&mut inner);
            }
        }

        Ok(outcome)
    }

    /// Pop the head event.
    ///
    /// Finding the queue empty counts as a drain and releases synchronous
    /// producers. With `wait` set, an empty queue blocks until an event
    /// arrives; `None` is then only returned once the queue is closed.
    pub fn dequeue(&self, wait: bool) -> Option<Event> {
        let mut inner = self.inner.lock();

        if inner.events.is_empty() {
            inner.drain_generation = inner.drain_generation.wrapping_add(1);
            self.drained.notify_all();
        }

        while wait && inner.events.is_empty() && inner.closed.is_none() {
            self.item_added.wait(&mut inner);
        }

        let (seq, event) = inner.events.pop_front()?;
        inner.last_dequeued = seq;
        Some(event)
    }

    /// Stop accepting events and release every waiter.
    ///
    /// Events still queued are discarded: nothing is processed after Destroy.
    /// Their synchronous producers are released with [`QueueError::Closed`].
    pub fn close(&self, reason: CloseReason) {
        let mut inner = self.inner.lock();
        if inner.closed.is_some() {
            return;
        }
        if !inner.events.is_empty() {
            warn!(
                "Discarding {} event(s) queued after shutdown",
                inner.events.len()
            );
            inner.events.clear();
        }
        inner.closed = Some(reason);
        self.drained.notify_all();
        self.item_added.notify_all();
    }

    #[must_use]
    pub fn close_reason(&self) -> Option<CloseReason> {
        self.inner.lock().closed.clone()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    #[must_use]
    pub fn stats(&self) -> QueueStats {
        let inner = self.inner.lock();
        QueueStats {
            len: inner.events.len(),
            capacity: inner.capacity,
            dropped: inner.dropped,
            drains: inner.drain_generation,
        }
    }
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("EventQueue")
            .field("len", &stats.len)
            .field("capacity", &stats.capacity)
            .field("dropped", &stats.dropped)
            .finish()
    }
}
