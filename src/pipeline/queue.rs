//! Bounded work queue between task generators and persistence workers.
//!
//! A thin wrapper over an `async-channel` bounded MPMC channel. `put`
//! suspends the producer when the queue is full (backpressure) and `get`
//! suspends a worker when it is empty. This channel is the only shared
//! mutable state between generators and workers.

use async_channel::{Receiver, Sender};
use thiserror::Error;

use crate::content::ContentDraft;

/// Returned when the other side of the queue has shut down.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("work queue closed")]
pub struct QueueClosed;

/// Producer handle for the bounded work queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WorkQueue {
    tx: Sender<ContentDraft>,
}

/// Consumer handle for the bounded work queue. Clones share one FIFO, so
/// each draft is delivered to exactly one worker.
#[derive(Debug, Clone)]
pub struct WorkReceiver {
    rx: Receiver<ContentDraft>,
}

/// Creates a bounded queue with the given capacity.
#[must_use]
pub fn bounded(capacity: usize) -> (WorkQueue, WorkReceiver) {
    let (tx, rx) = async_channel::bounded(capacity);
    (WorkQueue { tx }, WorkReceiver { rx })
}

impl WorkQueue {
    /// Enqueues a draft, suspending while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`QueueClosed`] when all receivers are gone or the queue has
    /// been closed for shutdown.
    pub async fn put(&self, draft: ContentDraft) -> Result<(), QueueClosed> {
        self.tx.send(draft).await.map_err(|_| QueueClosed)
    }

    /// Closes the queue. Workers drain remaining items, then their `get`
    /// calls return [`QueueClosed`].
    pub fn close(&self) {
        self.tx.close();
    }

    /// Number of drafts currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// True when no drafts are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

impl WorkReceiver {
    /// Dequeues the next draft, suspending while the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns [`QueueClosed`] once the queue is closed and drained.
    pub async fn get(&self) -> Result<ContentDraft, QueueClosed> {
        self.rx.recv().await.map_err(|_| QueueClosed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::content::ContentType;

    fn draft(n: u32) -> ContentDraft {
        ContentDraft {
            title: format!("item {n}"),
            description: String::new(),
            thumbnail: None,
            source: "test".to_string(),
            source_id: n.to_string(),
            source_url: None,
            content_type: ContentType::Book,
            tags: vec![],
            language: "ar".to_string(),
            authors: vec![],
        }
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let (queue, receiver) = bounded(8);
        assert!(queue.is_empty());

        queue.put(draft(1)).await.unwrap();
        queue.put(draft(2)).await.unwrap();
        assert_eq!(queue.len(), 2);

        assert_eq!(receiver.get().await.unwrap().source_id, "1");
        assert_eq!(receiver.get().await.unwrap().source_id, "2");
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_close_drains_then_errors() {
        let (queue, receiver) = bounded(8);
        queue.put(draft(1)).await.unwrap();
        queue.close();

        assert!(receiver.get().await.is_ok());
        assert_eq!(receiver.get().await.unwrap_err(), QueueClosed);
        assert_eq!(queue.put(draft(2)).await.unwrap_err(), QueueClosed);
    }
}
