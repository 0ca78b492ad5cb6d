//! Pipeline plumbing: the bounded work queue, the persistence worker pool,
//! and the cycle scheduler.
//!
//! Data flow: scheduler → task generators → [`WorkQueue`] → persistence
//! workers → content store. The queue is the sole synchronization primitive
//! between producers and consumers.

mod queue;
mod scheduler;
mod worker;

pub use queue::{QueueClosed, WorkQueue, WorkReceiver, bounded};
pub use scheduler::Scheduler;
pub use worker::persistence_worker;
