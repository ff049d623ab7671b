//! Scenegen Task
//!
//! The generation task state machine: configure a job, submit it to the
//! backend, poll for incremental log events and status at a fixed
//! interval, and resolve a terminal state (completed or failed).
//!
//! Architecture:
//! - Scheduler: cancellable fixed-interval poller
//! - Task: per-job lifecycle state machine with snapshot queries and
//!   broadcast notifications
//!
//! One task drives one job at a time; independent tasks may share a
//! single backend client.

pub mod scheduler;
pub mod task;

pub use scheduler::Poller;
pub use task::{GenerationTask, TaskSnapshot};
