//! The pending copy/move queue and the batch engine that drains it.

pub mod engine;
pub mod queue;

pub use engine::{BatchResult, Confirm, execute_delete, execute_paste};
pub use queue::{Enqueued, TransferItem, TransferMode, TransferQueue};
