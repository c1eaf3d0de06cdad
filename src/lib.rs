#![warn(
    rust_2018_idioms,
    unreachable_pub,
    // missing_docs
    // missing_debug_implementations
)]

mod error;
mod node;
mod queue;
mod sort;

#[cfg(feature = "fault-injection")]
pub mod fault;
#[cfg(not(feature = "fault-injection"))]
mod fault;

#[cfg(feature = "capi")]
pub mod capi;

#[cfg(feature = "lock_api")]
mod locked;

pub use self::{error::Error, queue::Queue};

#[cfg(feature = "lock_api")]
pub use self::locked::{locked_queue, LockedQueue, LockedQueueGuard};
