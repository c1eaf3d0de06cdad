use thiserror::Error;

/// The ways a [`Queue`](crate::Queue) operation can fail.
///
/// A failed operation never leaves the queue partially modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Memory for a node or its text value could not be allocated.
    #[error("failed to allocate queue element")]
    AllocationFailure,
    /// The operation was given something it cannot act on, such as an empty
    /// queue to remove from or a null pointer at the C boundary.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
