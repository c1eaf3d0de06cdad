use crate::{fault, Error};
use std::{
    alloc::{self, Layout},
    ptr::NonNull,
};

pub(crate) type Link = Option<NonNull<Node>>;

/// A single element of a queue's chain.
///
/// The node owns its text value. `next` does not own anything: every node is
/// owned by the [`Queue`](crate::Queue) whose chain reaches it.
pub(crate) struct Node {
    pub(crate) value: Box<[u8]>,
    pub(crate) next: Link,
}

impl Node {
    /// Allocates a detached node holding a copy of `text`, up to its first NUL.
    ///
    /// The node memory is reserved first. If the value cannot be allocated
    /// afterwards, the node memory is handed back before returning.
    pub(crate) fn alloc(text: &[u8]) -> Result<NonNull<Self>, Error> {
        let layout = Layout::new::<Self>();
        let ptr = match Self::reserve(layout) {
            Some(ptr) => ptr,
            None => {
                tracing::debug!("failed to allocate queue node");
                return Err(Error::AllocationFailure);
            }
        };
        fault::node_allocated();

        let value = match copy_text(text) {
            Ok(value) => value,
            Err(error) => {
                unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) };
                fault::node_released();
                return Err(error);
            }
        };

        unsafe { ptr.as_ptr().write(Self { value, next: None }) };
        Ok(ptr)
    }

    fn reserve(layout: Layout) -> Option<NonNull<Self>> {
        if !fault::may_allocate() {
            return None;
        }

        let ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(ptr.cast::<Self>())
    }

    /// Releases a node previously returned by [`Node::alloc`] and hands back
    /// its value.
    ///
    /// # Safety
    ///
    /// `node` must come from [`Node::alloc`], must not be reachable from any
    /// chain anymore, and must not be used again.
    pub(crate) unsafe fn free(node: NonNull<Self>) -> Box<[u8]> {
        let node = Box::from_raw(node.as_ptr());
        fault::node_released();
        node.value
    }
}

/// Copies `text` up to (not including) its first NUL byte into a buffer of
/// exactly that length.
fn copy_text(text: &[u8]) -> Result<Box<[u8]>, Error> {
    let len = text.iter().position(|&byte| byte == 0).unwrap_or(text.len());

    let mut value = Vec::new();
    if !fault::may_allocate() || value.try_reserve_exact(len).is_err() {
        tracing::debug!(len, "failed to allocate queue value");
        return Err(Error::AllocationFailure);
    }

    value.extend_from_slice(&text[..len]);
    Ok(value.into_boxed_slice())
}

/// Writes `value` into `buf` as a NUL-terminated string, truncating it to
/// `buf.len() - 1` bytes. The rest of `buf` is zeroed.
///
/// Returns the number of value bytes written. A zero-length `buf` is left
/// untouched.
pub(crate) fn copy_terminated(value: &[u8], buf: &mut [u8]) -> usize {
    let capacity = match buf.len().checked_sub(1) {
        Some(capacity) => capacity,
        None => return 0,
    };

    let len = value.len().min(capacity);
    buf.fill(0);
    buf[..len].copy_from_slice(&value[..len]);
    len
}
