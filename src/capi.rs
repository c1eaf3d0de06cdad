//! C ABI for [`Queue`].
//!
//! These functions follow the contract of the classic `queue.h` interface so a
//! C harness can drive the queue directly. A queue is handled through an
//! opaque pointer obtained from [`q_new`] and released with [`q_free`]. A null
//! queue pointer is accepted everywhere: mutating calls report failure or do
//! nothing, and [`q_size`] reports zero.

use crate::{node, Error, Queue};
use std::{
    alloc::{self, Layout},
    convert::TryFrom,
    ffi::CStr,
    os::raw::{c_char, c_int},
    ptr::{self, NonNull},
    slice,
};

/// Creates an empty queue, or returns null if it could not be allocated.
#[no_mangle]
pub extern "C" fn q_new() -> *mut Queue {
    let layout = Layout::new::<Queue>();
    let queue = match crate::fault::may_allocate() {
        true => NonNull::new(unsafe { alloc::alloc(layout) }.cast::<Queue>()),
        false => None,
    };

    match queue {
        Some(queue) => unsafe {
            queue.as_ptr().write(Queue::new());
            queue.as_ptr()
        },
        None => {
            tracing::debug!("failed to allocate queue");
            ptr::null_mut()
        }
    }
}

/// Releases a queue and every value it holds.
///
/// # Safety
///
/// `q` must be null or a pointer returned by [`q_new`] that was not freed yet.
#[no_mangle]
pub unsafe extern "C" fn q_free(q: *mut Queue) {
    if !q.is_null() {
        drop(Box::from_raw(q));
    }
}

/// Inserts a copy of the NUL-terminated string `s` at the head of the queue.
///
/// Returns `false` if `q` or `s` is null or if memory could not be allocated.
///
/// # Safety
///
/// `q` must be null or a live queue from [`q_new`]. `s` must be null or point
/// to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn q_insert_head(q: *mut Queue, s: *const c_char) -> bool {
    insert(q, s, |queue, text| queue.insert_head(text)).is_ok()
}

/// Inserts a copy of the NUL-terminated string `s` at the tail of the queue.
///
/// Returns `false` if `q` or `s` is null or if memory could not be allocated.
///
/// # Safety
///
/// Same requirements as [`q_insert_head`].
#[no_mangle]
pub unsafe extern "C" fn q_insert_tail(q: *mut Queue, s: *const c_char) -> bool {
    insert(q, s, |queue, text| queue.insert_tail(text)).is_ok()
}

unsafe fn insert(
    q: *mut Queue,
    s: *const c_char,
    insert_fn: impl FnOnce(&mut Queue, &[u8]) -> Result<(), Error>,
) -> Result<(), Error> {
    let queue = q.as_mut().ok_or(Error::InvalidArgument("null queue"))?;
    if s.is_null() {
        return Err(Error::InvalidArgument("null string"));
    }

    let text = CStr::from_ptr(s).to_bytes();
    insert_fn(queue, text)
}

/// Removes the head of the queue.
///
/// If `sp` is non-null and `bufsize` is non-zero, the removed string is copied
/// into `sp`: at most `bufsize - 1` bytes followed by a NUL, with the rest of
/// the buffer zeroed. Returns `false` if `q` is null or the queue is empty.
///
/// # Safety
///
/// `q` must be null or a live queue from [`q_new`]. If `sp` is non-null it must
/// be valid for writes of `bufsize` bytes.
#[no_mangle]
pub unsafe extern "C" fn q_remove_head(q: *mut Queue, sp: *mut c_char, bufsize: usize) -> bool {
    let queue = match q.as_mut() {
        Some(queue) => queue,
        None => return false,
    };

    let value = match queue.remove_head() {
        Some(value) => value,
        None => return false,
    };

    if !sp.is_null() && bufsize > 0 {
        let buf = slice::from_raw_parts_mut(sp.cast::<u8>(), bufsize);
        node::copy_terminated(&value, buf);
    }

    true
}

/// Returns the number of values in the queue, or zero if `q` is null.
///
/// # Safety
///
/// `q` must be null or a live queue from [`q_new`].
#[no_mangle]
pub unsafe extern "C" fn q_size(q: *const Queue) -> c_int {
    match q.as_ref() {
        Some(queue) => c_int::try_from(queue.len()).unwrap_or(c_int::MAX),
        None => 0,
    }
}

/// Reverses the queue in place. Does nothing if `q` is null.
///
/// # Safety
///
/// `q` must be null or a live queue from [`q_new`].
#[no_mangle]
pub unsafe extern "C" fn q_reverse(q: *mut Queue) {
    if let Some(queue) = q.as_mut() {
        queue.reverse();
    }
}

/// Sorts the queue in ascending order. Does nothing if `q` is null.
///
/// # Safety
///
/// `q` must be null or a live queue from [`q_new`].
#[no_mangle]
pub unsafe extern "C" fn q_sort(q: *mut Queue) {
    if let Some(queue) = q.as_mut() {
        queue.sort();
    }
}
