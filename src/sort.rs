//! Merge sort over a raw node chain.
//!
//! Nothing here allocates: sorting only rewrites `next` links between nodes
//! the queue already owns.

use crate::node::{Link, Node};

/// A sub-chain together with the number of nodes reachable from its head.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Run {
    pub(crate) head: Link,
    pub(crate) len: usize,
}

impl Run {
    /// Cuts the run into a left half of `ceil(len / 2)` nodes and a right half
    /// of `floor(len / 2)` nodes.
    ///
    /// # Safety
    ///
    /// `len` must be the exact number of nodes reachable from `head`, and the
    /// caller must have exclusive access to them.
    pub(crate) unsafe fn split(self) -> (Run, Run) {
        let left_len = self.len / 2 + self.len % 2;
        let right_len = self.len / 2;

        let mut cursor = self.head;
        for _ in 1..left_len {
            cursor = match cursor {
                Some(node) => node.as_ref().next,
                None => unreachable!("run shorter than its recorded length"),
            };
        }

        let right = match cursor {
            Some(node) => (*node.as_ptr()).next.take(),
            None => None,
        };

        let left = Run {
            head: self.head,
            len: left_len,
        };
        let right = Run {
            head: right,
            len: right_len,
        };
        (left, right)
    }
}

/// Merges two sorted chains into one, relinking their nodes.
///
/// A node from `right` is taken only when its value is strictly less than the
/// current `left` value, so equal values keep their relative order.
///
/// # Safety
///
/// Both chains must be null-terminated, disjoint, and exclusively accessible.
pub(crate) unsafe fn merge(mut left: Link, mut right: Link) -> Link {
    let mut head: Link = None;
    let mut tail: Link = None;

    loop {
        let node = match (left, right) {
            (Some(l), Some(r)) => {
                if r.as_ref().value < l.as_ref().value {
                    right = r.as_ref().next;
                    r
                } else {
                    left = l.as_ref().next;
                    l
                }
            }
            (rest, None) | (None, rest) => {
                append(&mut head, tail, rest);
                return head;
            }
        };

        append(&mut head, tail, Some(node));
        tail = Some(node);
    }
}

unsafe fn append(head: &mut Link, tail: Link, link: Link) {
    match tail {
        Some(tail) => (*tail.as_ptr()).next = link,
        None => *head = link,
    }
}

/// Sorts a run in ascending byte-wise order and returns the new head.
///
/// # Safety
///
/// Same requirements as [`Run::split`].
pub(crate) unsafe fn merge_sort(run: Run) -> Link {
    if run.len < 2 {
        return run.head;
    }

    let (left, right) = run.split();
    let left = merge_sort(left);
    let right = merge_sort(right);
    merge(left, right)
}

/// Walks a chain to its last node.
///
/// # Safety
///
/// The chain must be null-terminated.
pub(crate) unsafe fn last(head: Link) -> Link {
    let mut node = head?;
    while let Some(next) = node.as_ref().next {
        node = next;
    }
    Some(node)
}

/// Reverses a chain in place, returning its new head and tail.
///
/// # Safety
///
/// The chain must be null-terminated and exclusively accessible.
pub(crate) unsafe fn reverse(head: Link) -> (Link, Link) {
    let mut reversed: Link = None;
    let mut current = head;

    while let Some(node) = current {
        let node_ref: &mut Node = &mut *node.as_ptr();
        current = node_ref.next;
        node_ref.next = reversed;
        reversed = Some(node);
    }

    (reversed, head)
}
