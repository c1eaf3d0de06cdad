//! Allocation fault injection for exercising the out-of-memory paths of a
//! [`Queue`](crate::Queue).
//!
//! Every element insertion performs two allocation attempts: one for the node
//! and one for its text value. [`fail_after`] lets a fixed number of attempts
//! through and fails the rest, which makes it possible to drive each of those
//! attempts into failure deterministically. [`live_nodes`] tracks how many
//! nodes this thread allocated but did not release, so tests can check
//! nothing leaked.
//!
//! All state is per thread. Without the `fault-injection` feature (and outside
//! of this crate's own tests) the hooks compile down to nothing.

#[cfg(any(test, feature = "fault-injection"))]
use std::cell::Cell;

#[cfg(any(test, feature = "fault-injection"))]
thread_local! {
    static BUDGET: Cell<Option<usize>> = Cell::new(None);
    static LIVE_NODES: Cell<isize> = Cell::new(0);
}

// The hooks are public with the `fault-injection` feature and crate-private
// in this crate's own tests otherwise.
macro_rules! fault_api {
    ($vis:vis) => {
        /// Restores the previous allocation budget of the current thread when
        /// dropped.
        #[must_use = "allocations only fail while the guard is alive"]
        #[derive(Debug)]
        $vis struct FaultGuard {
            previous: Option<usize>,
        }

        impl Drop for FaultGuard {
            fn drop(&mut self) {
                BUDGET.with(|budget| budget.set(self.previous));
            }
        }

        /// Lets the next `allocations` attempts on this thread succeed and
        /// fails every attempt after that, until the returned guard is dropped.
        $vis fn fail_after(allocations: usize) -> FaultGuard {
            let previous = BUDGET.with(|budget| budget.replace(Some(allocations)));
            FaultGuard { previous }
        }

        /// Nodes allocated on this thread minus nodes released on it.
        ///
        /// A queue can move to another thread and release its nodes there, so
        /// the count of a single thread may go negative. Compare the value
        /// before and after an operation on the same thread.
        $vis fn live_nodes() -> isize {
            LIVE_NODES.with(Cell::get)
        }
    };
}

#[cfg(feature = "fault-injection")]
fault_api!(pub);
#[cfg(all(test, not(feature = "fault-injection")))]
fault_api!(pub(crate));

#[cfg(any(test, feature = "fault-injection"))]
pub(crate) fn may_allocate() -> bool {
    BUDGET.with(|budget| match budget.get() {
        None => true,
        Some(0) => false,
        Some(remaining) => {
            budget.set(Some(remaining - 1));
            true
        }
    })
}

#[cfg(any(test, feature = "fault-injection"))]
pub(crate) fn node_allocated() {
    LIVE_NODES.with(|live| live.set(live.get().wrapping_add(1)));
}

#[cfg(any(test, feature = "fault-injection"))]
pub(crate) fn node_released() {
    LIVE_NODES.with(|live| live.set(live.get().wrapping_sub(1)));
}

#[cfg(not(any(test, feature = "fault-injection")))]
#[inline(always)]
pub(crate) fn may_allocate() -> bool {
    true
}

#[cfg(not(any(test, feature = "fault-injection")))]
#[inline(always)]
pub(crate) fn node_allocated() {}

#[cfg(not(any(test, feature = "fault-injection")))]
#[inline(always)]
pub(crate) fn node_released() {}
