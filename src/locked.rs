use crate::Queue;

/// A [`Queue`] behind a [`lock_api::Mutex`] for callers that share one queue
/// between threads. The queue itself does no locking.
pub type LockedQueue<R> = lock_api::Mutex<R, Queue>;
pub type LockedQueueGuard<'a, R> = lock_api::MutexGuard<'a, R, Queue>;

/// Creates an empty queue guarded by the raw mutex `R`.
pub fn locked_queue<R: lock_api::RawMutex>() -> LockedQueue<R> {
    lock_api::Mutex::const_new(R::INIT, Queue::new())
}
