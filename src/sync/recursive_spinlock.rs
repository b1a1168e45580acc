use crate::{
    architecture::{event, CoreId},
    fatal_assert,
    kernel::platform,
};
use core::{
    cell::UnsafeCell,
    sync::atomic::{AtomicI64, Ordering},
};

/// Holder value of a lock that no core holds
const FREE: i64 = -1;

/// A spinlock that the holding core may acquire again
///
/// Tracks the holding core and how many times it has acquired the lock; the
/// lock is free again once every acquire has been matched by a release.
/// Waiting cores spin, so nothing about this lock needs a scheduler.
///
/// Acquiring a lock held by a core that never releases it spins forever.
/// Waiters are not queued: any of them may win once the lock is released.
pub struct RecursiveSpinLock {
    /// The holding core, or `FREE`
    holder: AtomicI64,
    /// Number of acquires by `holder` not yet released
    ///
    /// Only touched by the holding core
    depth: UnsafeCell<u32>,
}

// SAFETY: `depth` is only accessed by the core that `holder` names, and
// ownership passes between cores through acquire/release operations on `holder`
unsafe impl Sync for RecursiveSpinLock {}

impl RecursiveSpinLock {
    /// Creates a free lock
    pub const fn new() -> Self {
        Self {
            holder: AtomicI64::new(FREE),
            depth: UnsafeCell::new(0),
        }
    }

    /// Acquires the lock for the calling core
    pub fn acquire(&self) {
        // SAFETY: The platform reports the identity of the calling core
        unsafe { self.acquire_as(platform::get().core_id()) }
    }

    /// Acquires the lock for `me`
    ///
    /// ```compile_fail
    /// # use bootrt::{CoreId, RecursiveSpinLock};
    /// RecursiveSpinLock::new().acquire_as(CoreId::new(7));
    /// ```
    /// # Safety
    /// `me` must be the identity of the executing core, and no other context
    /// that may run concurrently may use the same identity
    pub unsafe fn acquire_as(&self, me: CoreId) {
        let me = i64::from(me);

        // Only `me` can ever have stored `me`, so seeing it means this core holds the lock
        if self.holder.load(Ordering::Acquire) == me {
            // SAFETY: This core holds the lock
            unsafe {
                *self.depth.get() += 1;
            }
            return;
        }

        #[cfg(feature = "verbose")]
        let mut reported = false;
        while self
            .holder
            .compare_exchange(FREE, me, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            #[cfg(feature = "verbose")]
            if !reported {
                reported = true;
                // Logging needs a registered platform
                if platform::try_get().is_some() {
                    crate::log!("waiting for lock {:p}", self);
                }
            }
            event::wait();
        }

        fatal_assert!(self.holder.load(Ordering::Relaxed) == me);
        // SAFETY: This core now holds the lock
        unsafe {
            *self.depth.get() = 1;
        }
    }

    /// Releases one level of the calling core's hold on the lock
    ///
    /// Releasing a lock the calling core does not hold is fatal
    pub fn release(&self) {
        // SAFETY: The platform reports the identity of the calling core
        unsafe { self.release_as(platform::get().core_id()) }
    }

    /// Releases one level of `me`'s hold on the lock
    ///
    /// Releasing a lock `me` does not hold is fatal
    /// # Safety
    /// `me` must be the identity of the executing core, and no other context
    /// that may run concurrently may use the same identity
    pub unsafe fn release_as(&self, me: CoreId) {
        let me = i64::from(me);
        fatal_assert!(self.holder.load(Ordering::Relaxed) == me);

        // SAFETY: This core holds the lock
        let depth = unsafe { &mut *self.depth.get() };
        fatal_assert!(*depth > 0);
        *depth -= 1;
        if *depth == 0 {
            self.holder.store(FREE, Ordering::Release);
            event::wake();
        }
    }

    /// The core holding the lock, if any
    ///
    /// Only a snapshot when read by a core other than the holder
    pub fn holder(&self) -> Option<CoreId> {
        CoreId::try_from(self.holder.load(Ordering::Relaxed)).ok()
    }

    /// Whether `core` holds the lock
    pub fn is_held_by(&self, core: CoreId) -> bool {
        self.holder.load(Ordering::Relaxed) == i64::from(core)
    }

    /// How many times the calling core holds the lock, zero if it does not
    /// hold it
    pub fn depth(&self) -> u32 {
        // SAFETY: The platform reports the identity of the calling core
        unsafe { self.depth_as(platform::get().core_id()) }
    }

    /// How many times `me` holds the lock, zero if it does not hold it
    /// # Safety
    /// `me` must be the identity of the executing core, and no other context
    /// that may run concurrently may use the same identity
    pub unsafe fn depth_as(&self, me: CoreId) -> u32 {
        if self.is_held_by(me) {
            // SAFETY: This core holds the lock
            unsafe { *self.depth.get() }
        } else {
            0
        }
    }
}

impl Default for RecursiveSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for RecursiveSpinLock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecursiveSpinLock")
            .field("holder", &self.holder())
            .finish_non_exhaustive()
    }
}
