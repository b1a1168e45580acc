use super::RecursiveSpinLock;
use crate::{architecture::CoreId, kernel::platform};
use core::{marker::PhantomData, ops::Deref};

/// Protects a value with a `RecursiveSpinLock`
///
/// Guards only hand out shared references, since the same core may hold
/// several guards at once; use `Cell` or `RefCell` for mutation
pub struct ReentrantSpinLock<T: ?Sized> {
    /// The lock guarding `data`
    lock: RecursiveSpinLock,
    /// The protected data
    data: T,
}

// SAFETY: Only the holding core can reach `data`, so it is enough that `T` can
// move between cores
unsafe impl<T: ?Sized + Send> Sync for ReentrantSpinLock<T> {}

impl<T> ReentrantSpinLock<T> {
    /// Creates a lock around the given data
    pub const fn new(data: T) -> Self {
        Self {
            lock: RecursiveSpinLock::new(),
            data,
        }
    }

    /// Consumes the lock, returning the protected data
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: ?Sized> ReentrantSpinLock<T> {
    /// Locks for the calling core. The lock is released one level when the
    /// returned guard is dropped
    pub fn lock(&self) -> ReentrantGuard<'_, T> {
        // SAFETY: The platform reports the identity of the calling core
        unsafe { self.lock_as(platform::get().core_id()) }
    }

    /// Locks for `me`. The lock is released one level when the returned
    /// guard is dropped
    ///
    /// ```compile_fail
    /// # use bootrt::{CoreId, ReentrantSpinLock};
    /// let lock = ReentrantSpinLock::new(0_u32);
    /// let _guard = lock.lock_as(CoreId::new(7));
    /// ```
    /// # Safety
    /// `me` must be the identity of the executing core, and no other context
    /// that may run concurrently may use the same identity
    pub unsafe fn lock_as(&self, me: CoreId) -> ReentrantGuard<'_, T> {
        // SAFETY: By assumption, `me` is the executing core
        unsafe { self.lock.acquire_as(me) };
        ReentrantGuard {
            mutex: self,
            core: me,
            _not_send: PhantomData,
        }
    }

    /// The underlying lock
    pub fn raw(&self) -> &RecursiveSpinLock {
        &self.lock
    }

    /// Mutable access without locking, since the borrow is already exclusive
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

/// Provides protected access to the data of a `ReentrantSpinLock`, which
/// stays locked by this core while the guard persists
pub struct ReentrantGuard<'a, T: ?Sized> {
    /// The enclosing mutex
    mutex: &'a ReentrantSpinLock<T>,
    /// The core that acquired the lock
    core: CoreId,
    /// The guard must be dropped on the core that created it
    _not_send: PhantomData<*const ()>,
}

impl<T: ?Sized> Deref for ReentrantGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.mutex.data
    }
}

impl<T: ?Sized> Drop for ReentrantGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: The guard is not `Send`, so this is still the core that locked
        unsafe { self.mutex.lock.release_as(self.core) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use std::{
        sync::{
            atomic::{AtomicBool, AtomicU32, Ordering},
            Arc,
        },
        thread,
    };

    const CORE: CoreId = CoreId::new(3);

    #[test]
    fn nested_guards_share_the_data() {
        let counter = ReentrantSpinLock::new(Cell::new(0_u32));
        // SAFETY: Only this thread uses `CORE`
        unsafe {
            let outer = counter.lock_as(CORE);
            outer.set(outer.get() + 1);
            {
                let inner = counter.lock_as(CORE);
                inner.set(inner.get() + 1);
                assert_eq!(counter.raw().depth_as(CORE), 2);
            }
            assert_eq!(outer.get(), 2);
            assert_eq!(counter.raw().depth_as(CORE), 1);
        }
        assert_eq!(counter.raw().holder(), None);
        assert_eq!(counter.into_inner().get(), 2);
    }

    #[test]
    fn refcell_mutation_through_guard() {
        let log = ReentrantSpinLock::new(RefCell::new(Vec::new()));
        // SAFETY: Only this thread uses `CORE`
        unsafe {
            log.lock_as(CORE).borrow_mut().push("boot");
            log.lock_as(CORE).borrow_mut().push("ready");
            assert_eq!(*log.lock_as(CORE).borrow(), ["boot", "ready"]);
        }
    }

    #[test]
    fn get_mut_skips_locking() {
        let mut value = ReentrantSpinLock::new(7_u8);
        *value.get_mut() = 9;
        // SAFETY: Only this thread uses `CORE`
        assert_eq!(*unsafe { value.lock_as(CORE) }, 9);
        assert_eq!(value.raw().holder(), None);
    }

    #[test]
    fn guards_of_distinct_cores_never_overlap() {
        const ROUNDS: u32 = 5_000;

        let mut state = Arc::new(ReentrantSpinLock::new(Cell::new(0_u32)));
        let inside = Arc::new(AtomicBool::new(false));
        let overlaps = Arc::new(AtomicU32::new(0));

        let cores: Vec<_> = [CoreId::new(7), CoreId::new(8)]
            .into_iter()
            .map(|me| {
                let state = Arc::clone(&state);
                let inside = Arc::clone(&inside);
                let overlaps = Arc::clone(&overlaps);
                thread::spawn(move || {
                    for _ in 0..ROUNDS {
                        // SAFETY: Each thread has its own identity
                        let guard = unsafe { state.lock_as(me) };
                        if inside.swap(true, Ordering::Relaxed) {
                            overlaps.fetch_add(1, Ordering::Relaxed);
                        }
                        guard.set(guard.get() + 1);
                        inside.store(false, Ordering::Relaxed);
                    }
                })
            })
            .collect();

        for core in cores {
            core.join().unwrap();
        }
        assert_eq!(overlaps.load(Ordering::Relaxed), 0);
        assert_eq!(state.raw().holder(), None);
        let total = Arc::get_mut(&mut state).unwrap().get_mut().get();
        assert_eq!(total, 2 * ROUNDS);
    }
}
