use core::{
    cell::UnsafeCell,
    mem::MaybeUninit,
    sync::atomic::{AtomicU8, Ordering},
};

/// No value has been stored
const UNSET: u8 = 0;
/// A value is being written
const SETTING: u8 = 1;
/// The value is written and visible
const SET: u8 = 2;

/// Can only be set once
///
/// Readers on any core see either nothing or the fully written value
pub struct SetOnce<T> {
    /// Progress of the single write
    state: AtomicU8,
    /// The stored value, initialized once `state` is `SET`
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> SetOnce<T> {
    /// Creates an unset `SetOnce`
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(UNSET),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Sets the value
    ///
    /// Panics if the value is already set
    pub fn set(&self, value: T) {
        assert!(
            self.state
                .compare_exchange(UNSET, SETTING, Ordering::Acquire, Ordering::Relaxed)
                .is_ok(),
            "SetOnce should only be set once"
        );
        // SAFETY: Winning the exchange above grants exclusive access to the slot
        unsafe {
            (*self.value.get()).write(value);
        }
        self.state.store(SET, Ordering::Release);
    }

    /// Gets the value, if it has been set
    pub fn try_get(&self) -> Option<&T> {
        (self.state.load(Ordering::Acquire) == SET).then(|| {
            // SAFETY: `SET` is only published after the value is written, and never changes again
            unsafe { (*self.value.get()).assume_init_ref() }
        })
    }

    /// Gets the value
    ///
    /// Panics if the value is not yet set
    pub fn get(&self) -> &T {
        self.try_get().expect("Should not access before being set")
    }
}

impl<T> Default for SetOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for SetOnce<T> {
    fn drop(&mut self) {
        if *self.state.get_mut() == SET {
            // SAFETY: The value was written and is dropped exactly once here
            unsafe { self.value.get_mut().assume_init_drop() }
        }
    }
}

// SAFETY: The value is written once before being shared, then only read
unsafe impl<T: Send + Sync> Sync for SetOnce<T> {}
unsafe impl<T: Send> Send for SetOnce<T> {}

/// Ensures that the given function is only called once
/// Panics if run more than once
#[macro_export]
macro_rules! call_once {
    () => {{
        use core::sync::atomic::{AtomicBool, Ordering::AcqRel};
        static IS_FIRST_INVOCATION: AtomicBool = AtomicBool::new(false);
        assert!(!IS_FIRST_INVOCATION.swap(true, AcqRel))
    }};
}

#[cfg(test)]
mod tests {
    use super::SetOnce;
    use std::sync::Arc;

    #[test]
    fn unset_until_written() {
        let once = SetOnce::new();
        assert!(once.try_get().is_none());
        once.set(5_u32);
        assert_eq!(once.try_get(), Some(&5));
        assert_eq!(*once.get(), 5);
    }

    #[test]
    #[should_panic(expected = "only be set once")]
    fn second_set_panics() {
        let once = SetOnce::new();
        once.set(1_u8);
        once.set(2_u8);
    }

    #[test]
    fn drops_stored_value() {
        let value = Arc::new(());
        {
            let once = SetOnce::new();
            once.set(Arc::clone(&value));
            assert_eq!(Arc::strong_count(&value), 2);
        }
        assert_eq!(Arc::strong_count(&value), 1);
    }
}
