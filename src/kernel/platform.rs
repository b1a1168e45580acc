use super::SetOnce;
use crate::architecture::CoreId;

/// The hardware services the runtime is built on
///
/// Implemented by the board; tests substitute their own
/// # Safety
/// `core_id` must return the identity of the executing core, and no two
/// contexts that may run concurrently may share an identity. The lock
/// operations that query it rely on this for mutual exclusion
pub unsafe trait Platform: Sync {
    /// Identity of the calling core, stable for the life of the calling context
    fn core_id(&self) -> CoreId;

    /// Reads a 32-bit hardware register with volatile semantics
    /// # Safety
    /// `address` must be a mapped register that is safe to read
    unsafe fn read32(&self, address: u64) -> u32;

    /// Appends bytes to the console output, which may be buffered
    fn console_write(&self, bytes: &[u8]);

    /// Forces any buffered console output out before returning
    fn console_flush(&self);

    /// Irreversibly resets the machine
    fn reboot(&self) -> !;
}

/// The platform the runtime was started on
static PLATFORM: SetOnce<&'static dyn Platform> = SetOnce::new();

/// Registers the platform for the rest of the program
///
/// Panics if a platform was already registered
pub fn install(platform: &'static dyn Platform) {
    PLATFORM.set(platform);
}

/// Returns the registered platform, if any
pub fn try_get() -> Option<&'static dyn Platform> {
    PLATFORM.try_get().copied()
}

/// Returns the registered platform
///
/// Panics if no platform has been registered
pub fn get() -> &'static dyn Platform {
    *PLATFORM.get()
}
