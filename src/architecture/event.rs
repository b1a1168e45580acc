/// Waits for an event from another core
///
/// May return spuriously, so callers must recheck their condition
#[inline]
pub fn wait() {
    #[cfg(target_arch = "aarch64")]
    aarch64_cpu::asm::wfe();
    #[cfg(not(target_arch = "aarch64"))]
    core::hint::spin_loop();
}

/// Wakes any cores waiting in `wait`
#[inline]
pub fn wake() {
    #[cfg(target_arch = "aarch64")]
    aarch64_cpu::asm::sev();
}

/// Parks the current core forever in a low-power state
pub fn park() -> ! {
    loop {
        wait();
    }
}
