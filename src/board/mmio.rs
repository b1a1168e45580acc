/// Memory mapped IO wrapper
pub struct Mmio<T> {
    /// Beginning address of the MMIO region
    start_addr: *mut T,
}

impl<T> Mmio<T> {
    /// Creates an MMIO wrapper at the given location
    /// # Safety
    /// `start_addr` must be correct, and should not be reused by anything else
    pub const unsafe fn new(start_addr: *mut T) -> Self {
        Self { start_addr }
    }
}

impl<T> core::ops::Deref for Mmio<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // SAFETY: By assumption, this dereference should be safe
        unsafe { &*self.start_addr }
    }
}

/// Reads a 32-bit hardware register
///
/// Every call performs a fresh access that is not merged or reordered with
/// other volatile accesses
/// # Safety
/// `address` must be a mapped, 4-byte aligned device register that is safe to read
#[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
pub unsafe fn read32(address: u64) -> u32 {
    // SAFETY: By assumption, the address is a readable register
    unsafe { core::ptr::read_volatile(address as usize as *const u32) }
}
