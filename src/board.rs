/// Board constants
pub mod config;
/// Wrapper for memory-mapped registers
pub mod mmio;
/// Boot console UART
pub mod uart;
/// Machine reset through the watchdog
pub mod watchdog;

use uart::Uart;
use watchdog::Watchdog;

/// The devices backing the runtime on this board
#[cfg_attr(not(target_arch = "aarch64"), allow(dead_code))]
pub struct Board {
    /// Console output
    uart: Uart,
    /// Machine reset
    watchdog: Watchdog,
}

impl Board {
    /// Creates the board description
    /// # Safety
    /// The device addresses must be correct and owned by this board instance
    pub const unsafe fn new(uart: Uart, watchdog: Watchdog) -> Self {
        Self { uart, watchdog }
    }
}

#[cfg(target_arch = "aarch64")]
// SAFETY: `MPIDR_EL1` affinity is unique per core
unsafe impl crate::kernel::Platform for Board {
    fn core_id(&self) -> crate::architecture::CoreId {
        crate::architecture::machine::core_id()
    }

    unsafe fn read32(&self, address: u64) -> u32 {
        // SAFETY: By assumption, the address is a readable register
        unsafe { mmio::read32(address) }
    }

    fn console_write(&self, bytes: &[u8]) {
        self.uart.write_bytes(bytes);
    }

    fn console_flush(&self) {
        self.uart.flush();
    }

    fn reboot(&self) -> ! {
        #[cfg(feature = "qemu")]
        {
            use qemu_exit::QEMUExit;
            qemu_exit::AArch64::new().exit_failure();
        }
        #[cfg(not(feature = "qemu"))]
        self.watchdog.reset();
    }
}

/// The system-wide board
#[cfg(target_arch = "aarch64")]
#[allow(clippy::as_conversions)]
// SAFETY: These addresses are taken from the board's memory map
static BOARD: Board = unsafe {
    Board::new(
        Uart::new(config::UART_BASE as *mut uart::RegisterBlock),
        Watchdog::new(config::WATCHDOG_BASE as *mut watchdog::RegisterBlock),
    )
};

/// Registers this board as the runtime platform
///
/// Must run on the boot core before any other core is woken
#[cfg(target_arch = "aarch64")]
pub fn init() {
    crate::call_once!();
    crate::kernel::platform::install(&BOARD);
}
