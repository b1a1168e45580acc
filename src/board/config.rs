/// Size of the console formatting buffer, including the terminator
pub const CONSOLE_BUFFER_SIZE: usize = 512;

/// Free-running 32-bit tick counter of the interrupt controller
pub const TIMER_ADDRESS: u64 = 0x2_3b10_8020;

/// Rate of the tick counter (24 MHz)
pub const TICKS_PER_MICROSECOND: u32 = 24;

/// Base of the boot console UART
pub const UART_BASE: usize = 0x2_3520_0000;

/// Base of the watchdog used to reset the machine
pub const WATCHDOG_BASE: usize = 0x2_3d2b_0000;
