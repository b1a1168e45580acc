use super::mmio::Mmio;
use crate::architecture::event;
use core::sync::atomic::{AtomicBool, Ordering};
use tock_registers::{
    interfaces::{ReadWriteable, Writeable},
    register_bitfields, register_structs,
    registers::ReadWrite,
};

register_bitfields! {u32,
    CONTROL [
        /// Reset the machine when the counter reaches the alarm value
        RESET_ENABLE OFFSET(2) NUMBITS(1) [],
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    pub RegisterBlock {
        (0x00 => _reserved0),
        (0x10 => COUNTER: ReadWrite<u32>),
        (0x14 => ALARM: ReadWrite<u32>),
        (0x18 => _reserved1),
        (0x1c => CONTROL: ReadWrite<u32, CONTROL::Register>),
        (0x20 => @END),
    }
}

/// The chip watchdog, used to reset the whole machine
pub struct Watchdog {
    /// The watchdog registers, memory mapped
    registers: Mmio<RegisterBlock>,
}

// SAFETY: The only operation is the final reset, guarded below
unsafe impl Sync for Watchdog {}

impl Watchdog {
    /// Creates a watchdog instance
    /// # Safety
    /// The start address must be correct, and the range must not be used by anything else
    pub const unsafe fn new(start_address: *mut RegisterBlock) -> Self {
        Self {
            // SAFETY: By assumption, the start address is correct
            registers: unsafe { Mmio::new(start_address) },
        }
    }

    /// Resets the machine
    pub fn reset(&self) -> ! {
        /// Stores whether or not a reset has already been requested
        static RESET_CALLED: AtomicBool = AtomicBool::new(false);
        if !RESET_CALLED.swap(true, Ordering::Relaxed) {
            self.registers.COUNTER.set(0);
            self.registers.ALARM.set(1);
            self.registers.CONTROL.modify(CONTROL::RESET_ENABLE::SET);
        }

        // The reset lands asynchronously; another core may already be resetting
        event::park()
    }
}
