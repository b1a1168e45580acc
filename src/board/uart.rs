use super::mmio::Mmio;
use tock_registers::{
    interfaces::{Readable, Writeable},
    register_bitfields, register_structs,
    registers::{ReadOnly, WriteOnly},
};

register_bitfields! {u32,
    UTRSTAT [
        /// The transmit holding register can take another byte
        TX_BUFFER_EMPTY OFFSET(1) NUMBITS(1) [],
        /// Every byte has left the shifter
        TX_EMPTY OFFSET(2) NUMBITS(1) [],
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    pub RegisterBlock {
        (0x00 => _reserved0),
        (0x10 => UTRSTAT: ReadOnly<u32, UTRSTAT::Register>),
        (0x14 => _reserved1),
        (0x20 => UTXH: WriteOnly<u32>),
        (0x24 => @END),
    }
}

/// The boot console UART
///
/// Unbuffered: every byte goes straight to the transmit register, so writing
/// and flushing never need a lock
pub struct Uart {
    /// The UART registers, memory mapped
    registers: Mmio<RegisterBlock>,
}

// SAFETY: Registers are only touched one byte at a time. Output from several
// cores may interleave, but the device state stays consistent
unsafe impl Sync for Uart {}

impl Uart {
    /// Creates a UART instance
    /// # Safety
    /// The start address must be correct, and the range must not be used by anything else
    pub const unsafe fn new(start_address: *mut RegisterBlock) -> Self {
        Self {
            // SAFETY: By assumption, the start address is correct
            registers: unsafe { Mmio::new(start_address) },
        }
    }

    /// Sends a byte across the UART
    fn write_byte(&self, byte: u8) {
        while !self.registers.UTRSTAT.is_set(UTRSTAT::TX_BUFFER_EMPTY) {
            core::hint::spin_loop();
        }
        self.registers.UTXH.set(byte.into());
    }

    /// Sends every byte across the UART
    pub fn write_bytes(&self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }

    /// Waits until every written byte has been transmitted
    pub fn flush(&self) {
        while !self.registers.UTRSTAT.is_set(UTRSTAT::TX_EMPTY) {
            core::hint::spin_loop();
        }
    }
}
