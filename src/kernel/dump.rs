//! Hex dumps of memory and device registers

use super::{platform, print::ConsoleWriter, Platform};
use core::fmt::{self, Write};

/// Bytes per hex dump row
const HEXDUMP_ROW: usize = 16;
/// Bytes per register dump row
const REGDUMP_ROW: u64 = 32;

/// Renders a byte as itself if printable, otherwise as `.`
fn printable(byte: u8) -> char {
    match byte {
        0x20..=0x7e => char::from(byte),
        _ => '.',
    }
}

/// Writes `data` as rows of offset, hex bytes and ASCII
///
/// Offsets are relative to the start of `data`
pub fn hexdump_to<W: Write + ?Sized>(out: &mut W, data: &[u8]) -> fmt::Result {
    for (row, chunk) in data.chunks(HEXDUMP_ROW).enumerate() {
        write!(out, "{:08x}  ", row * HEXDUMP_ROW)?;
        for index in 0..HEXDUMP_ROW {
            match chunk.get(index) {
                Some(byte) => write!(out, "{byte:02x} ")?,
                None => out.write_str("   ")?,
            }
        }

        out.write_char(' ')?;
        for index in 0..HEXDUMP_ROW {
            out.write_char(chunk.get(index).copied().map_or(' ', printable))?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

/// Hex dumps `data` to the console
pub fn hexdump(data: &[u8]) {
    if let Some(platform) = platform::try_get() {
        _ = hexdump_to(&mut ConsoleWriter(platform), data);
    }
}

/// Hex dumps `len` bytes of memory starting at `address` to the console
/// # Safety
/// The whole range must be readable memory that is not being written concurrently
pub unsafe fn hexdump_raw(address: *const u8, len: usize) {
    // SAFETY: By assumption, the range is valid for reads
    hexdump(unsafe { core::slice::from_raw_parts(address, len) });
}

/// Writes rows of eight 32-bit registers, read live through `platform`,
/// covering `len` bytes from `base`
///
/// A partial final row still reads all eight registers
/// # Safety
/// Every register in the covered rows must be safe to read
pub unsafe fn regdump_to<W: Write + ?Sized>(
    out: &mut W,
    platform: &dyn Platform,
    base: u64,
    len: u64,
) -> fmt::Result {
    for offset in (0..len).step_by(REGDUMP_ROW as usize) {
        let row = base.wrapping_add(offset);
        write!(out, "{row:016x}  ")?;
        for word in (0..REGDUMP_ROW).step_by(4) {
            // SAFETY: By assumption, the register is readable
            let value = unsafe { platform.read32(row.wrapping_add(word)) };
            write!(out, "{value:08x} ")?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

/// Dumps the registers covering `len` bytes from `base` to the console
/// # Safety
/// Every register in the covered rows must be safe to read
pub unsafe fn regdump(base: u64, len: u64) {
    if let Some(platform) = platform::try_get() {
        // SAFETY: By assumption, the registers are readable
        _ = unsafe { regdump_to(&mut ConsoleWriter(platform), platform, base, len) };
    }
}
