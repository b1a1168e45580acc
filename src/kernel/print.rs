use super::{platform, Platform};
use crate::board::config::CONSOLE_BUFFER_SIZE;
use core::fmt::{self, Write};

/// Stores formatted output up to a capacity, but counts all of it
struct Truncating<'a> {
    /// Destination of the stored bytes
    buffer: &'a mut [u8],
    /// Maximum number of bytes to store
    capacity: usize,
    /// Number of bytes produced so far, stored or not
    len: usize,
}

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let stored = self.len.min(self.capacity);
        let count = s.len().min(self.capacity - stored);
        self.buffer[stored..stored + count].copy_from_slice(&s.as_bytes()[..count]);
        self.len += s.len();
        Ok(())
    }
}

/// Formats into `buffer`, storing at most `buffer.len() - 1` bytes followed by
/// a NUL terminator
///
/// Returns the length the output would have had without truncation
pub fn format_to_buffer(buffer: &mut [u8], args: fmt::Arguments) -> usize {
    let capacity = buffer.len().saturating_sub(1);
    let len = {
        let mut writer = Truncating {
            buffer: &mut *buffer,
            capacity,
            len: 0,
        };
        // A failing `Display` impl only cuts the output short
        _ = writer.write_fmt(args);
        writer.len
    };

    if let Some(terminator) = buffer.get_mut(len.min(capacity)) {
        *terminator = 0;
    }
    len
}

/// Formats to the console of `platform` through a fixed-size buffer
///
/// Output past the buffer is clipped; the untruncated length is returned
pub fn format_to_console_on(platform: &dyn Platform, args: fmt::Arguments) -> usize {
    let mut buffer = [0_u8; CONSOLE_BUFFER_SIZE];
    let len = format_to_buffer(&mut buffer, args);
    platform.console_write(&buffer[..len.min(CONSOLE_BUFFER_SIZE - 1)]);
    len
}

/// Formats to the console of the registered platform
///
/// Before a platform is registered nothing is written, but the length is
/// still reported
pub fn format_to_console(args: fmt::Arguments) -> usize {
    match platform::try_get() {
        Some(platform) => format_to_console_on(platform, args),
        None => format_to_buffer(&mut [], args),
    }
}

/// Unbuffered writer straight to the console of a platform
pub struct ConsoleWriter<'a>(pub &'a dyn Platform);

impl Write for ConsoleWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.console_write(s.as_bytes());
        Ok(())
    }
}

pub fn _print(args: fmt::Arguments) {
    format_to_console(args);
}

/// Print to the console
// <https://doc.rust-lang.org/src/std/macros.rs.html>
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::kernel::print::_print(format_args!($($arg)*)));
}

/// Print, with a newline, to the console
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}

/// Prints info prefixed with core ID and timestamp
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => ({
        let timestamp: core::time::Duration = $crate::kernel::time::now();

        $crate::println!(
            "[CORE {:2}, {}.{:03}s] {}",
            $crate::kernel::platform::get().core_id(),
            timestamp.as_secs(),
            timestamp.subsec_millis(),
            format_args!($($arg)*)
        );
    })
}
