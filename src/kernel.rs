/// Memory and register dumps
pub mod dump;
/// The fatal escalation path
pub mod fatal;
/// Things that should happen once
mod once;
/// Panic handling
#[cfg(target_os = "none")]
mod panic;
/// The hardware services the runtime depends on
pub mod platform;
/// Formatted output to buffers and the console
pub mod print;
/// Tick counter and busy-wait delays
pub mod time;

pub use dump::{hexdump, regdump};
pub use fatal::{fail_fatal, fail_fatal_on_condition, flush_and_reboot};
pub use once::SetOnce;
pub use platform::Platform;
pub use print::{format_to_buffer, format_to_console};
pub use time::delay;
