//! Runtime support for a bare-metal boot environment
//!
//! Provides a recursive spinlock for mutual exclusion across cores, hex and
//! register dumps over the console, formatted output, busy-wait delays, and
//! the fatal path that reports a broken invariant and resets the machine.
//! The hardware underneath is reached through a registered `Platform`.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(clippy::correctness)]
#![warn(clippy::pedantic)]
#![warn(clippy::suspicious)]
#![warn(clippy::complexity)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![allow(clippy::module_name_repetitions)]

/// Architecture-specific implementations
pub mod architecture;
/// Board-specific implementations
pub mod board;
/// Generic implementations
pub mod kernel;
/// Synchronization primitives
pub mod sync;

pub use architecture::CoreId;
pub use kernel::{
    delay, fail_fatal, fail_fatal_on_condition, format_to_buffer, format_to_console, hexdump,
    regdump, Platform,
};
pub use sync::{RecursiveSpinLock, ReentrantGuard, ReentrantSpinLock};
