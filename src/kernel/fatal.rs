//! The terminal path for irrecoverable failures
//!
//! Nothing here takes a lock: the failing core may already hold any number
//! of them, or another core may hold them forever.

use super::{platform, print, Platform};
use crate::architecture::event;
use core::fmt;

/// Prints `args`, flushes the console and resets the machine
///
/// Without a registered platform there is nowhere to report to, so the core
/// parks instead
pub fn fail_fatal(args: fmt::Arguments) -> ! {
    match platform::try_get() {
        Some(platform) => fail_fatal_on(platform, args),
        None => event::park(),
    }
}

/// Prints `args` to the console of `platform`, flushes it and resets the machine
pub fn fail_fatal_on(platform: &dyn Platform, args: fmt::Arguments) -> ! {
    print::format_to_console_on(platform, args);
    flush_and_reboot_on(platform)
}

/// Reports a failed invariant check and resets the machine
///
/// Invoked by `fatal_assert!`
#[cold]
pub fn fail_fatal_on_condition(expression: &str, file: &str, line: u32, function: &str) -> ! {
    fail_fatal(format_args!(
        "Assertion failed: '{expression}' on {file}:{line}:{function}\n"
    ))
}

/// Flushes the console and resets the machine
pub fn flush_and_reboot() -> ! {
    match platform::try_get() {
        Some(platform) => flush_and_reboot_on(platform),
        None => event::park(),
    }
}

/// Flushes the console of `platform`, then resets the machine
fn flush_and_reboot_on(platform: &dyn Platform) -> ! {
    platform.console_flush();
    platform.reboot()
}

/// Checks an invariant, escalating to `fail_fatal_on_condition` if it does
/// not hold
#[macro_export]
macro_rules! fatal_assert {
    ($cond:expr $(,)?) => {
        if !$cond {
            $crate::kernel::fatal::fail_fatal_on_condition(
                stringify!($cond),
                file!(),
                line!(),
                module_path!(),
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::architecture::CoreId;
    use std::{
        panic::{self, AssertUnwindSafe},
        sync::Mutex,
    };

    #[derive(Debug, PartialEq)]
    enum Event {
        Write(String),
        Flush,
        Reboot,
    }

    /// Payload of the panic standing in for a reset
    struct Rebooted;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<Event>>,
    }

    // SAFETY: Fatal path tests never lock through this platform
    unsafe impl Platform for Recorder {
        fn core_id(&self) -> CoreId {
            CoreId::new(0)
        }

        unsafe fn read32(&self, _address: u64) -> u32 {
            0
        }

        fn console_write(&self, bytes: &[u8]) {
            let text = String::from_utf8_lossy(bytes).into_owned();
            self.events.lock().unwrap().push(Event::Write(text));
        }

        fn console_flush(&self) {
            self.events.lock().unwrap().push(Event::Flush);
        }

        fn reboot(&self) -> ! {
            self.events.lock().unwrap().push(Event::Reboot);
            panic::panic_any(Rebooted)
        }
    }

    #[test]
    fn message_then_flush_then_reboot() {
        let recorder = Recorder::default();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            fail_fatal_on(&recorder, format_args!("bad state {}\n", 42))
        }));

        assert!(result.unwrap_err().is::<Rebooted>());
        assert_eq!(
            *recorder.events.lock().unwrap(),
            [
                Event::Write("bad state 42\n".into()),
                Event::Flush,
                Event::Reboot
            ]
        );
    }
}
