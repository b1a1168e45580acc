#![allow(dead_code)]

use bootrt::{board::config::TIMER_ADDRESS, kernel::platform, CoreId, Platform};
use std::{
    cell::Cell,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicU32, Ordering},
        Mutex, OnceLock,
    },
};

/// Something the runtime asked of the hardware
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(String),
    Flush,
    Reboot,
}

/// Payload of the panic that stands in for a machine reset
pub struct Rebooted;

/// Records console traffic and resets; every thread is its own core
pub struct MockPlatform {
    events: Mutex<Vec<Event>>,
    ticks: AtomicU32,
}

thread_local! {
    static CORE: Cell<Option<CoreId>> = const { Cell::new(None) };
}

static NEXT_CORE: AtomicU32 = AtomicU32::new(0);

// SAFETY: Every thread gets its own identity, and threads stand in for cores
unsafe impl Platform for MockPlatform {
    fn core_id(&self) -> CoreId {
        CORE.with(|core| {
            if let Some(id) = core.get() {
                return id;
            }
            let id = CoreId::new(NEXT_CORE.fetch_add(1, Ordering::Relaxed));
            core.set(Some(id));
            id
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    unsafe fn read32(&self, address: u64) -> u32 {
        if address == TIMER_ADDRESS {
            self.ticks.fetch_add(1, Ordering::Relaxed)
        } else {
            address as u32
        }
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

impl MockPlatform {
    /// Removes and returns everything recorded so far
    pub fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Removes everything recorded so far, returning the console text
    pub fn take_output(&self) -> String {
        self.take_events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Write(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

/// The mock, registered as the runtime platform on first use
pub fn platform() -> &'static MockPlatform {
    static PLATFORM: OnceLock<&'static MockPlatform> = OnceLock::new();
    PLATFORM.get_or_init(|| {
        let mock: &'static MockPlatform = Box::leak(Box::new(MockPlatform {
            events: Mutex::new(Vec::new()),
            ticks: AtomicU32::new(0),
        }));
        platform::install(mock);
        mock
    })
}

/// Runs `f`, which must end in a machine reset
pub fn expect_reboot(f: impl FnOnce()) {
    let payload = panic::catch_unwind(AssertUnwindSafe(f)).expect_err("should have rebooted");
    assert!(payload.is::<Rebooted>(), "panicked without rebooting");
}
