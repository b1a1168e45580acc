use super::{platform, Platform};
use crate::board::config::{TICKS_PER_MICROSECOND, TIMER_ADDRESS};
use core::{hint, time::Duration};

/// Longest stretch measured against a single counter reading
///
/// Kept at half the counter range, so a late sample cannot wrap past the target
const MAX_SPAN: u32 = u32::MAX / 2;

/// The number of nanoseconds per microsecond
const NANOSEC_PER_MICROSEC: u64 = 1_000;

/// Encloses a value of the free-running tick counter
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub struct Tick {
    /// The tick value
    tick: u32,
}

impl Tick {
    /// Reads the counter of `platform`
    pub fn current_on(platform: &dyn Platform) -> Self {
        // SAFETY: The timer register is always mapped and side-effect free to read
        let tick = unsafe { platform.read32(TIMER_ADDRESS) };
        Self { tick }
    }

    /// Ticks elapsed since `self`, assuming fewer than one full wrap
    pub const fn elapsed_until(self, later: Self) -> u32 {
        later.tick.wrapping_sub(self.tick)
    }
}

impl From<Tick> for Duration {
    fn from(tick: Tick) -> Self {
        Self::from_nanos(
            u64::from(tick.tick) * NANOSEC_PER_MICROSEC / u64::from(TICKS_PER_MICROSECOND),
        )
    }
}

/// Returns the current counter value as time since the counter last wrapped
pub fn now() -> Duration {
    Tick::current_on(platform::get()).into()
}

/// Spins until at least `ticks` counter ticks have passed on `platform`
fn spin_ticks(platform: &dyn Platform, mut ticks: u64) {
    while ticks > 0 {
        let span = u32::try_from(ticks).unwrap_or(MAX_SPAN).min(MAX_SPAN);
        let start = Tick::current_on(platform);
        while start.elapsed_until(Tick::current_on(platform)) < span {
            hint::spin_loop();
        }
        ticks -= u64::from(span);
    }
}

/// Busy-waits for at least `microseconds`, measured on the tick counter of `platform`
pub fn delay_on(platform: &dyn Platform, microseconds: u32) {
    spin_ticks(
        platform,
        u64::from(microseconds) * u64::from(TICKS_PER_MICROSECOND),
    );
}

/// Busy-waits for at least `microseconds`
pub fn delay(microseconds: u32) {
    delay_on(platform::get(), microseconds);
}
