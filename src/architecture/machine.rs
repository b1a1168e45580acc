use bitfield_struct::bitfield;
use derive_more::{Display, From};

/// Identifies an execution context (a CPU core)
///
/// Always non-negative, so it can never collide with the holder value of a
/// free lock
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, From)]
pub struct CoreId(u32);

impl CoreId {
    /// Wraps a raw core number
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw core number
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<CoreId> for i64 {
    fn from(core: CoreId) -> Self {
        core.0.into()
    }
}

impl TryFrom<i64> for CoreId {
    type Error = &'static str;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value).map_or(Err("Value is not a valid core identity"), |id| {
            Ok(Self(id))
        })
    }
}

/// Layout of `MPIDR_EL1`
#[bitfield(u64)]
pub struct Mpidr {
    /// Core within the cluster
    pub aff0: u8,
    /// Cluster
    pub aff1: u8,
    /// Die
    pub aff2: u8,
    /// Whether the lowest affinity level consists of hardware threads
    pub multithreading: bool,
    #[bits(5)]
    _res0: u8,
    /// Whether this is a uniprocessor system
    pub uniprocessor: bool,
    _res1: bool,
    /// Highest affinity level
    pub aff3: u8,
    #[bits(24)]
    _res2: u32,
}

impl Mpidr {
    /// Packs the affinity levels into a unique core number
    pub fn core_id(self) -> CoreId {
        CoreId(
            (u32::from(self.aff2()) << 16)
                | (u32::from(self.aff1()) << 8)
                | u32::from(self.aff0()),
        )
    }
}

/// Returns the identity of the calling core
#[cfg(target_arch = "aarch64")]
pub fn core_id() -> CoreId {
    use aarch64_cpu::registers::MPIDR_EL1;
    use tock_registers::interfaces::Readable;

    Mpidr::from(MPIDR_EL1.get()).core_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mpidr_affinity_packs_into_core_id() {
        // RES1 bit, uniprocessor clear, die 3, cluster 1, core 2
        let mpidr = Mpidr::from((1 << 31) | (3 << 16) | (1 << 8) | 2);
        assert_eq!(mpidr.aff0(), 2);
        assert_eq!(mpidr.aff1(), 1);
        assert_eq!(mpidr.aff2(), 3);
        assert!(!mpidr.uniprocessor());
        assert!(!mpidr.multithreading());
        assert_eq!(mpidr.aff3(), 0);
        assert_eq!(mpidr.core_id(), CoreId::new(0x03_01_02));
    }

    #[test]
    fn free_sentinel_is_not_a_core() {
        assert!(CoreId::try_from(-1_i64).is_err());
        assert_eq!(CoreId::try_from(7_i64), Ok(CoreId::new(7)));
        assert_eq!(i64::from(CoreId::new(u32::MAX)), i64::from(u32::MAX));
    }
}
