/// Event hints for waiting cores
pub mod event;
/// Core identification
pub mod machine;

pub use machine::CoreId;
