/// The core lock: a spinlock that its holder may acquire again
mod recursive_spinlock;
pub use recursive_spinlock::RecursiveSpinLock;

/// Data protected by a `RecursiveSpinLock`, with RAII guards
mod reentrant;
pub use reentrant::{ReentrantGuard, ReentrantSpinLock};
