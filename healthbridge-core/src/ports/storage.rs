//! Slot storage port - named byte slots
//!
//! A slot is a single named blob, the same shape as a key in a mobile
//! key/value defaults store. The account store keeps its whole collection
//! in one slot and always rewrites it in a single `write`.

use crate::domain::result::Result;

/// Held for the duration of a read-modify-write on one slot
///
/// Adapters that can be shared between processes return a guard that
/// releases an OS-level lock on drop; the rest return an unlocked guard.
pub struct SlotLock {
    _guard: Option<Box<dyn Send>>,
}

impl SlotLock {
    /// A guard that holds nothing
    pub fn unlocked() -> Self {
        Self { _guard: None }
    }

    /// A guard that keeps `guard` alive until dropped
    pub fn holding<G: Send + 'static>(guard: G) -> Self {
        Self {
            _guard: Some(Box::new(guard)),
        }
    }

    pub fn is_held(&self) -> bool {
        self._guard.is_some()
    }
}

/// Named-slot storage abstraction
///
/// Implementations (adapters) decide where bytes live. All calls are
/// synchronous and complete in the time of a local read or write.
pub trait SlotStorage: Send + Sync {
    /// Backend name (e.g., "file", "duckdb", "memory")
    fn name(&self) -> &str;

    /// Human-readable location of the data
    fn location(&self) -> String;

    /// Read a slot; `None` if it was never written or has been removed
    fn read(&self, slot: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the whole content of a slot
    fn write(&self, slot: &str, data: &[u8]) -> Result<()>;

    /// Remove a slot; removing a missing slot is not an error
    fn remove(&self, slot: &str) -> Result<()>;

    /// Exclusive lock on a slot for a read-modify-write sequence
    fn lock(&self, _slot: &str) -> Result<SlotLock> {
        Ok(SlotLock::unlocked())
    }
}
