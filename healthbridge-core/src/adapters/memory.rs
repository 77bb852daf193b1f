//! In-memory slot storage (process-local, not durable)

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::result::{Error, Result};
use crate::ports::SlotStorage;

#[derive(Default)]
pub struct MemorySlotStorage {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.slots
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }
}

impl SlotStorage for MemorySlotStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn location(&self) -> String {
        ":memory:".to_string()
    }

    fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots()?.get(slot).cloned())
    }

    fn write(&self, slot: &str, data: &[u8]) -> Result<()> {
        self.slots()?.insert(slot.to_string(), data.to_vec());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<()> {
        self.slots()?.remove(slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_and_remove() {
        let storage = MemorySlotStorage::new();
        assert_eq!(storage.read("x").unwrap(), None);

        storage.write("x", b"hello").unwrap();
        assert_eq!(storage.read("x").unwrap(), Some(b"hello".to_vec()));

        storage.remove("x").unwrap();
        assert_eq!(storage.read("x").unwrap(), None);
    }

    #[test]
    fn test_lock_is_unlocked() {
        let storage = MemorySlotStorage::new();
        assert!(!storage.lock("x").unwrap().is_held());
    }
}
