//! Filesystem slot storage
//!
//! Each slot is one file, `<dir>/<slot>.json`. Writes go to a temp file in
//! the same directory and are renamed over the target, so readers never see
//! a half-written blob. `<dir>/<slot>.lock` carries the cross-process lock.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::ports::{SlotLock, SlotStorage};

/// Slot storage backed by files in one directory
pub struct FileSlotStorage {
    dir: PathBuf,
}

/// Exclusive advisory lock, released when dropped
struct FileLockGuard {
    file: File,
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl FileSlotStorage {
    /// Create the storage directory if needed
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `slot`
    pub fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        validate_slot_name(slot)?;
        Ok(self.dir.join(format!("{}.json", slot)))
    }

    fn lock_path(&self, slot: &str) -> Result<PathBuf> {
        validate_slot_name(slot)?;
        Ok(self.dir.join(format!("{}.lock", slot)))
    }
}

/// Slot names become file names; keep them to a safe character set
fn validate_slot_name(slot: &str) -> Result<()> {
    let valid = !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::storage(format!("Invalid slot name: {:?}", slot)))
    }
}

impl SlotStorage for FileSlotStorage {
    fn name(&self) -> &str {
        "file"
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(slot)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, slot: &str, data: &[u8]) -> Result<()> {
        let path = self.slot_path(slot)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;

        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn lock(&self, slot: &str) -> Result<SlotLock> {
        let path = self.lock_path(slot)?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
        file.lock_exclusive()?;
        Ok(SlotLock::holding(FileLockGuard { file }))
    }
}
