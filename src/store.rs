//! Save slots: where the encoded save string lives between sessions.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::Result;

/// A single save slot holding one encoded save string.
pub trait SaveStore {
    /// The stored save, or `None` if the slot is empty.
    fn read(&self) -> Result<Option<String>>;

    fn write(&mut self, blob: &str) -> Result<()>;

    /// Empty the slot. Clearing an empty slot is not an error.
    fn clear(&mut self) -> Result<()>;
}

/// In-memory slot. Clones share the same slot, so a test can keep a handle
/// after giving one to the engine.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(blob.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&mut self, blob: &str) -> Result<()> {
        *self.slot.borrow_mut() = Some(blob.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

/// Slot backed by a single file on disk.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for FileStore {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, blob)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// localStorage のキー。
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "moneyTycoonSave";

/// Browser localStorage slot. Only available on wasm32.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| io::Error::other("localStorage is unavailable").into())
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorageStore {
    fn read(&self) -> Result<Option<String>> {
        get_storage()?
            .get_item(STORAGE_KEY)
            .map_err(|e| io::Error::other(format!("{e:?}")).into())
    }

    fn write(&mut self, blob: &str) -> Result<()> {
        get_storage()?
            .set_item(STORAGE_KEY, blob)
            .map_err(|e| io::Error::other(format!("{e:?}")).into())
    }

    fn clear(&mut self) -> Result<()> {
        get_storage()?
            .remove_item(STORAGE_KEY)
            .map_err(|e| io::Error::other(format!("{e:?}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_shares_slot_between_clones() {
        let store = MemoryStore::new();
        let mut handle = store.clone();
        assert_eq!(store.read().unwrap(), None);
        handle.write("abc").unwrap();
        assert_eq!(store.contents().as_deref(), Some("abc"));
        handle.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn file_store_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "money_tycoon_store_test_{}/slot.save",
            std::process::id()
        ));
        let mut store = FileStore::new(&path);
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);

        store.write("deadbeef").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("deadbeef"));

        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
        // Clearing twice is fine.
        store.clear().unwrap();
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir(dir);
        }
    }
}
