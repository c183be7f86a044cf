use std::sync::{Arc, Mutex};

use crawl_monitor_core::SavedParameters;

/// Keeps the last submitted parameters between runs.
///
/// `save` is fire-and-forget: implementations log failures instead of returning them.
pub trait ConfigStore: Send {
    fn load(&self) -> Option<SavedParameters>;

    fn save(&self, record: &SavedParameters);
}

impl<T: ConfigStore + Sync + ?Sized> ConfigStore for Arc<T> {
    fn load(&self) -> Option<SavedParameters> {
        self.as_ref().load()
    }

    fn save(&self, record: &SavedParameters) {
        self.as_ref().save(record);
    }
}

/// In-process store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    record: Mutex<Option<SavedParameters>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SavedParameters) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Option<SavedParameters> {
        self.record.lock().ok().and_then(|guard| guard.clone())
    }

    fn save(&self, record: &SavedParameters) {
        if let Ok(mut guard) = self.record.lock() {
            *guard = Some(record.clone());
        }
    }
}
