use std::path::PathBuf;

use chrono::Utc;
use crawl_monitor_core::SavedParameters;
use crawl_monitor_engine::{read_if_exists, AtomicFileWriter, ConfigStore};
use monitor_logging::{monitor_error, monitor_info, monitor_warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILENAME: &str = ".crawl_monitor.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedConfig {
    vendor_name: String,
    base_url: String,
    start_urls: Vec<String>,
    page_limit: u32,
    #[serde(default)]
    saved_at: Option<String>,
}

/// Keeps the last submitted job parameters in a RON file.
pub struct RonConfigStore {
    path: PathBuf,
}

impl RonConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ConfigStore for RonConfigStore {
    fn load(&self) -> Option<SavedParameters> {
        let content = match read_if_exists(&self.path) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(err) => {
                monitor_warn!("Failed to read saved config from {:?}: {}", self.path, err);
                return None;
            }
        };

        let persisted: PersistedConfig = match ron::from_str(&content) {
            Ok(persisted) => persisted,
            Err(err) => {
                monitor_warn!("Failed to parse saved config from {:?}: {}", self.path, err);
                return None;
            }
        };

        monitor_info!(
            "Loaded saved config from {:?} (saved at {})",
            self.path,
            persisted.saved_at.as_deref().unwrap_or("unknown time")
        );
        Some(SavedParameters {
            vendor_name: persisted.vendor_name,
            base_url: persisted.base_url,
            start_urls: persisted.start_urls,
            page_limit: persisted.page_limit,
        })
    }

    fn save(&self, record: &SavedParameters) {
        let persisted = PersistedConfig {
            vendor_name: record.vendor_name.clone(),
            base_url: record.base_url.clone(),
            start_urls: record.start_urls.clone(),
            page_limit: record.page_limit,
            saved_at: Some(Utc::now().to_rfc3339()),
        };

        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&persisted, pretty) {
            Ok(text) => text,
            Err(err) => {
                monitor_error!("Failed to serialize config: {}", err);
                return;
            }
        };

        let writer = AtomicFileWriter::new(self.path.clone());
        if let Err(err) = writer.write(&content) {
            monitor_error!("Failed to write config to {:?}: {}", writer.target(), err);
        }
    }
}
