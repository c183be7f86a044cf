use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crawl_monitor_core::{JobInput, SavedParameters};
use crawl_monitor_engine::{ApiRoutes, ClientSettings, MonitorSettings};
use log::LevelFilter;

use super::logging::LogDestination;
use super::persistence::DEFAULT_CONFIG_FILENAME;

/// Submit a crawl job to the vendor import engine and follow it until it finishes.
///
/// Job fields left out on the command line are taken from the last run.
#[derive(Debug, Clone, Parser)]
#[command(name = "crawl-monitor", version)]
pub struct Cli {
    /// Base URL of the crawl engine.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    pub server: String,

    /// Vendor the crawl imports products for.
    #[arg(long)]
    pub vendor: Option<String>,

    /// Vendor site root.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Page to start crawling from; repeat for several.
    #[arg(long = "start-url")]
    pub start_urls: Vec<String>,

    /// Maximum number of pages to crawl.
    #[arg(long)]
    pub page_limit: Option<String>,

    /// Delay between status checks.
    #[arg(long, default_value_t = 2000)]
    pub poll_interval_ms: u64,

    /// Use the /api/crawl/* endpoints instead of /jobs.
    #[arg(long)]
    pub legacy_routes: bool,

    /// Where the last submitted parameters are kept.
    #[arg(long, default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    /// One of error, warn, info, debug, trace.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn level(&self) -> LevelFilter {
        monitor_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// Command-line fields win; anything missing falls back to the saved record.
    pub fn job_input(&self, saved: Option<SavedParameters>) -> JobInput {
        let saved = saved.map(JobInput::from).unwrap_or_default();
        JobInput {
            vendor_name: self.vendor.clone().unwrap_or(saved.vendor_name),
            base_url: self.base_url.clone().unwrap_or(saved.base_url),
            start_urls: if self.start_urls.is_empty() {
                saved.start_urls
            } else {
                self.start_urls.clone()
            },
            page_limit: self.page_limit.clone().unwrap_or(saved.page_limit),
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server.clone(),
            routes: if self.legacy_routes {
                ApiRoutes::vendor_import()
            } else {
                ApiRoutes::default()
            },
            ..ClientSettings::default()
        }
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}
