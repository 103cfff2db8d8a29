use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use tracing::warn;

use crate::db::RecordStore;
use crate::description::DescriptionGenerator;
use crate::error::DescriptionError;
use crate::latency::SimulatedNetwork;
use crate::sqlite::SqliteStorage;
use crate::storage::{KeyValueStore, MemoryStorage, UnavailableStorage};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(1000);

#[derive(Clone)]
pub struct StoreConfig {
    /// SQLite file to persist into. `None` keeps everything in memory.
    pub database_path: Option<PathBuf>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub simulated_latency: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            simulated_latency: DEFAULT_SIMULATED_LATENCY,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("database_path", &self.database_path)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("simulated_latency", &self.simulated_latency)
            .finish()
    }
}

impl StoreConfig {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let simulated_latency = match non_empty("JAMII_SIMULATED_LATENCY_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    warn!(value = %raw, "invalid JAMII_SIMULATED_LATENCY_MS, using default");
                    defaults.simulated_latency
                }
            },
            None => defaults.simulated_latency,
        };

        Self {
            database_path: non_empty("JAMII_DATABASE_PATH").map(PathBuf::from),
            gemini_api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            simulated_latency,
        }
    }

    /// The configured medium. A database that cannot be opened yields
    /// [`UnavailableStorage`], so the record store degrades instead of
    /// failing.
    pub fn open_storage(&self) -> Arc<dyn KeyValueStore> {
        match &self.database_path {
            None => Arc::new(MemoryStorage::new()),
            Some(path) => match SqliteStorage::open(path) {
                Ok(storage) => Arc::new(storage),
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "cannot open database, storage disabled"
                    );
                    Arc::new(UnavailableStorage)
                }
            },
        }
    }

    pub fn open_records(&self) -> RecordStore {
        RecordStore::open(self.open_storage())
    }

    pub fn description_generator(&self) -> Result<DescriptionGenerator, DescriptionError> {
        DescriptionGenerator::new(
            self.gemini_api_key.clone(),
            self.gemini_model.as_str(),
            self.gemini_base_url.as_str(),
        )
    }

    pub fn simulated_network(&self, records: RecordStore) -> SimulatedNetwork {
        SimulatedNetwork::new(records, self.simulated_latency)
    }
}
