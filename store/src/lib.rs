//! Persisted records for the Jamii listing feed: users, listings and the
//! signed-in session, stored as JSON documents in a key-value medium.

pub mod config;
pub mod db;
pub mod description;
pub mod error;
pub mod latency;
pub mod seed;
pub mod sqlite;
pub mod storage;

pub use config::StoreConfig;
pub use db::RecordStore;
pub use description::{DescriptionGenerator, ListingBrief};
pub use error::{DescriptionError, StorageError};
pub use latency::{Deferred, SimulatedNetwork};
pub use sqlite::SqliteStorage;
pub use storage::{KeyValueStore, MemoryStorage, UnavailableStorage};
