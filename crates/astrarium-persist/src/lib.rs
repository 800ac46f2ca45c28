pub mod compat;
pub mod discovery;
pub mod error;
pub mod format;
pub mod kv;
pub mod record;
pub mod session;

pub use discovery::DiscoveryStore;
pub use error::PersistError;
pub use kv::{KeyValueStore, MemoryStore, UnavailableStore};
pub use record::DiscoveryRecord;
