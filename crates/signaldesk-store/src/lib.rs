pub mod error;
pub mod memory;
pub mod repository;
pub mod sqlite;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use repository::{
    history_repository, watchlist_repository, JsonRepository, Repository, Unreadable,
};
pub use sqlite::SqliteStore;
pub use store::{CachedStore, KeyValueStore};
