//! Metra Store - Favorites and history persistence
//!
//! Best-effort local storage. Lists live as JSON arrays under fixed keys;
//! an unreadable value is treated as an empty list rather than an error.

mod favorites;
mod history;
mod store;

pub use favorites::{Favorite, Favorites, FAVORITES_KEY};
pub use history::{History, DEFAULT_HISTORY_LIMIT, HISTORY_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
