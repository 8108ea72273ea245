//! Search history persistence for Skycast.
//!
//! The history is a single JSON array of `{city, date}` objects kept in one
//! file, `search_history.json` in the working directory by default. Records
//! are only ever appended.
//!
//! # Example
//!
//! ```no_run
//! use skycast_store::HistoryStore;
//!
//! let store = HistoryStore::open_default();
//! store.append_record("Berlin")?;
//!
//! for record in store.load()?.unwrap_or_default() {
//!     println!("{} at {}", record.city, record.date);
//! }
//! # Ok::<(), skycast_store::Error>(())
//! ```

mod error;
mod store;

pub use error::{Error, Result};
pub use store::HistoryStore;

/// File name of the history file.
pub const HISTORY_FILE_NAME: &str = "search_history.json";

/// Default history path, relative to the working directory.
pub fn default_history_path() -> std::path::PathBuf {
    std::path::PathBuf::from(HISTORY_FILE_NAME)
}
