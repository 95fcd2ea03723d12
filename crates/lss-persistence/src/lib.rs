//! Persistent option storage for label sheets.
//!
//! Widget options are written one key at a time through the [`OptionSink`]
//! trait. Two stores are provided:
//!
//! - [`JsonOptionStore`] keeps a JSON object on disk and rewrites it
//!   atomically (temp file + rename) on every write.
//! - [`MemoryOptionStore`] keeps everything in memory and records the write
//!   history, for hosts that persist elsewhere and for tests.

mod error;
mod io;
mod sink;
mod store;

pub use error::{PersistenceError, Result};
pub use io::{load_options_file, save_options_file};
pub use sink::OptionSink;
pub use store::{JsonOptionStore, MemoryOptionStore};
