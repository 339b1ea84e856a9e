//! Burrow Core - Incremental directory browsing
//!
//! This library provides the search engine behind the burrow browser: a
//! codepoint trie per directory, a cached tree of directory indices, and the
//! input loop that ties keystrokes to navigation.

pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod index;
pub mod navigate;
pub mod screen;
pub mod session;
pub mod trie;

pub use config::{Config, DEFAULT_CONFIG};
pub use error::BurrowError;
pub use fs::{Filesystem, ProcessFs, RawEntry, TrackedFs};
pub use index::{DirEntry, DirIndex, EntryKind, IndexId, IndexTree};
pub use navigate::{Navigator, NavigatorOptions, Outcome};
pub use session::{Exit, Keymap, Session, Step};
pub use trie::{NodeId, Trie};

/// Result type alias for burrow operations
pub type Result<T> = std::result::Result<T, BurrowError>;
