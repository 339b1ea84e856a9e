//! Error types for burrow operations

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BurrowError {
    #[error("Invalid UTF-8 sequence at byte 0x{byte:02x}")]
    InvalidEncoding { byte: u8 },

    #[error("Codepoint 0x{0:x} is out of encodable range")]
    InvalidCodepoint(u32),

    #[error("Duplicate key: {name:?} is already indexed")]
    DuplicateKey { name: String },

    #[error("Unsupported entry type for {name:?} (only files and directories can be opened)")]
    Unsupported { name: String },

    #[error("Entry {name:?} not found in parent directory listing")]
    MissingEntry { name: String },

    #[error("No entry at position {0}")]
    NoSuchEntry(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Config already exists at {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("Invalid key binding: {0}")]
    InvalidKeymap(String),

    #[error("Could not open with {program:?}: {source}")]
    OpenerFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl BurrowError {
    /// True for input errors the loop can drop before reading the next key.
    pub fn is_transient_input(&self) -> bool {
        match self {
            Self::InvalidEncoding { .. } => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// True when the input source is exhausted.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}
