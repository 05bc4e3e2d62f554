use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort loading the instruction catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read instruction catalog {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid instruction catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("instruction catalog has no `{0}` section")]
    MissingSection(&'static str),
    #[error("catalog entry {opcode:#04X} (prefixed: {prefixed}) has invalid cycles {cycles:?}")]
    InvalidCycles {
        opcode: u8,
        prefixed: bool,
        cycles: Vec<u32>,
    },
}
