use crate::record::ParseRecordError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or reloading the package definition file.
///
/// Any error aborts the whole load; the registry never keeps a partially
/// parsed package set.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read package list {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed package list {path} at line {line}: {source}", path = .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParseRecordError,
    },
}
