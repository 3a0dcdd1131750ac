use crate::error::RegistryError;
use crate::record::PackageRecord;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// One complete package set, keyed by registered path.
pub type PackageMap = FxHashMap<String, PackageRecord>;

/// Authoritative, concurrency-safe view over package path -> record,
/// refreshed from a definition file.
///
/// The current package set lives behind a reader/writer lock as a shared
/// [`Arc`]: lookups clone the `Arc` under a short read hold and work on
/// that snapshot, [`reload`](Self::reload) parses the file on a private
/// map and takes the write hold only for the swap. Readers therefore
/// never block each other and never observe a half-built set.
#[derive(Debug)]
pub struct PackageRegistry {
    file: PathBuf,
    packages: RwLock<Arc<PackageMap>>,
}

impl PackageRegistry {
    /// Loads the definition file at `file` and returns a populated registry.
    ///
    /// # Errors
    /// Returns [`RegistryError::Io`] if the file cannot be opened or read,
    /// or [`RegistryError::Malformed`] if any non-blank line has fewer
    /// than three fields or a path without a leading `/`. No registry is
    /// constructed on failure.
    pub fn load(file: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let file = file.into();
        let packages = read_packages(&file)?;
        debug!(file = %file.display(), packages = packages.len(), "Package list loaded");

        Ok(Self { file, packages: RwLock::new(Arc::new(packages)) })
    }

    /// Path of the backing definition file.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Re-reads the definition file and atomically swaps in the new
    /// package set. Returns the size of the new set.
    ///
    /// # Errors
    /// Fails for the same reasons as [`load`](Self::load); on failure the
    /// previous package set stays authoritative and keeps serving.
    pub fn reload(&self) -> Result<usize, RegistryError> {
        let fresh = read_packages(&self.file)?;
        let count = fresh.len();
        *self.packages.write() = Arc::new(fresh);

        Ok(count)
    }

    /// Resolves `path` to the record registered at its longest
    /// `/`-boundary prefix.
    ///
    /// `/lib1/subdir/more` matches a record registered at `/lib1` when
    /// nothing longer is registered. Returns `None` when no registered
    /// path is a prefix of the request, which is a normal outcome, not an
    /// error.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<PackageRecord> {
        let snapshot = self.snapshot();

        let mut candidate = path;
        loop {
            if let Some(record) = snapshot.get(candidate) {
                return Some(record.clone());
            }
            // Strip the last segment; the root separator ends the search.
            match candidate.rfind('/') {
                Some(slash) if slash > 0 => candidate = &candidate[..slash],
                _ => return None,
            }
        }
    }

    /// One complete, immutable view of the current package set.
    ///
    /// The returned snapshot stays valid while held, even across
    /// concurrent reloads; it is freed once the last holder drops it.
    #[must_use]
    pub fn snapshot(&self) -> Arc<PackageMap> {
        Arc::clone(&self.packages.read())
    }

    /// Number of currently registered packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.read().len()
    }
}

fn read_packages(file: &Path) -> Result<PackageMap, RegistryError> {
    let io_err = |source| RegistryError::Io { path: file.to_path_buf(), source };
    let reader = BufReader::new(File::open(file).map_err(io_err)?);

    let mut packages = PackageMap::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }

        let record: PackageRecord = line.parse().map_err(|source| RegistryError::Malformed {
            path: file.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        // Last line wins on duplicate paths.
        packages.insert(record.path.clone(), record);
    }

    Ok(packages)
}
