use std::str::FromStr;
use thiserror::Error;

/// A single package registration: where the source for a logical import
/// path actually lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    /// Canonical registration key, e.g. `/lib1`. Always starts with `/`.
    pub path: String,
    /// Version-control system identifier (`git`, `hg`, ...). Opaque, not
    /// validated against a known set.
    pub vcs: String,
    /// Repository root URL. Opaque.
    pub repo: String,
    /// Optional documentation URL. When present, plain browser
    /// navigations are redirected here instead of shown the metadata page.
    pub doc: Option<String>,
}

/// A definition line that does not parse into a [`PackageRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRecordError {
    #[error("expected `<path> <vcs> <repo> [<doc>]`, found {found} field(s)")]
    MissingFields { found: usize },
    #[error("package path {path:?} must start with '/'")]
    RelativePath { path: String },
}

impl FromStr for PackageRecord {
    type Err = ParseRecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        let (Some(path), Some(vcs), Some(repo)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(ParseRecordError::MissingFields {
                found: line.split_whitespace().count(),
            });
        };
        if !path.starts_with('/') {
            return Err(ParseRecordError::RelativePath { path: path.to_owned() });
        }

        Ok(Self {
            path: path.to_owned(),
            vcs: vcs.to_owned(),
            repo: repo.to_owned(),
            doc: fields.next().map(str::to_owned),
        })
    }
}
