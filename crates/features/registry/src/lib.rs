//! # Package registry
//!
//! The in-memory mapping from vanity import path to [`PackageRecord`],
//! loaded from a line-oriented definition file:
//!
//! ```text
//! /lib1 git ssh://git@bitbucket.org/user1/lib1
//! /lib2 hg ssh://hg@bitbucket.org/user2/lib2
//! /lib3 git ssh://git@go.mydomain.com/lib3 http://godoc.mydomain.com/lib3
//! ```
//!
//! Each non-blank line is `<path> <vcs> <repo> [<doc>]`. [`PackageRegistry::lookup`]
//! resolves request paths by longest registered prefix, so `/lib1/subdir`
//! finds the record registered at `/lib1`.
//!
//! Reloads swap the whole package set atomically: concurrent lookups
//! observe either the previous or the new set in full, never a mix, and a
//! failed reload leaves the previous set serving. [`watch::watch_packages`]
//! drives reloads from filesystem change events.

mod error;
mod record;
mod registry;
pub mod watch;

pub use crate::error::RegistryError;
pub use crate::record::{PackageRecord, ParseRecordError};
pub use crate::registry::{PackageMap, PackageRegistry};
