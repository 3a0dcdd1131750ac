//! Kernel utilities shared across the workspace.
//! Keep this crate lightweight; it holds the configuration types and the
//! layered config loader (file + `VHUB__`-prefixed env overrides).

pub mod config;
