use config::{Config, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised while building the layered configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub packages: PackagesConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9090 }
    }
}

/// Package definition file location.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    /// Line-oriented definition file (`<path> <vcs> <repo> [<doc>]`).
    /// Leaving this unset is a fatal startup error.
    pub file: PathBuf,
}

/// A reusable configuration loader that combines file-based settings with
/// environment overrides.
///
/// 1. **Base file**: settings from `path` (e.g. `server.toml`); defaults
///    to the `server` file in the current working directory.
/// 2. **Environment overrides**: values from variables prefixed with
///    `VHUB__`, nested structures separated by double underscores
///    (e.g. `VHUB__PACKAGES__FILE` maps to `packages.file`).
///
/// # Errors
/// Fails if the configuration file cannot be found or its contents do not
/// match the structure of `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    info!("Loading config from {}", effective_path.display());

    build_config(effective_path.as_path(), environment())
}

fn environment() -> Environment {
    Environment::with_prefix("VHUB")
        .separator("__")
        .convert_case(config::Case::Snake)
}

fn build_config<T>(path: &Path, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(env)
        .build()?
        .try_deserialize::<T>()?;

    Ok(config)
}
