//! Server configuration, layered from `config.toml` and `FLATSHARE_*`
//! environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Runtime server configuration. Every field has a default, so an absent
/// config file is not an error.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:     String,
  pub port:     u16,
  /// Created on startup if it does not exist.
  pub data_dir: PathBuf,
  /// File name of the SQLite database, relative to `data_dir`.
  pub db_file:  String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:     "127.0.0.1".to_owned(),
      port:     8080,
      data_dir: PathBuf::from("data"),
      db_file:  "roommates.db".to_owned(),
    }
  }
}

impl ServerConfig {
  /// Load `path` (optional) with environment overrides on top.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FLATSHARE").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn data_dir(&self) -> PathBuf { expand_tilde(&self.data_dir) }

  pub fn db_path(&self) -> PathBuf { self.data_dir().join(&self.db_file) }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
