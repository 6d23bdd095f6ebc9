//! Runtime server configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file, then
//! `IDENT_*` environment variables (e.g. `IDENT_PORT=8080`).

use std::path::{Path, PathBuf};

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  /// SQLite file path; `:memory:` opens a throwaway in-memory store.
  pub store_path:    PathBuf,
  /// When `false`, 500 responses carry a generic message instead of the
  /// underlying error.
  pub expose_errors: bool,
}

impl ServerConfig {
  /// Load from the file at `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_builder(
      Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(Environment::with_prefix("IDENT")),
    )
  }

  /// Apply defaults beneath whatever sources `builder` already carries.
  pub fn from_builder(
    builder: ConfigBuilder<DefaultState>,
  ) -> Result<Self, ConfigError> {
    builder
      .set_default("host", "0.0.0.0")?
      .set_default("port", 3000)?
      .set_default("store_path", "ident.sqlite3")?
      .set_default("expose_errors", true)?
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `true` if `store_path` asks for an in-memory store.
  pub fn in_memory(&self) -> bool { self.store_path == Path::new(":memory:") }
}
