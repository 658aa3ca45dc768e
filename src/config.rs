//! Configuration file structures for mxpost.
//!
//! The configuration is read from a YAML file, then overridden by environment
//! variables prefixed with `MXPOST_`. Nested keys are separated by `__`.
//!
//! # Configuration File Format
//!
//! ```yaml
//! matrix:
//!   # URL of the homeserver
//!   base_url: "https://matrix.example.org"
//!   # Access token of the account
//!   access_token: "syt_xxx"
//!   # Optional, required for typing notifications
//!   user_id: "@bot:example.org"
//! ```
//!
//! # Environment Variable Overrides
//!
//! ```bash
//! export MXPOST_MATRIX__BASE_URL="https://matrix.example.org"
//! export MXPOST_MATRIX__ACCESS_TOKEN="syt_xxx"
//! export MXPOST_MATRIX__USER_ID="@bot:example.org"
//! ```

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Prefix of the environment variables overriding the file.
pub const ENV_PREFIX: &str = "MXPOST_";

/// Root configuration structure.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix account configuration
    pub matrix: Matrix,
}

/// Matrix homeserver and account configuration.
///
/// # YAML Section
///
/// ```yaml
/// matrix:
///   base_url: "https://matrix.example.org"
///   access_token: "syt_xxx"
///   user_id: "@bot:example.org"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Matrix {
    /// Base URL of the homeserver, without trailing slash once loaded.
    pub base_url: String,

    /// Access token sent as a bearer token on every request.
    pub access_token: String,

    /// Fully qualified Matrix user ID of the account, e.g. `@bot:example.org`.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Config {
    /// Loads the configuration from a YAML file and `MXPOST_` environment variables.
    ///
    /// Environment variables take precedence over the file. The trailing slash
    /// of `matrix.base_url` is removed.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, figment::Error> {
        let mut config: Config = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        while config.matrix.base_url.ends_with('/') {
            config.matrix.base_url.pop();
        }

        Ok(config)
    }
}
