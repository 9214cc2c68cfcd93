use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use url::Url;

use crate::analysis::response::VarianceOrder;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Base name of the optional settings file (`rusty-pca.toml`, `.json`, `.yaml`…).
pub const SETTINGS_FILE: &str = "rusty-pca";

/// Prefix of the environment variables that override settings.
pub const ENV_PREFIX: &str = "RUSTY_PCA";

/// Runtime configuration of the client.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the analysis service; relative plot paths resolve against it.
    pub server_url: String,
    /// Path of the analysis endpoint, appended to the path of `server_url`
    /// (`http://host/pca` + `/analyze-pca/` posts to `http://host/pca/analyze-pca/`).
    pub endpoint: String,
    /// Upper bound on one upload-analyze round trip.
    pub timeout_secs: u64,
    /// Display order of the explained-variance lines.
    pub variance_order: VarianceOrder,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            endpoint: "/analyze-pca/".to_string(),
            timeout_secs: 120,
            variance_order: VarianceOrder::Server,
        }
    }
}

impl Settings {
    /// Layer defaults, the optional settings file and `RUSTY_PCA_*` variables.
    pub fn load() -> Result<Self> {
        Self::load_from(
            config::File::with_name(SETTINGS_FILE).required(false),
            config::Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        )
    }

    fn load_from<F, E>(file: F, env: E) -> Result<Self>
    where
        F: config::Source + Send + Sync + 'static,
        E: config::Source + Send + Sync + 'static,
    {
        let defaults = Settings::default();
        let settings: Settings = config::Config::builder()
            .set_default("server_url", defaults.server_url)?
            .set_default("endpoint", defaults.endpoint)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("variance_order", "server")?
            .add_source(file)
            .add_source(env)
            .build()
            .context("reading settings")?
            .try_deserialize()
            .context("parsing settings")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        self.endpoint_url()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parsed `server_url`.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.server_url)
            .with_context(|| format!("invalid server_url '{}'", self.server_url))
    }

    /// Full URL the CSV is posted to.
    pub fn endpoint_url(&self) -> Result<Url> {
        let mut base = self.base_url()?;
        // `join` replaces the last path segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(self.endpoint.trim_start_matches('/'))
            .with_context(|| format!("invalid endpoint '{}'", self.endpoint))
    }
}
