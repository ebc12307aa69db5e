//! Server configuration
//!
//! Optional TOML file first, then environment overrides. Invalid values are
//! logged and ignored.

use heaven_catalog::{Catalog, CatalogError};
use heaven_forms::{EmailJsNotifier, LogNotifier, Notifier, NotifierError, NotifySettings};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::{env, fs, io};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "heaven.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// External catalog file; the bundled catalog when unset
    pub catalog: Option<PathBuf>,
    pub emailjs: EmailJsConfig,
    pub notify: NotifySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailJsConfig {
    pub endpoint: String,
    pub private_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            catalog: None,
            emailjs: EmailJsConfig::default(),
            notify: NotifySettings::default(),
        }
    }
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            endpoint: EmailJsNotifier::DEFAULT_ENDPOINT.to_string(),
            private_key: None,
        }
    }
}

impl ServerConfig {
    /// Read `path` (or `heaven.toml` when present) and apply the process
    /// environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Override fields from `lookup`. Blank values count as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(bind) = var("HEAVEN_BIND") {
            try_parse("HEAVEN_BIND", &bind, &mut self.bind);
        }
        if let Some(catalog) = var("HEAVEN_CATALOG") {
            self.catalog = Some(PathBuf::from(catalog));
        }
        if let Some(endpoint) = var("EMAILJS_ENDPOINT") {
            self.emailjs.endpoint = endpoint;
        }
        if let Some(key) = var("EMAILJS_PRIVATE_KEY") {
            self.emailjs.private_key = Some(key);
        }

        let notify = &mut self.notify;
        for (key, field) in [
            ("EMAILJS_SERVICE_ID", &mut notify.service_id),
            ("EMAILJS_PUBLIC_KEY", &mut notify.public_key),
            ("EMAILJS_ADOPTION_TEMPLATE", &mut notify.adoption_template),
            ("EMAILJS_RELEASE_TEMPLATE", &mut notify.release_template),
            ("HEAVEN_OPERATOR_EMAIL", &mut notify.operator_email),
            ("HEAVEN_FALLBACK_CONTACT", &mut notify.fallback_contact),
        ] {
            if let Some(value) = var(key) {
                *field = value;
            }
        }
    }

    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Catalog::bundled(),
        }
    }

    /// EmailJS when credentials are present, otherwise a dry-run logger
    pub fn notifier(&self) -> Result<Arc<dyn Notifier>, NotifierError> {
        if !self.notify.is_configured() {
            warn!("EmailJS service id or public key not set, notifications will only be logged");
            return Ok(Arc::new(LogNotifier));
        }
        let notifier = EmailJsNotifier::new(&self.emailjs.endpoint, self.emailjs.private_key.clone())?;
        info!("Email notifications via {}", notifier.send_url());
        Ok(Arc::new(notifier))
    }
}

fn try_parse<T: FromStr>(key: &str, raw: &str, target: &mut T)
where
    T::Err: Display,
{
    match raw.parse() {
        Ok(value) => *target = value,
        Err(e) => warn!("Invalid {key} value {raw:?}: {e}, keeping current setting"),
    }
}
