use std::path::Path;
use std::sync::{Arc, RwLock};

use config::{Config, Environment, File, Map};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{DatashapeError, Result};

/// Crate wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Strictness of types declared with `Strictness::Inherit`.
    pub default_strict: bool,
    /// Keep described types in the registry.
    pub cache_descriptors: bool,
    /// Directives for the log filter installed by `init_logging`.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_strict: false,
            cache_descriptors: true,
            log_filter: "warn".into(),
        }
    }
}

impl Settings {
    /// Reads settings from an optional file, then `DATASHAPE_*` environment
    /// variables, on top of the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, None)
    }

    /// As `load`, but reads the `DATASHAPE_*` variables from `env` instead of
    /// the process environment when given.
    pub fn load_from(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix("DATASHAPE").try_parsing(true).source(env))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

lazy_static! {
    static ref CURRENT: RwLock<Arc<Settings>> = RwLock::new(Arc::new(Settings::default()));
}

/// Settings in effect. Falls back to the defaults if the lock was poisoned.
pub fn current() -> Arc<Settings> {
    CURRENT
        .read()
        .map(|settings| Arc::clone(&settings))
        .unwrap_or_else(|_| Arc::new(Settings::default()))
}

pub fn install(settings: Settings) {
    match CURRENT.write() {
        Ok(mut current) => *current = Arc::new(settings),
        Err(poisoned) => *poisoned.into_inner() = Arc::new(settings),
    }
}

/// Installs a formatting subscriber filtered by `log_filter`.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let filter = EnvFilter::try_new(&settings.log_filter).map_err(|e| DatashapeError::Config(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| DatashapeError::Config(e.to_string()))
}
