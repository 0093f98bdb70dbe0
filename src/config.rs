use crate::constants::{
    API_KEY_ENV, API_URL_ENV, BUSINESS_NAME_COLUMN, DEFAULT_CONFIG_FILENAME, DEFAULT_INPUT_FILENAME,
    DEFAULT_OUTPUT_FILENAME, DEFAULT_PHOTO_MAX_WIDTH, DEFAULT_REQUEST_TIMEOUT_SECS, FIELD_MASK,
    PLACES_API_URL, PLACES_PHOTO_BASE_URL,
};
use crate::error::{EnricherError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Places API credential. Never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Settings for the enrichment run, read from an optional TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnricherConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub name_column: String,
    pub places: PlacesConfig,
    /// Upper bound on photo columns; unset keeps every photo the API returns
    pub max_photos: Option<usize>,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_FILENAME),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            name_column: BUSINESS_NAME_COLUMN.to_string(),
            places: PlacesConfig::default(),
            max_photos: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub api_url: String,
    pub photo_base_url: String,
    pub field_mask: String,
    pub photo_max_width: u32,
    pub request_timeout_secs: u64,
    /// Filled from the environment only
    #[serde(skip)]
    pub api_key: ApiKey,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_url: PLACES_API_URL.to_string(),
            photo_base_url: PLACES_PHOTO_BASE_URL.to_string(),
            field_mask: FIELD_MASK.to_string(),
            photo_max_width: DEFAULT_PHOTO_MAX_WIDTH,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            api_key: ApiKey::default(),
        }
    }
}

impl PlacesConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl EnricherConfig {
    /// Load configuration: TOML file, then `.env` and process environment.
    ///
    /// With `path == None` the default `enricher.toml` is used when it exists.
    /// An explicitly named file must exist. A missing or empty
    /// `GOOGLE_PLACES_API_KEY` is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        dotenv::dotenv().ok();
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EnricherError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EnricherConfig = toml::from_str(content)?;
        if config.max_photos == Some(0) {
            return Err(EnricherError::Config("max_photos must be at least 1".into()));
        }
        Ok(config)
    }

    /// Fill environment-sourced settings through `lookup` so tests can supply
    /// a fake environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.places.api_url = url.trim().to_string();
        }

        let key = lookup(API_KEY_ENV).map(|k| k.trim().to_string()).unwrap_or_default();
        if key.is_empty() {
            return Err(EnricherError::Config(format!(
                "{} environment variable is not set. Please create a .env file with this variable.",
                API_KEY_ENV
            )));
        }
        self.places.api_key = ApiKey::new(key);
        Ok(())
    }
}
