use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub feed: FeedConfig,
    pub store: StoreConfig,
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub refresh_interval: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    pub fetch_on_start: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "https://nasa-public-data.s3.amazonaws.com/iss-coords/current/ISS_OEM/ISS.OEM_J2K_EPH.txt"
                .to_string(),
            refresh_interval: Duration::from_secs(12 * 60 * 60),
            timeout: Duration::from_secs(30),
            fetch_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    File,
}

impl StoreBackend {
    /// Whether records outlive the process.
    pub fn is_persistent(self) -> bool {
        matches!(self, StoreBackend::File)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
    pub connect_attempts: u32,
    #[serde(deserialize_with = "deserialize_duration")]
    pub connect_backoff: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: PathBuf::from("data/state_vectors.json"),
            connect_attempts: 5,
            connect_backoff: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub enabled: bool,
    pub url: String,
    pub user_agent: String,
    pub zoom: u8,
    pub language: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "iss_tracker".to_string(),
            zoom: 15,
            language: "en".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Like [`Config::from_file`], but a missing file yields the defaults.
    pub fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path);
            Ok(Self::default())
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}
