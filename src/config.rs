use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const APP_DIR_NAME: &str = "photo-wall";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Settings resolved once at startup and shared read-only with every handler.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn new(upload_dir: PathBuf) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upload_dir,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match read("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };
        let max_upload_bytes = match read("MAX_UPLOAD_BYTES") {
            Some(value) => match value.parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "MAX_UPLOAD_BYTES",
                        value,
                    });
                }
            },
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        let host = read("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let upload_dir = read("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_upload_dir);

        Ok(Self {
            host,
            port,
            upload_dir,
            max_upload_bytes,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_upload_dir() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(env::temp_dir);
    base.push(APP_DIR_NAME);
    base.push("uploads");
    base
}
