use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::project_management::config::models::{AppEnv, DbConfig};
use crate::shared::error::BimaError;

/// Supported application config formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    DotEnv,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect the format from the file name (`.env`, `prod.env`, `config.yaml`, ...).
    pub fn from_path(path: &Path) -> Result<Self, BimaError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if file_name == ".env" || file_name.ends_with(".env") {
            return Ok(ConfigFormat::DotEnv);
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(BimaError::Config {
                path: path.to_path_buf(),
                message: "unsupported config format (expected .env, .yaml or .json)".to_string(),
            }),
        }
    }
}

pub trait ConfigLoader {
    fn load(&self, path: &Path, format: ConfigFormat) -> Result<AppEnv, BimaError>;
}

/// Reads application config from disk.
pub struct FileConfigLoader;

impl ConfigLoader for FileConfigLoader {
    fn load(&self, path: &Path, format: ConfigFormat) -> Result<AppEnv, BimaError> {
        debug!(path = %path.display(), ?format, "loading application config");

        match format {
            ConfigFormat::DotEnv => {
                let iter = dotenvy::from_path_iter(path).map_err(|e| config_error(path, e))?;
                let mut vars = HashMap::new();
                for item in iter {
                    let (key, value) = item.map_err(|e| config_error(path, e))?;
                    vars.insert(key, value);
                }
                Ok(from_env_vars(&vars))
            }
            ConfigFormat::Yaml => {
                let content = read(path)?;
                serde_yaml::from_str(&content).map_err(|e| config_error(path, e))
            }
            ConfigFormat::Json => {
                let content = read(path)?;
                serde_json::from_str(&content).map_err(|e| config_error(path, e))
            }
        }
    }
}

/// Load `path` with the format its name implies. A missing file yields the
/// default environment (no driver).
pub fn load_or_default(loader: &dyn ConfigLoader, path: &Path) -> Result<AppEnv, BimaError> {
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using an empty environment");
        return Ok(AppEnv::default());
    }
    loader.load(path, ConfigFormat::from_path(path)?)
}

fn read(path: &Path) -> Result<String, BimaError> {
    fs::read_to_string(path).map_err(|e| BimaError::io("read", path, e))
}

fn config_error(path: &Path, error: impl std::fmt::Display) -> BimaError {
    BimaError::Config {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

/// Map `KEY=value` pairs onto [`AppEnv`]. Unparsable numbers become 0 and
/// unparsable booleans false.
pub fn from_env_vars(vars: &HashMap<String, String>) -> AppEnv {
    let text = |key: &str| vars.get(key).cloned().unwrap_or_default();
    let number = |key: &str| vars.get(key).and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(0);

    AppEnv {
        debug: vars
            .get("APP_DEBUG")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(false),
        http_port: number("APP_PORT") as u16,
        rpc_port: number("GRPC_PORT") as u16,
        service: text("APP_NAME"),
        secret: text("APP_SECRET"),
        cache_lifetime: number("CACHE_LIFETIME") as u32,
        db: DbConfig {
            host: text("DB_HOST"),
            port: number("DB_PORT") as u16,
            user: text("DB_USER"),
            password: text("DB_PASSWORD"),
            name: text("DB_NAME"),
            driver: text("DB_DRIVER"),
        },
    }
}
