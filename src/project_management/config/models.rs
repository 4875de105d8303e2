use serde::{Deserialize, Serialize};

/// Application environment of a bima project (`.env`, YAML or JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppEnv {
    pub debug: bool,
    pub http_port: u16,
    pub rpc_port: u16,
    pub service: String,
    pub secret: String,
    pub cache_lifetime: u32,
    pub db: DbConfig,
}

/// Database settings; only `driver` is consumed by the module generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub driver: String,
}

impl AppEnv {
    pub fn driver(&self) -> &str {
        &self.db.driver
    }
}
