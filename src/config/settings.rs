use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub menu: MenuConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MenuConfig {
    /// Menu structure cache TTL in seconds (default 1 hour)
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    /// Root folder id for the news category tree
    #[serde(default = "default_news_root_folder_id")]
    pub news_root_folder_id: i32,
}

fn default_cache_ttl_seconds() -> u64 {
    3600
}

fn default_news_root_folder_id() -> i32 {
    11
}

impl MenuConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder()
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        // Plain DATABASE_URL wins over the config file
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_config_defaults() {
        let menu: MenuConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(menu.cache_ttl_seconds, 3600);
        assert_eq!(menu.news_root_folder_id, 11);
        assert_eq!(menu.cache_ttl(), Duration::from_secs(3600));
    }
}
