use crate::cli::ServeArgs;
use crate::error::AppResult;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

const TRACE_LEVELS: [&'static str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
const LOCAL_SETTINGS_YAML_FILE: &str = ".env.local.yaml";

// All settings may be configured via environment variables. Example:
// REDIS_URL="redis://cache:6379" would set redis_url to that value.
// Flags given on the command line win over both the yaml file and the environment.
#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    #[serde(default = "default_trace_level")]
    trace_level: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    // Without a MongoDB URI, scan results only live in memory.
    pub mongodb_uri: Option<String>,
    #[serde(default = "default_mongodb_database")]
    pub mongodb_database: String,
    pub redis_url: Option<String>,
    // In-process cache used when no redis_url is set
    #[serde(default)]
    pub local_cache: bool,
    #[serde(default = "default_cache_key_version")]
    pub cache_key_version: u32,
    #[serde(default = "default_cache_fresh_secs")]
    pub cache_fresh_secs: u64,
    #[serde(default = "default_cache_stale_secs")]
    pub cache_stale_secs: u64,
    #[serde(default = "default_cache_timeout_ms")]
    pub cache_timeout_ms: u64,
    #[serde(default = "default_cache_health_schedule")]
    pub cache_health_schedule: String,
}

impl Settings {
    pub fn load(overrides: &ServeArgs) -> AppResult<Self> {
        let mut figment = Figment::new();
        if Path::new(LOCAL_SETTINGS_YAML_FILE).exists() {
            println!(
                "\n######################################\n\
                   ##   Found '.env.local.yaml' file,  ##\n\
                   ##   loading local configuration.   ##\n\
                   ######################################\n\
                "
            );
            figment = figment.merge(Yaml::file(LOCAL_SETTINGS_YAML_FILE));
        }

        Self::from_figment(
            figment
                .merge(Env::raw())
                .merge(Serialized::defaults(overrides)),
        )
    }

    pub fn from_figment(figment: Figment) -> AppResult<Self> {
        Ok(figment.extract()?)
    }

    pub fn get_trace_level(&self) -> Level {
        get_trace_level(&self.trace_level)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cache_fresh(&self) -> Duration {
        Duration::from_secs(self.cache_fresh_secs)
    }

    pub fn cache_stale(&self) -> Duration {
        Duration::from_secs(self.cache_stale_secs)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

fn get_trace_level(level_str: &str) -> Level {
    match level_str.to_uppercase().as_str() {
        level if level == TRACE_LEVELS[0] => Level::TRACE,
        level if level == TRACE_LEVELS[1] => Level::DEBUG,
        level if level == TRACE_LEVELS[2] => Level::INFO,
        level if level == TRACE_LEVELS[3] => Level::WARN,
        level if level == TRACE_LEVELS[4] => Level::ERROR,
        // Default trace level
        _ => Level::INFO,
    }
}

fn default_trace_level() -> String {
    "INFO".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_mongodb_database() -> String {
    "naughty_nice".to_string()
}

fn default_cache_key_version() -> u32 {
    1
}

fn default_cache_fresh_secs() -> u64 {
    60
}

fn default_cache_stale_secs() -> u64 {
    300
}

fn default_cache_timeout_ms() -> u64 {
    250
}

fn default_cache_health_schedule() -> String {
    // every 10 seconds
    "0/10 * * * * *".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_configuration_uses_defaults() {
        let settings = Settings::from_figment(Figment::new()).unwrap();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.address(), "0.0.0.0:3000");
        assert_eq!(settings.mongodb_uri, None);
        assert_eq!(settings.redis_url, None);
        assert!(!settings.local_cache);
        assert_eq!(settings.cache_fresh(), Duration::from_secs(60));
        assert_eq!(settings.cache_stale(), Duration::from_secs(300));
        assert_eq!(settings.get_trace_level(), Level::INFO);
    }

    #[test]
    fn command_line_overrides_win() {
        let overrides = ServeArgs {
            port: Some(8080),
            redis_url: Some("redis://cache:6379".to_string()),
            ..Default::default()
        };
        let figment = Figment::new()
            .merge(Serialized::default("port", 9000))
            .merge(Serialized::default("trace_level", "debug"))
            .merge(Serialized::defaults(&overrides));

        let settings = Settings::from_figment(figment).unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(settings.get_trace_level(), Level::DEBUG);
    }

    #[test]
    fn unknown_trace_level_falls_back_to_info() {
        assert_eq!(get_trace_level("chatty"), Level::INFO);
        assert_eq!(get_trace_level("WARN"), Level::WARN);
    }
}
