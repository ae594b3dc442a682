//! Gateway configuration from environment variables
//!
//! | Variable                         | Default    |
//! |----------------------------------|------------|
//! | `ZELONIA_GATEWAY_PORT` / `PORT`  | `8501`     |
//! | `ZELONIA_BIND_ADDR`              | `0.0.0.0`  |
//! | `ZELONIA_DATA_DIR`               | `data`     |
//! | `ZELONIA_ADMIN_USER`             | `admin`    |
//! | `ZELONIA_ADMIN_PASSWORD`         | `password` |

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_ADMIN_USER: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "password";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid port {value:?} in {var}")]
    InvalidPort { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USER.to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub bind_addr: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub admin: AdminCredentials,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            admin: AdminCredentials::default(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (env in production, a map in tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = lookup("ZELONIA_GATEWAY_PORT")
            .map(|v| ("ZELONIA_GATEWAY_PORT", v))
            .or_else(|| lookup("PORT").map(|v| ("PORT", v)));
        let port = match port {
            Some((var, value)) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { var, value })?,
            None => defaults.port,
        };

        Ok(Self {
            bind_addr: lookup("ZELONIA_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            data_dir: lookup("ZELONIA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            admin: AdminCredentials {
                username: lookup("ZELONIA_ADMIN_USER").unwrap_or(defaults.admin.username),
                password: lookup("ZELONIA_ADMIN_PASSWORD").unwrap_or(defaults.admin.password),
            },
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.listen_addr(), "0.0.0.0:8501");
    }

    #[test]
    fn test_gateway_port_wins_over_port() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("ZELONIA_GATEWAY_PORT", "9000"),
            ("PORT", "9001"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);

        let config = GatewayConfig::from_lookup(lookup(&[("PORT", "9001")])).unwrap();
        assert_eq!(config.port, 9001);
    }

    #[test]
    fn test_invalid_port() {
        let err = GatewayConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPort {
                var: "PORT",
                value: "http".to_string()
            }
        );
    }

    #[test]
    fn test_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("ZELONIA_DATA_DIR", "/srv/zelonia"),
            ("ZELONIA_ADMIN_USER", "ops"),
            ("ZELONIA_ADMIN_PASSWORD", "hunter2"),
            ("ZELONIA_BIND_ADDR", "127.0.0.1"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/zelonia"));
        assert_eq!(config.admin.username, "ops");
        assert_eq!(config.admin.password, "hunter2");
        assert_eq!(config.listen_addr(), "127.0.0.1:8501");
    }
}
