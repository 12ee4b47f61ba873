use std::collections::HashMap;
use std::net::IpAddr;
use thiserror::Error;

use crate::auth::password::DEFAULT_ITERATIONS;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: IpAddr,
    pub database_path: String,
    pub password_hash_iterations: u32,
    pub admin: Option<AdminAccount>,
}

/// Staff account ensured at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8000")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let bind_addr = env_map
            .get("BIND_ADDR")
            .map(|s| s.as_str())
            .unwrap_or("127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "BIND_ADDR".to_string(),
                    "must be an IP address".to_string(),
                )
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let password_hash_iterations = match env_map.get("PASSWORD_HASH_ITERATIONS") {
            None => DEFAULT_ITERATIONS,
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "PASSWORD_HASH_ITERATIONS".to_string(),
                        "must be a positive integer".to_string(),
                    ))
                }
            },
        };

        let admin = parse_admin_from_map(&env_map)?;

        Ok(Config {
            port,
            bind_addr,
            database_path,
            password_hash_iterations,
            admin,
        })
    }
}

fn parse_admin_from_map(
    env_map: &HashMap<String, String>,
) -> Result<Option<AdminAccount>, ConfigError> {
    let username = env_map
        .get("ADMIN_USERNAME")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let password = env_map.get("ADMIN_PASSWORD").filter(|s| !s.is_empty()).cloned();

    match (username, password) {
        (None, None) => Ok(None),
        (Some(username), Some(password)) => Ok(Some(AdminAccount {
            username,
            password,
            email: env_map.get("ADMIN_EMAIL").cloned().unwrap_or_default(),
        })),
        (Some(_), None) => Err(ConfigError::MissingEnv("ADMIN_PASSWORD".to_string())),
        (None, Some(_)) => Err(ConfigError::MissingEnv("ADMIN_USERNAME".to_string())),
    }
}
