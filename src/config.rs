use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: `{value}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Settings of the timed exam. Handed to the simulation handlers through the
/// application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub answer_count: i32,
    pub time_limit_secs: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            answer_count: 4,
            time_limit_secs: 45 * 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub templates_glob: String,
    pub static_dir: String,
    pub session_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SimulationConfig::default();
        let config = Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "milon.db".into()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:5000".into()),
            templates_glob: lookup("TEMPLATES_GLOB")
                .unwrap_or_else(|| "templates/**/*.html".into()),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "static".into()),
            session_ttl_days: parse_or(&lookup, "SESSION_TTL_DAYS", 7)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            simulation: SimulationConfig {
                answer_count: parse_or(&lookup, "SIMULATION_ANSWER_COUNT", defaults.answer_count)?,
                time_limit_secs: parse_or(
                    &lookup,
                    "SIMULATION_TIME_LIMIT_SECS",
                    defaults.time_limit_secs,
                )?,
            },
        };

        if !(4..=31).contains(&config.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                value: config.bcrypt_cost.to_string(),
            });
        }
        if config.simulation.answer_count < 2 {
            return Err(ConfigError::InvalidValue {
                key: "SIMULATION_ANSWER_COUNT",
                value: config.simulation.answer_count.to_string(),
            });
        }
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
