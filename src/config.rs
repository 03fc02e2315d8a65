use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub max_stops_per_engineer: u32,
    pub average_speed_kmh: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let max_stops: u32 = parse_or_default("MAX_STOPS_PER_ENGINEER", 8)?;
        let average_speed: f64 = parse_or_default("AVERAGE_SPEED_KMH", 40.0)?;

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            max_stops_per_engineer: max_stops.clamp(1, 100),
            average_speed_kmh: average_speed.clamp(1.0, 200.0),
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
