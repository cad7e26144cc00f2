use thiserror::Error;

use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum ArbiterError {
    #[error("Invalid angle: {0} is not a multiple of 30 degrees")]
    InvalidAngle(i32),

    #[error("Failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown move profile: {0}")]
    UnknownProfile(String),

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArbiterError>;
