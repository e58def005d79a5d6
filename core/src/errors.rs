use thiserror::Error;

#[derive(Error, Debug)]
pub enum GreeterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Failed to load configuration from {location}: {error}")]
    LoadFailed {
        location: String,
        #[source]
        error: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("JSON serialization failed: {reason}")]
    Json { reason: String },

    #[error("YAML serialization failed: {reason}")]
    Yaml { reason: String },
}

pub type Result<T> = std::result::Result<T, GreeterError>;

impl From<serde_json::Error> for GreeterError {
    fn from(err: serde_json::Error) -> Self {
        GreeterError::Serialization(SerializationError::Json {
            reason: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for GreeterError {
    fn from(err: serde_yaml::Error) -> Self {
        GreeterError::Serialization(SerializationError::Yaml {
            reason: err.to_string(),
        })
    }
}
