use std::env::VarError;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ConfigError, GreeterError, Result};

/// Environment variable holding the YAML configuration document.
pub const CONFIG_ENV_VAR: &str = "GREETER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GreeterConfig {
    pub greeting: GreetingDefaults,
}

/// Values substituted for names missing from an event.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GreetingDefaults {
    pub default_first_name: String,
    pub default_last_name: String,
}

impl Default for GreetingDefaults {
    fn default() -> Self {
        Self {
            default_first_name: "Guest".to_string(),
            default_last_name: String::new(),
        }
    }
}

pub fn load_config(config_path: Option<&str>) -> Result<GreeterConfig> {
    match config_path {
        Some(path) => GreeterConfig::from_file(path),
        None => GreeterConfig::from_env(),
    }
}

impl GreeterConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            location: path.to_string(),
            error: Box::new(e),
        })?;
        debug!("Loaded configuration from {}", path);
        Self::from_yaml(&content)
    }

    /// Reads the configuration from `GREETER_CONFIG`. An unset variable means
    /// the built-in defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_env_value(std::env::var(CONFIG_ENV_VAR))
    }

    fn from_env_value(value: std::result::Result<String, VarError>) -> Result<Self> {
        match value {
            Ok(raw) => Self::from_yaml(&raw),
            Err(VarError::NotPresent) => {
                debug!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::LoadFailed {
                location: CONFIG_ENV_VAR.to_string(),
                error: Box::new(e),
            }
            .into()),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: GreeterConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let greeting = &self.greeting;
        if greeting.default_first_name.trim().is_empty() {
            return Err(validation_failed("Default first name cannot be empty"));
        }
        if has_line_break(&greeting.default_first_name)
            || has_line_break(&greeting.default_last_name)
        {
            return Err(validation_failed("Default names cannot contain line breaks"));
        }
        Ok(())
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

fn validation_failed(reason: &str) -> GreeterError {
    ConfigError::ValidationFailed {
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SerializationError;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GreeterConfig::default();
        assert_eq!(config.greeting.default_first_name, "Guest");
        assert_eq!(config.greeting.default_last_name, "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
greeting:
  default_first_name: Friend
  default_last_name: Doe
"#;
        let config = GreeterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.greeting.default_first_name, "Friend");
        assert_eq!(config.greeting.default_last_name, "Doe");
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let config = GreeterConfig::from_yaml("greeting:\n  default_last_name: Smith\n").unwrap();
        assert_eq!(config.greeting.default_first_name, "Guest");
        assert_eq!(config.greeting.default_last_name, "Smith");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(GreeterConfig::from_yaml("  \n").unwrap(), GreeterConfig::default());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = GreeterConfig::from_yaml("greeting: [unclosed").unwrap_err();
        assert!(matches!(
            err,
            GreeterError::Serialization(SerializationError::Yaml { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_blank_first_name() {
        let mut config = GreeterConfig::default();
        config.greeting.default_first_name = "  ".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            GreeterError::Config(ConfigError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_line_breaks() {
        let mut config = GreeterConfig::default();
        config.greeting.default_last_name = "Doe\nInjected".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "greeting:\n  default_first_name: Visitor").unwrap();

        let path = file.path().to_str().unwrap();
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.greeting.default_first_name, "Visitor");
        assert_eq!(config.greeting.default_last_name, "");
    }

    #[test]
    fn test_env_value_yaml() {
        let config = GreeterConfig::from_env_value(Ok(
            "greeting:\n  default_first_name: Stranger\n".to_string(),
        ))
        .unwrap();
        assert_eq!(config.greeting.default_first_name, "Stranger");

        let err = GreeterConfig::from_env_value(Ok("greeting: [".to_string())).unwrap_err();
        assert!(matches!(
            err,
            GreeterError::Serialization(SerializationError::Yaml { .. })
        ));
    }

    #[test]
    fn test_env_value_unset_or_not_unicode() {
        let config = GreeterConfig::from_env_value(Err(VarError::NotPresent)).unwrap();
        assert_eq!(config, GreeterConfig::default());

        let err = GreeterConfig::from_env_value(Err(VarError::NotUnicode(
            std::ffi::OsString::from("x"),
        )))
        .unwrap_err();
        assert!(matches!(
            err,
            GreeterError::Config(ConfigError::LoadFailed { .. })
        ));
        assert!(err.to_string().contains(CONFIG_ENV_VAR));
    }

    // The only test that touches GREETER_CONFIG, so the steps run in order.
    #[test]
    fn test_load_config_from_environment() {
        unsafe { std::env::set_var(CONFIG_ENV_VAR, "greeting:\n  default_last_name: Smith\n") };
        let config = load_config(None).unwrap();
        assert_eq!(config.greeting.default_first_name, "Guest");
        assert_eq!(config.greeting.default_last_name, "Smith");

        unsafe { std::env::set_var(CONFIG_ENV_VAR, "greeting: [") };
        assert!(load_config(None).is_err());

        unsafe { std::env::remove_var(CONFIG_ENV_VAR) };
        assert_eq!(load_config(None).unwrap(), GreeterConfig::default());
    }

    #[test]
    fn test_from_missing_file() {
        let err = GreeterConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(
            err,
            GreeterError::Config(ConfigError::LoadFailed { .. })
        ));
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
