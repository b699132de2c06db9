//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::config::schema::{RelayConfig, Secret};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration: defaults, then the optional TOML file, then the process
/// environment. The merged result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// Blank values are ignored so an empty `BOT_TOKEN=` line does not wipe a
/// token set in the config file.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(token) = var("BOT_TOKEN") {
        config.bot.token = Some(Secret::new(token));
    }
    if let Some(chat_id) = var("CHAT_ID") {
        config.bot.chat_id = Some(chat_id);
    }
    if let Some(key) = var("NP_API_KEY").or_else(|| var("NOVA_POSHTA_API_KEY")) {
        config.carrier.api_key = Some(Secret::new(key));
    }
    if let Some(base) = var("BOT_API_BASE") {
        config.bot.api_base = base;
    }
    if let Some(endpoint) = var("NP_API_URL") {
        config.carrier.endpoint = endpoint;
    }
    if let Some(port) = var("PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            var: "PORT",
            message: format!("'{}' is not a port number", port),
        })?;
        let mut addr: SocketAddr =
            config
                .listener
                .bind_address
                .parse()
                .map_err(|_| ConfigError::Env {
                    var: "PORT",
                    message: format!(
                        "cannot apply to bind address '{}'",
                        config.listener.bind_address
                    ),
                })?;
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_secrets_and_port() {
        let mut config = RelayConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("BOT_TOKEN", "123:abc"),
                ("CHAT_ID", "-1001"),
                ("NOVA_POSHTA_API_KEY", "np"),
                ("PORT", "8088"),
            ]),
        )
        .unwrap();

        assert_eq!(config.bot.token.unwrap().expose(), "123:abc");
        assert_eq!(config.bot.chat_id.as_deref(), Some("-1001"));
        assert_eq!(config.carrier.api_key.unwrap().expose(), "np");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8088");
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = RelayConfig::default();
        config.bot.chat_id = Some("from-file".into());
        apply_env_overrides(&mut config, env(&[("CHAT_ID", "  ")])).unwrap();
        assert_eq!(config.bot.chat_id.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = RelayConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[listener]\nbind_address = \"127.0.0.1:4100\"\n[orders]\nrequire_phone = false"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert!(!config.orders.require_phone);
    }

    #[test]
    fn test_invalid_file_reports_validation_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timeouts]\nupstream_secs = 0").unwrap();

        match load_config(Some(file.path())) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field == "timeouts.upstream_secs"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }
}
