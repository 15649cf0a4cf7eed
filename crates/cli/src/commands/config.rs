use std::env;
use std::fs;
use std::path::Path;

use crate::commands::CommandResult;
use goldapi_core::config::{redact_database_url, resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

/// Effective config key, its rendered value, and the env vars that can set it
/// (first match wins, same order `AppConfig::load` checks them).
struct ConfigField {
    key_path: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source =
            field_source(&field, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(format!("- {} = {} (source: {source})", field.key_path, field.value));
    }

    CommandResult::success("config", lines.join("\n"))
}

fn effective_fields(config: &AppConfig) -> Vec<ConfigField> {
    vec![
        ConfigField {
            key_path: "database.url",
            value: redact_database_url(&config.database.url),
            env_keys: &["GOLDAPI_DATABASE_URL", "DATABASE_URL"],
        },
        ConfigField {
            key_path: "database.max_connections",
            value: config.database.max_connections.to_string(),
            env_keys: &["GOLDAPI_DATABASE_MAX_CONNECTIONS"],
        },
        ConfigField {
            key_path: "database.timeout_secs",
            value: config.database.timeout_secs.to_string(),
            env_keys: &["GOLDAPI_DATABASE_TIMEOUT_SECS"],
        },
        ConfigField {
            key_path: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["GOLDAPI_SERVER_BIND_ADDRESS"],
        },
        ConfigField {
            key_path: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["GOLDAPI_SERVER_PORT"],
        },
        ConfigField {
            key_path: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["GOLDAPI_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        ConfigField {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["GOLDAPI_LOGGING_LEVEL", "GOLDAPI_LOG_LEVEL"],
        },
        ConfigField {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format).to_lowercase(),
            env_keys: &["GOLDAPI_LOGGING_FORMAT", "GOLDAPI_LOG_FORMAT"],
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &ConfigField,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let env_key = field
        .env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::contains_path;

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc = "[database]\nurl = \"sqlite://warehouse.db\"\n[server]\nport = 8080\n"
            .parse::<toml::Value>()
            .expect("toml");

        assert!(contains_path(&doc, "database.url"));
        assert!(contains_path(&doc, "server.port"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "logging.level"));
    }
}
