mod file_config;

pub use file_config::{DatabaseConfig, FileConfig};

use crate::game_store::DatabaseSettings;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;

const DEFAULT_DB_PORT: u16 = 3306;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,

    /// Review keyword categories, in the review table's column order.
    pub categories: Option<Vec<String>>,

    pub database: DatabaseSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments, optional TOML file config
    /// and the process environment. TOML values override CLI values where
    /// present; database credentials prefer the environment (DB_HOST,
    /// DB_PORT, DB_USER, DB_PASSWORD, DB_NAME) over the [database] section.
    pub fn resolve<E>(cli: &CliConfig, file_config: Option<FileConfig>, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let db_file = file.database.unwrap_or_default();

        let host = match env("DB_HOST").or(db_file.host) {
            Some(x) => x,
            None => bail!("Database host must be set via DB_HOST or [database] host"),
        };
        let user = match env("DB_USER").or(db_file.user) {
            Some(x) => x,
            None => bail!("Database user must be set via DB_USER or [database] user"),
        };
        let password = match env("DB_PASSWORD").or(db_file.password) {
            Some(x) => x,
            None => bail!("Database password must be set via DB_PASSWORD or [database] password"),
        };
        let database = match env("DB_NAME").or(db_file.database) {
            Some(x) => x,
            None => bail!("Database name must be set via DB_NAME or [database] database"),
        };
        let db_port = match env("DB_PORT") {
            Some(raw) => match raw.parse::<u16>() {
                Ok(x) => x,
                Err(_) => bail!("DB_PORT is not a valid port number: {}", raw),
            },
            None => db_file.port.unwrap_or(DEFAULT_DB_PORT),
        };

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            categories: file.categories,
            database: DatabaseSettings {
                host,
                port: db_port,
                user,
                password,
                database,
            },
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn db_section() -> FileConfig {
        FileConfig {
            database: Some(DatabaseConfig {
                host: Some("db.local".to_string()),
                port: None,
                user: Some("steamlens".to_string()),
                password: Some("secret".to_string()),
                database: Some("games".to_string()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_logging_level() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("path"),
            Some(RequestsLoggingLevel::Path)
        ));
        assert!(matches!(
            parse_logging_level("body"),
            Some(RequestsLoggingLevel::Body)
        ));
        // Case insensitive
        assert!(matches!(
            parse_logging_level("PATH"),
            Some(RequestsLoggingLevel::Path)
        ));
        // Invalid
        assert!(parse_logging_level("invalid").is_none());
    }

    #[test]
    fn test_resolve_cli_only() {
        let cli = CliConfig {
            port: 3001,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Headers,
            frontend_dir_path: Some("/frontend".to_string()),
        };

        let config = AppConfig::resolve(&cli, Some(db_section()), no_env).unwrap();

        assert_eq!(config.port, 3001);
        assert_eq!(config.metrics_port, 9091);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Headers);
        assert_eq!(config.frontend_dir_path, Some("/frontend".to_string()));
        assert!(config.categories.is_none());
        assert_eq!(config.database.host, "db.local");
        assert_eq!(config.database.port, 3306);
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let cli = CliConfig {
            port: 3001,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Path,
            ..Default::default()
        };

        let file_config = FileConfig {
            port: Some(4000),
            logging_level: Some("body".to_string()),
            categories: Some(vec!["Story".to_string(), "Sound".to_string()]),
            ..db_section()
        };

        let config = AppConfig::resolve(&cli, Some(file_config), no_env).unwrap();

        // TOML values should override CLI
        assert_eq!(config.port, 4000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Body);
        // CLI value used when TOML doesn't specify
        assert_eq!(config.metrics_port, 9091);
        assert_eq!(
            config.categories,
            Some(vec!["Story".to_string(), "Sound".to_string()])
        );
    }

    #[test]
    fn test_resolve_env_overrides_file_database() {
        let env: HashMap<&str, &str> = [
            ("DB_HOST", "env-host"),
            ("DB_PASSWORD", "env-secret"),
            ("DB_PORT", "3307"),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let config = AppConfig::resolve(&CliConfig::default(), Some(db_section()), lookup).unwrap();

        assert_eq!(config.database.host, "env-host");
        assert_eq!(config.database.password, "env-secret");
        assert_eq!(config.database.port, 3307);
        // File values used where the environment is silent
        assert_eq!(config.database.user, "steamlens");
        assert_eq!(config.database.database, "games");
    }

    #[test]
    fn test_resolve_missing_database_settings_error() {
        let result = AppConfig::resolve(&CliConfig::default(), None, no_env);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Database host must be set"));
    }

    #[test]
    fn test_resolve_bad_db_port_error() {
        let lookup = |key: &str| (key == "DB_PORT").then(|| "not-a-port".to_string());
        let result = AppConfig::resolve(&CliConfig::default(), Some(db_section()), lookup);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("DB_PORT"));
    }

    #[test]
    fn test_file_config_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
port = 4000
categories = ["Story", "Graphics"]

[database]
host = "localhost"
user = "steamlens"
password = "secret"
database = "games"
"#
        )
        .unwrap();

        let loaded = FileConfig::load(file.path()).unwrap();
        assert_eq!(loaded.port, Some(4000));
        assert_eq!(
            loaded.categories,
            Some(vec!["Story".to_string(), "Graphics".to_string()])
        );
        let db = loaded.database.unwrap();
        assert_eq!(db.host.as_deref(), Some("localhost"));
        assert_eq!(db.port, None);
    }

    #[test]
    fn test_file_config_load_missing_file() {
        let result = FileConfig::load(std::path::Path::new("/nonexistent/steamlens.toml"));
        assert!(result.is_err());
    }
}
