//! Application settings, read from `settings.toml` in the working directory
//! and from `PAVILION__*` environment variables.
//!
//! See `settings.example.toml` for the layout.

use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";
const ENV_PREFIX: &str = "PAVILION";

/// Where the bookkeeping data lives.
///
/// In TOML either `database = "memory"` or `database = { sqlite = "pavilion.db" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    /// Read `settings.toml` (optional) and `PAVILION__*` environment
    /// overrides, e.g. `PAVILION__SERVER__PORT=3000`.
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::with_name(DEFAULT_CONFIG_PATH).required(false)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Settings {
        Settings::from_builder(
            config::Config::builder()
                .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
        )
        .unwrap()
    }

    #[test]
    fn sqlite_server_settings() {
        let settings = from_toml(
            r#"
            [app]
            level = "debug"

            [server]
            database = { sqlite = "data/pavilion.db" }
            bind = "0.0.0.0"
            port = 5000
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        let server = settings.server.unwrap();
        assert_eq!(server.database, Database::Sqlite("data/pavilion.db".to_string()));
        assert_eq!(server.database.url(), "sqlite:data/pavilion.db?mode=rwc");
        assert_eq!(server.port, 5000);
    }

    #[test]
    fn memory_database_and_default_level() {
        let settings = from_toml(
            r#"
            [server]
            database = "memory"
            port = 3000
            "#,
        );
        assert_eq!(settings.app.level, "info");
        let server = settings.server.unwrap();
        assert_eq!(server.database, Database::Memory);
        assert_eq!(server.bind, None);
    }
}
