//! Settings of the application, read from `settings.toml` (optional) and
//! `HANGOVER__`-prefixed environment variables, e.g.
//! `HANGOVER__SERVER__PORT=8080`.

use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    /// IANA name; dashboards bucket drinks by local hour in this zone.
    pub timezone: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl App {
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| ConfigError::Message(format!("invalid app.timezone: {err}")))
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_sources(
            Config::builder().add_source(File::with_name("settings").required(false)),
        )
    }

    fn from_sources(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings = builder
            .add_source(Environment::with_prefix("HANGOVER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Settings::from_sources(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn server_with_sqlite_file() {
        let settings = parse(
            r#"
            [app]
            level = "debug"
            timezone = "America/Sao_Paulo"

            [server]
            port = 3000
            database = { sqlite = "hangover.db" }
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.app.timezone().unwrap(), chrono_tz::America::Sao_Paulo);
        let server = settings.server.unwrap();
        assert_eq!(server.port, 3000);
        assert!(matches!(server.database, Database::Sqlite(ref path) if path == "hangover.db"));
    }

    #[test]
    fn defaults_without_server() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.app.timezone().unwrap(), chrono_tz::UTC);
        assert!(settings.server.is_none());
    }

    #[test]
    fn memory_database() {
        let settings = parse(
            r#"
            [server]
            port = 3000
            database = "memory"
            "#,
        );
        assert!(matches!(settings.server.unwrap().database, Database::Memory));
    }

    #[test]
    fn bad_timezone_is_reported() {
        let settings = parse("[app]\ntimezone = \"Mars/Olympus\"\n");
        assert!(settings.app.timezone().is_err());
    }
}
