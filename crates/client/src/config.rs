use serde::Deserialize;

use crate::Result;

const DEFAULT_CONFIG_PATH: &str = "config/client.toml";

/// Connection settings of a front end. The password is never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub username: String,
    /// IANA name used to display times.
    pub timezone: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            username: String::new(),
            timezone: "America/Sao_Paulo".to_string(),
        }
    }
}

/// Read an optional TOML file, then `HANGOVER_CLIENT_*` variables.
pub fn load(path: Option<&str>) -> Result<ClientConfig> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let settings = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("HANGOVER_CLIENT"))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}
