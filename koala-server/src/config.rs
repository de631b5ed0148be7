//! Command line flags and the optional TOML configuration file.

use std::fs;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use koala_provider_eatery::EateryConfig;
use koala_provider_grill::GrillConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Parser)]
#[command(name = "koala-server", version, about = "Aggregated menu and location API")]
/// Command line flags.
pub struct Cli {
    /// TOML file with server and provider settings.
    #[arg(short, long, env = "KOALA_CONFIG")]
    pub config: Option<PathBuf>,
    /// Port to listen on; overrides the port of the configured listen address.
    #[arg(short, long, env = "KOALA_PORT")]
    pub port: Option<u16>,
    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

#[derive(thiserror::Error, Debug)]
/// Errors raised while loading configuration.
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Cannot read config {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The configuration file is not valid TOML for [`AppConfig`].
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
/// Complete server configuration.
pub struct AppConfig {
    /// Listener settings.
    pub server: ServerConfig,
    /// JSON eatery sources and location.
    pub eatery: EateryConfig,
    /// XML grill sources and location.
    pub grill: GrillConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Listener settings.
pub struct ServerConfig {
    /// Socket address to bind.
    pub listen_address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
        }
    }
}

impl AppConfig {
    /// Load the file named by `cli` (if any) and apply command line overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        if let Some(port) = cli.port {
            config.server.listen_address.set_port(port);
        }

        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is invalid.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn defaults_match_bundled_sources() {
        let config = AppConfig::default();

        assert_eq!(config.server.listen_address.port(), 8080);
        assert_eq!(config.eatery.location_id, "2");
        assert_eq!(config.eatery.menu_source, "./goldenfiles/json-eatery-menu.json");
        assert_eq!(config.grill.location_id, "1");
        assert_eq!(config.grill.menu_source, config.grill.location_source);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [eatery]
            location_id = "7"
            menu_source = "https://eatery.example/catalog"
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.eatery.location_id, "7");
        assert_eq!(config.eatery.menu_source, "https://eatery.example/catalog");
        assert_eq!(
            config.eatery.location_source,
            "./goldenfiles/json-eatery-location.json"
        );
        assert_eq!(config.grill.location_id, "1");
    }

    #[test]
    fn port_flag_overrides_listen_address() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[server]\nlisten_address = \"127.0.0.1:9000\"").expect("write config");

        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            port: Some(9100),
            json_logs: false,
        };
        let config = AppConfig::load(&cli).expect("load config");

        assert_eq!(
            config.server.listen_address,
            SocketAddr::from((Ipv4Addr::LOCALHOST, 9100))
        );
    }

    #[test]
    fn invalid_file_is_reported() {
        let err = AppConfig::from_toml("[server]\nlisten_address = 12").expect_err("bad address");

        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn missing_file_is_reported() {
        let cli = Cli {
            config: Some(PathBuf::from("./no/such/koala.toml")),
            port: None,
            json_logs: false,
        };

        let err = AppConfig::load(&cli).expect_err("file is missing");

        assert!(matches!(err, ConfigError::Read { .. }), "got {err:?}");
    }
}
