use std::{net::SocketAddr, path::PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[cfg(feature = "logging")]
use tracing_subscriber::filter::LevelFilter;

/// Database configuration.
#[derive(Deserialize)]
pub struct Database {
    /// Database URL string.
    pub url: String,
}

/// HTTP server configuration.
#[derive(Deserialize)]
pub struct Server {
    /// Address, that HTTP server will listen on.
    pub address: SocketAddr,

    /// Serve OpenAPI documentation under `/docs`.
    #[serde(default = "default_docs")]
    pub docs: bool,
}

fn default_docs() -> bool {
    true
}

/// Implementation of [`serde`]'s deserializer for [`FromStr`] types.
#[cfg(feature = "logging")]
fn deserialize_from_str<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error,
    D: serde::de::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
}

/// Logging configuration.
#[cfg(feature = "logging")]
#[derive(Deserialize)]
pub struct Logging {
    /// Log level.
    #[serde(deserialize_with = "deserialize_from_str")]
    pub level: LevelFilter,
}

#[cfg(feature = "logging")]
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
        }
    }
}

/// Account registration configuration.
#[derive(Deserialize)]
pub struct Accounts {
    /// Allow new readers to register.
    #[serde(default = "default_registration")]
    pub registration: bool,

    /// Email addresses that are granted the administrator role on registration.
    #[serde(default)]
    pub admins: Vec<String>,
}

fn default_registration() -> bool {
    true
}

impl Default for Accounts {
    fn default() -> Self {
        Self {
            registration: default_registration(),
            admins: Vec::new(),
        }
    }
}

/// General configuration.
#[derive(Deserialize)]
pub struct Config {
    /// General database configuration.
    pub database: Database,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: Option<Server>,

    /// Logging configuration.
    #[cfg(feature = "logging")]
    #[serde(default)]
    pub logging: Logging,

    /// Account registration configuration.
    #[serde(default)]
    pub accounts: Accounts,
}

impl Config {
    /// Create new config using default configuration file or environment variables.
    ///
    /// See [`Env`] for more details on how to use environment variables configuration.
    ///
    /// [`Env`]: figment::providers::Env
    pub fn new(path: Option<PathBuf>) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path.unwrap_or(PathBuf::from("Config.toml"))))
            .merge(Env::prefixed("CONFIG_").split("_"))
            .extract()
    }

    /// Create new config suitable for running unit tests.
    #[cfg(feature = "test-utils")]
    pub fn for_tests() -> Self {
        Self {
            database: Database {
                url: String::from("sqlite::memory:"),
            },
            server: Some(Server {
                address: "127.0.0.1:3000".parse().unwrap(),
                docs: true,
            }),
            #[cfg(feature = "logging")]
            logging: Logging::default(),
            accounts: Accounts {
                registration: true,
                admins: vec![String::from("admin@usethinkup.com")],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::Config;

    #[test]
    fn toml_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Config.toml",
                r#"
                [database]
                url = "postgres://localhost/thinkup"

                [server]
                address = "0.0.0.0:8080"

                [accounts]
                admins = ["editor@usethinkup.com"]
                "#,
            )?;
            jail.set_env("CONFIG_DATABASE_URL", "sqlite::memory:");

            let config = Config::new(None)?;

            assert_eq!(config.database.url, "sqlite::memory:");

            let server = config.server.expect("server config is missing");
            assert_eq!(server.address.port(), 8080);
            assert!(server.docs);

            assert!(config.accounts.registration);
            assert_eq!(config.accounts.admins, ["editor@usethinkup.com"]);

            Ok(())
        });
    }

    #[test]
    fn defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("CONFIG_DATABASE_URL", "sqlite::memory:");

            let config = Config::new(Some("Missing.toml".into()))?;

            assert!(config.server.is_none());
            assert!(config.accounts.registration);
            assert!(config.accounts.admins.is_empty());

            Ok(())
        });
    }
}
