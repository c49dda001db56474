//! Builds an `AppConfig` from layered sources.
//!
//! Precedence, lowest first: built-in defaults, `config/base.toml`, `config/{environment}.toml`,
//! `APP_` prefixed env variables (nested with `__`), libpq style variables (`PGHOST`, `PGPORT`...)
//! together with `PORT`, and finally `DATABASE_URL` which replaces the whole database section.
//!
//! The config is loaded once in `main` and handed to `App::build_from_config`.

mod error;
mod types;

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, DbConfig, Environment, NetConfig, SslRequire};

const DEFAULTS: &str = r#"
[net_config]
host = [0, 0, 0, 0]
app_port = 5000

[db_config]
port = 5432
require_ssl = "Prefer"
"#;

/// Variables understood by every postgres client, mapped onto config keys.
const LIBPQ_VARS: [(&str, &str); 4] = [
    ("PGHOST", "db_config.host"),
    ("PGDATABASE", "db_config.db_name"),
    ("PGUSER", "db_config.username"),
    ("PGPASSWORD", "db_config.password"),
];
const PORT_VARS: [(&str, &str); 2] = [
    ("PGPORT", "db_config.port"),
    ("PORT", "net_config.app_port"),
];

impl AppConfig {
    /// Loads the configuration from the `config` directory in the current working directory
    /// and the process environment.
    ///
    /// `APP_ENVIRONMENT` selects the environment file and defaults to `production`, which only
    /// holds the public listening address. Connection details must then come from the env.
    pub fn load() -> ConfigResult<Self> {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "production".into())
            .try_into()?;

        Self::load_environment(environment)
    }

    /// Same as `load` with an explicitly chosen environment file.
    pub fn load_environment(environment: Environment) -> ConfigResult<Self> {
        info!(
            "{:<20} - Initializing the {} configuration",
            "AppConfig::load",
            environment.as_ref()
        );
        let config_dir = std::env::current_dir()?.join("config");

        Self::resolve(Self::file_figment(&config_dir, environment), |var| {
            std::env::var(var).ok()
        })
    }

    /// Defaults, config files and `APP_` prefixed env variables.
    pub fn file_figment(config_dir: &Path, environment: Environment) -> Figment {
        Figment::from(Toml::string(DEFAULTS))
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment.config_file_name())))
            .merge(Env::prefixed("APP_").split("__"))
    }

    /// Applies the well-known connection variables on top of `figment` and extracts the config.
    /// `env_var` looks up a single variable.
    pub fn resolve(
        mut figment: Figment,
        env_var: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        // Merged as plain strings so a numeric password stays a string.
        for (var, key) in LIBPQ_VARS {
            if let Some(value) = env_var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        for (var, key) in PORT_VARS {
            if let Some(value) = env_var(var) {
                let port: u16 = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort { var, value })?;
                figment = figment.merge(Serialized::default(key, port));
            }
        }

        let net_config = figment.extract_inner("net_config")?;
        let db_config = match env_var("DATABASE_URL") {
            Some(url) => DbConfig::try_from(url.as_str())?,
            None => figment.extract_inner("db_config")?,
        };

        Ok(AppConfig {
            net_config,
            db_config,
        })
    }
}
