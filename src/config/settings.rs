//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_MIGRATIONS_STRICT, DEFAULT_RUN_MIGRATIONS_ON_STARTUP,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Apply pending migrations when the server boots
    pub run_migrations_on_startup: bool,
    /// Abort boot when startup migrations fail.
    ///
    /// Off by default: a failed migration is logged and the server keeps
    /// serving against whatever schema exists.
    pub migrations_strict: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("run_migrations_on_startup", &self.run_migrations_on_startup)
            .field("migrations_strict", &self.migrations_strict)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            run_migrations_on_startup: DEFAULT_RUN_MIGRATIONS_ON_STARTUP,
            migrations_strict: DEFAULT_MIGRATIONS_STRICT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to
    /// defaults for missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            run_migrations_on_startup: lookup("RUN_MIGRATIONS_ON_STARTUP")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.run_migrations_on_startup),
            migrations_strict: lookup("MIGRATIONS_STRICT")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.migrations_strict),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert!(!config.run_migrations_on_startup);
        assert!(!config.migrations_strict);
    }

    #[test]
    fn reads_migration_flags() {
        let config = config_from(&[
            ("RUN_MIGRATIONS_ON_STARTUP", "true"),
            ("MIGRATIONS_STRICT", "1"),
            ("SERVER_PORT", "8080"),
        ]);
        assert!(config.run_migrations_on_startup);
        assert!(config.migrations_strict);
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn ignores_unparsable_values() {
        let config = config_from(&[("RUN_MIGRATIONS_ON_STARTUP", "maybe"), ("SERVER_PORT", "x")]);
        assert!(!config.run_migrations_on_startup);
        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
    }

    #[test]
    fn debug_redacts_database_url() {
        let config = config_from(&[("DATABASE_URL", "mysql://root:secret@db/sso")]);
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
