use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "NOTES_HOST";
    pub const PORT: &str = "NOTES_PORT";
    /// Path of the SQLite database. When unset, notes live in memory only.
    pub const DB_PATH: &str = "NOTES_DB_PATH";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 9104;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub db_path: Option<PathBuf>,
}

impl ServiceConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Missing, empty or
    /// unparsable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty(env_vars::PORT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!(
                    "Ignoring invalid {}={:?}, using {}",
                    env_vars::PORT,
                    raw,
                    defaults::PORT
                );
                defaults::PORT
            }),
            None => defaults::PORT,
        };

        Self {
            host: non_empty(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_string()),
            port,
            db_path: non_empty(env_vars::DB_PATH).map(PathBuf::from),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
