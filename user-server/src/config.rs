use std::{env, fmt, str::FromStr};

use userstore::UserError;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_CERT_FILE: &str = "/etc/ssl/certs/ssl.crt";
const DEFAULT_KEY_FILE: &str = "/etc/ssl/certs/ssl.key";

/// Which `UserStore` implementation backs the handlers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StoreType {
    Postgres,
    Sqlite,
    Memory,
}

impl StoreType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            StoreType::Postgres => "postgres",
            StoreType::Sqlite => "sqlite",
            StoreType::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreType {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" => Ok(StoreType::Postgres),
            "sqlite" => Ok(StoreType::Sqlite),
            "memory" => Ok(StoreType::Memory),
            other => Err(UserError::Config(format!(
                "Unsupported store type: {other}. Supported types are 'postgres', 'sqlite' and 'memory'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ServerConfig {
    pub(crate) port: u16,
    pub(crate) cert_file: String,
    pub(crate) key_file: String,
    pub(crate) store_type: StoreType,
}

impl ServerConfig {
    pub(crate) fn from_env() -> Result<Self, UserError> {
        let port = match env::var("SERVER_PORT") {
            Ok(value) if !value.is_empty() => value
                .parse::<u16>()
                .map_err(|e| UserError::Config(format!("Invalid SERVER_PORT={value}: {e}")))?,
            _ => DEFAULT_SERVER_PORT,
        };

        let store_type = match env::var("USER_STORE_TYPE") {
            Ok(value) if !value.is_empty() => value.parse()?,
            _ => StoreType::Postgres,
        };

        Ok(Self {
            port,
            cert_file: env::var("TLS_CERT_FILE").unwrap_or_else(|_| DEFAULT_CERT_FILE.to_string()),
            key_file: env::var("TLS_KEY_FILE").unwrap_or_else(|_| DEFAULT_KEY_FILE.to_string()),
            store_type,
        })
    }
}
