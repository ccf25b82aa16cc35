use std::env;
use std::fmt;
use std::path::PathBuf;

/// Marker URL selecting the in-process store instead of Postgres.
pub const MEMORY_DATABASE_URL: &str = "memory://";

/// bcrypt accepts work factors in this range.
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Token lifetimes from one hour up to a year.
const JWT_EXPIRATION_HOURS_RANGE: std::ops::RangeInclusive<i64> = 1..=8760;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has invalid value {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.starts_with(MEMORY_DATABASE_URL)
    }
}

/// How tokens are signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtSigning {
    Secret(String),
    /// RS256 with PEM-encoded keys on disk.
    KeyPair {
        private_key: PathBuf,
        public_key: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub signing: JwtSigning,
    pub expiration_hours: i64,
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server_host: String,
    pub server_port: u16,
    pub cors_origin: String,
    pub jwt: JwtConfig,
    pub bcrypt_cost: u32,
    pub log: LogConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            max_connections: parse("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS", "10"))?,
        };

        let signing = match (
            lookup("JWT_PRIVATE_KEY_PATH"),
            lookup("JWT_PUBLIC_KEY_PATH"),
            lookup("JWT_SECRET"),
        ) {
            (Some(private_key), Some(public_key), _) => JwtSigning::KeyPair {
                private_key: private_key.into(),
                public_key: public_key.into(),
            },
            (_, _, Some(secret)) if !secret.is_empty() => JwtSigning::Secret(secret),
            _ => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        let expiration_hours: i64 =
            parse("JWT_EXPIRATION_HOURS", get("JWT_EXPIRATION_HOURS", "24"))?;
        if !JWT_EXPIRATION_HOURS_RANGE.contains(&expiration_hours) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_HOURS",
                value: expiration_hours.to_string(),
            });
        }

        let jwt = JwtConfig {
            signing,
            expiration_hours,
            issuer: lookup("JWT_ISSUER").filter(|issuer| !issuer.is_empty()),
        };

        let bcrypt_cost: u32 = parse("BCRYPT_COST", get("BCRYPT_COST", "12"))?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let format = match get("LOG_FORMAT", "text").to_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            database,
            server_host: get("SERVER_HOST", "127.0.0.1"),
            server_port: parse("SERVER_PORT", get("SERVER_PORT", "8080"))?,
            cors_origin: get("CORS_ORIGIN", "*"),
            jwt,
            bcrypt_cost,
            log: LogConfig {
                level: get("LOG_LEVEL", "info"),
                format,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
