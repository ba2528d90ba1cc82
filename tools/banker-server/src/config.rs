//! Server configuration
//!
//! Read from environment variables at startup. Unset variables take their
//! defaults; set-but-unparseable variables are an error.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default request body limit (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Runtime settings for the HTTP boundary
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (`BANKER_HOST`)
    pub host: IpAddr,
    /// Listen port (`PORT`)
    pub port: u16,
    /// Directory of presentation assets served under `/` (`BANKER_WEB_DIR`).
    ///
    /// No assets ship with the server; the deployment supplies them. While
    /// the directory is missing every non-API path answers 404.
    pub web_dir: PathBuf,
    /// Largest accepted request body (`BANKER_MAX_BODY_BYTES`)
    pub max_body_bytes: usize,
    /// Allow cross-origin requests (`BANKER_CORS`)
    pub cors: bool,
    /// Log filter used when `RUST_LOG` is unset (`BANKER_LOG`)
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            web_dir: PathBuf::from("web"),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cors: false,
            log_level: String::from("info"),
        }
    }
}

/// A configuration variable that was set but could not be parsed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    /// Environment variable name
    pub key: &'static str,
    /// The rejected value
    pub value: String,
    /// What was expected instead
    pub expected: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {}={:?}: expected {}",
            self.key, self.value, self.expected
        )
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            host: parse_var(&lookup, "BANKER_HOST", "an IP address")?.unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", "a port number")?.unwrap_or(defaults.port),
            web_dir: lookup("BANKER_WEB_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.web_dir),
            max_body_bytes: parse_var(&lookup, "BANKER_MAX_BODY_BYTES", "a byte count")?
                .unwrap_or(defaults.max_body_bytes),
            cors: match lookup("BANKER_CORS") {
                Some(value) => parse_bool("BANKER_CORS", value)?,
                None => defaults.cors,
            },
            log_level: lookup("BANKER_LOG").unwrap_or(defaults.log_level),
        })
    }

    /// Socket address to bind
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<F, T>(
    lookup: &F,
    key: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError {
                key,
                value,
                expected,
            }),
        None => Ok(None),
    }
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            key,
            value,
            expected: "true or false",
        }),
    }
}
