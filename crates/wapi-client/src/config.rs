//! Connection configuration
//!
//! [`HostConfig`] tells the request builder where the grid lives and how to
//! authenticate; [`TransportConfig`] tells the HTTP requestor how to trust it
//! and how to pool connections. Both are immutable once built.

use crate::error::WapiError;
use reqwest::Certificate;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default WAPI version used when none is configured
pub const DEFAULT_WAPI_VERSION: &str = "2.5";
/// Default HTTPS port of the grid
pub const DEFAULT_WAPI_PORT: u16 = 443;
/// Default per-request timeout, in seconds
pub const DEFAULT_HTTP_REQUEST_TIMEOUT: u64 = 60;
/// Default number of idle pooled connections kept per host
pub const DEFAULT_HTTP_POOL_CONNECTIONS: usize = 10;

/// Target grid host and credentials
#[derive(Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Grid Master host name or address
    pub host: String,
    /// WAPI version, e.g. `2.5`
    pub version: String,
    /// HTTPS port
    pub port: u16,
    /// Basic auth user
    pub username: String,
    /// Basic auth password
    pub password: String,
}

impl HostConfig {
    /// Create a host configuration
    pub fn new(
        host: impl Into<String>,
        version: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            version: version.into(),
            port,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Load the host configuration from `WAPI_*` environment variables
    ///
    /// `WAPI_HOST`, `WAPI_USERNAME` and `WAPI_PASSWORD` are required;
    /// `WAPI_VERSION` and `WAPI_PORT` fall back to the defaults.
    pub fn from_env() -> Result<Self, WapiError> {
        let port = match env::var("WAPI_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| WapiError::Config(format!("WAPI_PORT '{raw}' is not a port: {e}")))?,
            Err(_) => DEFAULT_WAPI_PORT,
        };

        Ok(Self {
            host: required_var("WAPI_HOST")?,
            version: env::var("WAPI_VERSION").unwrap_or_else(|_| DEFAULT_WAPI_VERSION.to_string()),
            port,
            username: required_var("WAPI_USERNAME")?,
            password: required_var("WAPI_PASSWORD")?,
        })
    }
}

impl fmt::Debug for HostConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostConfig")
            .field("host", &self.host)
            .field("version", &self.version)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How the requestor verifies the grid's TLS certificate
#[derive(Clone)]
pub enum VerifyMode {
    /// Accept any certificate
    Off,
    /// Verify against the bundled web PKI roots
    On,
    /// Verify against the given CA certificates (never empty)
    CustomCa(Vec<Certificate>),
}

impl fmt::Debug for VerifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyMode::Off => f.write_str("Off"),
            VerifyMode::On => f.write_str("On"),
            VerifyMode::CustomCa(certs) => write!(f, "CustomCa({} certificates)", certs.len()),
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// TLS certificate verification
    pub verify_mode: VerifyMode,
    /// Timeout of a single HTTP request
    pub request_timeout: Duration,
    /// Idle pooled connections kept per host
    pub pool_connections: usize,
}

impl TransportConfig {
    /// Build a transport configuration
    ///
    /// `ssl_verify` is `"true"` or `"false"` (any case), or otherwise the path
    /// to a PEM bundle of CA certificates to trust. A bundle that cannot be
    /// read or holds no certificate is a configuration error.
    ///
    /// # Arguments
    /// * `ssl_verify` - Verification policy or CA bundle path
    /// * `request_timeout_secs` - Timeout of a single HTTP request
    /// * `pool_connections` - Idle connections kept per host
    pub fn new(
        ssl_verify: &str,
        request_timeout_secs: u64,
        pool_connections: usize,
    ) -> Result<Self, WapiError> {
        let verify_mode = match ssl_verify.to_lowercase().as_str() {
            "false" => VerifyMode::Off,
            "true" => VerifyMode::On,
            _ => VerifyMode::CustomCa(load_ca_bundle(Path::new(ssl_verify))?),
        };

        Ok(Self {
            verify_mode,
            request_timeout: Duration::from_secs(request_timeout_secs),
            pool_connections,
        })
    }

    /// Load the transport configuration from `WAPI_*` environment variables
    ///
    /// Reads `WAPI_SSL_VERIFY` (default `true`), `WAPI_HTTP_TIMEOUT` in seconds
    /// and `WAPI_HTTP_POOL_CONNECTIONS`.
    pub fn from_env() -> Result<Self, WapiError> {
        let ssl_verify = env::var("WAPI_SSL_VERIFY").unwrap_or_else(|_| "true".to_string());
        let timeout = parse_var("WAPI_HTTP_TIMEOUT", DEFAULT_HTTP_REQUEST_TIMEOUT)?;
        let pool = parse_var("WAPI_HTTP_POOL_CONNECTIONS", DEFAULT_HTTP_POOL_CONNECTIONS)?;
        Self::new(&ssl_verify, timeout, pool)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            verify_mode: VerifyMode::On,
            request_timeout: Duration::from_secs(DEFAULT_HTTP_REQUEST_TIMEOUT),
            pool_connections: DEFAULT_HTTP_POOL_CONNECTIONS,
        }
    }
}

fn load_ca_bundle(path: &Path) -> Result<Vec<Certificate>, WapiError> {
    let pem = std::fs::read(path).map_err(|e| {
        WapiError::Config(format!("Cannot load certificate file '{}': {}", path.display(), e))
    })?;
    let certs = Certificate::from_pem_bundle(&pem).map_err(|e| {
        WapiError::Config(format!("Invalid CA bundle '{}': {}", path.display(), e))
    })?;
    if certs.is_empty() {
        return Err(WapiError::Config(format!(
            "Cannot append certificate from file '{}': no certificate found",
            path.display()
        )));
    }
    Ok(certs)
}

fn required_var(name: &str) -> Result<String, WapiError> {
    env::var(name).map_err(|_| WapiError::Config(format!("{name} environment variable is required")))
}

fn parse_var<T>(name: &str, default: T) -> Result<T, WapiError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| WapiError::Config(format!("{name} '{raw}' is invalid: {e}"))),
        Err(_) => Ok(default),
    }
}
