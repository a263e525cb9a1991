//! Client configuration.
//!
//! The configuration is fixed when the client is built. Nothing here is
//! process-wide; two clients with different hosts or users can coexist.

use std::env;
use std::fmt;

use url::Url;

use crate::error::{RallyError, Result};

/// Host used when `RALLY_HOST` is not set.
pub const DEFAULT_HOST: &str = "rally1.rallydev.com";

/// Web services API version used when `RALLY_API_VERSION` is not set.
pub const DEFAULT_API_VERSION: &str = "1.39";

const SERVICE_PATH: &str = "slm/webservice";

/// Username and password sent with every request as HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Connection settings for a Rally client.
///
/// # Example
///
/// ```
/// use rallyapi::RallyConfig;
///
/// let config = RallyConfig::new("rally1.rallydev.com", "1.39", "user", "secret");
/// assert_eq!(
///     config.service_root().unwrap().as_str(),
///     "https://rally1.rallydev.com/slm/webservice/1.39/"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RallyConfig {
    host: String,
    version: String,
    credentials: Credentials,
}

impl RallyConfig {
    /// Build a configuration from explicit values.
    ///
    /// `host` is normally a bare host name. A value that already carries a
    /// scheme (`http://127.0.0.1:8080`) is used verbatim, which is how tests
    /// point the client at a local server.
    pub fn new(
        host: impl Into<String>,
        version: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            version: version.into(),
            credentials: Credentials::new(username, password),
        }
    }

    /// Build a configuration from environment variables.
    ///
    /// Uses `RALLY_USERNAME` and `RALLY_PASSWORD` for authentication, and
    /// optionally `RALLY_HOST` and `RALLY_API_VERSION`.
    ///
    /// # Errors
    ///
    /// Returns an error if either credential variable is not set.
    pub fn from_env() -> Result<Self> {
        let username = required_var("RALLY_USERNAME")?;
        let password = required_var("RALLY_PASSWORD")?;
        let host = env::var("RALLY_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let version =
            env::var("RALLY_API_VERSION").unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());

        Ok(Self::new(host, version, username, password))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The URL every object-type resource is resolved against,
    /// always ending in `/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host or version do not form a valid URL.
    pub fn service_root(&self) -> Result<Url> {
        let host = self.host.trim_end_matches('/');
        let origin = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };

        let version = self.version.trim_matches('/');
        Ok(Url::parse(&format!("{origin}/{SERVICE_PATH}/{version}/"))?)
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name)
        .map_err(|_| RallyError::ConfigMissing(format!("{name} environment variable not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_root_from_bare_host() {
        let config = RallyConfig::new("rally1.rallydev.com", "1.39", "u", "p");
        assert_eq!(
            config.service_root().unwrap().as_str(),
            "https://rally1.rallydev.com/slm/webservice/1.39/"
        );
    }

    #[test]
    fn test_service_root_keeps_explicit_scheme() {
        let config = RallyConfig::new("http://127.0.0.1:8080/", "v2.0", "u", "p");
        assert_eq!(
            config.service_root().unwrap().as_str(),
            "http://127.0.0.1:8080/slm/webservice/v2.0/"
        );
    }

    // The only test in this crate that touches the RALLY_* variables.
    #[test]
    fn test_from_env_requires_credentials() {
        env::remove_var("RALLY_USERNAME");
        env::remove_var("RALLY_PASSWORD");

        let err = RallyConfig::from_env().unwrap_err();
        assert!(matches!(err, RallyError::ConfigMissing(_)));
        assert!(err.to_string().contains("RALLY_USERNAME"));

        env::set_var("RALLY_USERNAME", "alice");
        let err = RallyConfig::from_env().unwrap_err();
        env::remove_var("RALLY_USERNAME");

        assert!(matches!(err, RallyError::ConfigMissing(_)));
        assert!(err.to_string().contains("RALLY_PASSWORD"));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = RallyConfig::new("rally1.rallydev.com", "1.39", "alice", "hunter2");
        let debug = format!("{:?}", config);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
