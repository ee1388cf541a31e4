use crate::error::{Result, TrackViaError};
use reqwest::blocking::{Client, ClientBuilder};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Base URL of the hosted TrackVia API
pub const API_URL: &str = "https://api.trackvia.com/";

/// Create the HTTP client for TrackVia API requests
/// with connection pooling and the configured timeouts
pub fn create_rest_client(config: &Config) -> Result<Client> {
    ClientBuilder::new()
        .pool_max_idle_per_host(50)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(TrackViaError::ClientBuild)
}

/// Configuration for the TrackVia client
#[derive(Debug, Clone)]
pub struct Config {
    /// API base URL, always ending in `/`
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config::new(API_URL)
    }
}

impl Config {
    /// Create a new configuration pointing at the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Config {
            base_url,
            timeout: Duration::from_secs(300), // 5 minutes
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Set the whole-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        Ok(base.join(endpoint.trim_start_matches('/'))?)
    }

    /// Append path segments to the base URL.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#`
    /// inside a segment never change the resolved resource.
    pub fn segments_url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Account credentials used for the password grant.
///
/// Fixed for the lifetime of a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Credentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Load credentials from `TRACKVIA_CLIENT_ID`, `TRACKVIA_CLIENT_SECRET`,
    /// `TRACKVIA_USERNAME` and `TRACKVIA_PASSWORD`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &'static str| lookup(key).ok_or(TrackViaError::MissingEnv(key));

        Ok(Credentials {
            client_id: var("TRACKVIA_CLIENT_ID")?,
            client_secret: var("TRACKVIA_CLIENT_SECRET")?,
            username: var("TRACKVIA_USERNAME")?,
            password: var("TRACKVIA_PASSWORD")?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://api.trackvia.com/");
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = Config::new("http://localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080/");

        let url = config.endpoint_url("dashboards/12").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/dashboards/12");
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let config = Config::new("http://localhost:8080/api");
        let url = config.endpoint_url("/oauth/v2/token").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/oauth/v2/token");
    }

    #[test]
    fn test_segments_url_encodes_each_segment() {
        let config = Config::new("http://localhost:8080/api");
        let url = config.segments_url(&["records", "a/b?c#d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/records/a%2Fb%3Fc%23d");
        assert!(url.query().is_none());

        let url = Config::default().segments_url(&["apps"]).unwrap();
        assert_eq!(url.as_str(), "https://api.trackvia.com/apps");
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials::new("cid", "shh", "jane", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("cid"));
        assert!(debug.contains("jane"));
        assert!(!debug.contains("shh"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_credentials_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("TRACKVIA_CLIENT_ID", "cid"),
            ("TRACKVIA_CLIENT_SECRET", "secret"),
            ("TRACKVIA_USERNAME", "jane"),
            ("TRACKVIA_PASSWORD", "pw"),
        ]
        .into_iter()
        .collect();

        let credentials =
            Credentials::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(credentials, Credentials::new("cid", "secret", "jane", "pw"));
    }

    #[test]
    fn test_credentials_from_lookup_missing() {
        let err = Credentials::from_lookup(|key| {
            (key != "TRACKVIA_PASSWORD").then(|| "x".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, TrackViaError::MissingEnv("TRACKVIA_PASSWORD")));
    }
}
