use crate::client::{create_rest_client, Config, Credentials};
use crate::error::{Result, TrackViaError};
use crate::response::Response;
use crate::token::Token;
use reqwest::blocking::Client;
use serde_json::Value;
use std::sync::{PoisonError, RwLock};
use url::Url;

/// Path of the OAuth2 token endpoint, relative to the base URL
pub const TOKEN_ENDPOINT: &str = "oauth/v2/token";

/// Client for the TrackVia REST API.
///
/// Holds the account credentials and the current access token. The token is
/// obtained lazily on the first request and renewed once per call when the
/// service answers `invalid_grant`.
#[derive(Debug)]
pub struct TrackVia {
    /// HTTP client
    pub client: Client,
    /// Configuration
    pub config: Config,
    credentials: Credentials,
    token: RwLock<Option<Token>>,
}

impl TrackVia {
    /// Create a client against the hosted API
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, Config::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(credentials: Credentials, config: Config) -> Result<Self> {
        Ok(TrackVia {
            client: create_rest_client(&config)?,
            config,
            credentials,
            token: RwLock::new(None),
        })
    }

    /// Seed the client with a token obtained elsewhere
    pub fn with_token(self, token: Token) -> Self {
        self.store_token(Some(token));
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Current access token, if authenticated
    pub fn access_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    /// Current token payload, if authenticated
    pub fn token(&self) -> Option<Token> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn store_token(&self, token: Option<Token>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Exchange the credentials for an access token (password grant).
    ///
    /// The returned token is stored for later requests. On failure the
    /// stored token is cleared so the next request authenticates again.
    pub fn authenticate(&self) -> Result<Token> {
        let mut url = self.config.endpoint_url(TOKEN_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("client_secret", &self.credentials.client_secret)
            .append_pair("grant_type", "password")
            .append_pair("username", &self.credentials.username)
            .append_pair("password", &self.credentials.password);

        let result = self
            .send(TOKEN_ENDPOINT, url)
            .and_then(|(_, body)| Ok(serde_json::from_value::<Token>(body)?));

        match result {
            Ok(token) => {
                log::info!("authenticated as {}", self.credentials.username);
                self.store_token(Some(token.clone()));
                Ok(token)
            }
            Err(e) => {
                log::debug!("authentication failed: {}", e);
                self.store_token(None);
                Err(e)
            }
        }
    }

    /// Issue a GET request to an endpoint and return the decoded body.
    ///
    /// Authenticates first when no token is held. When the service reports
    /// `invalid_grant`, authenticates again and retries the request once.
    ///
    /// # Arguments
    /// * `endpoint` - path relative to the API base URL
    /// * `query` - extra query parameters; `access_token` is appended
    pub fn request(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = self.config.endpoint_url(endpoint)?;
        self.request_url(endpoint, url, query)
    }

    /// Issue a GET request and unmarshal the decoded body into the target type
    pub fn get<T>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.request(endpoint, query)?.apply()
    }

    /// Lazy authentication and the single `invalid_grant` retry around an
    /// already resolved endpoint URL
    pub(crate) fn request_url(&self, label: &str, url: Url, query: &[(&str, String)]) -> Result<Response> {
        let access_token = match self.access_token() {
            Some(token) => token,
            None => self.authenticate()?.access_token,
        };

        match self.dispatch(label, url.clone(), query, &access_token) {
            Err(e) if e.is_invalid_grant() => {
                log::warn!("{}: access token rejected, re-authenticating", label);
                let access_token = self.authenticate()?.access_token;
                self.dispatch(label, url, query, &access_token)
            }
            other => other,
        }
    }

    fn dispatch(&self, label: &str, mut url: Url, query: &[(&str, String)], access_token: &str) -> Result<Response> {
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("access_token", access_token);
        }

        let (status, body) = self.send(label, url)?;
        Ok(Response::new(status, body))
    }

    fn send(&self, label: &str, url: Url) -> Result<(u16, Value)> {
        let start = std::time::Instant::now();
        let http_response = self.client.get(url).send()?;
        let status = http_response.status().as_u16();
        let body = http_response.bytes()?;

        log::debug!(
            "GET {} => {:?} (status: {}, {} bytes)",
            label,
            start.elapsed(),
            status,
            body.len()
        );

        parse_body(status, &body).map(|value| (status, value))
    }
}

/// Decode a response body, mapping the service's error conventions
/// onto `TrackViaError`.
///
/// Any object carrying an `error` key is an error, even when its value is
/// `null`.
pub(crate) fn parse_body(status: u16, body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(TrackViaError::EmptyResponse { status });
    }

    let is_error_status = !(200..300).contains(&status);
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        if is_error_status {
            TrackViaError::http(
                status,
                String::from_utf8_lossy(body).to_string(),
                Some(Box::new(e)),
            )
        } else {
            TrackViaError::Json(e)
        }
    })?;

    if value.get("error").is_some() {
        return Err(TrackViaError::from_body(status, value));
    }

    Ok(value)
}
