//! # trackvia - TrackVia REST API client for Rust
//!
//! A blocking client for the hosted TrackVia API. It authenticates with an
//! OAuth2 password grant, attaches the access token to every request and
//! parses JSON responses.
//!
//! ## Features
//!
//! - Lazy authentication on the first request
//! - One transparent re-authentication and retry when the token expires
//!   (`invalid_grant`)
//! - Endpoints for dashboards, apps, tables, views, records, forms and search
//! - Response parsing with path-based value access
//!
//! ## Basic Usage
//!
//! ```no_run
//! use trackvia::{Credentials, TrackVia, ViewPage};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tv = TrackVia::new(Credentials::new(
//!         "client_id",
//!         "client_secret",
//!         "user@example.com",
//!         "password",
//!     ))?;
//!
//!     let apps = tv.apps(None)?;
//!     println!("Apps: {}", apps.raw());
//!
//!     let view = tv.views("42", Some(ViewPage::new(0, 25)))?;
//!     println!("First record: {:?}", view.get("records/0"));
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`Result`]. Missing required identifiers fail
//! with [`TrackViaError::MissingParameter`] before any request is sent.
//! Error payloads from the service become [`TrackViaError::Api`].
//!
//! ```no_run
//! use trackvia::{Credentials, TrackVia, TrackViaError};
//!
//! let tv = TrackVia::new(Credentials::from_env()?)?;
//! match tv.records("123") {
//!     Ok(record) => println!("{}", record.raw()),
//!     Err(TrackViaError::Api { error, .. }) => eprintln!("service said: {}", error),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), TrackViaError>(())
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod response;
pub mod rest;
pub mod token;

// Re-export main types for convenience
pub use client::{Config, Credentials, API_URL};
pub use endpoints::ViewPage;
pub use error::{Result, TrackViaError, INVALID_GRANT};
pub use response::Response;
pub use rest::{TrackVia, TOKEN_ENDPOINT};
pub use token::Token;

// Re-export serde_json for convenience
pub use serde_json::json;
