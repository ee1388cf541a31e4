//! Typed wrappers over [`TrackVia::request`] for each API resource.
//!
//! Required identifiers are checked before any network activity,
//! authentication included. Identifiers always land in a single path
//! segment.

use crate::client::Config;
use crate::error::{Result, TrackViaError};
use crate::response::Response;
use crate::rest::TrackVia;
use url::Url;

/// Paging for the `views` endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewPage {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ViewPage {
    pub fn new(page: u32, limit: u32) -> Self {
        ViewPage {
            page: Some(page),
            limit: Some(limit),
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

/// A resolved endpoint: path segments plus query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint {
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    fn new(segments: &[&str]) -> Self {
        Endpoint {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
        }
    }

    fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    /// Slash-joined path, for logging
    pub fn label(&self) -> String {
        self.segments.join("/")
    }

    pub fn url(&self, config: &Config) -> Result<Url> {
        config.segments_url(&self.segments)
    }

    /// `base` when no id is given, `base/{id}` otherwise
    fn optional(endpoint: &'static str, id: Option<&str>) -> Result<Self> {
        match id.filter(|id| !is_blank(id)) {
            Some(id) => Ok(Endpoint::new(&[endpoint, segment(endpoint, "id", id)?])),
            None => Ok(Endpoint::new(&[endpoint])),
        }
    }

    pub fn dashboards(id: Option<&str>) -> Result<Self> {
        Endpoint::optional("dashboards", id)
    }

    pub fn apps(id: Option<&str>) -> Result<Self> {
        Endpoint::optional("apps", id)
    }

    pub fn tables(id: &str, foreign_key: Option<&str>) -> Result<Self> {
        let id = segment("tables", "id", require("tables", "id", id)?)?;
        match foreign_key.filter(|fk| !is_blank(fk)) {
            Some(fk) => {
                let fk = segment("tables", "foreign_key", fk)?;
                Ok(Endpoint::new(&["tables", id, "foreign_keys", fk]))
            }
            None => Ok(Endpoint::new(&["tables", id])),
        }
    }

    pub fn views(id: &str, page: Option<ViewPage>) -> Result<Self> {
        let id = segment("views", "id", require("views", "id", id)?)?;
        let query = page.map(|p| p.query()).unwrap_or_default();
        Ok(Endpoint::new(&["views", id]).with_query(query))
    }

    pub fn records(id: &str) -> Result<Self> {
        let id = segment("records", "id", require("records", "id", id)?)?;
        Ok(Endpoint::new(&["records", id]))
    }

    pub fn forms(id: &str) -> Result<Self> {
        let id = segment("forms", "id", require("forms", "id", id)?)?;
        Ok(Endpoint::new(&["forms", id]))
    }

    pub fn search(id: &str, term: &str) -> Result<Self> {
        let id = segment("search", "id", require("search", "id", id)?)?;
        let term = require("search", "term", term)?;
        Ok(Endpoint::new(&["search", id]).with_query(vec![("term", term.to_string())]))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Reject blank values; non-blank values pass through untouched
fn require<'a>(endpoint: &'static str, parameter: &'static str, value: &'a str) -> Result<&'a str> {
    if is_blank(value) {
        return Err(TrackViaError::MissingParameter { endpoint, parameter });
    }
    Ok(value)
}

/// `.` and `..` would be dropped from the path instead of encoded
fn segment<'a>(endpoint: &'static str, parameter: &'static str, value: &'a str) -> Result<&'a str> {
    if matches!(value, "." | "..") {
        return Err(TrackViaError::InvalidParameter {
            endpoint,
            parameter,
            value: value.to_string(),
        });
    }
    Ok(value)
}

impl TrackVia {
    fn call(&self, endpoint: Endpoint) -> Result<Response> {
        let url = endpoint.url(&self.config)?;
        self.request_url(&endpoint.label(), url, &endpoint.query)
    }

    /// List all dashboards, or load one by id
    pub fn dashboards(&self, id: Option<&str>) -> Result<Response> {
        self.call(Endpoint::dashboards(id)?)
    }

    /// List all apps, or load one by id
    pub fn apps(&self, id: Option<&str>) -> Result<Response> {
        self.call(Endpoint::apps(id)?)
    }

    /// Load a table, or the values of one of its foreign keys
    pub fn tables(&self, id: &str, foreign_key: Option<&str>) -> Result<Response> {
        self.call(Endpoint::tables(id, foreign_key)?)
    }

    /// Load the records of a view, optionally paged
    pub fn views(&self, id: &str, page: Option<ViewPage>) -> Result<Response> {
        self.call(Endpoint::views(id, page)?)
    }

    pub fn records(&self, id: &str) -> Result<Response> {
        self.call(Endpoint::records(id)?)
    }

    pub fn forms(&self, id: &str) -> Result<Response> {
        self.call(Endpoint::forms(id)?)
    }

    /// Search a table for records matching `term`
    pub fn search(&self, id: &str, term: &str) -> Result<Response> {
        self.call(Endpoint::search(id, term)?)
    }
}
