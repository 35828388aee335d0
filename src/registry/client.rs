//! Catalog client
//!
//! Lists the repositories of the organization that hosts the package
//! catalog. This is the only networked-HTTP code path in the tool; every
//! other remote interaction goes through git. Failures are surfaced to
//! the caller, never retried here.

use serde::Deserialize;
use thiserror::Error;

/// Catalog client errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to construct the HTTP client
    #[error("Failed to initialize HTTP client: {error}")]
    Client { error: String },

    /// Request failed or returned a non-success status
    #[error("Catalog request failed for '{url}': {error}")]
    Network { url: String, error: String },

    /// Response body did not decode
    #[error("Unexpected catalog response from '{url}': {error}")]
    Decode { url: String, error: String },
}

#[derive(Debug, Deserialize)]
struct RepoEntry {
    name: String,
}

/// Blocking client for the catalog listing endpoint
#[derive(Debug)]
pub struct CatalogClient {
    http: reqwest::blocking::Client,
    api_url: String,
}

impl CatalogClient {
    /// Create a client against an API base URL
    pub fn new(api_url: impl Into<String>) -> Result<Self, CatalogError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("emberkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Client {
                error: e.to_string(),
            })?;
        Ok(Self {
            http,
            api_url: api_url.into(),
        })
    }

    /// Names of the organization's repositories, sorted
    pub fn list_repositories(&self, org: &str) -> Result<Vec<String>, CatalogError> {
        let url = format!(
            "{}/orgs/{org}/repos?per_page=100",
            self.api_url.trim_end_matches('/')
        );
        tracing::debug!(url, "listing catalog repositories");

        let response = self
            .http
            .get(&url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| CatalogError::Network {
                url: url.clone(),
                error: e.to_string(),
            })?;

        let entries: Vec<RepoEntry> = response.json().map_err(|e| CatalogError::Decode {
            url: url.clone(),
            error: e.to_string(),
        })?;

        let mut names: Vec<String> = entries.into_iter().map(|e| e.name).collect();
        names.sort();
        Ok(names)
    }
}
