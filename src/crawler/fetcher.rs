//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scrape phases:
//! - Building the HTTP client with the configured user agent and timeout
//! - POSTing listing forms and GETting content pages
//! - Classifying failures so callers can log and move on

use crate::config::SiteConfig;
use reqwest::{Client, Response};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the body on success, or a description of the failure
    pub fn into_body(self) -> Result<String, String> {
        match self {
            FetchResult::Success { body, .. } => Ok(body),
            FetchResult::HttpError { status_code } => Err(format!("HTTP {}", status_code)),
            FetchResult::NetworkError { error } => Err(error),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use speech_harvest::config::SiteConfig;
/// use speech_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&SiteConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &SiteConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.request_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a content page with GET
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    read_response(client.get(url).send().await).await
}

/// Submits a listing form with POST and returns the resulting page
///
/// The form is sent `application/x-www-form-urlencoded`.
pub async fn fetch_listing(client: &Client, url: &str, form: &[(&str, String)]) -> FetchResult {
    read_response(client.post(url).form(form).send().await).await
}

async fn read_response(sent: Result<Response, reqwest::Error>) -> FetchResult {
    let response = match sent {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
