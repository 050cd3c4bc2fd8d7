//! Configuration options for the model console

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use model_console_api::{DEFAULT_INTROSPECT_PATH, DEFAULT_RECORDS_PATH, DEFAULT_TOKEN_HEADER};

use crate::error::{Error, Result};

/// Page sizes offered by the console
pub const PAGE_SIZE_CHOICES: [usize; 4] = [20, 50, 100, 200];

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Configuration options for the model console
#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    /// Base URL of the application serving the admin endpoints
    pub base_url: String,

    /// Path of the introspection endpoint
    pub introspect_path: String,

    /// Path of the records endpoint
    pub records_path: String,

    /// Header that carries the admin token
    pub token_header: String,

    /// Rows requested per page until the user picks another size
    pub page_size: usize,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// File the admin token is persisted to
    pub token_file: PathBuf,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            introspect_path: DEFAULT_INTROSPECT_PATH.to_string(),
            records_path: DEFAULT_RECORDS_PATH.to_string(),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Some(Duration::from_secs(30)),
            token_file: default_token_file(),
        }
    }
}

fn default_token_file() -> PathBuf {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".model-console").join("session.json")
}

impl ConsoleOptions {
    /// Read options from `MODEL_CONSOLE_*` environment variables, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(url) = std::env::var("MODEL_CONSOLE_URL") {
            options.base_url = url;
        }
        if let Ok(size) = std::env::var("MODEL_CONSOLE_PAGE_SIZE") {
            let size = size
                .parse::<usize>()
                .map_err(|_| Error::config(format!("MODEL_CONSOLE_PAGE_SIZE is not a number: {}", size)))?;
            options = options.with_page_size(size)?;
        }
        if let Ok(path) = std::env::var("MODEL_CONSOLE_TOKEN_FILE") {
            options.token_file = PathBuf::from(path);
        }

        Ok(options)
    }

    /// Check that the base URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("invalid base URL {}: {}", self.base_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::config(format!("unsupported URL scheme: {}", other))),
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.to_string();
        self
    }

    /// Set the endpoint paths
    pub fn with_paths(mut self, introspect_path: &str, records_path: &str) -> Self {
        self.introspect_path = introspect_path.to_string();
        self.records_path = records_path.to_string();
        self
    }

    /// Set the token header name
    pub fn with_token_header(mut self, value: &str) -> Self {
        self.token_header = value.to_string();
        self
    }

    /// Set the initial page size; zero is rejected
    pub fn with_page_size(mut self, value: usize) -> Result<Self> {
        if value == 0 {
            return Err(Error::config("page size must be greater than zero"));
        }
        self.page_size = value;
        Ok(self)
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the token file
    pub fn with_token_file(mut self, value: impl Into<PathBuf>) -> Self {
        self.token_file = value.into();
        self
    }
}
