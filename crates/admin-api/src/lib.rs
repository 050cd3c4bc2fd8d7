//! Model console admin API client for Rust
//!
//! This crate talks to the two admin endpoints a model console depends on:
//!
//! - introspection (`GET`), listing models and their scalar fields
//! - records (`GET`/`POST`/`PUT`/`DELETE`), paging and mutating rows
//!
//! Every request carries the admin token in the `x-admin-token` header.
//! Failed responses surface as [`AdminApiError::RequestFailed`] with the
//! message taken from the body's `error` field when the server sends one.

pub mod error;
pub mod fetch;
pub mod types;

use reqwest::Client;
use serde_json::Value;

pub use error::{AdminApiError, ApiErrorBody, Result};
pub use fetch::{Fetch, FetchBuilder};
pub use types::*;

pub const DEFAULT_INTROSPECT_PATH: &str = "/api/admin/introspect";
pub const DEFAULT_RECORDS_PATH: &str = "/api/admin/records";
pub const DEFAULT_TOKEN_HEADER: &str = "x-admin-token";

/// Client for the introspection and records endpoints
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
    http_client: Client,
    introspect_path: String,
    records_path: String,
    token_header: String,
}

impl AdminClient {
    /// Create a client rooted at `base_url` with the default endpoint paths
    pub fn new(base_url: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            introspect_path: DEFAULT_INTROSPECT_PATH.to_string(),
            records_path: DEFAULT_RECORDS_PATH.to_string(),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
        }
    }

    /// Override the endpoint paths
    pub fn with_paths(mut self, introspect_path: &str, records_path: &str) -> Self {
        self.introspect_path = introspect_path.to_string();
        self.records_path = records_path.to_string();
        self
    }

    /// Override the header that carries the admin token
    pub fn with_token_header(mut self, name: &str) -> Self {
        self.token_header = name.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the model descriptors
    pub async fn introspect(&self, token: &str) -> Result<Vec<ModelDescriptor>> {
        let url = self.endpoint(&self.introspect_path);

        let body = Fetch::get(&self.http_client, &url)
            .header(&self.token_header, token)?
            .execute::<Introspection>()
            .await?;

        Ok(body.models)
    }

    /// Fetch one page of records
    pub async fn list_records(&self, token: &str, query: &ListQuery) -> Result<RecordPage> {
        if query.take == 0 {
            return Err(AdminApiError::InvalidParameters(
                "take must be greater than zero".to_string(),
            ));
        }
        let url = self.endpoint(&self.records_path);

        Fetch::get(&self.http_client, &url)
            .header(&self.token_header, token)?
            .query("model", &query.model)
            .query("skip", query.skip)
            .query("take", query.take)
            .execute::<RecordPage>()
            .await
    }

    /// Create a record; returns whatever the server echoes back
    pub async fn create_record(&self, token: &str, model: &str, data: &Record) -> Result<Value> {
        let url = self.endpoint(&self.records_path);

        Fetch::post(&self.http_client, &url)
            .header(&self.token_header, token)?
            .json(&CreateBody { model, data })?
            .execute_value()
            .await
    }

    /// Update the record identified by `id`
    pub async fn update_record(
        &self,
        token: &str,
        model: &str,
        id: &Value,
        data: &Record,
    ) -> Result<Value> {
        let url = self.endpoint(&self.records_path);

        Fetch::put(&self.http_client, &url)
            .header(&self.token_header, token)?
            .json(&UpdateBody { model, id, data })?
            .execute_value()
            .await
    }

    /// Delete the record identified by `id`
    pub async fn delete_record(&self, token: &str, model: &str, id: &Value) -> Result<Value> {
        let url = self.endpoint(&self.records_path);

        Fetch::delete(&self.http_client, &url)
            .header(&self.token_header, token)?
            .json(&DeleteBody { model, id })?
            .execute_value()
            .await
    }
}
