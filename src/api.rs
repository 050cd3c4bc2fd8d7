//! Seam between the console and the admin endpoints

use async_trait::async_trait;
use std::sync::Arc;
use serde_json::Value;

use model_console_api::{AdminClient, ListQuery, ModelDescriptor, Record, RecordPage};

use crate::error::Result;

/// Operations the console needs from the admin backend.
///
/// Every call takes the session token explicitly; implementations hold no
/// session state of their own.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn introspect(&self, token: &str) -> Result<Vec<ModelDescriptor>>;

    async fn list_records(&self, token: &str, query: &ListQuery) -> Result<RecordPage>;

    async fn create_record(&self, token: &str, model: &str, data: &Record) -> Result<Value>;

    async fn update_record(&self, token: &str, model: &str, id: &Value, data: &Record) -> Result<Value>;

    async fn delete_record(&self, token: &str, model: &str, id: &Value) -> Result<Value>;
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn introspect(&self, token: &str) -> Result<Vec<ModelDescriptor>> {
        Ok(AdminClient::introspect(self, token).await?)
    }

    async fn list_records(&self, token: &str, query: &ListQuery) -> Result<RecordPage> {
        Ok(AdminClient::list_records(self, token, query).await?)
    }

    async fn create_record(&self, token: &str, model: &str, data: &Record) -> Result<Value> {
        Ok(AdminClient::create_record(self, token, model, data).await?)
    }

    async fn update_record(&self, token: &str, model: &str, id: &Value, data: &Record) -> Result<Value> {
        Ok(AdminClient::update_record(self, token, model, id, data).await?)
    }

    async fn delete_record(&self, token: &str, model: &str, id: &Value) -> Result<Value> {
        Ok(AdminClient::delete_record(self, token, model, id).await?)
    }
}

#[async_trait]
impl<T: AdminApi + ?Sized> AdminApi for Arc<T> {
    async fn introspect(&self, token: &str) -> Result<Vec<ModelDescriptor>> {
        (**self).introspect(token).await
    }

    async fn list_records(&self, token: &str, query: &ListQuery) -> Result<RecordPage> {
        (**self).list_records(token, query).await
    }

    async fn create_record(&self, token: &str, model: &str, data: &Record) -> Result<Value> {
        (**self).create_record(token, model, data).await
    }

    async fn update_record(&self, token: &str, model: &str, id: &Value, data: &Record) -> Result<Value> {
        (**self).update_record(token, model, id, data).await
    }

    async fn delete_record(&self, token: &str, model: &str, id: &Value) -> Result<Value> {
        (**self).delete_record(token, model, id).await
    }
}
