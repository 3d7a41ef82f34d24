//! RestRecordStore - PostgREST-style client for the hosted row store.
//!
//! Requires the `http` feature.
//!
//! ## Routes
//!
//! - `GET    /rest/v1/{collection}?select=*&order={column}.{asc|desc}`
//! - `POST   /rest/v1/{collection}` with `Prefer: return=representation`
//! - `PATCH  /rest/v1/{collection}?id=eq.{id}`
//! - `DELETE /rest/v1/{collection}?id=eq.{id}`
//!
//! ## Change feed
//!
//! This client speaks plain REST only and does not implement
//! [`ChangeFeed`](super::ChangeFeed). The hosted realtime channel is a separate
//! websocket protocol, so a [`LiveCollection`](crate::LiveCollection) over this
//! store needs a feed implementation alongside it. Until then, use
//! [`OrderedCollection::refresh`](crate::OrderedCollection::refresh) or
//! [`Records::list`](crate::Records::list) to poll.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::{OrderBy, RecordStore, Row, StoreError};
use crate::config::{ConfigError, StoreConfig};

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Row store backed by a PostgREST endpoint.
#[derive(Clone)]
pub struct RestRecordStore {
    client: Client,
    base: String,
}

impl RestRecordStore {
    /// Build a client from configuration. Fails on keys that are not valid header values.
    pub fn new(config: &StoreConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| ConfigError::Invalid("api_key".into(), e.to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| ConfigError::Invalid("api_key".into(), e.to_string()))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Invalid("client".into(), e.to_string()))?;

        Ok(Self {
            client,
            base: format!("{}/rest/v1", config.url.trim_end_matches('/')),
        })
    }

    fn table(&self, collection: &str) -> String {
        format!("{}/{}", self.base, collection)
    }

    fn by_id(&self, request: RequestBuilder, id: &str) -> RequestBuilder {
        request.query(&[("id", format!("eq.{id}"))])
    }

    async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                StoreError::Constraint(format!("{status}: {body}"))
            }
            _ => StoreError::Transport(format!("{status}: {body}")),
        })
    }

    async fn rows(response: Response) -> Result<Vec<Row>, StoreError> {
        let values: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Serde(e.to_string()))?;

        values
            .into_iter()
            .map(|value| match value {
                Value::Object(row) => Ok(row),
                other => Err(StoreError::Serde(format!("expected row object, got {other}"))),
            })
            .collect()
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn list_ordered(
        &self,
        collection: &str,
        order: &OrderBy,
    ) -> Result<Vec<Row>, StoreError> {
        let direction = if order.ascending { "asc" } else { "desc" };
        let request = self.client.get(self.table(collection)).query(&[
            ("select", "*".to_string()),
            ("order", format!("{}.{}", order.column, direction)),
        ]);

        Self::rows(Self::send(request).await?).await
    }

    async fn insert(&self, collection: &str, row: Row) -> Result<Row, StoreError> {
        let request = self
            .client
            .post(self.table(collection))
            .header(PREFER, RETURN_REPRESENTATION)
            .json(&[Value::Object(row)]);

        Self::rows(Self::send(request).await?)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Serde("insert returned no row".into()))
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Row,
    ) -> Result<(), StoreError> {
        let request = self
            .by_id(self.client.patch(self.table(collection)), id)
            .header(PREFER, RETURN_REPRESENTATION)
            .json(&Value::Object(fields));

        let touched = Self::rows(Self::send(request).await?).await?;
        if touched.is_empty() {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let request = self
            .by_id(self.client.delete(self.table(collection)), id)
            .header(PREFER, RETURN_REPRESENTATION);

        let removed = Self::rows(Self::send(request).await?).await?;
        if removed.is_empty() {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
