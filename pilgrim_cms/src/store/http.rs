use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::{ContentStore, DocumentKey};
use crate::error::StoreError;

/// Document served at `<base_url>/<collection>/<name>`: `GET` reads it (404
/// means never written), `PUT` replaces it.
#[derive(Debug, Clone)]
pub struct HttpStore {
    url: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: &str, key: &DocumentKey, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pilgrim-cms/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self {
            url: document_url(base_url, key),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn document_url(base_url: &str, key: &DocumentKey) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(&key.collection),
        urlencoding::encode(&key.name)
    )
}

impl ContentStore for HttpStore {
    async fn get(&self) -> Result<Option<Value>, StoreError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(url = %self.url, "no stored document");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::Status {
                target: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map(Some)
            .map_err(|e| StoreError::Transport(e.to_string()))
    }

    async fn set(&self, document: Value) -> Result<(), StoreError> {
        let response = self
            .client
            .put(&self.url)
            .json(&document)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Status {
                target: self.url.clone(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("http:{}", self.url)
    }
}
