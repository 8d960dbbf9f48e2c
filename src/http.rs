//! Contentful Management API client over HTTP.
//!
//! Requires the `remote` feature (enabled by default).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::{EditorInterface, ManagementClient};
use crate::error::ManagementError;
use crate::types::ContentTypeDefinition;

/// Media type of every management API body.
pub const CONTENT_TYPE_JSON: &str = "application/vnd.contentful.management.v1+json";

/// Header carrying the version token of the resource being changed.
pub const VERSION_HEADER: &str = "X-Contentful-Version";

const PAGE_LIMIT: u64 = 100;

/// Connection settings for [`HttpManagementClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub space_id: String,
    /// Content management token.
    pub api_key: String,
    /// Target environment; the space's default environment when `None`.
    pub environment: Option<String>,
    /// Base URL of the management API (e.g. `https://api.contentful.com`).
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            space_id: String::new(),
            api_key: String::new(),
            environment: None,
            base_url: "https://api.contentful.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new(space_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// [`ManagementClient`] backed by the Contentful Management API.
#[derive(Debug, Clone)]
pub struct HttpManagementClient {
    config: ClientConfig,
    client: Client,
}

impl HttpManagementClient {
    /// Build a client with bearer authentication for `config.api_key`.
    ///
    /// # Errors
    ///
    /// Returns `ManagementError::Transport` if the token isn't a valid header
    /// value or the HTTP client can't be built.
    pub fn new(config: ClientConfig) -> Result<Self, ManagementError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| ManagementError::transport(&config.base_url, e))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ManagementError::transport(&config.base_url, e))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL of the content type collection in the configured space/environment.
    fn content_types_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match &self.config.environment {
            Some(env) => format!(
                "{base}/spaces/{}/environments/{env}/content_types",
                self.config.space_id
            ),
            None => format!("{base}/spaces/{}/content_types", self.config.space_id),
        }
    }

    fn content_type_url(&self, id: &str) -> String {
        format!("{}/{id}", self.content_types_url())
    }

    /// Attach a management API JSON body.
    ///
    /// `RequestBuilder::json` would override the vendor content type.
    fn with_body<T: Serialize>(
        &self,
        request: RequestBuilder,
        body: &T,
    ) -> Result<RequestBuilder, ManagementError> {
        let bytes = serde_json::to_vec(body).map_err(ManagementError::Encode)?;
        Ok(request.body(bytes))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        id: Option<&str>,
        version: Option<u64>,
        request: RequestBuilder,
    ) -> Result<T, ManagementError> {
        let request = match version {
            Some(v) => request.header(VERSION_HEADER, v),
            None => request,
        };
        let request = request
            .build()
            .map_err(|e| ManagementError::transport(&self.config.base_url, e))?;
        let url = request.url().to_string();
        debug!(method = %request.method(), %url, "management request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ManagementError::transport(&url, e))?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(ManagementError::Conflict {
                id: id.unwrap_or_default().to_string(),
                version,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body);
            return Err(ManagementError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ManagementError::transport(&url, e))?;
        serde_json::from_str(&body).map_err(|e| ManagementError::Api {
            status: status.as_u16(),
            message: format!("unexpected response body: {e}"),
        })
    }
}

#[async_trait]
impl ManagementClient for HttpManagementClient {
    async fn list(
        &self,
        query: Option<&str>,
    ) -> Result<Vec<ContentTypeDefinition>, ManagementError> {
        let url = match query {
            Some(q) if !q.is_empty() => {
                format!("{}?{}", self.content_types_url(), q.trim_start_matches('?'))
            }
            _ => self.content_types_url(),
        };

        let mut definitions = Vec::new();
        loop {
            let request = self.client.get(&url).query(&[
                ("skip", definitions.len() as u64),
                ("limit", PAGE_LIMIT),
            ]);
            let page: Page<ContentTypeDefinition> = self.send(None, None, request).await?;
            let fetched = page.items.len();
            definitions.extend(page.items);
            if fetched == 0 || definitions.len() as u64 >= page.total {
                break;
            }
        }

        debug!(count = definitions.len(), "listed content types");
        Ok(definitions)
    }

    async fn upsert(
        &self,
        definition: &ContentTypeDefinition,
        version: Option<u64>,
    ) -> Result<ContentTypeDefinition, ManagementError> {
        let request =
            self.with_body(self.client.put(self.content_type_url(&definition.id)), definition)?;
        let upserted: ContentTypeDefinition =
            self.send(Some(&definition.id), version, request).await?;
        info!(id = %upserted.id, version = ?upserted.version, "content type saved");
        Ok(upserted)
    }

    async fn activate(
        &self,
        id: &str,
        version: u64,
    ) -> Result<ContentTypeDefinition, ManagementError> {
        let url = format!("{}/published", self.content_type_url(id));
        let request = self.client.put(url);
        let activated: ContentTypeDefinition = self.send(Some(id), Some(version), request).await?;
        info!(id, version = ?activated.version, "content type published");
        Ok(activated)
    }

    async fn widget_config(&self, id: &str) -> Result<EditorInterface, ManagementError> {
        let url = format!("{}/editor_interface", self.content_type_url(id));
        self.send(Some(id), None, self.client.get(url)).await
    }

    async fn update_widget_config(
        &self,
        config: &EditorInterface,
        id: &str,
        version: u64,
    ) -> Result<EditorInterface, ManagementError> {
        let url = format!("{}/editor_interface", self.content_type_url(id));
        let request = self.with_body(self.client.put(url), config)?;
        self.send(Some(id), Some(version), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.contentful.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.environment.is_none());
    }

    #[test]
    fn urls_without_environment() {
        let client = HttpManagementClient::new(
            ClientConfig::new("space1", "token").base_url("http://localhost:1234/"),
        )
        .unwrap();
        assert_eq!(
            client.content_type_url("person"),
            "http://localhost:1234/spaces/space1/content_types/person"
        );
    }

    #[test]
    fn urls_with_environment() {
        let client =
            HttpManagementClient::new(ClientConfig::new("space1", "token").environment("staging"))
                .unwrap();
        assert_eq!(
            client.content_types_url(),
            "https://api.contentful.com/spaces/space1/environments/staging/content_types"
        );
    }

    #[test]
    fn unencodable_body_is_not_a_transport_error() {
        let client = HttpManagementClient::new(ClientConfig::new("space1", "token")).unwrap();
        let body = std::collections::HashMap::from([((1, 2), "value")]);
        let err = client
            .with_body(client.client.put(client.content_types_url()), &body)
            .unwrap_err();
        assert!(matches!(err, ManagementError::Encode(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_token_rejected() {
        let result = HttpManagementClient::new(ClientConfig::new("space1", "bad\ntoken"));
        assert!(matches!(result, Err(ManagementError::Transport { .. })));
    }
}
