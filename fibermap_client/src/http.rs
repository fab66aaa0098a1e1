// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The backend over HTTP and JSON.

use async_trait::async_trait;
use fibermap_model::{
    Cable, CableDraft, CableId, CableTypeRecord, FiberSplice, NetworkObject, ObjectDraft,
    ObjectId, ObjectTypeRecord, Region, RegionContents, RegionDraft, RegionId, SpliceDraft,
    SpliceId,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{Backend, BackendError, BackendResult, ClientConfig};

/// [`Backend`] talking to the REST API under `{api_base}/api`.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl HttpBackend {
    /// A backend rooted at `api_base`, such as `http://localhost:8000`.
    pub fn new(api_base: impl Into<String>) -> Self {
        let base = api_base.into().trim_end_matches('/').to_owned();
        Self {
            client: reqwest::Client::new(),
            base,
            token: None,
        }
    }

    /// A backend configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        let backend = Self::new(config.api_base.clone());
        match &config.access_token {
            Some(token) => backend.with_token(token.clone()),
            None => backend,
        }
    }

    /// Send `token` as a bearer credential on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "backend request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> BackendResult<T> {
        let response = checked(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn execute(&self, builder: RequestBuilder) -> BackendResult<()> {
        checked(builder.send().await?).await?;
        Ok(())
    }
}

async fn checked(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    });
    tracing::warn!(status = status.as_u16(), %detail, "backend rejected request");
    Err(BackendError::Status {
        status: status.as_u16(),
        detail,
    })
}

/// The `detail` member of an error body, as the API framework reports it.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_objects(&self) -> BackendResult<Vec<NetworkObject>> {
        self.fetch(self.request(Method::GET, "/network-objects/"))
            .await
    }

    async fn create_object(&self, draft: &ObjectDraft) -> BackendResult<NetworkObject> {
        self.fetch(self.request(Method::POST, "/network-objects/").json(draft))
            .await
    }

    async fn update_object(
        &self,
        id: ObjectId,
        draft: &ObjectDraft,
    ) -> BackendResult<NetworkObject> {
        let path = format!("/network-objects/{id}");
        self.fetch(self.request(Method::PUT, &path).json(draft))
            .await
    }

    async fn delete_object(&self, id: ObjectId) -> BackendResult<()> {
        let path = format!("/network-objects/{id}");
        self.execute(self.request(Method::DELETE, &path)).await
    }

    async fn list_cables(&self) -> BackendResult<Vec<Cable>> {
        self.fetch(self.request(Method::GET, "/cables/")).await
    }

    async fn create_cable(&self, draft: &CableDraft) -> BackendResult<Cable> {
        self.fetch(self.request(Method::POST, "/cables/").json(draft))
            .await
    }

    async fn update_cable(&self, id: CableId, draft: &CableDraft) -> BackendResult<Cable> {
        let path = format!("/cables/{id}");
        self.fetch(self.request(Method::PUT, &path).json(draft))
            .await
    }

    async fn delete_cable(&self, id: CableId) -> BackendResult<()> {
        let path = format!("/cables/{id}");
        self.execute(self.request(Method::DELETE, &path)).await
    }

    async fn list_splices(&self, cable: CableId) -> BackendResult<Vec<FiberSplice>> {
        let builder = self
            .request(Method::GET, "/fiber-splices/")
            .query(&[("cable_id", cable.get())]);
        self.fetch(builder).await
    }

    async fn create_splice(&self, draft: &SpliceDraft) -> BackendResult<FiberSplice> {
        self.fetch(self.request(Method::POST, "/fiber-splices/").json(draft))
            .await
    }

    async fn delete_splice(&self, id: SpliceId) -> BackendResult<()> {
        let path = format!("/fiber-splices/{id}");
        self.execute(self.request(Method::DELETE, &path)).await
    }

    async fn list_regions(&self) -> BackendResult<Vec<Region>> {
        self.fetch(self.request(Method::GET, "/regions/")).await
    }

    async fn region_contents(&self, id: RegionId) -> BackendResult<RegionContents> {
        let path = format!("/regions/{id}");
        self.fetch(self.request(Method::GET, &path)).await
    }

    async fn create_region(&self, draft: &RegionDraft) -> BackendResult<Region> {
        self.fetch(self.request(Method::POST, "/regions/").json(draft))
            .await
    }

    async fn add_object_to_region(&self, region: RegionId, object: ObjectId) -> BackendResult<()> {
        let path = format!("/regions/{region}/objects/{object}");
        self.execute(self.request(Method::POST, &path)).await
    }

    async fn add_cable_to_region(&self, region: RegionId, cable: CableId) -> BackendResult<()> {
        let path = format!("/regions/{region}/cables/{cable}");
        self.execute(self.request(Method::POST, &path)).await
    }

    async fn object_types(&self) -> BackendResult<Vec<ObjectTypeRecord>> {
        self.fetch(self.request(Method::GET, "/reference/object-types"))
            .await
    }

    async fn cable_types(&self) -> BackendResult<Vec<CableTypeRecord>> {
        self.fetch(self.request(Method::GET, "/reference/cable-types"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_live_under_the_api_prefix() {
        let backend = HttpBackend::new("http://localhost:8000/");
        assert_eq!(
            backend.url("/cables/"),
            "http://localhost:8000/api/cables/"
        );
        assert_eq!(
            backend.url(&format!("/regions/{}/objects/{}", RegionId(3), ObjectId(9))),
            "http://localhost:8000/api/regions/3/objects/9"
        );
    }

    #[test]
    fn token_comes_from_config() {
        let config = ClientConfig {
            access_token: Some("secret".into()),
            ..ClientConfig::default()
        };
        let backend = HttpBackend::from_config(&config);
        assert_eq!(backend.token.as_deref(), Some("secret"));
        assert!(HttpBackend::new("http://x").token.is_none());
    }

    #[test]
    fn detail_is_read_from_error_bodies() {
        assert_eq!(
            error_detail(r#"{"detail": "Cable not found"}"#).as_deref(),
            Some("Cable not found")
        );
        let nested = error_detail(r#"{"detail": [{"msg": "field required"}]}"#).unwrap();
        assert!(nested.contains("field required"));
        assert_eq!(error_detail("<html>oops</html>"), None);
        assert_eq!(error_detail(r#"{"error": "x"}"#), None);
    }
}
