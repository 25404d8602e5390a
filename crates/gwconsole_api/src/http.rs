use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::ApiError;
use crate::model::{ServicePanel, ServiceRecord};
use crate::query::{FetchResult, PageResult, ServiceQuery};
use crate::ServiceApi;

const SERVICES_PATH: &str = "api/v1/services";
const PANEL_PATH: &str = "api/v1/services/panel";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Gateway admin API over HTTP.
///
/// Cheap to clone; the underlying `reqwest::Client` is shared.
#[derive(Debug, Clone)]
pub struct HttpServiceApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
}

impl HttpServiceApi {
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.timeout(self.timeout);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Reads the body and rejects non-2xx statuses.
    async fn read_body<T: DeserializeOwned>(
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "service request failed");
            return Err(ApiError::http(status.as_u16(), body));
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }
}

#[async_trait::async_trait]
impl ServiceApi for HttpServiceApi {
    async fn list_services(
        &self,
        query: &ServiceQuery,
    ) -> Result<PageResult<ServiceRecord>, ApiError> {
        let mut url = self.base_url.join(SERVICES_PATH)?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());
        debug!(%url, "listing services");

        let response = self.authorize(self.client.get(url)).send().await?;
        let page: PageResult<ServiceRecord> = Self::read_body(response).await?;
        if !page.success {
            return Err(ApiError::Backend(Box::new(
                page.error.unwrap_or_default(),
            )));
        }
        Ok(page)
    }

    async fn delete_service(&self, id: &str) -> Result<(), ApiError> {
        let mut url = self.base_url.join(SERVICES_PATH)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::NotFound(id.to_string()))?
            .push(id);
        debug!(%url, "deleting service");

        let response = self.authorize(self.client.delete(url)).send().await?;
        let result: FetchResult<serde_json::Value> =
            Self::read_body(response).await?;
        if !result.success {
            return Err(ApiError::Backend(Box::new(
                result.error.unwrap_or_default(),
            )));
        }
        Ok(())
    }

    async fn service_panel(&self) -> Result<ServicePanel, ApiError> {
        let url = self.base_url.join(PANEL_PATH)?;
        debug!(%url, "reading service panel");

        let response = self.authorize(self.client.get(url)).send().await?;
        let result: FetchResult<ServicePanel> = Self::read_body(response).await?;
        if !result.success {
            return Err(ApiError::Backend(Box::new(
                result.error.unwrap_or_default(),
            )));
        }
        Ok(result.data.unwrap_or_default())
    }
}
