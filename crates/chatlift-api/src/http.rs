//! Shared bearer-token HTTP plumbing for the two platform clients.

use chatlift_core::{ChatliftError, Result};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A configured client for one platform: base URL, bearer token, and
/// uniform error mapping.
#[derive(Clone)]
pub(crate) struct ApiClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: &str, api_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }

    /// Pagination links come back absolute; everything else is
    /// base-relative.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, context: &str) -> Result<Response> {
        request
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ChatliftError::http(format!("{} failed: {}", context, e)))
    }

    async fn expect_success(response: Response, context: &str) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ChatliftError::api(
                status.as_u16(),
                format!("{}: {}", context, body),
            ));
        }
        Ok(response)
    }

    pub(crate) async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ChatliftError::http(format!("failed to decode {} response: {}", context, e)))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str, context: &str) -> Result<T> {
        let response = self.send(self.client.get(self.url(path)), context).await?;
        let response = Self::expect_success(response, context).await?;
        Self::decode(response, context).await
    }

    pub(crate) async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<T> {
        let request = self.client.get(self.url(path)).query(query);
        let response = self.send(request, context).await?;
        let response = Self::expect_success(response, context).await?;
        Self::decode(response, context).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<T> {
        let response = self.post_raw(path, body, context).await?;
        let response = Self::expect_success(response, context).await?;
        Self::decode(response, context).await
    }

    /// POST without status handling; the caller inspects the response.
    pub(crate) async fn post_raw<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<Response> {
        self.send(self.client.post(self.url(path)).json(body), context)
            .await
    }

    pub(crate) async fn put_unit<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<()> {
        let response = self
            .send(self.client.put(self.url(path)).json(body), context)
            .await?;
        Self::expect_success(response, context).await?;
        Ok(())
    }
}
