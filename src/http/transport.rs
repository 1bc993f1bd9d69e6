//! Request-issuing transport.

use super::request::Request;
use super::response::Response;
use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Issues a request and returns its (streaming) response.
///
/// Implemented over `reqwest` by [`ReqwestTransport`]; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response>;
}

/// `reqwest`-backed transport.
///
/// Only a connect timeout is set. Event streams are long-lived, so any overall
/// deadline belongs to the caller's cancellation token.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        Self {
            client: builder.build().unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Use an existing client as-is.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        let response = tokio::select! {
            biased;
            () = request.cancel_token().cancelled() => return Err(Error::Cancelled),
            response = builder.send() => response?,
        };

        tracing::debug!(
            url = %request.url(),
            status = %response.status(),
            "Response received"
        );

        Ok(Response::from_reqwest(response))
    }
}
