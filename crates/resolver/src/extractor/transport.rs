use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{self, HeaderValue};
use reqwest::{Client, StatusCode, redirect};
use rustls::{ClientConfig, crypto::aws_lc_rs};
use rustls_platform_verifier::BuilderVerifierExt;
use std::sync::Arc;
use tracing::debug;

use super::config::ResolverConfig;
use super::error::TransportError;
use super::request::RequestDescriptor;

/// A fetched response.
#[derive(Debug, Clone)]
pub struct Response {
    /// Final URL, after redirects
    pub url: String,
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Response {
    pub fn new(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            url: url.into(),
            status: StatusCode::OK,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

/// Sends requests on behalf of the resolver.
///
/// Timeouts, redirects and TLS are the transport's business. Any failure is
/// reported as a [`TransportError`] and never retried by the resolver.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<Response, TransportError>;
}

pub fn default_client(config: &ResolverConfig) -> Result<Client, TransportError> {
    let provider = Arc::new(aws_lc_rs::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| TransportError::Client {
            reason: e.to_string(),
        })?
        .with_platform_verifier()
        .map_err(|e| TransportError::Client {
            reason: e.to_string(),
        })?
        .with_no_client_auth();

    let redirect_policy = if config.follow_redirects {
        redirect::Policy::limited(10)
    } else {
        redirect::Policy::none()
    };

    Client::builder()
        .use_preconfigured_tls(tls_config)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.as_str())
        .default_headers(config.headers.clone())
        .redirect(redirect_policy)
        .build()
        .map_err(|e| TransportError::Client {
            reason: e.to_string(),
        })
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    error_for_status: bool,
}

impl HttpTransport {
    pub fn new(config: &ResolverConfig) -> Result<Self, TransportError> {
        Ok(Self::with_client(default_client(config)?, config.error_for_status))
    }

    pub fn with_client(client: Client, error_for_status: bool) -> Self {
        Self {
            client,
            error_for_status,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<Response, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());

        if let Some(content_type) = &request.content_type {
            let value = HeaderValue::from_str(content_type)
                .map_err(|e| TransportError::invalid_request(e.to_string()))?;
            builder = builder.header(header::CONTENT_TYPE, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        debug!(%status, url = %url, "Received response");

        if self.error_for_status && !status.is_success() {
            return Err(TransportError::http_status(status, url));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        let body = response.bytes().await?;

        let mut response = Response::new(url, body).with_status(status);
        if let Some(content_type) = content_type {
            response = response.with_content_type(content_type);
        }
        Ok(response)
    }
}
