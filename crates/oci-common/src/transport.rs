//! Signing seam and HTTP transport.
//!
//! [`RequestSigner`] is the seam a signing implementation plugs into; this
//! crate ships only [`NoopSigner`] for anonymous requests and tests.
//! [`HttpTransport`] performs exactly one round trip per call over a shared
//! `reqwest` client. Retry scheduling lives in the dispatcher, never here.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::request::{BoundRequest, OperationDescriptor};
use crate::response::RawResponse;
use async_trait::async_trait;
use std::sync::Arc;

/// Signs a bound request in place before it is sent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestSigner: Send + Sync {
    /// Add authentication headers to the request.
    ///
    /// # Errors
    ///
    /// Returns an error when signing material is unavailable or invalid;
    /// the request is not sent in that case.
    async fn sign(&self, request: &mut BoundRequest) -> Result<()>;
}

/// Signer that adds nothing. Requests go out anonymously.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSigner;

#[async_trait]
impl RequestSigner for NoopSigner {
    async fn sign(&self, _request: &mut BoundRequest) -> Result<()> {
        Ok(())
    }
}

/// Executes one HTTP exchange for the dispatcher.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransportExecutor: Send + Sync {
    /// Perform a single round trip: sign, send, collect the full response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] or [`Error::Timeout`] for failures
    /// below the HTTP layer. Non-2xx responses are not errors here; the
    /// dispatcher classifies them.
    async fn round_trip(
        &self,
        descriptor: &OperationDescriptor,
        request: BoundRequest,
    ) -> Result<RawResponse>;
}

/// `reqwest`-backed transport with a shared connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    signer: Arc<dyn RequestSigner>,
}

impl HttpTransport {
    /// Build a transport from client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        config: &ClientConfig,
        user_agent: String,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .pool_max_idle_per_host(
                usize::try_from(config.pool_max_idle_per_host).unwrap_or(usize::MAX),
            );
        if !config.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, signer })
    }
}

#[async_trait]
impl TransportExecutor for HttpTransport {
    async fn round_trip(
        &self,
        descriptor: &OperationDescriptor,
        mut request: BoundRequest,
    ) -> Result<RawResponse> {
        self.signer.sign(&mut request).await?;

        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            Error::transport(
                descriptor.service,
                descriptor.operation,
                &e,
                descriptor.api_reference,
            )
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| {
            Error::transport(
                descriptor.service,
                descriptor.operation,
                &e,
                descriptor.api_reference,
            )
        })?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
