//! Generic service client: every operation runs through this dispatcher.
//!
//! [`ServiceClient`] owns the resolved endpoint and the transport, and turns
//! a descriptor plus a typed request into attempts: resolve the retry
//! policy, bind the request, inject the idempotency token, then loop over
//! round trips with jittered backoff until a terminal outcome. Service
//! crates wrap this in a thin typed facade built by [`ServiceClientBuilder`].

use crate::config::{service_enabled, ClientConfig, ENABLED_SERVICES_ENV};
use crate::error::{Error, Result};
use crate::region::Region;
use crate::request::{
    bind_url, BoundRequest, OperationDescriptor, RequestParts, ServiceRequest,
};
use crate::response::{demux, demux_no_content, service_error, ApiResponse, RawResponse};
use crate::retry::{generate_retry_token, resolve_policy};
use crate::transport::{HttpTransport, NoopSigner, RequestSigner, TransportExecutor};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;
use validator::Validate;

/// Builder for [`ServiceClient`].
pub struct ServiceClientBuilder {
    service: &'static str,
    endpoint_template: &'static str,
    base_path: &'static str,
    user_agent: String,
    config: ClientConfig,
    signer: Arc<dyn RequestSigner>,
    executor: Option<Arc<dyn TransportExecutor>>,
}

impl ServiceClientBuilder {
    /// Create a builder for a service.
    ///
    /// `service` is the enablement-registry name (e.g. `core`),
    /// `endpoint_template` the region template (e.g.
    /// `https://iaas.{region}.{secondLevelDomain}`), and `base_path` the
    /// API version prefix (e.g. `/20160918`).
    #[must_use]
    pub fn new(
        service: &'static str,
        endpoint_template: &'static str,
        base_path: &'static str,
    ) -> Self {
        Self {
            service,
            endpoint_template,
            base_path,
            user_agent: concat!("oci-common/", env!("CARGO_PKG_VERSION")).to_string(),
            config: ClientConfig::new(),
            signer: Arc::new(NoopSigner),
            executor: None,
        }
    }

    /// Replace the whole client configuration.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the region used for endpoint resolution.
    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.config.region = Some(region);
        self
    }

    /// Set an explicit endpoint, bypassing region resolution.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    /// Set the client-wide retry default.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: crate::retry::RetryPolicy) -> Self {
        self.config.retry_policy = Some(policy);
        self
    }

    /// Set the request signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = signer;
        self
    }

    /// Override the user-agent product token.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replace the transport executor. Intended for tests that exercise the
    /// dispatcher without a live server.
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn TransportExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the service is disabled, the
    /// configuration fails validation, or no endpoint can be resolved.
    pub fn build(self) -> Result<ServiceClient> {
        if !service_enabled(self.service) {
            return Err(Error::Configuration(format!(
                "service {:?} is disabled by {ENABLED_SERVICES_ENV}",
                self.service
            )));
        }
        self.config.validate()?;

        let endpoint = resolve_endpoint(&self.config, self.service, self.endpoint_template)?;
        let user_agent = match &self.config.extra_user_agent {
            Some(extra) => format!("{} {extra}", self.user_agent),
            None => self.user_agent.clone(),
        };
        let executor: Arc<dyn TransportExecutor> = match self.executor {
            Some(executor) => executor,
            None => Arc::new(HttpTransport::new(&self.config, user_agent, self.signer)?),
        };

        Ok(ServiceClient {
            service: self.service,
            endpoint,
            endpoint_template: self.endpoint_template,
            base_path: self.base_path,
            retry_policy: self.config.retry_policy,
            executor,
        })
    }
}

impl fmt::Debug for ServiceClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClientBuilder")
            .field("service", &self.service)
            .field("endpoint_template", &self.endpoint_template)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn resolve_endpoint(
    config: &ClientConfig,
    service: &'static str,
    endpoint_template: &'static str,
) -> Result<Url> {
    if let Some(url) = config.parse_endpoint()? {
        return Ok(url);
    }
    let region = config.region.as_ref().ok_or_else(|| {
        Error::Configuration("either a region or an explicit endpoint is required".to_string())
    })?;
    if region.id().is_empty() {
        return Err(Error::Configuration(
            "endpoint cannot be constructed from an empty region".to_string(),
        ));
    }
    let endpoint = region.endpoint_for_template(service, endpoint_template);
    Url::parse(&endpoint)
        .map_err(|e| Error::Configuration(format!("invalid endpoint {endpoint:?}: {e}")))
}

/// Dispatcher shared by all typed service clients.
///
/// Cloning is cheap and clones share the transport's connection pool. All
/// invocation methods take `&self`; concurrent invocations are independent.
#[derive(Clone)]
pub struct ServiceClient {
    service: &'static str,
    endpoint: Url,
    endpoint_template: &'static str,
    base_path: &'static str,
    retry_policy: Option<crate::retry::RetryPolicy>,
    executor: Arc<dyn TransportExecutor>,
}

impl ServiceClient {
    /// The endpoint requests are sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Point the client at another region, keeping everything else.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the region produces an
    /// unparsable endpoint.
    pub fn set_region(&mut self, region: &Region) -> Result<()> {
        let endpoint = region.endpoint_for_template(self.service, self.endpoint_template);
        self.endpoint = Url::parse(&endpoint)
            .map_err(|e| Error::Configuration(format!("invalid endpoint {endpoint:?}: {e}")))?;
        Ok(())
    }

    /// Invoke an operation and decode its JSON response body.
    ///
    /// # Errors
    ///
    /// Any variant of [`Error`] except `Configuration`: binding failures
    /// before the first byte is sent, normalised transport/service failures,
    /// decode failures, cancellation, deadline, or retry exhaustion.
    pub async fn invoke<R, T>(
        &self,
        descriptor: &'static OperationDescriptor,
        request: &R,
    ) -> Result<ApiResponse<T>>
    where
        R: ServiceRequest + Sync,
        T: DeserializeOwned,
    {
        let raw = self.dispatch(descriptor, request).await?;
        demux(descriptor, raw)
    }

    /// Invoke an operation that returns no response body.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ServiceClient::invoke`], minus decode errors.
    pub async fn invoke_no_content<R>(
        &self,
        descriptor: &'static OperationDescriptor,
        request: &R,
    ) -> Result<ApiResponse<()>>
    where
        R: ServiceRequest + Sync,
    {
        let raw = self.dispatch(descriptor, request).await?;
        demux_no_content(descriptor, raw)
    }

    /// Run the attempt loop for one invocation. `Ok` carries a 2xx response.
    async fn dispatch<R>(
        &self,
        descriptor: &'static OperationDescriptor,
        request: &R,
    ) -> Result<RawResponse>
    where
        R: ServiceRequest + Sync,
    {
        let metadata = request.metadata();
        let policy = resolve_policy(metadata.retry_policy, self.retry_policy, descriptor.retry);

        let mut parts = RequestParts::new(descriptor.operation);
        request.bind(&mut parts)?;
        let url = bind_url(&self.endpoint, self.base_path, descriptor, &parts)?;

        let mut bound = BoundRequest {
            method: descriptor.method.clone(),
            url,
            headers: parts.take_headers(),
            body: parts.take_body(),
        };
        bound.set_header("accept", "application/json");
        if bound.body.is_some() {
            bound.set_header("content-type", "application/json");
        }
        if descriptor.requires_retry_token {
            // Chosen once; every retry of this invocation reuses it
            let token = match request.retry_token() {
                Some(token) if !token.trim().is_empty() => token.to_string(),
                _ => generate_retry_token(),
            };
            bound.set_header("opc-retry-token", token);
        }

        let cancellation = metadata.cancellation_token.clone();
        let deadline = metadata.deadline;
        let mut attempt: u32 = 1;

        loop {
            if let Some(token) = &cancellation {
                if token.is_cancelled() {
                    return Err(Error::Cancelled {
                        operation: descriptor.operation,
                    });
                }
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(Error::DeadlineExceeded {
                        operation: descriptor.operation,
                    });
                }
            }

            debug!(
                service = descriptor.service,
                operation = descriptor.operation,
                attempt,
                method = %bound.method,
                url = %bound.url,
                "sending request"
            );

            let round_trip =
                self.round_trip_within_deadline(descriptor, bound.clone(), deadline);
            let outcome = match &cancellation {
                Some(token) => tokio::select! {
                    () = token.cancelled() => {
                        return Err(Error::Cancelled {
                            operation: descriptor.operation,
                        });
                    }
                    outcome = round_trip => outcome,
                },
                None => round_trip.await,
            };

            let failure = match outcome {
                Ok(raw) => {
                    debug!(
                        service = descriptor.service,
                        operation = descriptor.operation,
                        attempt,
                        status = raw.status.as_u16(),
                        "received response"
                    );
                    if raw.status.is_success() {
                        return Ok(raw);
                    }
                    service_error(descriptor, &raw)
                }
                Err(err) => err,
            };

            if !policy.is_retryable_failure(&failure) {
                return Err(failure);
            }
            if attempt >= policy.max_attempts {
                if attempt > 1 {
                    return Err(Error::RetryExhausted {
                        attempts: attempt,
                        source: Box::new(failure),
                    });
                }
                return Err(failure);
            }

            let delay = policy.jittered_delay_for_attempt(attempt);
            if let Some(deadline) = deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining <= delay {
                    return Err(Error::DeadlineExceeded {
                        operation: descriptor.operation,
                    });
                }
            }
            warn!(
                service = descriptor.service,
                operation = descriptor.operation,
                attempt,
                error = %failure,
                "retrying after {:?}",
                delay
            );
            match &cancellation {
                Some(token) => tokio::select! {
                    () = token.cancelled() => {
                        return Err(Error::Cancelled {
                            operation: descriptor.operation,
                        });
                    }
                    () = tokio::time::sleep(delay) => {}
                },
                None => tokio::time::sleep(delay).await,
            }
            attempt += 1;
        }
    }

    /// One transport round trip, bounded by the invocation deadline.
    ///
    /// A deadline firing while the attempt is in flight drops the HTTP
    /// call and surfaces [`Error::DeadlineExceeded`].
    async fn round_trip_within_deadline(
        &self,
        descriptor: &OperationDescriptor,
        request: BoundRequest,
        deadline: Option<Instant>,
    ) -> Result<RawResponse> {
        match deadline {
            Some(deadline) => {
                let bounded = tokio::time::timeout_at(
                    deadline.into(),
                    self.executor.round_trip(descriptor, request),
                );
                match bounded.await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(Error::DeadlineExceeded {
                        operation: descriptor.operation,
                    }),
                }
            }
            None => self.executor.round_trip(descriptor, request).await,
        }
    }
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("endpoint", &self.endpoint.as_str())
            .field("base_path", &self.base_path)
            .finish_non_exhaustive()
    }
}
