//! Operation descriptors and request binding.
//!
//! An [`OperationDescriptor`] is the static description of one REST
//! operation: method, path template, retry stance, whether it takes an
//! idempotency token. Typed request structs implement [`ServiceRequest`] to
//! bind their fields into [`RequestParts`]; the dispatcher then expands the
//! path template into a full URL. Binding failures never reach the network.

use crate::error::{Error, Result};
use crate::query::QueryParams;
use crate::retry::{OperationRetry, RetryPolicy};
use reqwest::Method;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Static description of one REST operation.
///
/// One `static` descriptor exists per operation, colocated with the facade
/// method that uses it.
#[derive(Debug)]
pub struct OperationDescriptor {
    /// Service name used in errors and logs, e.g. `Compute`
    pub service: &'static str,
    /// Operation name, e.g. `LaunchInstance`
    pub operation: &'static str,
    /// HTTP method
    pub method: Method,
    /// Path template with `{param}` placeholders, e.g.
    /// `/instances/{instanceId}`
    pub path_template: &'static str,
    /// Retry stance when neither the request nor the client overrides it
    pub retry: OperationRetry,
    /// Whether the dispatcher injects an `opc-retry-token` header
    pub requires_retry_token: bool,
    /// API reference link attached to failures; empty means none
    pub api_reference: &'static str,
}

impl OperationDescriptor {
    /// The API reference link, when the operation has one.
    #[must_use]
    pub fn reference(&self) -> Option<&'static str> {
        (!self.api_reference.is_empty()).then_some(self.api_reference)
    }

    /// The operation-level default retry policy.
    #[must_use]
    pub const fn default_retry_policy(&self) -> RetryPolicy {
        self.retry.policy()
    }
}

/// Per-invocation metadata riding on a typed request.
#[derive(Debug, Clone, Default)]
pub struct RequestMetadata {
    /// Retry override; wins over the client and operation defaults
    pub retry_policy: Option<RetryPolicy>,

    /// Token that cancels the invocation, including backoff sleeps
    pub cancellation_token: Option<CancellationToken>,

    /// Deadline across all attempts of the invocation
    pub deadline: Option<Instant>,
}

impl RequestMetadata {
    /// Empty metadata: no override, no cancellation, no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the retry policy for this invocation only.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Set an absolute deadline across all attempts.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }
}

/// A typed request that can bind itself into wire-level parts.
pub trait ServiceRequest {
    /// Bind path parameters, query parameters, headers and body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] when a parameter is missing or invalid;
    /// nothing is sent in that case.
    fn bind(&self, parts: &mut RequestParts) -> Result<()>;

    /// Invocation metadata: retry override, cancellation, deadline.
    fn metadata(&self) -> &RequestMetadata;

    /// Caller-supplied idempotency token, when the operation takes one.
    fn retry_token(&self) -> Option<&str> {
        None
    }
}

/// Wire-level parts collected from a typed request during binding.
#[derive(Debug)]
pub struct RequestParts {
    operation: &'static str,
    path_params: Vec<(&'static str, String)>,
    /// Query string pairs, appended in insertion order
    pub query: QueryParams,
    headers: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
}

impl RequestParts {
    /// Empty parts for the named operation.
    #[must_use]
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            path_params: Vec::new(),
            query: QueryParams::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Operation these parts are bound for, as named by the descriptor.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Bind a path parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] when the value is empty after trimming;
    /// an empty segment would silently address the wrong resource.
    pub fn path_param(&mut self, name: &'static str, value: &str) -> Result<()> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::binding(
                self.operation,
                format!("path parameter {name:?} must not be empty"),
            ));
        }
        match self.path_params.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = trimmed.to_string(),
            None => self.path_params.push((name, trimmed.to_string())),
        }
        Ok(())
    }

    /// Set a header, replacing any earlier value for the same name.
    pub fn header(&mut self, name: &'static str, value: impl Into<String>) {
        set_header(&mut self.headers, name, value.into());
    }

    /// Set a header when a value is present.
    pub fn header_opt(&mut self, name: &'static str, value: Option<&str>) {
        if let Some(value) = value {
            self.header(name, value);
        }
    }

    /// Serialise a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] when serialisation fails.
    pub fn json_body<T: Serialize + ?Sized>(&mut self, body: &T) -> Result<()> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            Error::binding(
                self.operation,
                format!("failed to serialise request body: {e}"),
            )
        })?;
        self.body = Some(bytes);
        Ok(())
    }

    /// The bound value for a path parameter, if any.
    #[must_use]
    pub fn path_value(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Headers bound so far.
    #[must_use]
    pub fn headers(&self) -> &[(&'static str, String)] {
        &self.headers
    }

    /// Whether a body was bound.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub(crate) fn take_body(&mut self) -> Option<Vec<u8>> {
        self.body.take()
    }

    pub(crate) fn take_headers(&mut self) -> Vec<(&'static str, String)> {
        std::mem::take(&mut self.headers)
    }
}

/// A fully bound request, ready for the transport. Cloned once per attempt.
#[derive(Debug, Clone)]
pub struct BoundRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including query string
    pub url: Url,
    /// Header pairs; names are unique
    pub headers: Vec<(&'static str, String)>,
    /// Serialised body, when the operation has one
    pub body: Option<Vec<u8>>,
}

impl BoundRequest {
    /// Set a header, replacing any earlier value for the same name.
    pub fn set_header(&mut self, name: &'static str, value: impl Into<String>) {
        set_header(&mut self.headers, name, value.into());
    }

    /// The current value of a header, if set.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn set_header(headers: &mut Vec<(&'static str, String)>, name: &'static str, value: String) {
    match headers
        .iter_mut()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
    {
        Some(entry) => entry.1 = value,
        None => headers.push((name, value)),
    }
}

/// Expand the descriptor's path template against a base endpoint.
///
/// Every substituted value lands as exactly one path segment; reserved
/// characters in values are percent-encoded and can never introduce new
/// segments. The query pairs from `parts` are appended afterwards.
pub(crate) fn bind_url(
    endpoint: &Url,
    base_path: &str,
    descriptor: &OperationDescriptor,
    parts: &RequestParts,
) -> Result<Url> {
    let mut url = endpoint.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            Error::binding(descriptor.operation, "endpoint cannot be a base URL")
        })?;
        segments.pop_if_empty();
        for segment in base_path
            .split('/')
            .chain(descriptor.path_template.split('/'))
        {
            if segment.is_empty() {
                continue;
            }
            if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                let value = parts.path_value(name).ok_or_else(|| {
                    Error::binding(
                        descriptor.operation,
                        format!("no value bound for path parameter {name:?}"),
                    )
                })?;
                segments.push(value);
            } else {
                segments.push(segment);
            }
        }
    }
    let pairs = parts.query.pairs();
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for (name, value) in pairs {
            query.append_pair(name, value);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    static GET_WIDGET: OperationDescriptor = OperationDescriptor {
        service: "Widgets",
        operation: "GetWidget",
        method: Method::GET,
        path_template: "/widgets/{widgetId}",
        retry: OperationRetry::None,
        requires_retry_token: false,
        api_reference: "https://docs.example.com/api/GetWidget",
    };

    #[test]
    fn descriptor_reference_empty_means_none() {
        assert_eq!(
            GET_WIDGET.reference(),
            Some("https://docs.example.com/api/GetWidget")
        );

        let bare = OperationDescriptor {
            service: "Widgets",
            operation: "DeleteWidget",
            method: Method::DELETE,
            path_template: "/widgets/{widgetId}",
            retry: OperationRetry::None,
            requires_retry_token: false,
            api_reference: "",
        };
        assert_eq!(bare.reference(), None);
    }

    #[test]
    fn path_param_rejects_empty_values() {
        let mut parts = RequestParts::new("GetWidget");
        let err = parts.path_param("widgetId", "   ").unwrap_err();
        assert_eq!(err.error_code(), "BINDING_ERROR");
        assert!(err.to_string().contains("widgetId"));
    }

    #[test]
    fn path_param_trims_and_overwrites() {
        let mut parts = RequestParts::new("GetWidget");
        parts.path_param("widgetId", " first ").unwrap();
        parts.path_param("widgetId", "second").unwrap();
        assert_eq!(parts.path_value("widgetId"), Some("second"));
    }

    #[test]
    fn bind_url_expands_template() {
        let endpoint = Url::parse("https://iaas.us-phoenix-1.oraclecloud.com").unwrap();
        let mut parts = RequestParts::new("GetWidget");
        parts.path_param("widgetId", "ocid1.widget.oc1..abc").unwrap();

        let url = bind_url(&endpoint, "/20160918", &GET_WIDGET, &parts).unwrap();
        assert_eq!(
            url.as_str(),
            "https://iaas.us-phoenix-1.oraclecloud.com/20160918/widgets/ocid1.widget.oc1..abc"
        );
    }

    #[test]
    fn bind_url_percent_encodes_single_segment() {
        let endpoint = Url::parse("https://iaas.us-phoenix-1.oraclecloud.com").unwrap();
        let mut parts = RequestParts::new("GetWidget");
        parts.path_param("widgetId", "a/b c?d").unwrap();

        let url = bind_url(&endpoint, "/20160918", &GET_WIDGET, &parts).unwrap();
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], "20160918");
        assert_eq!(segments[1], "widgets");
        assert!(url.path().contains("a%2Fb%20c%3Fd"));
    }

    #[test]
    fn bind_url_missing_placeholder_is_binding_error() {
        let endpoint = Url::parse("https://iaas.us-phoenix-1.oraclecloud.com").unwrap();
        let parts = RequestParts::new("GetWidget");

        let err = bind_url(&endpoint, "/20160918", &GET_WIDGET, &parts).unwrap_err();
        assert_eq!(err.error_code(), "BINDING_ERROR");
        assert!(err.to_string().contains("widgetId"));
    }

    #[test]
    fn bind_url_appends_query_pairs() {
        let endpoint = Url::parse("https://iaas.us-phoenix-1.oraclecloud.com").unwrap();
        static LIST_WIDGETS: OperationDescriptor = OperationDescriptor {
            service: "Widgets",
            operation: "ListWidgets",
            method: Method::GET,
            path_template: "/widgets",
            retry: OperationRetry::Default,
            requires_retry_token: false,
            api_reference: "",
        };
        let mut parts = RequestParts::new("ListWidgets");
        parts.query.push("compartmentId", "ocid1.compartment.oc1..xyz");
        parts.query.push("limit", "50");

        let url = bind_url(&endpoint, "/20160918", &LIST_WIDGETS, &parts).unwrap();
        assert_eq!(
            url.query(),
            Some("compartmentId=ocid1.compartment.oc1..xyz&limit=50")
        );
    }

    #[test]
    fn bind_url_no_query_when_empty() {
        let endpoint = Url::parse("https://iaas.us-phoenix-1.oraclecloud.com").unwrap();
        let mut parts = RequestParts::new("GetWidget");
        parts.path_param("widgetId", "w-1").unwrap();

        let url = bind_url(&endpoint, "/20160918", &GET_WIDGET, &parts).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn bind_url_tolerates_trailing_slash_on_endpoint() {
        let endpoint = Url::parse("https://iaas.us-phoenix-1.oraclecloud.com/").unwrap();
        let mut parts = RequestParts::new("GetWidget");
        parts.path_param("widgetId", "w-1").unwrap();

        let url = bind_url(&endpoint, "/20160918", &GET_WIDGET, &parts).unwrap();
        assert_eq!(url.path(), "/20160918/widgets/w-1");
    }

    #[test]
    fn headers_replace_by_name() {
        let mut request = BoundRequest {
            method: Method::POST,
            url: Url::parse("https://example.com/x").unwrap(),
            headers: vec![("accept", "application/json".to_string())],
            body: None,
        };
        request.set_header("accept", "text/plain");
        request.set_header("if-match", "\"etag-1\"");

        assert_eq!(request.header("accept"), Some("text/plain"));
        assert_eq!(request.header("ACCEPT"), Some("text/plain"));
        assert_eq!(request.header("if-match"), Some("\"etag-1\""));
        assert_eq!(request.headers.len(), 2);
    }

    #[test]
    fn json_body_serialises() {
        #[derive(Serialize)]
        struct Payload<'a> {
            name: &'a str,
        }
        let mut parts = RequestParts::new("CreateWidget");
        parts.json_body(&Payload { name: "w" }).unwrap();
        assert!(parts.has_body());
        assert_eq!(parts.take_body().unwrap(), br#"{"name":"w"}"#);
    }

    #[test]
    fn metadata_builders() {
        let token = CancellationToken::new();
        let metadata = RequestMetadata::new()
            .with_retry_policy(RetryPolicy::no_retry())
            .with_cancellation_token(token.clone())
            .with_timeout(Duration::from_secs(30));

        assert_eq!(metadata.retry_policy, Some(RetryPolicy::no_retry()));
        assert!(metadata.cancellation_token.is_some());
        assert!(metadata.deadline.unwrap() > Instant::now());
    }
}
