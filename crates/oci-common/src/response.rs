//! Response envelope and demultiplexing.
//!
//! The transport hands back a [`RawResponse`]; demultiplexing turns it into
//! either a typed [`ApiResponse`] or a normalised error. Success bodies are
//! decoded with `serde_json`; non-2xx bodies are parsed as the standard
//! `{ "code", "message" }` error payload. The correlation id of the failing
//! response always survives on the error.

use crate::error::{Error, Result};
use crate::request::OperationDescriptor;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// One HTTP exchange as seen by the transport: status, headers, full body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Response status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Complete response body
    pub body: Vec<u8>,
}

impl RawResponse {
    /// A header value as UTF-8, when present and representable.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `opc-request-id` correlation header.
    #[must_use]
    pub fn opc_request_id(&self) -> Option<&str> {
        self.header("opc-request-id")
    }
}

/// A successful operation result together with its transport envelope.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Response status
    pub status: StatusCode,
    /// All response headers
    pub headers: HeaderMap,
    /// Correlation id assigned by the service
    pub opc_request_id: Option<String>,
    /// Entity tag for optimistic concurrency, when the operation returns one
    pub etag: Option<String>,
    /// Opaque pagination cursor; pass it back as `page` to continue a list
    pub opc_next_page: Option<String>,
    /// Decoded operation result
    pub body: T,
}

impl<T> ApiResponse<T> {
    /// Whether the service indicated another page of results.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.opc_next_page.is_some()
    }

    /// Consume the envelope, keeping only the decoded body.
    #[must_use]
    pub fn into_body(self) -> T {
        self.body
    }
}

/// Demultiplex a raw response into a typed envelope.
pub(crate) fn demux<T: DeserializeOwned>(
    descriptor: &OperationDescriptor,
    raw: RawResponse,
) -> Result<ApiResponse<T>> {
    if !raw.status.is_success() {
        return Err(service_error(descriptor, &raw));
    }
    let opc_request_id = raw.opc_request_id().map(str::to_string);
    let body = serde_json::from_slice(&raw.body).map_err(|e| Error::ResponseDecode {
        service: descriptor.service,
        operation: descriptor.operation,
        message: e.to_string(),
        opc_request_id: opc_request_id.clone(),
    })?;
    Ok(ApiResponse {
        status: raw.status,
        opc_request_id,
        etag: raw.header("etag").map(str::to_string),
        opc_next_page: raw.header("opc-next-page").map(str::to_string),
        headers: raw.headers,
        body,
    })
}

/// Demultiplex a raw response for an operation that returns no body.
///
/// Any body the service does send on success is ignored.
pub(crate) fn demux_no_content(
    descriptor: &OperationDescriptor,
    raw: RawResponse,
) -> Result<ApiResponse<()>> {
    if !raw.status.is_success() {
        return Err(service_error(descriptor, &raw));
    }
    Ok(ApiResponse {
        status: raw.status,
        opc_request_id: raw.opc_request_id().map(str::to_string),
        etag: raw.header("etag").map(str::to_string),
        opc_next_page: raw.header("opc-next-page").map(str::to_string),
        headers: raw.headers,
        body: (),
    })
}

/// Normalise a non-2xx response into a service error.
pub(crate) fn service_error(descriptor: &OperationDescriptor, raw: &RawResponse) -> Error {
    Error::service_failure(
        descriptor.service,
        descriptor.operation,
        raw.status,
        raw.opc_request_id().map(str::to_string),
        &raw.body,
        descriptor.api_reference,
    )
}
