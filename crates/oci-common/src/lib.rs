//! # oci-common
//!
//! Shared runtime for Oracle Cloud Infrastructure REST clients.
//!
//! This crate carries everything a typed service binding needs but should
//! not re-implement: the error taxonomy, retry policies with jittered
//! backoff, idempotency tokens, region and endpoint metadata, request
//! binding, response demultiplexing, and the dispatcher that strings those
//! together. Service crates such as `oci-compute` contribute only their
//! models, typed requests, and operation descriptors.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and normalisation of failures
//! - [`retry`] - Retry policies, backoff schedules, idempotency tokens
//! - [`config`] - Client configuration, credentials, service enablement
//! - [`region`] - Region and realm metadata, endpoint templates
//! - [`enums`] - Wire-format string enum support
//! - [`query`] - Query parameter builder
//! - [`request`] - Operation descriptors and request binding
//! - [`response`] - Response envelope and demultiplexing
//! - [`transport`] - Signing seam and the HTTP transport
//! - [`client`] - The generic dispatcher and its builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod enums;
pub mod error;
pub mod query;
pub mod region;
pub mod request;
pub mod response;
pub mod retry;
pub mod transport;

// Re-export commonly used types
pub use error::{Error, Result};
