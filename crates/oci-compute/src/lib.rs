//! Core Services (Compute) client and data models for Oracle Cloud
//! Infrastructure.
//!
//! Provides typed request and wire structures and an asynchronous client for
//! the Compute portion of the Core Services API: instances, volume
//! attachments, images and compute capacity topologies.

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod requests;

pub use client::{ComputeClient, ComputeClientBuilder};
pub use models::{
    AttachVolumeDetails, ChangeInstanceCompartmentDetails, ComputeCapacityTopology,
    CreateComputeCapacityTopologyDetails, Image, Instance, InstanceLifecycleState,
    InstancePowerAction, InstancePowerActionDetails, InstanceSourceDetails,
    LaunchInstanceDetails, UpdateInstanceDetails, VolumeAttachment,
};
pub use requests::{
    AttachVolumeRequest, ChangeInstanceCompartmentRequest, CreateComputeCapacityTopologyRequest,
    DetachVolumeRequest, GetComputeCapacityTopologyRequest, GetImageRequest, GetInstanceRequest,
    GetVolumeAttachmentRequest, InstanceActionRequest, LaunchInstanceRequest, ListImagesRequest,
    ListInstancesRequest, ListVolumeAttachmentsRequest, TerminateInstanceRequest,
    UpdateInstanceRequest,
};

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = oci_common::Result<T>;
