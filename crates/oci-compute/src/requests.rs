//! Typed requests for the Compute operations.
//!
//! Each request binds its own path parameters, query filters, headers and
//! body into [`RequestParts`]; the dispatcher owns token injection, retries
//! and transport. `new` fills the mandatory fields and leaves every option
//! unset.

use crate::models::{
    AttachVolumeDetails, ChangeInstanceCompartmentDetails, CreateComputeCapacityTopologyDetails,
    ImageLifecycleState, ImageSortBy, InstanceLifecycleState, InstancePowerAction,
    InstancePowerActionDetails, InstanceSortBy, LaunchInstanceDetails, SortOrder,
    UpdateInstanceDetails,
};
use oci_common::query::QueryParams;
use oci_common::request::{RequestMetadata, RequestParts, ServiceRequest};
use oci_common::Result;

/// Request for `LaunchInstance`.
#[derive(Debug, Clone)]
pub struct LaunchInstanceRequest {
    /// Instance configuration to launch.
    pub details: LaunchInstanceDetails,
    /// Idempotency token; generated when not supplied.
    pub opc_retry_token: Option<String>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl LaunchInstanceRequest {
    /// Launch request for the given configuration.
    #[must_use]
    pub fn new(details: LaunchInstanceDetails) -> Self {
        Self {
            details,
            opc_retry_token: None,
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for LaunchInstanceRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.json_body(&self.details)
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }

    fn retry_token(&self) -> Option<&str> {
        self.opc_retry_token.as_deref()
    }
}

/// Request for `GetInstance`.
#[derive(Debug, Clone)]
pub struct GetInstanceRequest {
    /// OCID of the instance.
    pub instance_id: String,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl GetInstanceRequest {
    /// Request for the named instance.
    #[must_use]
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for GetInstanceRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.path_param("instanceId", &self.instance_id)
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

/// Request for `ListInstances`.
#[derive(Debug, Clone)]
pub struct ListInstancesRequest {
    /// OCID of the compartment to list.
    pub compartment_id: String,
    /// Filter by availability domain.
    pub availability_domain: Option<String>,
    /// Filter by capacity reservation.
    pub capacity_reservation_id: Option<String>,
    /// Filter by exact display name.
    pub display_name: Option<String>,
    /// Filter by lifecycle state.
    pub lifecycle_state: Option<InstanceLifecycleState>,
    /// Maximum number of results per page.
    pub limit: Option<u32>,
    /// Pagination cursor from a previous response's `opc-next-page`.
    pub page: Option<String>,
    /// Sort key.
    pub sort_by: Option<InstanceSortBy>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl ListInstancesRequest {
    /// List request for the named compartment.
    #[must_use]
    pub fn new(compartment_id: impl Into<String>) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            availability_domain: None,
            capacity_reservation_id: None,
            display_name: None,
            lifecycle_state: None,
            limit: None,
            page: None,
            sort_by: None,
            sort_order: None,
            metadata: RequestMetadata::new(),
        }
    }

    /// Convert the filters into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push("compartmentId", &self.compartment_id);
        params.push_opt("availabilityDomain", self.availability_domain.as_deref());
        params.push_opt(
            "capacityReservationId",
            self.capacity_reservation_id.as_deref(),
        );
        params.push_opt("displayName", self.display_name.as_deref());
        params.push_opt("lifecycleState", self.lifecycle_state.as_ref());
        params.push_opt("limit", self.limit);
        params.push_opt("page", self.page.as_deref());
        params.push_opt("sortBy", self.sort_by.as_ref());
        params.push_opt("sortOrder", self.sort_order.as_ref());
        params.into_pairs()
    }
}

impl ServiceRequest for ListInstancesRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        if let Some(state) = &self.lifecycle_state {
            state.ensure_known(parts.operation(), "lifecycleState")?;
        }
        if let Some(sort_by) = &self.sort_by {
            sort_by.ensure_known(parts.operation(), "sortBy")?;
        }
        if let Some(sort_order) = &self.sort_order {
            sort_order.ensure_known(parts.operation(), "sortOrder")?;
        }
        for (name, value) in self.to_pairs() {
            parts.query.push(name, value);
        }
        Ok(())
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

/// Request for `UpdateInstance`.
#[derive(Debug, Clone)]
pub struct UpdateInstanceRequest {
    /// OCID of the instance.
    pub instance_id: String,
    /// Fields to update.
    pub details: UpdateInstanceDetails,
    /// Etag guard for optimistic concurrency.
    pub if_match: Option<String>,
    /// Idempotency token; generated when not supplied.
    pub opc_retry_token: Option<String>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl UpdateInstanceRequest {
    /// Update request for the named instance.
    #[must_use]
    pub fn new(instance_id: impl Into<String>, details: UpdateInstanceDetails) -> Self {
        Self {
            instance_id: instance_id.into(),
            details,
            if_match: None,
            opc_retry_token: None,
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for UpdateInstanceRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.path_param("instanceId", &self.instance_id)?;
        parts.header_opt("if-match", self.if_match.as_deref());
        parts.json_body(&self.details)
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }

    fn retry_token(&self) -> Option<&str> {
        self.opc_retry_token.as_deref()
    }
}

/// Request for `TerminateInstance`.
#[derive(Debug, Clone)]
pub struct TerminateInstanceRequest {
    /// OCID of the instance.
    pub instance_id: String,
    /// Etag guard for optimistic concurrency.
    pub if_match: Option<String>,
    /// Whether to keep the boot volume after termination.
    pub preserve_boot_volume: Option<bool>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl TerminateInstanceRequest {
    /// Terminate request for the named instance.
    #[must_use]
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            if_match: None,
            preserve_boot_volume: None,
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for TerminateInstanceRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.path_param("instanceId", &self.instance_id)?;
        parts.header_opt("if-match", self.if_match.as_deref());
        parts
            .query
            .push_opt("preserveBootVolume", self.preserve_boot_volume);
        Ok(())
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

/// Request for `InstanceAction`.
#[derive(Debug, Clone)]
pub struct InstanceActionRequest {
    /// OCID of the instance.
    pub instance_id: String,
    /// Power action to perform.
    pub action: InstancePowerAction,
    /// Action parameters, for actions that take any.
    pub details: Option<InstancePowerActionDetails>,
    /// Etag guard for optimistic concurrency.
    pub if_match: Option<String>,
    /// Idempotency token; generated when not supplied.
    pub opc_retry_token: Option<String>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl InstanceActionRequest {
    /// Action request for the named instance.
    #[must_use]
    pub fn new(instance_id: impl Into<String>, action: InstancePowerAction) -> Self {
        Self {
            instance_id: instance_id.into(),
            action,
            details: None,
            if_match: None,
            opc_retry_token: None,
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for InstanceActionRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.path_param("instanceId", &self.instance_id)?;
        self.action.ensure_known(parts.operation(), "action")?;
        parts.query.push("action", &self.action);
        parts.header_opt("if-match", self.if_match.as_deref());
        if let Some(details) = &self.details {
            parts.json_body(details)?;
        }
        Ok(())
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }

    fn retry_token(&self) -> Option<&str> {
        self.opc_retry_token.as_deref()
    }
}

/// Request for `ChangeInstanceCompartment`.
#[derive(Debug, Clone)]
pub struct ChangeInstanceCompartmentRequest {
    /// OCID of the instance.
    pub instance_id: String,
    /// Destination compartment.
    pub details: ChangeInstanceCompartmentDetails,
    /// Etag guard for optimistic concurrency.
    pub if_match: Option<String>,
    /// Caller-chosen correlation id echoed by the service.
    pub opc_request_id: Option<String>,
    /// Idempotency token; generated when not supplied.
    pub opc_retry_token: Option<String>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl ChangeInstanceCompartmentRequest {
    /// Compartment move for the named instance.
    #[must_use]
    pub fn new(
        instance_id: impl Into<String>,
        details: ChangeInstanceCompartmentDetails,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            details,
            if_match: None,
            opc_request_id: None,
            opc_retry_token: None,
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for ChangeInstanceCompartmentRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.path_param("instanceId", &self.instance_id)?;
        parts.header_opt("if-match", self.if_match.as_deref());
        parts.header_opt("opc-request-id", self.opc_request_id.as_deref());
        parts.json_body(&self.details)
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }

    fn retry_token(&self) -> Option<&str> {
        self.opc_retry_token.as_deref()
    }
}

/// Request for `AttachVolume`.
#[derive(Debug, Clone)]
pub struct AttachVolumeRequest {
    /// Attachment configuration, keyed by attachment kind.
    pub details: AttachVolumeDetails,
    /// Idempotency token; generated when not supplied.
    pub opc_retry_token: Option<String>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl AttachVolumeRequest {
    /// Attach request for the given configuration.
    #[must_use]
    pub fn new(details: AttachVolumeDetails) -> Self {
        Self {
            details,
            opc_retry_token: None,
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for AttachVolumeRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.json_body(&self.details)
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }

    fn retry_token(&self) -> Option<&str> {
        self.opc_retry_token.as_deref()
    }
}

/// Request for `GetVolumeAttachment`.
#[derive(Debug, Clone)]
pub struct GetVolumeAttachmentRequest {
    /// OCID of the volume attachment.
    pub volume_attachment_id: String,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl GetVolumeAttachmentRequest {
    /// Request for the named attachment.
    #[must_use]
    pub fn new(volume_attachment_id: impl Into<String>) -> Self {
        Self {
            volume_attachment_id: volume_attachment_id.into(),
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for GetVolumeAttachmentRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.path_param("volumeAttachmentId", &self.volume_attachment_id)
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

/// Request for `ListVolumeAttachments`.
#[derive(Debug, Clone)]
pub struct ListVolumeAttachmentsRequest {
    /// OCID of the compartment to list.
    pub compartment_id: String,
    /// Filter by availability domain.
    pub availability_domain: Option<String>,
    /// Filter by attached instance.
    pub instance_id: Option<String>,
    /// Filter by attached volume.
    pub volume_id: Option<String>,
    /// Maximum number of results per page.
    pub limit: Option<u32>,
    /// Pagination cursor from a previous response's `opc-next-page`.
    pub page: Option<String>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl ListVolumeAttachmentsRequest {
    /// List request for the named compartment.
    #[must_use]
    pub fn new(compartment_id: impl Into<String>) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            availability_domain: None,
            instance_id: None,
            volume_id: None,
            limit: None,
            page: None,
            metadata: RequestMetadata::new(),
        }
    }

    /// Convert the filters into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push("compartmentId", &self.compartment_id);
        params.push_opt("availabilityDomain", self.availability_domain.as_deref());
        params.push_opt("instanceId", self.instance_id.as_deref());
        params.push_opt("volumeId", self.volume_id.as_deref());
        params.push_opt("limit", self.limit);
        params.push_opt("page", self.page.as_deref());
        params.into_pairs()
    }
}

impl ServiceRequest for ListVolumeAttachmentsRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        for (name, value) in self.to_pairs() {
            parts.query.push(name, value);
        }
        Ok(())
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

/// Request for `DetachVolume`.
#[derive(Debug, Clone)]
pub struct DetachVolumeRequest {
    /// OCID of the volume attachment.
    pub volume_attachment_id: String,
    /// Etag guard for optimistic concurrency.
    pub if_match: Option<String>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl DetachVolumeRequest {
    /// Detach request for the named attachment.
    #[must_use]
    pub fn new(volume_attachment_id: impl Into<String>) -> Self {
        Self {
            volume_attachment_id: volume_attachment_id.into(),
            if_match: None,
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for DetachVolumeRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.path_param("volumeAttachmentId", &self.volume_attachment_id)?;
        parts.header_opt("if-match", self.if_match.as_deref());
        Ok(())
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

/// Request for `GetImage`.
#[derive(Debug, Clone)]
pub struct GetImageRequest {
    /// OCID of the image.
    pub image_id: String,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl GetImageRequest {
    /// Request for the named image.
    #[must_use]
    pub fn new(image_id: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for GetImageRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.path_param("imageId", &self.image_id)
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

/// Request for `ListImages`.
#[derive(Debug, Clone)]
pub struct ListImagesRequest {
    /// OCID of the compartment to list.
    pub compartment_id: String,
    /// Filter by exact display name.
    pub display_name: Option<String>,
    /// Filter by operating system name.
    pub operating_system: Option<String>,
    /// Filter by operating system version.
    pub operating_system_version: Option<String>,
    /// Filter to images launchable on this shape.
    pub shape: Option<String>,
    /// Filter by lifecycle state.
    pub lifecycle_state: Option<ImageLifecycleState>,
    /// Maximum number of results per page.
    pub limit: Option<u32>,
    /// Pagination cursor from a previous response's `opc-next-page`.
    pub page: Option<String>,
    /// Sort key.
    pub sort_by: Option<ImageSortBy>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl ListImagesRequest {
    /// List request for the named compartment.
    #[must_use]
    pub fn new(compartment_id: impl Into<String>) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            display_name: None,
            operating_system: None,
            operating_system_version: None,
            shape: None,
            lifecycle_state: None,
            limit: None,
            page: None,
            sort_by: None,
            sort_order: None,
            metadata: RequestMetadata::new(),
        }
    }

    /// Convert the filters into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push("compartmentId", &self.compartment_id);
        params.push_opt("displayName", self.display_name.as_deref());
        params.push_opt("operatingSystem", self.operating_system.as_deref());
        params.push_opt(
            "operatingSystemVersion",
            self.operating_system_version.as_deref(),
        );
        params.push_opt("shape", self.shape.as_deref());
        params.push_opt("lifecycleState", self.lifecycle_state.as_ref());
        params.push_opt("limit", self.limit);
        params.push_opt("page", self.page.as_deref());
        params.push_opt("sortBy", self.sort_by.as_ref());
        params.push_opt("sortOrder", self.sort_order.as_ref());
        params.into_pairs()
    }
}

impl ServiceRequest for ListImagesRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        if let Some(state) = &self.lifecycle_state {
            state.ensure_known(parts.operation(), "lifecycleState")?;
        }
        if let Some(sort_by) = &self.sort_by {
            sort_by.ensure_known(parts.operation(), "sortBy")?;
        }
        if let Some(sort_order) = &self.sort_order {
            sort_order.ensure_known(parts.operation(), "sortOrder")?;
        }
        for (name, value) in self.to_pairs() {
            parts.query.push(name, value);
        }
        Ok(())
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}

/// Request for `CreateComputeCapacityTopology`.
#[derive(Debug, Clone)]
pub struct CreateComputeCapacityTopologyRequest {
    /// Topology configuration to create.
    pub details: CreateComputeCapacityTopologyDetails,
    /// Idempotency token; generated when not supplied.
    pub opc_retry_token: Option<String>,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl CreateComputeCapacityTopologyRequest {
    /// Create request for the given configuration.
    #[must_use]
    pub fn new(details: CreateComputeCapacityTopologyDetails) -> Self {
        Self {
            details,
            opc_retry_token: None,
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for CreateComputeCapacityTopologyRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.json_body(&self.details)
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }

    fn retry_token(&self) -> Option<&str> {
        self.opc_retry_token.as_deref()
    }
}

/// Request for `GetComputeCapacityTopology`.
#[derive(Debug, Clone)]
pub struct GetComputeCapacityTopologyRequest {
    /// OCID of the capacity topology.
    pub compute_capacity_topology_id: String,
    /// Invocation metadata.
    pub metadata: RequestMetadata,
}

impl GetComputeCapacityTopologyRequest {
    /// Request for the named topology.
    #[must_use]
    pub fn new(compute_capacity_topology_id: impl Into<String>) -> Self {
        Self {
            compute_capacity_topology_id: compute_capacity_topology_id.into(),
            metadata: RequestMetadata::new(),
        }
    }
}

impl ServiceRequest for GetComputeCapacityTopologyRequest {
    fn bind(&self, parts: &mut RequestParts) -> Result<()> {
        parts.path_param(
            "computeCapacityTopologyId",
            &self.compute_capacity_topology_id,
        )
    }

    fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }
}
