//! Asynchronous Compute client.
//!
//! Every facade method pairs a typed request with a static
//! [`OperationDescriptor`] and hands both to the shared dispatcher. The
//! descriptors are the only per-operation wiring; retry, token injection,
//! binding and demultiplexing all happen in `oci-common`.

use crate::models::{ComputeCapacityTopology, Image, Instance, VolumeAttachment};
use crate::requests::{
    AttachVolumeRequest, ChangeInstanceCompartmentRequest, CreateComputeCapacityTopologyRequest,
    DetachVolumeRequest, GetComputeCapacityTopologyRequest, GetImageRequest, GetInstanceRequest,
    GetVolumeAttachmentRequest, InstanceActionRequest, LaunchInstanceRequest, ListImagesRequest,
    ListInstancesRequest, ListVolumeAttachmentsRequest, TerminateInstanceRequest,
    UpdateInstanceRequest,
};
use crate::Result;
use oci_common::client::{ServiceClient, ServiceClientBuilder};
use oci_common::config::ClientConfig;
use oci_common::region::Region;
use oci_common::request::OperationDescriptor;
use oci_common::response::ApiResponse;
use oci_common::retry::{OperationRetry, RetryPolicy};
use oci_common::transport::RequestSigner;
use reqwest::Method;
use std::sync::Arc;
use url::Url;

const USER_AGENT: &str = concat!("oci-compute/", env!("CARGO_PKG_VERSION"));

/// Name under which the service can be disabled in the enablement registry.
const SERVICE: &str = "core";
const ENDPOINT_TEMPLATE: &str = "https://iaas.{region}.{secondLevelDomain}";
const BASE_PATH: &str = "/20160918";

static LAUNCH_INSTANCE: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "LaunchInstance",
    method: Method::POST,
    path_template: "/instances",
    retry: OperationRetry::None,
    requires_retry_token: true,
    api_reference: "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/Instance/LaunchInstance",
};

static GET_INSTANCE: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "GetInstance",
    method: Method::GET,
    path_template: "/instances/{instanceId}",
    retry: OperationRetry::None,
    requires_retry_token: false,
    api_reference: "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/Instance/GetInstance",
};

static LIST_INSTANCES: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "ListInstances",
    method: Method::GET,
    path_template: "/instances",
    retry: OperationRetry::None,
    requires_retry_token: false,
    api_reference: "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/Instance/ListInstances",
};

static UPDATE_INSTANCE: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "UpdateInstance",
    method: Method::PUT,
    path_template: "/instances/{instanceId}",
    retry: OperationRetry::None,
    requires_retry_token: true,
    api_reference: "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/Instance/UpdateInstance",
};

// The service publishes no reference page for this operation
static TERMINATE_INSTANCE: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "TerminateInstance",
    method: Method::DELETE,
    path_template: "/instances/{instanceId}",
    retry: OperationRetry::None,
    requires_retry_token: false,
    api_reference: "",
};

static INSTANCE_ACTION: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "InstanceAction",
    method: Method::POST,
    path_template: "/instances/{instanceId}",
    retry: OperationRetry::None,
    requires_retry_token: true,
    api_reference: "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/Instance/InstanceAction",
};

static CHANGE_INSTANCE_COMPARTMENT: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "ChangeInstanceCompartment",
    method: Method::POST,
    path_template: "/instances/{instanceId}/actions/changeCompartment",
    retry: OperationRetry::None,
    requires_retry_token: true,
    api_reference:
        "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/Instance/ChangeInstanceCompartment",
};

static ATTACH_VOLUME: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "AttachVolume",
    method: Method::POST,
    path_template: "/volumeAttachments",
    retry: OperationRetry::None,
    requires_retry_token: true,
    api_reference:
        "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/VolumeAttachment/AttachVolume",
};

static GET_VOLUME_ATTACHMENT: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "GetVolumeAttachment",
    method: Method::GET,
    path_template: "/volumeAttachments/{volumeAttachmentId}",
    retry: OperationRetry::None,
    requires_retry_token: false,
    api_reference:
        "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/VolumeAttachment/GetVolumeAttachment",
};

static LIST_VOLUME_ATTACHMENTS: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "ListVolumeAttachments",
    method: Method::GET,
    path_template: "/volumeAttachments",
    retry: OperationRetry::None,
    requires_retry_token: false,
    api_reference:
        "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/VolumeAttachment/ListVolumeAttachments",
};

static DETACH_VOLUME: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "DetachVolume",
    method: Method::DELETE,
    path_template: "/volumeAttachments/{volumeAttachmentId}",
    retry: OperationRetry::None,
    requires_retry_token: false,
    api_reference:
        "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/VolumeAttachment/DetachVolume",
};

static GET_IMAGE: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "GetImage",
    method: Method::GET,
    path_template: "/images/{imageId}",
    retry: OperationRetry::Default,
    requires_retry_token: false,
    api_reference: "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/Image/GetImage",
};

static LIST_IMAGES: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "ListImages",
    method: Method::GET,
    path_template: "/images",
    retry: OperationRetry::Default,
    requires_retry_token: false,
    api_reference: "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/Image/ListImages",
};

static CREATE_COMPUTE_CAPACITY_TOPOLOGY: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "CreateComputeCapacityTopology",
    method: Method::POST,
    path_template: "/computeCapacityTopologies",
    retry: OperationRetry::Default,
    requires_retry_token: true,
    api_reference: "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/ComputeCapacityTopology/CreateComputeCapacityTopology",
};

static GET_COMPUTE_CAPACITY_TOPOLOGY: OperationDescriptor = OperationDescriptor {
    service: "Compute",
    operation: "GetComputeCapacityTopology",
    method: Method::GET,
    path_template: "/computeCapacityTopologies/{computeCapacityTopologyId}",
    retry: OperationRetry::Default,
    requires_retry_token: false,
    api_reference: "https://docs.oracle.com/iaas/api/#/en/iaas/20160918/ComputeCapacityTopology/GetComputeCapacityTopology",
};

/// Builder for [`ComputeClient`].
#[derive(Debug)]
pub struct ComputeClientBuilder {
    inner: ServiceClientBuilder,
}

impl ComputeClientBuilder {
    /// Create a builder with the service defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: ServiceClientBuilder::new(SERVICE, ENDPOINT_TEMPLATE, BASE_PATH)
                .with_user_agent(USER_AGENT),
        }
    }

    /// Replace the whole client configuration.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_config(config);
        self
    }

    /// Set the region used for endpoint resolution.
    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.inner = self.inner.with_region(region);
        self
    }

    /// Set an explicit endpoint, bypassing region resolution.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.inner = self.inner.with_endpoint(endpoint);
        self
    }

    /// Set the client-wide retry default.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(policy);
        self
    }

    /// Set the request signer.
    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.inner = self.inner.with_signer(signer);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ComputeClient> {
        let inner = self.inner.build()?;
        Ok(ComputeClient { inner })
    }
}

impl Default for ComputeClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Asynchronous client for the Core Services Compute API.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    inner: ServiceClient,
}

impl ComputeClient {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> ComputeClientBuilder {
        ComputeClientBuilder::new()
    }

    /// The endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        self.inner.endpoint()
    }

    /// Point the client at another region, keeping everything else.
    pub fn set_region(&mut self, region: &Region) -> Result<()> {
        self.inner.set_region(region)
    }

    /// Launch a new instance.
    pub async fn launch_instance(
        &self,
        request: &LaunchInstanceRequest,
    ) -> Result<ApiResponse<Instance>> {
        self.inner.invoke(&LAUNCH_INSTANCE, request).await
    }

    /// Fetch a single instance.
    pub async fn get_instance(
        &self,
        request: &GetInstanceRequest,
    ) -> Result<ApiResponse<Instance>> {
        self.inner.invoke(&GET_INSTANCE, request).await
    }

    /// List instances in a compartment. One page per call; pass the
    /// response's `opc_next_page` as `page` to continue.
    pub async fn list_instances(
        &self,
        request: &ListInstancesRequest,
    ) -> Result<ApiResponse<Vec<Instance>>> {
        self.inner.invoke(&LIST_INSTANCES, request).await
    }

    /// Update an instance.
    pub async fn update_instance(
        &self,
        request: &UpdateInstanceRequest,
    ) -> Result<ApiResponse<Instance>> {
        self.inner.invoke(&UPDATE_INSTANCE, request).await
    }

    /// Terminate an instance.
    pub async fn terminate_instance(
        &self,
        request: &TerminateInstanceRequest,
    ) -> Result<ApiResponse<()>> {
        self.inner.invoke_no_content(&TERMINATE_INSTANCE, request).await
    }

    /// Perform a power action on an instance.
    pub async fn instance_action(
        &self,
        request: &InstanceActionRequest,
    ) -> Result<ApiResponse<Instance>> {
        self.inner.invoke(&INSTANCE_ACTION, request).await
    }

    /// Move an instance into another compartment.
    pub async fn change_instance_compartment(
        &self,
        request: &ChangeInstanceCompartmentRequest,
    ) -> Result<ApiResponse<()>> {
        self.inner
            .invoke_no_content(&CHANGE_INSTANCE_COMPARTMENT, request)
            .await
    }

    /// Attach a volume to an instance.
    pub async fn attach_volume(
        &self,
        request: &AttachVolumeRequest,
    ) -> Result<ApiResponse<VolumeAttachment>> {
        self.inner.invoke(&ATTACH_VOLUME, request).await
    }

    /// Fetch a single volume attachment.
    pub async fn get_volume_attachment(
        &self,
        request: &GetVolumeAttachmentRequest,
    ) -> Result<ApiResponse<VolumeAttachment>> {
        self.inner.invoke(&GET_VOLUME_ATTACHMENT, request).await
    }

    /// List volume attachments in a compartment.
    pub async fn list_volume_attachments(
        &self,
        request: &ListVolumeAttachmentsRequest,
    ) -> Result<ApiResponse<Vec<VolumeAttachment>>> {
        self.inner.invoke(&LIST_VOLUME_ATTACHMENTS, request).await
    }

    /// Detach a volume from its instance.
    pub async fn detach_volume(
        &self,
        request: &DetachVolumeRequest,
    ) -> Result<ApiResponse<()>> {
        self.inner.invoke_no_content(&DETACH_VOLUME, request).await
    }

    /// Fetch a single image.
    pub async fn get_image(&self, request: &GetImageRequest) -> Result<ApiResponse<Image>> {
        self.inner.invoke(&GET_IMAGE, request).await
    }

    /// List images available in a compartment.
    pub async fn list_images(
        &self,
        request: &ListImagesRequest,
    ) -> Result<ApiResponse<Vec<Image>>> {
        self.inner.invoke(&LIST_IMAGES, request).await
    }

    /// Create a compute capacity topology.
    pub async fn create_compute_capacity_topology(
        &self,
        request: &CreateComputeCapacityTopologyRequest,
    ) -> Result<ApiResponse<ComputeCapacityTopology>> {
        self.inner
            .invoke(&CREATE_COMPUTE_CAPACITY_TOPOLOGY, request)
            .await
    }

    /// Fetch a single compute capacity topology.
    pub async fn get_compute_capacity_topology(
        &self,
        request: &GetComputeCapacityTopologyRequest,
    ) -> Result<ApiResponse<ComputeCapacityTopology>> {
        self.inner
            .invoke(&GET_COMPUTE_CAPACITY_TOPOLOGY, request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn instance_body(id: &str) -> serde_json::Value {
        json!({
            "availabilityDomain": "Uocm:PHX-AD-1",
            "compartmentId": "ocid1.compartment.oc1..aaaa",
            "id": id,
            "lifecycleState": "RUNNING",
            "region": "phx",
            "shape": "VM.Standard.E4.Flex",
            "timeCreated": "2024-03-01T12:00:00.000Z"
        })
    }

    fn client_for(server: &MockServer) -> ComputeClient {
        ComputeClient::builder()
            .with_endpoint(server.uri())
            .build()
            .unwrap()
    }

    #[test]
    fn builder_resolves_regional_endpoint() {
        let client = ComputeClient::builder()
            .with_region(Region::EuFrankfurt1)
            .build()
            .unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://iaas.eu-frankfurt-1.oraclecloud.com/"
        );
    }

    #[test]
    fn set_region_moves_the_client() {
        let mut client = ComputeClient::builder()
            .with_region(Region::UsPhoenix1)
            .build()
            .unwrap();
        client.set_region(&Region::ApTokyo1).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://iaas.ap-tokyo-1.oraclecloud.com/"
        );
    }

    #[tokio::test]
    async fn get_instance_decodes_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/20160918/instances/ocid1.instance.oc1.phx.bbbb"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(instance_body("ocid1.instance.oc1.phx.bbbb"))
                    .insert_header("opc-request-id", "req-123")
                    .insert_header("etag", "\"etag-1\""),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .get_instance(&GetInstanceRequest::new("ocid1.instance.oc1.phx.bbbb"))
            .await
            .unwrap();

        assert_eq!(response.body.id, "ocid1.instance.oc1.phx.bbbb");
        assert_eq!(response.opc_request_id.as_deref(), Some("req-123"));
        assert_eq!(response.etag.as_deref(), Some("\"etag-1\""));
    }

    #[tokio::test]
    async fn terminate_instance_sends_query_and_returns_empty_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/20160918/instances/ocid1.instance.oc1.phx.bbbb"))
            .and(query_param("preserveBootVolume", "true"))
            .respond_with(ResponseTemplate::new(204).insert_header("opc-request-id", "req-del"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut request = TerminateInstanceRequest::new("ocid1.instance.oc1.phx.bbbb");
        request.preserve_boot_volume = Some(true);

        let response = client.terminate_instance(&request).await.unwrap();
        assert_eq!(response.status.as_u16(), 204);
        assert_eq!(response.opc_request_id.as_deref(), Some("req-del"));
    }

    #[tokio::test]
    async fn get_image_not_found_is_a_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/20160918/images/ocid1.image.oc1.phx.gone"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({
                        "code": "NotAuthorizedOrNotFound",
                        "message": "image not found or not authorized"
                    }))
                    .insert_header("opc-request-id", "req-404"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .get_image(&GetImageRequest::new("ocid1.image.oc1.phx.gone"))
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "SERVICE_ERROR");
        assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
        assert_eq!(err.service_code(), Some("NotAuthorizedOrNotFound"));
        assert_eq!(err.request_id(), Some("req-404"));
    }

    #[tokio::test]
    async fn list_images_passes_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/20160918/images"))
            .and(query_param("compartmentId", "ocid1.compartment.oc1..aaaa"))
            .and(query_param("operatingSystem", "Oracle Linux"))
            .and(query_param("sortOrder", "ASC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut request = ListImagesRequest::new("ocid1.compartment.oc1..aaaa");
        request.operating_system = Some("Oracle Linux".to_string());
        request.sort_order = Some(crate::models::SortOrder::Asc);

        let response = client.list_images(&request).await.unwrap();
        assert!(response.body.is_empty());
    }
}
