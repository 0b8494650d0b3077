//! Wire models for the Core Services (Compute) API.
//!
//! Field names follow the service's camelCase JSON schema. Optional fields
//! are omitted from serialised payloads rather than sent as null. Resources
//! with a wire discriminator (volume attachments, instance sources, power
//! actions, capacity sources) are tagged enums keyed by that discriminator.

use chrono::{DateTime, Utc};
use oci_common::enum_string;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Defined tags: namespace to tag key to value.
pub type DefinedTags = HashMap<String, HashMap<String, serde_json::Value>>;

/// Freeform tags: tag key to value.
pub type FreeformTags = HashMap<String, String>;

enum_string! {
    /// Lifecycle states of a compute instance.
    pub enum InstanceLifecycleState {
        /// Instance is moving between hosts or compartments.
        Moving => "MOVING",
        /// Instance is being created.
        Provisioning => "PROVISIONING",
        /// Instance is running.
        Running => "RUNNING",
        /// Instance is powering on.
        Starting => "STARTING",
        /// Instance is powering off.
        Stopping => "STOPPING",
        /// Instance is powered off.
        Stopped => "STOPPED",
        /// A custom image is being created from the instance.
        CreatingImage => "CREATING_IMAGE",
        /// Instance is being deleted.
        Terminating => "TERMINATING",
        /// Instance has been deleted.
        Terminated => "TERMINATED",
    }
}

enum_string! {
    /// Lifecycle states of a volume attachment.
    pub enum VolumeAttachmentLifecycleState {
        /// Attachment is being established.
        Attaching => "ATTACHING",
        /// Volume is attached.
        Attached => "ATTACHED",
        /// Attachment is being torn down.
        Detaching => "DETACHING",
        /// Volume is detached.
        Detached => "DETACHED",
    }
}

enum_string! {
    /// Lifecycle states of an image.
    pub enum ImageLifecycleState {
        /// Image is being created.
        Provisioning => "PROVISIONING",
        /// Image is being imported.
        Importing => "IMPORTING",
        /// Image can be used to launch instances.
        Available => "AVAILABLE",
        /// Image is being exported.
        Exporting => "EXPORTING",
        /// Image has been disabled.
        Disabled => "DISABLED",
        /// Image has been deleted.
        Deleted => "DELETED",
    }
}

enum_string! {
    /// Lifecycle states of a compute capacity topology.
    pub enum ComputeCapacityTopologyLifecycleState {
        /// Topology is usable.
        Active => "ACTIVE",
        /// Topology is being created.
        Creating => "CREATING",
        /// Topology is being updated.
        Updating => "UPDATING",
        /// Topology has been deleted.
        Deleted => "DELETED",
        /// Topology is being deleted.
        Deleting => "DELETING",
    }
}

enum_string! {
    /// Power actions accepted by the instance action endpoint.
    pub enum InstancePowerAction {
        /// Power the instance on.
        Start => "START",
        /// Power the instance off immediately.
        Stop => "STOP",
        /// Power-cycle the instance immediately.
        Reset => "RESET",
        /// Shut down gracefully, then power off.
        SoftStop => "SOFTSTOP",
        /// Shut down gracefully, then power back on.
        SoftReset => "SOFTRESET",
        /// Send a diagnostic interrupt (NMI) to the instance.
        SendDiagnosticInterrupt => "SENDDIAGNOSTICINTERRUPT",
        /// Reboot into diagnostic mode.
        DiagnosticReboot => "DIAGNOSTICREBOOT",
        /// Reboot the instance by migrating it to another host.
        RebootMigrate => "REBOOTMIGRATE",
    }
}

enum_string! {
    /// Firmware configuration used to launch an instance.
    pub enum LaunchMode {
        /// Launch with the platform's native interfaces.
        Native => "NATIVE",
        /// Launch with emulated devices.
        Emulated => "EMULATED",
        /// Launch with paravirtualised devices.
        Paravirtualized => "PARAVIRTUALIZED",
        /// Launch configuration taken from the image.
        Custom => "CUSTOM",
    }
}

enum_string! {
    /// Sort direction for list operations.
    pub enum SortOrder {
        /// Ascending.
        Asc => "ASC",
        /// Descending.
        Desc => "DESC",
    }
}

enum_string! {
    /// Sort keys accepted when listing instances.
    pub enum InstanceSortBy {
        /// Creation time, descending by default.
        TimeCreated => "TIMECREATED",
        /// Display name, ascending by default.
        DisplayName => "DISPLAYNAME",
    }
}

enum_string! {
    /// Sort keys accepted when listing images.
    pub enum ImageSortBy {
        /// Creation time, descending by default.
        TimeCreated => "TIMECREATED",
        /// Display name, ascending by default.
        DisplayName => "DISPLAYNAME",
    }
}

/// A compute instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Availability domain the instance runs in.
    pub availability_domain: String,
    /// OCID of the compartment containing the instance.
    pub compartment_id: String,
    /// OCID of the instance.
    pub id: String,
    /// Current lifecycle state.
    pub lifecycle_state: InstanceLifecycleState,
    /// Region the instance runs in.
    pub region: String,
    /// Shape of the instance.
    pub shape: String,
    /// Creation timestamp.
    pub time_created: DateTime<Utc>,

    /// OCID of the capacity reservation hosting the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_reservation_id: Option<String>,
    /// OCID of the dedicated VM host, when pinned to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedicated_vm_host_id: Option<String>,
    /// Defined tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
    /// User-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Fault domain the instance runs in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_domain: Option<String>,
    /// Freeform tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    /// OCID of the image the instance was launched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Firmware configuration used at launch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_mode: Option<LaunchMode>,
    /// Custom metadata key/value pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    /// Shape configuration for flexible shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_config: Option<InstanceShapeConfig>,
    /// Boot source the instance was launched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_details: Option<InstanceSourceDetails>,
    /// Scheduled maintenance reboot time, when one is due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_maintenance_reboot_due: Option<DateTime<Utc>>,
}

/// Shape configuration of a launched instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceShapeConfig {
    /// Total OCPUs available to the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocpus: Option<f32>,
    /// Total memory in gigabytes.
    #[serde(default, rename = "memoryInGBs", skip_serializing_if = "Option::is_none")]
    pub memory_in_gbs: Option<f32>,
    /// Total vCPUs available to the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<i32>,
    /// Marketing description of the processor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor_description: Option<String>,
    /// Networking bandwidth in gigabits per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networking_bandwidth_in_gbps: Option<f32>,
    /// Maximum number of VNIC attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_vnic_attachments: Option<i32>,
    /// Number of GPUs available to the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpus: Option<i32>,
    /// Number of local disks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_disks: Option<i32>,
    /// Aggregate local disk size in gigabytes.
    #[serde(
        default,
        rename = "localDisksTotalSizeInGBs",
        skip_serializing_if = "Option::is_none"
    )]
    pub local_disks_total_size_in_gbs: Option<f32>,
}

/// Boot source of an instance, keyed by `sourceType` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "sourceType")]
pub enum InstanceSourceDetails {
    /// Boot from a platform or custom image.
    #[serde(rename = "image")]
    Image(InstanceSourceViaImageDetails),
    /// Boot from an existing boot volume.
    #[serde(rename = "bootVolume")]
    BootVolume(InstanceSourceViaBootVolumeDetails),
}

/// Image boot source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSourceViaImageDetails {
    /// OCID of the image.
    pub image_id: String,
    /// Boot volume size in gigabytes.
    #[serde(
        default,
        rename = "bootVolumeSizeInGBs",
        skip_serializing_if = "Option::is_none"
    )]
    pub boot_volume_size_in_gbs: Option<i64>,
    /// OCID of the key used to encrypt the boot volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
}

/// Boot volume boot source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSourceViaBootVolumeDetails {
    /// OCID of the boot volume.
    pub boot_volume_id: String,
}

/// VNIC configuration supplied at launch.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateVnicDetails {
    /// Whether to assign a public IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_public_ip: Option<bool>,
    /// User-friendly name for the VNIC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Hostname label for DNS within the subnet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname_label: Option<String>,
    /// OCIDs of network security groups to add the VNIC to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsg_ids: Option<Vec<String>>,
    /// Private IP address to assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_ip: Option<String>,
    /// Whether to skip the source/destination check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_source_dest_check: Option<bool>,
    /// OCID of the subnet to create the VNIC in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
}

/// Request payload for launching an instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceDetails {
    /// Availability domain to launch in.
    pub availability_domain: String,
    /// OCID of the compartment to launch in.
    pub compartment_id: String,

    /// OCID of a capacity reservation to launch against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_reservation_id: Option<String>,
    /// Primary VNIC configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_vnic_details: Option<CreateVnicDetails>,
    /// OCID of a dedicated VM host to launch on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedicated_vm_host_id: Option<String>,
    /// Defined tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
    /// User-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Fault domain to launch in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_domain: Option<String>,
    /// Freeform tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    /// Hostname label, deprecated in favour of the VNIC's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname_label: Option<String>,
    /// OCID of the image, deprecated in favour of source details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Whether paravirtualised volume attachments encrypt data in transit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pv_encryption_in_transit_enabled: Option<bool>,
    /// Custom metadata key/value pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    /// Shape of the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    /// Shape configuration for flexible shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_config: Option<LaunchInstanceShapeConfigDetails>,
    /// Boot source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_details: Option<InstanceSourceDetails>,
    /// OCID of the subnet, deprecated in favour of the VNIC's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
}

impl LaunchInstanceDetails {
    /// Payload with only the mandatory placement fields set.
    #[must_use]
    pub fn new(
        availability_domain: impl Into<String>,
        compartment_id: impl Into<String>,
    ) -> Self {
        Self {
            availability_domain: availability_domain.into(),
            compartment_id: compartment_id.into(),
            capacity_reservation_id: None,
            create_vnic_details: None,
            dedicated_vm_host_id: None,
            defined_tags: None,
            display_name: None,
            fault_domain: None,
            freeform_tags: None,
            hostname_label: None,
            image_id: None,
            is_pv_encryption_in_transit_enabled: None,
            metadata: None,
            shape: None,
            shape_config: None,
            source_details: None,
            subnet_id: None,
        }
    }
}

/// Shape configuration requested at launch.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceShapeConfigDetails {
    /// Total OCPUs to provision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocpus: Option<f32>,
    /// Total memory in gigabytes to provision.
    #[serde(default, rename = "memoryInGBs", skip_serializing_if = "Option::is_none")]
    pub memory_in_gbs: Option<f32>,
    /// Total vCPUs to provision, for shapes sized by vCPU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<i32>,
}

/// Request payload for updating an instance.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstanceDetails {
    /// OCID of a capacity reservation to move the instance into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_reservation_id: Option<String>,
    /// Defined tags replacement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
    /// User-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Freeform tags replacement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    /// Custom metadata replacement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    /// New shape for the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    /// Shape configuration for the new shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_config: Option<UpdateInstanceShapeConfigDetails>,
    /// New scheduled maintenance reboot time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_maintenance_reboot_due: Option<DateTime<Utc>>,
}

/// Shape configuration requested on update.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstanceShapeConfigDetails {
    /// Total OCPUs to provision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocpus: Option<f32>,
    /// Total memory in gigabytes to provision.
    #[serde(default, rename = "memoryInGBs", skip_serializing_if = "Option::is_none")]
    pub memory_in_gbs: Option<f32>,
    /// Total vCPUs to provision, for shapes sized by vCPU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<i32>,
}

/// Request payload for moving an instance between compartments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInstanceCompartmentDetails {
    /// OCID of the destination compartment.
    pub compartment_id: String,
}

impl ChangeInstanceCompartmentDetails {
    /// Payload targeting the given compartment.
    #[must_use]
    pub fn new(compartment_id: impl Into<String>) -> Self {
        Self {
            compartment_id: compartment_id.into(),
        }
    }
}

/// Body of a power action request, keyed by `actionType` on the wire.
///
/// Only some actions carry extra fields; the plain actions serialise to just
/// the discriminator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "actionType")]
pub enum InstancePowerActionDetails {
    /// Power the instance on.
    #[serde(rename = "start")]
    Start,
    /// Power the instance off immediately.
    #[serde(rename = "stop")]
    Stop,
    /// Power-cycle the instance immediately.
    #[serde(rename = "reset", rename_all = "camelCase")]
    Reset {
        /// Whether a reboot migration may target dense shapes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        allow_dense_reboot_migration: Option<bool>,
    },
    /// Shut down gracefully, then power back on.
    #[serde(rename = "softreset", rename_all = "camelCase")]
    SoftReset {
        /// Whether a reboot migration may target dense shapes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        allow_dense_reboot_migration: Option<bool>,
    },
    /// Shut down gracefully, then power off.
    #[serde(rename = "softstop")]
    SoftStop,
    /// Send a diagnostic interrupt (NMI) to the instance.
    #[serde(rename = "senddiagnosticinterrupt")]
    SendDiagnosticInterrupt,
    /// Reboot into diagnostic mode.
    #[serde(rename = "diagnosticreboot")]
    DiagnosticReboot,
    /// Reboot the instance by migrating it to another host.
    #[serde(rename = "rebootMigrate", rename_all = "camelCase")]
    RebootMigrate {
        /// Whether to delete local NVMe storage during the migration.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delete_local_storage: Option<bool>,
    },
}

/// A volume attachment, keyed by `attachmentType` on the wire.
///
/// List items and single objects both decode through this type; an
/// unrecognised discriminator fails the decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "attachmentType")]
pub enum VolumeAttachment {
    /// Attachment exposed over iSCSI.
    #[serde(rename = "iscsi")]
    IScsi(IScsiVolumeAttachment),
    /// Attachment exposed as a paravirtualised device.
    #[serde(rename = "paravirtualized")]
    Paravirtualized(ParavirtualizedVolumeAttachment),
}

impl VolumeAttachment {
    /// OCID of the attachment.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::IScsi(a) => &a.id,
            Self::Paravirtualized(a) => &a.id,
        }
    }

    /// OCID of the attached instance.
    #[must_use]
    pub fn instance_id(&self) -> &str {
        match self {
            Self::IScsi(a) => &a.instance_id,
            Self::Paravirtualized(a) => &a.instance_id,
        }
    }

    /// OCID of the attached volume.
    #[must_use]
    pub fn volume_id(&self) -> &str {
        match self {
            Self::IScsi(a) => &a.volume_id,
            Self::Paravirtualized(a) => &a.volume_id,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn lifecycle_state(&self) -> &VolumeAttachmentLifecycleState {
        match self {
            Self::IScsi(a) => &a.lifecycle_state,
            Self::Paravirtualized(a) => &a.lifecycle_state,
        }
    }
}

/// An iSCSI volume attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IScsiVolumeAttachment {
    /// Availability domain of the instance and volume.
    pub availability_domain: String,
    /// OCID of the compartment.
    pub compartment_id: String,
    /// OCID of the attachment.
    pub id: String,
    /// OCID of the attached instance.
    pub instance_id: String,
    /// Current lifecycle state.
    pub lifecycle_state: VolumeAttachmentLifecycleState,
    /// Creation timestamp.
    pub time_created: DateTime<Utc>,
    /// OCID of the attached volume.
    pub volume_id: String,
    /// iSCSI qualified name of the target.
    pub iqn: String,
    /// IPv4 address of the iSCSI portal.
    pub ipv4: String,
    /// Port of the iSCSI portal.
    pub port: i32,

    /// CHAP secret, present when CHAP is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chap_secret: Option<String>,
    /// CHAP user name, present when CHAP is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chap_username: Option<String>,
    /// Device path the attachment is exposed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// User-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Whether the attachment is read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    /// Whether the volume can be attached to multiple instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shareable: Option<bool>,
}

/// A paravirtualised volume attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParavirtualizedVolumeAttachment {
    /// Availability domain of the instance and volume.
    pub availability_domain: String,
    /// OCID of the compartment.
    pub compartment_id: String,
    /// OCID of the attachment.
    pub id: String,
    /// OCID of the attached instance.
    pub instance_id: String,
    /// Current lifecycle state.
    pub lifecycle_state: VolumeAttachmentLifecycleState,
    /// Creation timestamp.
    pub time_created: DateTime<Utc>,
    /// OCID of the attached volume.
    pub volume_id: String,

    /// Device path the attachment is exposed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// User-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Whether the attachment encrypts data in transit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pv_encryption_in_transit_enabled: Option<bool>,
    /// Whether the attachment is read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    /// Whether the volume can be attached to multiple instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shareable: Option<bool>,
}

/// Request payload for attaching a volume, keyed by `type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum AttachVolumeDetails {
    /// Attach over iSCSI.
    #[serde(rename = "iscsi")]
    IScsi(AttachIScsiVolumeDetails),
    /// Attach as a paravirtualised device.
    #[serde(rename = "paravirtualized")]
    Paravirtualized(AttachParavirtualizedVolumeDetails),
}

/// iSCSI attachment request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachIScsiVolumeDetails {
    /// OCID of the instance to attach to.
    pub instance_id: String,
    /// OCID of the volume to attach.
    pub volume_id: String,

    /// Device path to expose the attachment under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// User-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Whether the attachment is read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    /// Whether the volume can be attached to multiple instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shareable: Option<bool>,
    /// Whether to require CHAP authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_chap: Option<bool>,
}

impl AttachIScsiVolumeDetails {
    /// Payload attaching the given volume to the given instance.
    #[must_use]
    pub fn new(instance_id: impl Into<String>, volume_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            volume_id: volume_id.into(),
            device: None,
            display_name: None,
            is_read_only: None,
            is_shareable: None,
            use_chap: None,
        }
    }
}

/// Paravirtualised attachment request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachParavirtualizedVolumeDetails {
    /// OCID of the instance to attach to.
    pub instance_id: String,
    /// OCID of the volume to attach.
    pub volume_id: String,

    /// Device path to expose the attachment under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// User-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Whether to encrypt data in transit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pv_encryption_in_transit_enabled: Option<bool>,
    /// Whether the attachment is read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    /// Whether the volume can be attached to multiple instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shareable: Option<bool>,
}

impl AttachParavirtualizedVolumeDetails {
    /// Payload attaching the given volume to the given instance.
    #[must_use]
    pub fn new(instance_id: impl Into<String>, volume_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            volume_id: volume_id.into(),
            device: None,
            display_name: None,
            is_pv_encryption_in_transit_enabled: None,
            is_read_only: None,
            is_shareable: None,
        }
    }
}

/// A boot image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// OCID of the compartment containing the image.
    pub compartment_id: String,
    /// Whether instances launched from this image may create images.
    pub create_image_allowed: bool,
    /// OCID of the image.
    pub id: String,
    /// Current lifecycle state.
    pub lifecycle_state: ImageLifecycleState,
    /// Operating system name.
    pub operating_system: String,
    /// Operating system version.
    pub operating_system_version: String,
    /// Creation timestamp.
    pub time_created: DateTime<Utc>,

    /// OCID of the image this one was derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image_id: Option<String>,
    /// Size of the billable image in gigabytes.
    #[serde(
        default,
        rename = "billableSizeInGBs",
        skip_serializing_if = "Option::is_none"
    )]
    pub billable_size_in_gbs: Option<i64>,
    /// Defined tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
    /// User-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Freeform tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    /// Default firmware configuration for launches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_mode: Option<LaunchMode>,
    /// Image size in megabytes.
    #[serde(default, rename = "sizeInMBs", skip_serializing_if = "Option::is_none")]
    pub size_in_mbs: Option<i64>,
}

/// Source of capacity for a topology, keyed by `capacityType` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "capacityType")]
pub enum CapacitySource {
    /// Capacity dedicated to the tenancy.
    #[serde(rename = "DEDICATED")]
    Dedicated,
}

/// A compute capacity topology.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputeCapacityTopology {
    /// Availability domain of the topology.
    pub availability_domain: String,
    /// Source of the topology's capacity.
    pub capacity_source: CapacitySource,
    /// OCID of the compartment containing the topology.
    pub compartment_id: String,
    /// OCID of the topology.
    pub id: String,
    /// Current lifecycle state.
    pub lifecycle_state: ComputeCapacityTopologyLifecycleState,
    /// Creation timestamp.
    pub time_created: DateTime<Utc>,
    /// Last update timestamp.
    pub time_updated: DateTime<Utc>,

    /// Defined tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
    /// User-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Freeform tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
}

/// Request payload for creating a compute capacity topology.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateComputeCapacityTopologyDetails {
    /// Availability domain to create the topology in.
    pub availability_domain: String,
    /// Source of the topology's capacity.
    pub capacity_source: CapacitySource,
    /// OCID of the compartment to create the topology in.
    pub compartment_id: String,

    /// Defined tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
    /// User-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Freeform tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
}

impl CreateComputeCapacityTopologyDetails {
    /// Payload with only the mandatory fields set.
    #[must_use]
    pub fn new(
        availability_domain: impl Into<String>,
        capacity_source: CapacitySource,
        compartment_id: impl Into<String>,
    ) -> Self {
        Self {
            availability_domain: availability_domain.into(),
            capacity_source,
            compartment_id: compartment_id.into(),
            defined_tags: None,
            display_name: None,
            freeform_tags: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn instance_deserialize_basic() {
        let json = json!({
            "availabilityDomain": "Uocm:PHX-AD-1",
            "compartmentId": "ocid1.compartment.oc1..aaaa",
            "id": "ocid1.instance.oc1.phx.bbbb",
            "lifecycleState": "RUNNING",
            "region": "phx",
            "shape": "VM.Standard.E4.Flex",
            "timeCreated": "2024-03-01T12:00:00.000Z",
            "displayName": "bastion-0",
            "launchMode": "paravirtualized"
        });

        let instance: Instance = serde_json::from_value(json).unwrap();
        assert_eq!(instance.lifecycle_state, InstanceLifecycleState::Running);
        assert_eq!(instance.display_name.as_deref(), Some("bastion-0"));
        assert_eq!(instance.launch_mode, Some(LaunchMode::Paravirtualized));
        assert!(instance.shape_config.is_none());
    }

    #[test]
    fn instance_keeps_unknown_lifecycle_state() {
        let json = json!({
            "availabilityDomain": "Uocm:PHX-AD-1",
            "compartmentId": "ocid1.compartment.oc1..aaaa",
            "id": "ocid1.instance.oc1.phx.bbbb",
            "lifecycleState": "HIBERNATED",
            "region": "phx",
            "shape": "VM.Standard.E4.Flex",
            "timeCreated": "2024-03-01T12:00:00.000Z"
        });

        let instance: Instance = serde_json::from_value(json).unwrap();
        assert!(instance.lifecycle_state.is_unknown());
        assert_eq!(instance.lifecycle_state.as_str(), "HIBERNATED");
    }

    #[test]
    fn launch_details_serialise_camel_case_without_nulls() {
        let details = LaunchInstanceDetails {
            availability_domain: "Uocm:PHX-AD-1".to_string(),
            compartment_id: "ocid1.compartment.oc1..aaaa".to_string(),
            capacity_reservation_id: None,
            create_vnic_details: None,
            dedicated_vm_host_id: None,
            defined_tags: None,
            display_name: Some("web-1".to_string()),
            fault_domain: None,
            freeform_tags: None,
            hostname_label: None,
            image_id: None,
            is_pv_encryption_in_transit_enabled: None,
            metadata: None,
            shape: Some("VM.Standard.E4.Flex".to_string()),
            shape_config: Some(LaunchInstanceShapeConfigDetails {
                ocpus: Some(2.0),
                memory_in_gbs: Some(32.0),
                vcpus: None,
            }),
            source_details: Some(InstanceSourceDetails::Image(InstanceSourceViaImageDetails {
                image_id: "ocid1.image.oc1.phx.cccc".to_string(),
                boot_volume_size_in_gbs: Some(100),
                kms_key_id: None,
            })),
            subnet_id: None,
        };

        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["availabilityDomain"], "Uocm:PHX-AD-1");
        assert_eq!(value["sourceDetails"]["sourceType"], "image");
        assert_eq!(value["sourceDetails"]["bootVolumeSizeInGBs"], 100);
        assert_eq!(value["shapeConfig"]["memoryInGBs"], 32.0);
        assert!(value.get("faultDomain").is_none());
        assert!(value["sourceDetails"].get("kmsKeyId").is_none());
    }

    #[test]
    fn volume_attachment_decodes_by_discriminator() {
        let json = json!({
            "attachmentType": "iscsi",
            "availabilityDomain": "Uocm:PHX-AD-1",
            "compartmentId": "ocid1.compartment.oc1..aaaa",
            "id": "ocid1.volumeattachment.oc1.phx.dddd",
            "instanceId": "ocid1.instance.oc1.phx.bbbb",
            "lifecycleState": "attached",
            "timeCreated": "2024-03-01T12:00:00.000Z",
            "volumeId": "ocid1.volume.oc1.phx.eeee",
            "iqn": "iqn.2015-12.com.oracleiaas:abc",
            "ipv4": "169.254.2.2",
            "port": 3260
        });

        let attachment: VolumeAttachment = serde_json::from_value(json).unwrap();
        match &attachment {
            VolumeAttachment::IScsi(a) => {
                assert_eq!(a.iqn, "iqn.2015-12.com.oracleiaas:abc");
                assert_eq!(a.port, 3260);
            }
            VolumeAttachment::Paravirtualized(_) => panic!("expected iscsi variant"),
        }
        assert_eq!(
            attachment.lifecycle_state(),
            &VolumeAttachmentLifecycleState::Attached
        );
        assert_eq!(attachment.volume_id(), "ocid1.volume.oc1.phx.eeee");
    }

    #[test]
    fn volume_attachment_rejects_unknown_discriminator() {
        let json = json!({
            "attachmentType": "emulated",
            "id": "ocid1.volumeattachment.oc1.phx.dddd"
        });

        let err = serde_json::from_value::<VolumeAttachment>(json).unwrap_err();
        assert!(err.to_string().contains("emulated"));
    }

    #[test]
    fn attach_details_stamp_discriminator() {
        let details =
            AttachVolumeDetails::Paravirtualized(AttachParavirtualizedVolumeDetails {
                instance_id: "ocid1.instance.oc1.phx.bbbb".to_string(),
                volume_id: "ocid1.volume.oc1.phx.eeee".to_string(),
                device: None,
                display_name: None,
                is_pv_encryption_in_transit_enabled: Some(true),
                is_read_only: None,
                is_shareable: None,
            });

        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["type"], "paravirtualized");
        assert_eq!(value["isPvEncryptionInTransitEnabled"], true);
    }

    #[test]
    fn power_action_details_roundtrip() {
        let details = InstancePowerActionDetails::RebootMigrate {
            delete_local_storage: Some(true),
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["actionType"], "rebootMigrate");
        assert_eq!(value["deleteLocalStorage"], true);

        let plain = serde_json::to_value(InstancePowerActionDetails::SoftStop).unwrap();
        assert_eq!(plain, json!({"actionType": "softstop"}));

        let back: InstancePowerActionDetails =
            serde_json::from_value(json!({"actionType": "reset"})).unwrap();
        assert_eq!(
            back,
            InstancePowerActionDetails::Reset {
                allow_dense_reboot_migration: None
            }
        );
    }

    #[test]
    fn capacity_topology_decodes_dedicated_source() {
        let json = json!({
            "availabilityDomain": "Uocm:PHX-AD-1",
            "capacitySource": {"capacityType": "DEDICATED"},
            "compartmentId": "ocid1.compartment.oc1..aaaa",
            "id": "ocid1.computecapacitytopology.oc1.phx.ffff",
            "lifecycleState": "ACTIVE",
            "timeCreated": "2024-03-01T12:00:00.000Z",
            "timeUpdated": "2024-03-02T12:00:00.000Z"
        });

        let topology: ComputeCapacityTopology = serde_json::from_value(json).unwrap();
        assert_eq!(topology.capacity_source, CapacitySource::Dedicated);
        assert_eq!(
            topology.lifecycle_state,
            ComputeCapacityTopologyLifecycleState::Active
        );
    }

    #[test]
    fn sort_keys_parse_case_insensitively() {
        assert_eq!(InstanceSortBy::parse("timecreated"), InstanceSortBy::TimeCreated);
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert!(ImageSortBy::parse("SIZE").is_unknown());
    }
}
