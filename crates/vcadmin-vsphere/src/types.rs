//! Shared types for vCenter inventory administration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Port count given to a new distributed port group unless overridden.
pub const DEFAULT_PORT_COUNT: u32 = 1000;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Connection / Config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Top-level configuration for connecting to a vCenter server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereConfig {
    /// vCenter hostname / IP (e.g. "vcenter.lab.local")
    pub host: String,
    /// Port (default 443)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username (e.g. "administrator@vsphere.local")
    pub username: String,
    /// Password
    pub password: String,
    /// Skip TLS certificate verification (self-signed labs)
    #[serde(default)]
    pub insecure: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// vim25 release segment used in VI/JSON paths
    #[serde(default = "default_api_release")]
    pub api_release: String,
    /// Delay between two `Task.info` polls
    #[serde(default = "default_task_poll_interval")]
    pub task_poll_interval_ms: u64,
    /// Give up waiting on a vCenter task after this long
    #[serde(default = "default_task_timeout")]
    pub task_timeout_secs: u64,
    /// Full API base URL (scheme, host, port), for vCenters behind a
    /// reverse proxy. Overrides `host` / `port` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_port() -> u16 { 443 }
fn default_timeout() -> u64 { 30 }
fn default_api_release() -> String { "8.0.1.0".to_string() }
fn default_task_poll_interval() -> u64 { 500 }
fn default_task_timeout() -> u64 { 600 }

impl Default for VsphereConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            port: default_port(),
            insecure: false,
            timeout_secs: default_timeout(),
            api_release: default_api_release(),
            task_poll_interval_ms: default_task_poll_interval(),
            task_timeout_secs: default_task_timeout(),
            base_url: None,
        }
    }
}

/// Config view that is safe to print (no password).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereConfigSafe {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub insecure: bool,
    pub api_release: String,
}

impl From<&VsphereConfig> for VsphereConfigSafe {
    fn from(c: &VsphereConfig) -> Self {
        Self {
            host: c.host.clone(),
            port: c.port,
            username: c.username.clone(),
            insecure: c.insecure,
            api_release: c.api_release.clone(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Inventory objects
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Kinds of inventory object this crate looks up by name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// Folder holding datacenters (the root `Datacenters` folder and its subfolders)
    DatacenterFolder,
    /// Folder holding clusters and standalone hosts
    HostFolder,
    Datacenter,
    Cluster,
    HostSystem,
    DistributedSwitch,
    DistributedPortGroup,
}

impl EntityKind {
    /// vSphere managed-object type name.
    pub fn managed_type(&self) -> &'static str {
        match self {
            Self::DatacenterFolder | Self::HostFolder => "Folder",
            Self::Datacenter => "Datacenter",
            Self::Cluster => "ClusterComputeResource",
            Self::HostSystem => "HostSystem",
            Self::DistributedSwitch => "VmwareDistributedVirtualSwitch",
            Self::DistributedPortGroup => "DistributedVirtualPortgroup",
        }
    }

    /// Human-readable label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DatacenterFolder => "datacenter folder",
            Self::HostFolder => "host folder",
            Self::Datacenter => "datacenter",
            Self::Cluster => "cluster",
            Self::HostSystem => "host",
            Self::DistributedSwitch => "distributed switch",
            Self::DistributedPortGroup => "distributed port group",
        }
    }
}

impl EntityKind {
    /// `types` filter of `/api/vcenter/folder` for folder kinds.
    pub fn folder_type(&self) -> Option<&'static str> {
        match self {
            Self::DatacenterFolder => Some("DATACENTER"),
            Self::HostFolder => Some("HOST"),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Handle to a remote managed object (e.g. `Datacenter:datacenter-21`).
///
/// The `value` is the same identifier the Automation REST API returns in
/// list results, so handles from either API are interchangeable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ManagedObjectRef {
    #[serde(rename = "type")]
    pub r#type: String,
    pub value: String,
}

impl ManagedObjectRef {
    pub fn new(r#type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            value: value.into(),
        }
    }

    /// Handle of `kind` with the given identifier.
    pub fn of(kind: EntityKind, value: impl Into<String>) -> Self {
        Self::new(kind.managed_type(), value)
    }
}

impl fmt::Display for ManagedObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.r#type, self.value)
    }
}

/// A name lookup hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryObject {
    pub name: String,
    pub moref: ManagedObjectRef,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Automation REST list results
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSummary {
    pub host: String,
    pub name: String,
    #[serde(default)]
    pub connection_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster: String,
    pub name: String,
    #[serde(default)]
    pub ha_enabled: Option<bool>,
    #[serde(default)]
    pub drs_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatacenterSummary {
    pub datacenter: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSummary {
    pub folder: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub folder_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub network: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub network_type: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Mutation specs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Credentials and options for attaching a host to a cluster.
#[derive(Clone, PartialEq, Eq)]
pub struct HostConnectSpec {
    /// DNS name or IP of the host
    pub host_name: String,
    pub port: Option<u16>,
    pub user_name: String,
    pub password: String,
    /// Take the host over even if it is managed by another vCenter
    pub force: bool,
    /// SHA-1 thumbprint of the host certificate, when already known
    pub ssl_thumbprint: Option<String>,
}

impl fmt::Debug for HostConnectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostConnectSpec")
            .field("host_name", &self.host_name)
            .field("port", &self.port)
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .field("force", &self.force)
            .field("ssl_thumbprint", &self.ssl_thumbprint)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterCreateSpec {
    pub drs_enabled: bool,
}

impl Default for ClusterCreateSpec {
    fn default() -> Self {
        Self { drs_enabled: true }
    }
}

/// Port binding of a distributed port group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PortBinding {
    /// Static binding: a port is assigned when a NIC is connected.
    EarlyBinding,
    /// Ephemeral: ports are created on power-on.
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortGroupCreateSpec {
    pub name: String,
    pub num_ports: u32,
    pub binding: PortBinding,
}

impl PortGroupCreateSpec {
    pub fn new(name: impl Into<String>, num_ports: u32) -> Self {
        Self {
            name: name.into(),
            num_ports,
            binding: PortBinding::EarlyBinding,
        }
    }
}

/// Options applied to every removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyOptions {
    /// Ask before deleting. Removal operations always pass `false`.
    pub confirm: bool,
}

impl DestroyOptions {
    pub const UNCONFIRMED: Self = Self { confirm: false };
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Results
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Both objects created by a switch + port group creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchAndPortGroup {
    pub switch: ManagedObjectRef,
    pub port_group: ManagedObjectRef,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Tasks
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TaskState {
    Queued,
    Running,
    Success,
    Error,
}

/// `LocalizedMethodFault` as returned in `TaskInfo.error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodFault {
    #[serde(default)]
    pub fault: Option<serde_json::Value>,
    #[serde(default)]
    pub localized_message: Option<String>,
}

/// VI/JSON `TaskInfo` (subset).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    #[serde(default)]
    pub key: Option<String>,
    pub state: TaskState,
    #[serde(default)]
    pub description_id: Option<String>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<MethodFault>,
    #[serde(default)]
    pub progress: Option<u32>,
    #[serde(default)]
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub complete_time: Option<chrono::DateTime<chrono::Utc>>,
}
