//! Management API seam: name lookups plus the create / attach / destroy
//! primitives the inventory managers are written against.

use crate::error::{VmwareError, VmwareResult};
use crate::types::*;
use crate::vsphere::VsphereClient;

use async_trait::async_trait;
use serde_json::{json, Value};

/// Name lookups and mutations against a vCenter inventory.
///
/// Lookups never cache; every call goes to the backend. Implementations
/// must be `Send + Sync` so the facade can sit behind a tokio `Mutex`.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Every object of `kind` whose name equals `name` (possibly none).
    async fn find(&self, kind: EntityKind, name: &str) -> VmwareResult<Vec<InventoryObject>>;

    /// Attach a host to a cluster; returns the new `HostSystem`.
    async fn add_host(
        &self,
        cluster: &ManagedObjectRef,
        spec: &HostConnectSpec,
    ) -> VmwareResult<ManagedObjectRef>;

    /// Create a cluster under a datacenter or host folder.
    async fn create_cluster(
        &self,
        location: &ManagedObjectRef,
        name: &str,
        spec: &ClusterCreateSpec,
    ) -> VmwareResult<ManagedObjectRef>;

    /// Create a datacenter under a folder.
    async fn create_datacenter(
        &self,
        folder: &ManagedObjectRef,
        name: &str,
    ) -> VmwareResult<ManagedObjectRef>;

    /// Create a distributed switch in a datacenter.
    async fn create_distributed_switch(
        &self,
        datacenter: &ManagedObjectRef,
        name: &str,
    ) -> VmwareResult<ManagedObjectRef>;

    /// Create a port group on a distributed switch.
    async fn create_port_group(
        &self,
        switch: &ManagedObjectRef,
        spec: &PortGroupCreateSpec,
    ) -> VmwareResult<ManagedObjectRef>;

    /// Delete an object and everything below it.
    async fn destroy(&self, entity: &ManagedObjectRef, opts: &DestroyOptions) -> VmwareResult<()>;
}

// ── vCenter binding ─────────────────────────────────────────────────

impl VsphereClient {
    async fn list_named<T, F>(
        &self,
        path: &str,
        name: &str,
        extra: &[(&str, &str)],
        map: F,
    ) -> VmwareResult<Vec<InventoryObject>>
    where
        T: serde::de::DeserializeOwned,
        F: Fn(T) -> InventoryObject,
    {
        let mut params = vec![("names", name)];
        params.extend_from_slice(extra);
        let items: Vec<T> = self.get_with_params(path, &params).await?;
        Ok(items.into_iter().map(map).collect())
    }

    /// Resolve a datacenter to one of its child folders; folders pass through.
    async fn folder_of(
        &self,
        location: &ManagedObjectRef,
        property: &str,
    ) -> VmwareResult<ManagedObjectRef> {
        if location.r#type == EntityKind::Datacenter.managed_type() {
            self.vim_property(location, property).await
        } else {
            Ok(location.clone())
        }
    }
}

fn host_connect_spec_json(spec: &HostConnectSpec) -> Value {
    let mut v = json!({
        "_typeName": "HostConnectSpec",
        "hostName": spec.host_name,
        "userName": spec.user_name,
        "password": spec.password,
        "force": spec.force,
    });
    if let Some(port) = spec.port {
        v["port"] = json!(port);
    }
    if let Some(ref tp) = spec.ssl_thumbprint {
        v["sslThumbprint"] = json!(tp);
    }
    v
}

#[async_trait]
impl InventoryApi for VsphereClient {
    async fn find(&self, kind: EntityKind, name: &str) -> VmwareResult<Vec<InventoryObject>> {
        log::debug!("Looking up {kind} '{name}'");
        match kind {
            EntityKind::DatacenterFolder | EntityKind::HostFolder => {
                let types = kind.folder_type().unwrap_or_default();
                self.list_named(
                    "/api/vcenter/folder",
                    name,
                    &[("types", types)],
                    |f: FolderSummary| InventoryObject {
                        name: f.name,
                        moref: ManagedObjectRef::of(kind, f.folder),
                    },
                )
                .await
            }
            EntityKind::Datacenter => {
                self.list_named("/api/vcenter/datacenter", name, &[], |d: DatacenterSummary| {
                    InventoryObject {
                        name: d.name,
                        moref: ManagedObjectRef::of(kind, d.datacenter),
                    }
                })
                .await
            }
            EntityKind::Cluster => {
                self.list_named("/api/vcenter/cluster", name, &[], |c: ClusterSummary| InventoryObject {
                    name: c.name,
                    moref: ManagedObjectRef::of(kind, c.cluster),
                })
                .await
            }
            EntityKind::HostSystem => {
                self.list_named("/api/vcenter/host", name, &[], |h: HostSummary| InventoryObject {
                    name: h.name,
                    moref: ManagedObjectRef::of(kind, h.host),
                })
                .await
            }
            EntityKind::DistributedPortGroup => {
                self.list_named(
                    "/api/vcenter/network",
                    name,
                    &[("types", "DISTRIBUTED_PORTGROUP")],
                    |n: NetworkSummary| InventoryObject {
                        name: n.name,
                        moref: ManagedObjectRef::of(kind, n.network),
                    },
                )
                .await
            }
            // The Automation API has no switch listing.
            EntityKind::DistributedSwitch => {
                self.find_in_container_view("DistributedVirtualSwitch", name).await
            }
        }
    }

    async fn add_host(
        &self,
        cluster: &ManagedObjectRef,
        spec: &HostConnectSpec,
    ) -> VmwareResult<ManagedObjectRef> {
        let body = json!({
            "spec": host_connect_spec_json(spec),
            "asConnected": true,
        });
        self.run_task_for_moref(cluster, "AddHost_Task", Some(&body)).await
    }

    async fn create_cluster(
        &self,
        location: &ManagedObjectRef,
        name: &str,
        spec: &ClusterCreateSpec,
    ) -> VmwareResult<ManagedObjectRef> {
        let folder = self.folder_of(location, "hostFolder").await?;
        let body = json!({
            "name": name,
            "spec": {
                "_typeName": "ClusterConfigSpecEx",
                "drsConfig": {
                    "_typeName": "ClusterDrsConfigInfo",
                    "enabled": spec.drs_enabled,
                },
            },
        });
        self.vim_invoke(&folder, "CreateClusterEx", Some(&body)).await
    }

    async fn create_datacenter(
        &self,
        folder: &ManagedObjectRef,
        name: &str,
    ) -> VmwareResult<ManagedObjectRef> {
        let body = json!({ "name": name });
        self.vim_invoke(folder, "CreateDatacenter", Some(&body)).await
    }

    async fn create_distributed_switch(
        &self,
        datacenter: &ManagedObjectRef,
        name: &str,
    ) -> VmwareResult<ManagedObjectRef> {
        let folder = self.folder_of(datacenter, "networkFolder").await?;
        let body = json!({
            "spec": {
                "_typeName": "DVSCreateSpec",
                "configSpec": {
                    "_typeName": "VMwareDVSConfigSpec",
                    "name": name,
                },
            },
        });
        self.run_task_for_moref(&folder, "CreateDVS_Task", Some(&body)).await
    }

    async fn create_port_group(
        &self,
        switch: &ManagedObjectRef,
        spec: &PortGroupCreateSpec,
    ) -> VmwareResult<ManagedObjectRef> {
        let body = json!({
            "spec": {
                "_typeName": "DVPortgroupConfigSpec",
                "name": spec.name,
                "numPorts": spec.num_ports,
                "type": spec.binding,
            },
        });
        self.run_task_for_moref(switch, "CreateDVPortgroup_Task", Some(&body)).await
    }

    async fn destroy(&self, entity: &ManagedObjectRef, opts: &DestroyOptions) -> VmwareResult<()> {
        if opts.confirm {
            return Err(VmwareError::invalid_argument(
                "interactive confirmation is not supported",
            ));
        }
        log::debug!("Destroying {entity}");
        self.run_task(entity, "Destroy_Task", None).await?;
        Ok(())
    }
}
