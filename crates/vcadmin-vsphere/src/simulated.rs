//! In-memory inventory backend.
//!
//! `SimulatedInventory` implements [`InventoryApi`] over a small object
//! tree held in memory. Every call is recorded in order, and failures can
//! be queued per operation, which makes it the backend the managers and
//! the CLI handlers are tested against.

use crate::api::InventoryApi;
use crate::error::{VmwareError, VmwareResult};
use crate::types::*;

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Call log
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Operation names, used to queue failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Find,
    AddHost,
    CreateCluster,
    CreateDatacenter,
    CreateDistributedSwitch,
    CreatePortGroup,
    Destroy,
}

/// One recorded call with the arguments it received.
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryCall {
    Find {
        kind: EntityKind,
        name: String,
    },
    AddHost {
        cluster: ManagedObjectRef,
        spec: HostConnectSpec,
    },
    CreateCluster {
        location: ManagedObjectRef,
        name: String,
        spec: ClusterCreateSpec,
    },
    CreateDatacenter {
        folder: ManagedObjectRef,
        name: String,
    },
    CreateDistributedSwitch {
        datacenter: ManagedObjectRef,
        name: String,
    },
    CreatePortGroup {
        switch: ManagedObjectRef,
        spec: PortGroupCreateSpec,
    },
    Destroy {
        entity: ManagedObjectRef,
        options: DestroyOptions,
    },
}

impl InventoryCall {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Find { .. } => Operation::Find,
            Self::AddHost { .. } => Operation::AddHost,
            Self::CreateCluster { .. } => Operation::CreateCluster,
            Self::CreateDatacenter { .. } => Operation::CreateDatacenter,
            Self::CreateDistributedSwitch { .. } => Operation::CreateDistributedSwitch,
            Self::CreatePortGroup { .. } => Operation::CreatePortGroup,
            Self::Destroy { .. } => Operation::Destroy,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Inventory
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
struct Entry {
    kind: EntityKind,
    name: String,
    moref: ManagedObjectRef,
    parent: Option<ManagedObjectRef>,
    num_ports: Option<u32>,
}

/// A fully in-memory inventory useful for unit tests and demos.
pub struct SimulatedInventory {
    root: ManagedObjectRef,
    entries: Mutex<Vec<Entry>>,
    calls: Mutex<Vec<InventoryCall>>,
    failures: Mutex<HashMap<Operation, VecDeque<VmwareError>>>,
    next_id: AtomicU64,
}

impl Default for SimulatedInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedInventory {
    /// Empty inventory holding only the root `Datacenters` folder.
    pub fn new() -> Self {
        let root = ManagedObjectRef::of(EntityKind::DatacenterFolder, "group-d1");
        let entry = Entry {
            kind: EntityKind::DatacenterFolder,
            name: "Datacenters".to_string(),
            moref: root.clone(),
            parent: None,
            num_ports: None,
        };
        Self {
            root,
            entries: Mutex::new(vec![entry]),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(2),
        }
    }

    /// Handle of the root folder.
    pub fn root_folder(&self) -> ManagedObjectRef {
        self.root.clone()
    }

    fn allocate(&self, kind: EntityKind) -> ManagedObjectRef {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let value = match kind {
            EntityKind::DatacenterFolder => format!("group-d{n}"),
            EntityKind::HostFolder => format!("group-h{n}"),
            EntityKind::Datacenter => format!("datacenter-{n}"),
            EntityKind::Cluster => format!("domain-c{n}"),
            EntityKind::HostSystem => format!("host-{n}"),
            EntityKind::DistributedSwitch => format!("dvs-{n}"),
            EntityKind::DistributedPortGroup => format!("dvportgroup-{n}"),
        };
        ManagedObjectRef::of(kind, value)
    }

    /// Seed an object directly, bypassing the call log.
    pub async fn insert(
        &self,
        kind: EntityKind,
        name: &str,
        parent: Option<&ManagedObjectRef>,
    ) -> ManagedObjectRef {
        let moref = self.allocate(kind);
        self.entries.lock().await.push(Entry {
            kind,
            name: name.to_string(),
            moref: moref.clone(),
            parent: parent.cloned(),
            num_ports: None,
        });
        moref
    }

    /// Make the next call of `op` fail with `err` (queued, first in first out).
    pub async fn fail_next(&self, op: Operation, err: VmwareError) {
        self.failures
            .lock()
            .await
            .entry(op)
            .or_default()
            .push_back(err);
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<InventoryCall> {
        self.calls.lock().await.clone()
    }

    /// Recorded calls other than lookups.
    pub async fn mutations(&self) -> Vec<InventoryCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.operation() != Operation::Find)
            .cloned()
            .collect()
    }

    /// Whether an object of `kind` named `name` currently exists.
    pub async fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.entries
            .lock()
            .await
            .iter()
            .any(|e| e.kind == kind && e.name == name)
    }

    /// Parent of an object, if it exists and has one.
    pub async fn parent_of(&self, moref: &ManagedObjectRef) -> Option<ManagedObjectRef> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|e| &e.moref == moref)
            .and_then(|e| e.parent.clone())
    }

    /// Port count of a port group created through this backend.
    pub async fn port_count(&self, moref: &ManagedObjectRef) -> Option<u32> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|e| &e.moref == moref)
            .and_then(|e| e.num_ports)
    }

    async fn record(&self, call: InventoryCall) -> VmwareResult<()> {
        let op = call.operation();
        self.calls.lock().await.push(call);
        match self.failures.lock().await.get_mut(&op).and_then(|q| q.pop_front()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn require_exists(entries: &[Entry], moref: &ManagedObjectRef) -> VmwareResult<()> {
        if entries.iter().any(|e| &e.moref == moref) {
            Ok(())
        } else {
            Err(VmwareError::not_found(format!(
                "ManagedObjectNotFound: {moref} has already been deleted or has not been completely created"
            )))
        }
    }

    async fn create_child(
        &self,
        kind: EntityKind,
        name: &str,
        parent: &ManagedObjectRef,
        num_ports: Option<u32>,
    ) -> VmwareResult<ManagedObjectRef> {
        let mut entries = self.entries.lock().await;
        Self::require_exists(&entries, parent)?;
        if entries
            .iter()
            .any(|e| e.kind == kind && e.name == name && e.parent.as_ref() == Some(parent))
        {
            return Err(VmwareError::name_collision(format!(
                "DuplicateName: The name '{name}' already exists."
            )));
        }
        let moref = self.allocate(kind);
        entries.push(Entry {
            kind,
            name: name.to_string(),
            moref: moref.clone(),
            parent: Some(parent.clone()),
            num_ports,
        });
        Ok(moref)
    }
}

#[async_trait]
impl InventoryApi for SimulatedInventory {
    async fn find(&self, kind: EntityKind, name: &str) -> VmwareResult<Vec<InventoryObject>> {
        self.record(InventoryCall::Find {
            kind,
            name: name.to_string(),
        })
        .await?;
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .filter(|e| e.kind == kind && e.name == name)
            .map(|e| InventoryObject {
                name: e.name.clone(),
                moref: e.moref.clone(),
            })
            .collect())
    }

    async fn add_host(
        &self,
        cluster: &ManagedObjectRef,
        spec: &HostConnectSpec,
    ) -> VmwareResult<ManagedObjectRef> {
        self.record(InventoryCall::AddHost {
            cluster: cluster.clone(),
            spec: spec.clone(),
        })
        .await?;
        if self.contains(EntityKind::HostSystem, &spec.host_name).await {
            return Err(VmwareError::conflict(format!(
                "AlreadyConnected: host '{}' is already managed",
                spec.host_name
            )));
        }
        self.create_child(EntityKind::HostSystem, &spec.host_name, cluster, None)
            .await
    }

    async fn create_cluster(
        &self,
        location: &ManagedObjectRef,
        name: &str,
        spec: &ClusterCreateSpec,
    ) -> VmwareResult<ManagedObjectRef> {
        self.record(InventoryCall::CreateCluster {
            location: location.clone(),
            name: name.to_string(),
            spec: spec.clone(),
        })
        .await?;
        self.create_child(EntityKind::Cluster, name, location, None).await
    }

    async fn create_datacenter(
        &self,
        folder: &ManagedObjectRef,
        name: &str,
    ) -> VmwareResult<ManagedObjectRef> {
        self.record(InventoryCall::CreateDatacenter {
            folder: folder.clone(),
            name: name.to_string(),
        })
        .await?;
        self.create_child(EntityKind::Datacenter, name, folder, None).await
    }

    async fn create_distributed_switch(
        &self,
        datacenter: &ManagedObjectRef,
        name: &str,
    ) -> VmwareResult<ManagedObjectRef> {
        self.record(InventoryCall::CreateDistributedSwitch {
            datacenter: datacenter.clone(),
            name: name.to_string(),
        })
        .await?;
        self.create_child(EntityKind::DistributedSwitch, name, datacenter, None)
            .await
    }

    async fn create_port_group(
        &self,
        switch: &ManagedObjectRef,
        spec: &PortGroupCreateSpec,
    ) -> VmwareResult<ManagedObjectRef> {
        self.record(InventoryCall::CreatePortGroup {
            switch: switch.clone(),
            spec: spec.clone(),
        })
        .await?;
        self.create_child(
            EntityKind::DistributedPortGroup,
            &spec.name,
            switch,
            Some(spec.num_ports),
        )
        .await
    }

    async fn destroy(&self, entity: &ManagedObjectRef, opts: &DestroyOptions) -> VmwareResult<()> {
        self.record(InventoryCall::Destroy {
            entity: entity.clone(),
            options: *opts,
        })
        .await?;
        if opts.confirm {
            return Err(VmwareError::invalid_argument(
                "interactive confirmation is not supported",
            ));
        }

        let mut entries = self.entries.lock().await;
        Self::require_exists(&entries, entity)?;

        // Drop the entity and everything below it.
        let mut doomed = vec![entity.clone()];
        let mut i = 0;
        while i < doomed.len() {
            let current = doomed[i].clone();
            doomed.extend(
                entries
                    .iter()
                    .filter(|e| e.parent.as_ref() == Some(&current))
                    .map(|e| e.moref.clone()),
            );
            i += 1;
        }
        entries.retain(|e| !doomed.contains(&e.moref));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VmwareErrorKind;

    #[tokio::test]
    async fn created_objects_are_findable() {
        let inv = SimulatedInventory::new();
        let dc = inv.create_datacenter(&inv.root_folder(), "DC1").await.unwrap();
        assert_eq!(dc.r#type, "Datacenter");

        let hits = inv.find(EntityKind::Datacenter, "DC1").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].moref, dc);
    }

    #[tokio::test]
    async fn duplicate_sibling_names_collide() {
        let inv = SimulatedInventory::new();
        let root = inv.root_folder();
        inv.create_datacenter(&root, "DC1").await.unwrap();
        let e = inv.create_datacenter(&root, "DC1").await.unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::NameCollision);
    }

    #[tokio::test]
    async fn destroy_removes_descendants() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC1", Some(&inv.root_folder())).await;
        let dvs = inv.insert(EntityKind::DistributedSwitch, "VDS1", Some(&dc)).await;
        inv.insert(EntityKind::DistributedPortGroup, "PG1", Some(&dvs)).await;

        inv.destroy(&dc, &DestroyOptions::UNCONFIRMED).await.unwrap();

        assert!(!inv.contains(EntityKind::Datacenter, "DC1").await);
        assert!(!inv.contains(EntityKind::DistributedSwitch, "VDS1").await);
        assert!(!inv.contains(EntityKind::DistributedPortGroup, "PG1").await);
        assert!(inv.contains(EntityKind::DatacenterFolder, "Datacenters").await);
    }

    #[tokio::test]
    async fn queued_failures_fire_once_in_order() {
        let inv = SimulatedInventory::new();
        inv.fail_next(Operation::Find, VmwareError::timeout("first")).await;
        inv.fail_next(Operation::Find, VmwareError::auth("second")).await;

        let e1 = inv.find(EntityKind::HostFolder, "x").await.unwrap_err();
        let e2 = inv.find(EntityKind::HostFolder, "x").await.unwrap_err();
        assert_eq!(e1.kind, VmwareErrorKind::Timeout);
        assert_eq!(e2.kind, VmwareErrorKind::AuthenticationError);
        assert!(inv.find(EntityKind::HostFolder, "x").await.is_ok());
        assert_eq!(inv.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn confirmed_destroy_is_refused() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC1", Some(&inv.root_folder())).await;
        let e = inv.destroy(&dc, &DestroyOptions { confirm: true }).await.unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::InvalidArgument);
        assert!(inv.contains(EntityKind::Datacenter, "DC1").await);
    }
}
