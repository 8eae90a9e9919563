//! Cluster creation and removal.

use crate::api::InventoryApi;
use crate::error::{VmwareError, VmwareErrorKind, VmwareResult};
use crate::resolve::{destroy_all, require_non_empty, resolve_all, resolve_one};
use crate::types::*;

/// Cluster operations.
pub struct ClusterManager<'a, A: InventoryApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: InventoryApi + ?Sized> ClusterManager<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Resolve a cluster location: a datacenter first, then a host folder.
    async fn resolve_location(&self, location: &str) -> VmwareResult<InventoryObject> {
        match resolve_one(self.api, EntityKind::Datacenter, location).await {
            Ok(dc) => Ok(dc),
            Err(e) if e.is(&VmwareErrorKind::NotFound) => {
                resolve_one(self.api, EntityKind::HostFolder, location)
                    .await
                    .map_err(|e| match e.kind {
                        VmwareErrorKind::NotFound => VmwareError::not_found(format!(
                            "no datacenter or host folder named '{location}'"
                        )),
                        _ => e,
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Create cluster `name` under `location` with DRS enabled.
    pub async fn create_cluster(&self, location: &str, name: &str) -> VmwareResult<ManagedObjectRef> {
        require_non_empty("location", location)?;
        require_non_empty("name", name)?;

        let parent = self.resolve_location(location).await?;
        let cluster = self
            .api
            .create_cluster(&parent.moref, name, &ClusterCreateSpec::default())
            .await?;
        log::info!("Created cluster {name} in {location} ({cluster})");
        Ok(cluster)
    }

    /// Delete every cluster named `name`, without confirmation.
    pub async fn remove_cluster(&self, name: &str) -> VmwareResult<Vec<ManagedObjectRef>> {
        require_non_empty("name", name)?;
        let targets = resolve_all(self.api, EntityKind::Cluster, name).await?;
        destroy_all(self.api, &targets).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::{InventoryCall, Operation, SimulatedInventory};

    #[tokio::test]
    async fn creates_cluster_in_datacenter_with_drs() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC1", Some(&inv.root_folder())).await;

        let cl = ClusterManager::new(&inv).create_cluster("DC1", "Prod").await.unwrap();

        assert_eq!(inv.parent_of(&cl).await, Some(dc.clone()));
        assert_eq!(
            inv.mutations().await,
            vec![InventoryCall::CreateCluster {
                location: dc,
                name: "Prod".into(),
                spec: ClusterCreateSpec { drs_enabled: true },
            }]
        );
    }

    #[tokio::test]
    async fn falls_back_to_folder_location() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC1", Some(&inv.root_folder())).await;
        let folder = inv.insert(EntityKind::HostFolder, "Lab", Some(&dc)).await;

        let cl = ClusterManager::new(&inv).create_cluster("Lab", "Test").await.unwrap();
        assert_eq!(inv.parent_of(&cl).await, Some(folder));
    }

    #[tokio::test]
    async fn folder_fallback_ignores_other_folder_types() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC1", Some(&inv.root_folder())).await;
        inv.insert(EntityKind::DatacenterFolder, "Lab", Some(&inv.root_folder())).await;
        let hosts = inv.insert(EntityKind::HostFolder, "Lab", Some(&dc)).await;

        let cl = ClusterManager::new(&inv).create_cluster("Lab", "Test").await.unwrap();

        assert_eq!(inv.parent_of(&cl).await, Some(hosts));
        assert!(inv.calls().await.contains(&InventoryCall::Find {
            kind: EntityKind::HostFolder,
            name: "Lab".into(),
        }));
    }

    #[tokio::test]
    async fn unknown_location_is_not_found() {
        let inv = SimulatedInventory::new();
        let e = ClusterManager::new(&inv)
            .create_cluster("Nowhere", "Prod")
            .await
            .unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::NotFound);
        assert!(inv.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_cluster_collides() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC1", Some(&inv.root_folder())).await;
        inv.insert(EntityKind::Cluster, "Prod", Some(&dc)).await;

        let e = ClusterManager::new(&inv).create_cluster("DC1", "Prod").await.unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::NameCollision);
    }

    #[tokio::test]
    async fn remove_missing_cluster_does_not_destroy() {
        let inv = SimulatedInventory::new();
        let e = ClusterManager::new(&inv).remove_cluster("Missing").await.unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::NotFound);
        assert!(inv.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn remove_cluster_is_unconfirmed() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC1", Some(&inv.root_folder())).await;
        let cl = inv.insert(EntityKind::Cluster, "Prod", Some(&dc)).await;

        let removed = ClusterManager::new(&inv).remove_cluster("Prod").await.unwrap();
        assert_eq!(removed, vec![cl.clone()]);
        assert_eq!(
            inv.mutations().await,
            vec![InventoryCall::Destroy {
                entity: cl,
                options: DestroyOptions { confirm: false },
            }]
        );
        assert!(!inv.contains(EntityKind::Cluster, "Prod").await);
    }

    #[tokio::test]
    async fn blocked_deletion_surfaces_precondition_failure() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC1", Some(&inv.root_folder())).await;
        inv.insert(EntityKind::Cluster, "Prod", Some(&dc)).await;
        inv.fail_next(
            Operation::Destroy,
            VmwareError::precondition("ResourceInUse: hosts are still attached"),
        )
        .await;

        let e = ClusterManager::new(&inv).remove_cluster("Prod").await.unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::PreconditionFailed);
        assert!(inv.contains(EntityKind::Cluster, "Prod").await);
    }
}
