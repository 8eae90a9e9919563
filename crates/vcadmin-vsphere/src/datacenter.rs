//! Datacenter creation and removal.

use crate::api::InventoryApi;
use crate::error::VmwareResult;
use crate::resolve::{destroy_all, require_non_empty, resolve_all, resolve_one};
use crate::types::*;

/// Datacenter operations.
pub struct DatacenterManager<'a, A: InventoryApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: InventoryApi + ?Sized> DatacenterManager<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Create datacenter `name` under the folder named `folder`.
    pub async fn create_datacenter(&self, folder: &str, name: &str) -> VmwareResult<ManagedObjectRef> {
        require_non_empty("folder", folder)?;
        require_non_empty("name", name)?;

        let parent = resolve_one(self.api, EntityKind::DatacenterFolder, folder).await?;
        let dc = self.api.create_datacenter(&parent.moref, name).await?;
        log::info!("Created datacenter {name} in folder {folder} ({dc})");
        Ok(dc)
    }

    /// Delete every datacenter named `name` and everything in it.
    pub async fn remove_datacenter(&self, name: &str) -> VmwareResult<Vec<ManagedObjectRef>> {
        require_non_empty("name", name)?;
        let targets = resolve_all(self.api, EntityKind::Datacenter, name).await?;
        destroy_all(self.api, &targets).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VmwareErrorKind;
    use crate::simulated::{InventoryCall, SimulatedInventory};

    #[tokio::test]
    async fn creates_datacenter_under_named_folder() {
        let inv = SimulatedInventory::new();
        let folder = inv.insert(EntityKind::DatacenterFolder, "Folder1", Some(&inv.root_folder())).await;

        let dc = DatacenterManager::new(&inv)
            .create_datacenter("Folder1", "DC1")
            .await
            .unwrap();

        assert_eq!(dc.r#type, "Datacenter");
        assert_eq!(
            inv.mutations().await,
            vec![InventoryCall::CreateDatacenter {
                folder,
                name: "DC1".into(),
            }]
        );
    }

    #[tokio::test]
    async fn parent_must_be_a_datacenter_folder() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC0", Some(&inv.root_folder())).await;
        inv.insert(EntityKind::HostFolder, "Lab", Some(&dc)).await;
        let lab = inv.insert(EntityKind::DatacenterFolder, "Lab", Some(&inv.root_folder())).await;

        let created = DatacenterManager::new(&inv)
            .create_datacenter("Lab", "DC1")
            .await
            .unwrap();
        assert_eq!(inv.parent_of(&created).await, Some(lab));
    }

    #[tokio::test]
    async fn host_folder_is_not_a_datacenter_parent() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC0", Some(&inv.root_folder())).await;
        inv.insert(EntityKind::HostFolder, "Lab", Some(&dc)).await;

        let e = DatacenterManager::new(&inv)
            .create_datacenter("Lab", "DC1")
            .await
            .unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::NotFound);
        assert!(inv.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn missing_folder_is_not_found() {
        let inv = SimulatedInventory::new();
        let e = DatacenterManager::new(&inv)
            .create_datacenter("Nope", "DC1")
            .await
            .unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::NotFound);
        assert!(inv.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn existing_datacenter_collides() {
        let inv = SimulatedInventory::new();
        let mgr = DatacenterManager::new(&inv);
        mgr.create_datacenter("Datacenters", "DC1").await.unwrap();
        let e = mgr.create_datacenter("Datacenters", "DC1").await.unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::NameCollision);
    }

    #[tokio::test]
    async fn removal_takes_children_with_it() {
        let inv = SimulatedInventory::new();
        let dc = inv.insert(EntityKind::Datacenter, "DC1", Some(&inv.root_folder())).await;
        inv.insert(EntityKind::Cluster, "Prod", Some(&dc)).await;

        let removed = DatacenterManager::new(&inv).remove_datacenter("DC1").await.unwrap();
        assert_eq!(removed, vec![dc]);
        assert!(!inv.contains(EntityKind::Cluster, "Prod").await);
    }

    #[tokio::test]
    async fn removing_unknown_datacenter_fails() {
        let inv = SimulatedInventory::new();
        let e = DatacenterManager::new(&inv).remove_datacenter("DC9").await.unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::NotFound);
        assert!(inv.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let inv = SimulatedInventory::new();
        let e = DatacenterManager::new(&inv).remove_datacenter("").await.unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::InvalidArgument);
        assert!(inv.calls().await.is_empty());
    }
}
