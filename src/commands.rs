//! Maps parsed subcommands onto the inventory operations.

use std::fmt;

use serde::Serialize;
use vcadmin_vsphere::cluster::ClusterManager;
use vcadmin_vsphere::datacenter::DatacenterManager;
use vcadmin_vsphere::host::HostManager;
use vcadmin_vsphere::network::NetworkManager;
use vcadmin_vsphere::types::{EntityKind, ManagedObjectRef, SwitchAndPortGroup};
use vcadmin_vsphere::{InventoryApi, VmwareResult};

use crate::cli::InventoryCommand;

/// What a command did, printable as text or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "result")]
pub enum CommandOutcome {
    #[serde(rename_all = "camelCase")]
    Attached {
        host: String,
        cluster: String,
        moref: ManagedObjectRef,
    },
    #[serde(rename_all = "camelCase")]
    Created {
        kind: EntityKind,
        name: String,
        moref: ManagedObjectRef,
    },
    #[serde(rename_all = "camelCase")]
    SwitchCreated {
        switch: String,
        port_group: String,
        created: SwitchAndPortGroup,
    },
    #[serde(rename_all = "camelCase")]
    Removed {
        kind: EntityKind,
        name: String,
        morefs: Vec<ManagedObjectRef>,
    },
    #[serde(rename_all = "camelCase")]
    Session { server: String, valid: bool },
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attached { host, cluster, moref } => {
                write!(f, "Added host {host} to cluster {cluster} ({moref})")
            }
            Self::Created { kind, name, moref } => write!(f, "Created {kind} {name} ({moref})"),
            Self::SwitchCreated {
                switch,
                port_group,
                created,
            } => write!(
                f,
                "Created distributed switch {switch} ({}) with port group {port_group} ({})",
                created.switch, created.port_group
            ),
            Self::Removed { kind, name, morefs } => {
                let ids: Vec<String> = morefs.iter().map(ToString::to_string).collect();
                write!(f, "Removed {} {kind} named {name}: {}", morefs.len(), ids.join(", "))
            }
            Self::Session { server, valid: true } => write!(f, "Session on {server} is valid"),
            Self::Session { server, valid: false } => write!(f, "Session on {server} is not valid"),
        }
    }
}

/// Run one inventory command against `api`.
pub async fn execute<A: InventoryApi + ?Sized>(
    api: &A,
    command: &InventoryCommand,
) -> VmwareResult<CommandOutcome> {
    match command {
        InventoryCommand::AddHost {
            host,
            host_username,
            host_password,
            cluster,
        } => {
            let moref = HostManager::new(api)
                .add_host_to_cluster(host, host_username, host_password, cluster)
                .await?;
            Ok(CommandOutcome::Attached {
                host: host.clone(),
                cluster: cluster.clone(),
                moref,
            })
        }
        InventoryCommand::CreateCluster { location, name } => {
            let moref = ClusterManager::new(api).create_cluster(location, name).await?;
            Ok(created(EntityKind::Cluster, name, moref))
        }
        InventoryCommand::RemoveCluster { name } => {
            let morefs = ClusterManager::new(api).remove_cluster(name).await?;
            Ok(removed(EntityKind::Cluster, name, morefs))
        }
        InventoryCommand::CreateDatacenter { folder, name } => {
            let moref = DatacenterManager::new(api)
                .create_datacenter(folder, name)
                .await?;
            Ok(created(EntityKind::Datacenter, name, moref))
        }
        InventoryCommand::RemoveDatacenter { name } => {
            let morefs = DatacenterManager::new(api).remove_datacenter(name).await?;
            Ok(removed(EntityKind::Datacenter, name, morefs))
        }
        InventoryCommand::CreateSwitch {
            port_group,
            switch,
            datacenter,
            ports,
        } => {
            let created = NetworkManager::new(api)
                .create_switch_and_port_group(port_group, switch, datacenter, *ports)
                .await?;
            Ok(CommandOutcome::SwitchCreated {
                switch: switch.clone(),
                port_group: port_group.clone(),
                created,
            })
        }
        InventoryCommand::RemoveSwitch { name } => {
            let morefs = NetworkManager::new(api).remove_distributed_switch(name).await?;
            Ok(removed(EntityKind::DistributedSwitch, name, morefs))
        }
        InventoryCommand::RemovePortGroup { name } => {
            let morefs = NetworkManager::new(api).remove_port_group(name).await?;
            Ok(removed(EntityKind::DistributedPortGroup, name, morefs))
        }
    }
}

fn created(kind: EntityKind, name: &str, moref: ManagedObjectRef) -> CommandOutcome {
    CommandOutcome::Created {
        kind,
        name: name.to_string(),
        moref,
    }
}

fn removed(kind: EntityKind, name: &str, morefs: Vec<ManagedObjectRef>) -> CommandOutcome {
    CommandOutcome::Removed {
        kind,
        name: name.to_string(),
        morefs,
    }
}
