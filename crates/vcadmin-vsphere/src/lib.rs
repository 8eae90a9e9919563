//! # vcadmin – vCenter inventory administration
//!
//! Lookup-then-mutate operations against a vCenter server: attach hosts
//! to clusters, create / remove clusters and datacenters, create a
//! distributed switch with a port group, remove distributed switches and
//! port groups.
//!
//! ## Modules
//!
//! - **types** — Shared data structures (handles, specs, config, tasks)
//! - **error** — Crate-specific error types
//! - **vsphere** — HTTP client with session-based auth (REST + VI/JSON)
//! - **vim** — vim25 fault mapping, task waiting, container-view lookups
//! - **api** — `InventoryApi` trait and its vCenter binding
//! - **simulated** — In-memory `InventoryApi` backend
//! - **resolve** — Input validation and resolve-then-act helpers
//! - **host** — Host attachment
//! - **cluster** — Cluster create / remove
//! - **datacenter** — Datacenter create / remove
//! - **network** — Distributed switches and port groups
//! - **service** — Aggregate facade owning the session

pub mod types;
pub mod error;
pub mod vsphere;
pub mod vim;
pub mod api;
pub mod simulated;
pub mod resolve;
pub mod host;
pub mod cluster;
pub mod datacenter;
pub mod network;
pub mod service;

#[cfg(test)]
mod test_server;

pub use api::InventoryApi;
pub use error::{VmwareError, VmwareErrorKind, VmwareResult};
pub use service::{VsphereAdminService, VsphereAdminServiceState};
