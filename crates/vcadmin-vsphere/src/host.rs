//! Host attachment.

use crate::api::InventoryApi;
use crate::error::{VmwareErrorKind, VmwareResult};
use crate::resolve::{require_non_empty, resolve_one};
use crate::types::*;

/// Host operations.
pub struct HostManager<'a, A: InventoryApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: InventoryApi + ?Sized> HostManager<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Attach `host` to the cluster named `cluster`, forcing the add.
    ///
    /// A forced add also accepts the host certificate: when vCenter answers
    /// with an untrusted-certificate fault carrying a thumbprint, the add is
    /// issued once more pinned to that thumbprint.
    pub async fn add_host_to_cluster(
        &self,
        host: &str,
        username: &str,
        password: &str,
        cluster: &str,
    ) -> VmwareResult<ManagedObjectRef> {
        require_non_empty("host", host)?;
        require_non_empty("username", username)?;
        require_non_empty("password", password)?;
        require_non_empty("cluster", cluster)?;

        let target = resolve_one(self.api, EntityKind::Cluster, cluster).await?;

        let mut spec = HostConnectSpec {
            host_name: host.to_string(),
            port: None,
            user_name: username.to_string(),
            password: password.to_string(),
            force: true,
            ssl_thumbprint: None,
        };

        let first = self.api.add_host(&target.moref, &spec).await;
        let added = match first {
            Err(e) => match e.kind {
                VmwareErrorKind::CertificateError(Some(ref thumbprint)) => {
                    log::warn!("Accepting certificate of {host} with thumbprint {thumbprint}");
                    spec.ssl_thumbprint = Some(thumbprint.clone());
                    self.api.add_host(&target.moref, &spec).await?
                }
                _ => return Err(e),
            },
            Ok(moref) => moref,
        };

        log::info!("Added host {host} to cluster {cluster} ({added})");
        Ok(added)
    }
}
