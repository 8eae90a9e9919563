//! Distributed switch and distributed port group operations.

use crate::api::InventoryApi;
use crate::error::{VmwareError, VmwareResult};
use crate::resolve::{destroy_all, require_non_empty, resolve_all, resolve_one};
use crate::types::*;

/// Distributed networking operations.
pub struct NetworkManager<'a, A: InventoryApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: InventoryApi + ?Sized> NetworkManager<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Create switch `switch` in datacenter `datacenter`, then port group
    /// `port_group` on it with `ports` ports (default 1000).
    ///
    /// The two creations are not atomic. If the port group fails, the
    /// switch stays and the error is a `PartialFailure` naming it.
    pub async fn create_switch_and_port_group(
        &self,
        port_group: &str,
        switch: &str,
        datacenter: &str,
        ports: Option<u32>,
    ) -> VmwareResult<SwitchAndPortGroup> {
        require_non_empty("port group", port_group)?;
        require_non_empty("switch", switch)?;
        require_non_empty("datacenter", datacenter)?;
        let num_ports = ports.unwrap_or(DEFAULT_PORT_COUNT);
        if num_ports == 0 {
            return Err(VmwareError::invalid_argument("port count must be at least 1"));
        }

        let dc = resolve_one(self.api, EntityKind::Datacenter, datacenter).await?;

        let dvs = self.api.create_distributed_switch(&dc.moref, switch).await?;
        log::info!("Created distributed switch {switch} in {datacenter} ({dvs})");

        let spec = PortGroupCreateSpec::new(port_group, num_ports);
        let pg = match self.api.create_port_group(&dvs, &spec).await {
            Ok(pg) => pg,
            Err(e) => {
                log::warn!("Port group {port_group} failed; switch {switch} ({dvs}) was left in place");
                return Err(VmwareError::partial(
                    format!("distributed switch '{switch}' ({dvs}) was created but port group '{port_group}' was not"),
                    e,
                ));
            }
        };
        log::info!("Created port group {port_group} with {num_ports} ports on {switch} ({pg})");

        Ok(SwitchAndPortGroup {
            switch: dvs,
            port_group: pg,
        })
    }

    /// Delete every distributed switch named `name`.
    pub async fn remove_distributed_switch(&self, name: &str) -> VmwareResult<Vec<ManagedObjectRef>> {
        require_non_empty("name", name)?;
        let targets = resolve_all(self.api, EntityKind::DistributedSwitch, name).await?;
        destroy_all(self.api, &targets).await
    }

    /// Delete every distributed port group named `name`.
    pub async fn remove_port_group(&self, name: &str) -> VmwareResult<Vec<ManagedObjectRef>> {
        require_non_empty("name", name)?;
        let targets = resolve_all(self.api, EntityKind::DistributedPortGroup, name).await?;
        destroy_all(self.api, &targets).await
    }
}
