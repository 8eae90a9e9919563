//! Aggregate service façade.
//!
//! `VsphereAdminService` owns the session (`VsphereClient`). Inventory
//! operations run through the managers against `client()`. Callers that
//! share it across tasks hold
//! `VsphereAdminServiceState = Arc<Mutex<VsphereAdminService>>`.

use crate::error::{VmwareError, VmwareResult};
use crate::types::{VsphereConfig, VsphereConfigSafe};
use crate::vsphere::VsphereClient;

use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle.
pub type VsphereAdminServiceState = Arc<Mutex<VsphereAdminService>>;

/// Top-level service over one vCenter session.
#[derive(Default)]
pub struct VsphereAdminService {
    client: Option<VsphereClient>,
    config: Option<VsphereConfig>,
}

impl VsphereAdminService {
    /// Create a new (disconnected) service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new (disconnected) service wrapped for sharing.
    pub fn new_state() -> VsphereAdminServiceState {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Whether we have an active vSphere session.
    pub fn is_connected(&self) -> bool {
        self.client
            .as_ref()
            .map(|c| c.is_connected())
            .unwrap_or(false)
    }

    /// The connected client, for callers that drive the managers directly.
    pub fn client(&self) -> VmwareResult<&VsphereClient> {
        self.client
            .as_ref()
            .filter(|c| c.is_connected())
            .ok_or_else(|| VmwareError::connection("Not connected to vCenter. Connect first."))
    }

    // ── Connection ──────────────────────────────────────────────────

    /// Connect to a vCenter server.
    pub async fn connect(&mut self, config: VsphereConfig) -> VmwareResult<String> {
        let mut client = VsphereClient::new(&config)?;
        let session = client.login().await?;
        self.config = Some(config);
        self.client = Some(client);
        Ok(session)
    }

    /// Disconnect from vCenter.
    pub async fn disconnect(&mut self) -> VmwareResult<()> {
        if let Some(ref mut client) = self.client {
            client.logout().await?;
        }
        self.client = None;
        self.config = None;
        Ok(())
    }

    /// Check if the session is still valid.
    pub async fn check_session(&self) -> VmwareResult<bool> {
        match self.client {
            Some(ref client) if client.is_connected() => client.check_session().await,
            _ => Ok(false),
        }
    }

    /// Get current config (without password).
    pub fn get_config(&self) -> Option<VsphereConfigSafe> {
        self.config.as_ref().map(VsphereConfigSafe::from)
    }
}
