//! vim25 plumbing over VI/JSON: fault mapping, task waiting, and
//! container-view lookups for object types the REST API does not list.

use crate::error::{VmwareError, VmwareErrorKind, VmwareResult};
use crate::types::*;
use crate::vsphere::VsphereClient;

use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

/// Floor for the task poll interval, so a zero setting does not spin.
pub const MIN_TASK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Well-known handle of the `ServiceInstance` singleton.
fn service_instance() -> ManagedObjectRef {
    ManagedObjectRef::new("ServiceInstance", "ServiceInstance")
}

/// Subset of `ServiceContent` needed here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceContent {
    pub root_folder: ManagedObjectRef,
    pub view_manager: ManagedObjectRef,
}

/// Encode a handle the way VI/JSON expects it in request bodies.
pub fn moref_json(moref: &ManagedObjectRef) -> Value {
    json!({
        "_typeName": "ManagedObjectReference",
        "type": moref.r#type,
        "value": moref.value,
    })
}

/// Map a vim25 fault object (`{"_typeName": "DuplicateName", ...}`) onto
/// the crate error taxonomy.
pub fn fault_to_error(fault: &Value, localized: Option<&str>) -> VmwareError {
    let type_name = fault
        .get("_typeName")
        .and_then(Value::as_str)
        .unwrap_or("MethodFault");
    let message = localized
        .map(str::to_string)
        .or_else(|| {
            fault
                .get("faultMessage")
                .and_then(Value::as_array)
                .and_then(|msgs| msgs.first())
                .and_then(|m| m.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("vCenter reported {type_name}"));
    let message = format!("{type_name}: {message}");

    let kind = match type_name {
        "DuplicateName" => VmwareErrorKind::NameCollision,
        "ManagedObjectNotFound" | "NotFound" => VmwareErrorKind::NotFound,
        "InvalidLogin" | "NotAuthenticated" => VmwareErrorKind::AuthenticationError,
        "HostConnectFault" if is_login_fault(fault) => VmwareErrorKind::AuthenticationError,
        "AlreadyConnected" | "AlreadyBeingManaged" => VmwareErrorKind::Conflict,
        "ResourceInUse" | "InvalidState" => VmwareErrorKind::PreconditionFailed,
        "NoPermission" => VmwareErrorKind::AccessDenied,
        "SSLVerifyFault" => VmwareErrorKind::CertificateError(
            fault
                .get("thumbprint")
                .and_then(Value::as_str)
                .map(str::to_string),
        ),
        "InvalidArgument" | "InvalidName" => VmwareErrorKind::InvalidArgument,
        _ => VmwareErrorKind::TaskError,
    };
    VmwareError::new(kind, message)
}

/// `HostConnectFault` is generic; it only means bad credentials when the
/// nested fault says so.
fn is_login_fault(fault: &Value) -> bool {
    fault
        .get("faultCause")
        .and_then(|c| c.get("_typeName"))
        .and_then(Value::as_str)
        == Some("InvalidLogin")
}

fn task_poll_interval(config: &VsphereConfig) -> Duration {
    Duration::from_millis(config.task_poll_interval_ms).max(MIN_TASK_POLL_INTERVAL)
}

/// `None` when the timeout is too large to represent: wait without limit.
fn task_deadline(config: &VsphereConfig, start: Instant) -> Option<Instant> {
    start.checked_add(Duration::from_secs(config.task_timeout_secs))
}

/// Convert a failed `TaskInfo` into an error.
fn task_error(info: &TaskInfo) -> VmwareError {
    match info.error {
        Some(ref err) => match err.fault {
            Some(ref fault) => fault_to_error(fault, err.localized_message.as_deref()),
            None => VmwareError::task(
                err.localized_message
                    .clone()
                    .unwrap_or_else(|| "task failed without a fault".to_string()),
            ),
        },
        None => VmwareError::task("task failed without error details"),
    }
}

impl VsphereClient {
    /// Fetch the `ServiceContent` of the connected vCenter.
    pub async fn service_content(&self) -> VmwareResult<ServiceContent> {
        self.vim_property(&service_instance(), "content").await
    }

    /// Poll a vCenter task until it finishes; returns its `result`.
    pub async fn wait_for_task(&self, task: &ManagedObjectRef) -> VmwareResult<Option<Value>> {
        let poll = task_poll_interval(self.config());
        let deadline = task_deadline(self.config(), Instant::now());

        loop {
            let info: TaskInfo = self.vim_property(task, "info").await?;
            match info.state {
                TaskState::Success => {
                    if let (Some(start), Some(end)) = (info.start_time, info.complete_time) {
                        log::debug!(
                            "Task {} finished in {} ms",
                            task.value,
                            (end - start).num_milliseconds()
                        );
                    }
                    return Ok(info.result);
                }
                TaskState::Error => return Err(task_error(&info)),
                TaskState::Queued | TaskState::Running => {
                    log::trace!(
                        "Task {} {:?} ({}%)",
                        task.value,
                        info.state,
                        info.progress.unwrap_or(0)
                    );
                }
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(VmwareError::timeout(format!(
                    "Task {} did not finish within {} s",
                    task.value,
                    self.config().task_timeout_secs
                )));
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Invoke a `*_Task` method and wait for it.
    pub async fn run_task(
        &self,
        moref: &ManagedObjectRef,
        method: &str,
        body: Option<&Value>,
    ) -> VmwareResult<Option<Value>> {
        let task: ManagedObjectRef = self.vim_invoke(moref, method, body).await?;
        self.wait_for_task(&task).await
    }

    /// Invoke a `*_Task` method whose result is a managed object.
    pub async fn run_task_for_moref(
        &self,
        moref: &ManagedObjectRef,
        method: &str,
        body: Option<&Value>,
    ) -> VmwareResult<ManagedObjectRef> {
        let result = self.run_task(moref, method, body).await?;
        let value = result.ok_or_else(|| {
            VmwareError::parse(format!("{method} finished without a result object"))
        })?;
        Ok(serde_json::from_value(value)?)
    }

    /// Find every object of a vim25 type with the given name, via a
    /// recursive container view on the root folder.
    pub async fn find_in_container_view(
        &self,
        managed_type: &str,
        name: &str,
    ) -> VmwareResult<Vec<InventoryObject>> {
        let content = self.service_content().await?;
        let body = json!({
            "container": moref_json(&content.root_folder),
            "type": [managed_type],
            "recursive": true,
        });
        let view: ManagedObjectRef = self
            .vim_invoke(&content.view_manager, "CreateContainerView", Some(&body))
            .await?;

        let found = self.collect_named(&view, name).await;

        if let Err(e) = self.vim_invoke::<Value>(&view, "DestroyView", None).await {
            log::warn!("Failed to destroy container view {}: {e}", view.value);
        }
        found
    }

    async fn collect_named(
        &self,
        view: &ManagedObjectRef,
        name: &str,
    ) -> VmwareResult<Vec<InventoryObject>> {
        let members: Vec<ManagedObjectRef> = self.vim_property(view, "view").await?;
        let mut hits = Vec::new();
        for moref in members {
            let obj_name: String = self.vim_property(&moref, "name").await?;
            if obj_name == name {
                hits.push(InventoryObject { name: obj_name, moref });
            }
        }
        Ok(hits)
    }
}
