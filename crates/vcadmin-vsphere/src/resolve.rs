//! Input validation and resolve-then-act helpers shared by the managers.

use crate::api::InventoryApi;
use crate::error::{VmwareError, VmwareResult};
use crate::types::*;

/// Reject empty or whitespace-only required parameters. The value is
/// passed on untouched.
pub fn require_non_empty<'v>(field: &str, value: &'v str) -> VmwareResult<&'v str> {
    if value.trim().is_empty() {
        return Err(VmwareError::invalid_argument(format!("{field} must not be empty")));
    }
    Ok(value)
}

/// Resolve `name` to every matching object; at least one must exist.
pub async fn resolve_all<A: InventoryApi + ?Sized>(
    api: &A,
    kind: EntityKind,
    name: &str,
) -> VmwareResult<Vec<InventoryObject>> {
    let found = api.find(kind, name).await?;
    if found.is_empty() {
        return Err(VmwareError::not_found(format!("{kind} '{name}' not found")));
    }
    Ok(found)
}

/// Resolve `name` to exactly one object.
pub async fn resolve_one<A: InventoryApi + ?Sized>(
    api: &A,
    kind: EntityKind,
    name: &str,
) -> VmwareResult<InventoryObject> {
    let mut found = resolve_all(api, kind, name).await?;
    if found.len() > 1 {
        let ids: Vec<String> = found.iter().map(|o| o.moref.value.clone()).collect();
        return Err(VmwareError::ambiguous(format!(
            "{kind} '{name}' matches {} objects ({})",
            found.len(),
            ids.join(", ")
        )));
    }
    Ok(found.remove(0))
}

/// Destroy every object in `targets`, in order, without confirmation.
/// Stops at the first failure.
pub async fn destroy_all<A: InventoryApi + ?Sized>(
    api: &A,
    targets: &[InventoryObject],
) -> VmwareResult<Vec<ManagedObjectRef>> {
    let mut removed = Vec::with_capacity(targets.len());
    for target in targets {
        api.destroy(&target.moref, &DestroyOptions::UNCONFIRMED).await?;
        log::info!("Removed {} ({})", target.name, target.moref);
        removed.push(target.moref.clone());
    }
    Ok(removed)
}
