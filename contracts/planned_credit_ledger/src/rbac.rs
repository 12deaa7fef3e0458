//! # Role-Based Access Control
//!
//! Two-level role hierarchy gating every mutation of the ledger:
//!
//! - [`Role::SuperAdmin`] — a single account; administers the role table
//!   itself (grants and revokes `Manager`) and may upgrade the contract.
//!   Moved only through [`transfer_super_admin`].
//! - [`Role::Manager`] — day-to-day operations: batch creation, mints,
//!   burns, metadata updates, and bulk transfers.
//!
//! Every mutating entry point calls one of the `require_*` guards before
//! reading or writing any other state, so an unauthorized call fails
//! before it can touch the registry.
//!
//! Role storage lives in the instance tier under [`RbacKey`], separate
//! from the ledger's own `DataKey` space.

use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::events;
use crate::storage::bump_instance;
use crate::Error;

/// Authorization levels recognised by the ledger.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// Administers the role table and the upgrade surface.
    SuperAdmin,
    /// Operates the batch registry.
    Manager,
}

/// Role storage keys (instance tier).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum RbacKey {
    /// The one account currently holding [`Role::SuperAdmin`].
    SuperAdmin,
    /// Role held by an account, if any.
    Role(Address),
}

/// Bind the first SuperAdmin. Must be called exactly once.
/// Panics with `AlreadyInitialized` on any later call.
pub fn init_super_admin(env: &Env, super_admin: &Address) {
    if env.storage().instance().has(&RbacKey::SuperAdmin) {
        panic_with_error!(env, Error::AlreadyInitialized);
    }
    env.storage()
        .instance()
        .set(&RbacKey::SuperAdmin, super_admin);
    env.storage()
        .instance()
        .set(&RbacKey::Role(super_admin.clone()), &Role::SuperAdmin);
    bump_instance(env);
    events::emit_role_set(env, super_admin, Role::SuperAdmin, super_admin);
}

/// Grant `role` to `target`.
///
/// `caller` must authorize and hold `SuperAdmin`. The `SuperAdmin` role
/// itself cannot be granted here; it only moves via
/// [`transfer_super_admin`].
pub fn grant_role(env: &Env, caller: &Address, target: &Address, role: Role) {
    caller.require_auth();
    require_super_admin(env, caller);
    if role == Role::SuperAdmin {
        panic_with_error!(env, Error::Unauthorized);
    }
    env.storage()
        .instance()
        .set(&RbacKey::Role(target.clone()), &role);
    bump_instance(env);
    events::emit_role_set(env, target, role, caller);
}

/// Revoke `role` from `target`.
///
/// `caller` must authorize and hold `SuperAdmin`. Panics with
/// `RoleNotFound` when `target` does not currently hold `role`.
/// The `SuperAdmin` role cannot be revoked, only transferred.
pub fn revoke_role(env: &Env, caller: &Address, target: &Address, role: Role) {
    caller.require_auth();
    require_super_admin(env, caller);
    if role == Role::SuperAdmin {
        panic_with_error!(env, Error::Unauthorized);
    }
    match role_of(env, target) {
        Some(held) if held == role => {
            env.storage()
                .instance()
                .remove(&RbacKey::Role(target.clone()));
        }
        _ => panic_with_error!(env, Error::RoleNotFound),
    }
    bump_instance(env);
    events::emit_role_del(env, target, role, caller);
}

/// Move `SuperAdmin` from the current holder to `new_super_admin`.
/// The previous holder loses the role in the same operation.
pub fn transfer_super_admin(env: &Env, current: &Address, new_super_admin: &Address) {
    current.require_auth();
    require_super_admin(env, current);
    env.storage()
        .instance()
        .remove(&RbacKey::Role(current.clone()));
    env.storage()
        .instance()
        .set(&RbacKey::SuperAdmin, new_super_admin);
    env.storage()
        .instance()
        .set(&RbacKey::Role(new_super_admin.clone()), &Role::SuperAdmin);
    bump_instance(env);
    events::emit_role_del(env, current, Role::SuperAdmin, current);
    events::emit_role_set(env, new_super_admin, Role::SuperAdmin, current);
}

/// Return the role held by `address`, or `None`.
pub fn role_of(env: &Env, address: &Address) -> Option<Role> {
    env.storage()
        .instance()
        .get(&RbacKey::Role(address.clone()))
}

/// Return `true` if `address` holds exactly `role`.
pub fn has_role(env: &Env, address: &Address, role: Role) -> bool {
    role_of(env, address) == Some(role)
}

/// Guard for registry mutations: `Manager` or `SuperAdmin`.
pub fn require_manager_or_above(env: &Env, address: &Address) {
    match role_of(env, address) {
        Some(Role::Manager) | Some(Role::SuperAdmin) => {}
        _ => panic_with_error!(env, Error::Unauthorized),
    }
}

/// Guard for role administration and upgrades: `SuperAdmin` only.
pub fn require_super_admin(env: &Env, address: &Address) {
    let stored: Option<Address> = env.storage().instance().get(&RbacKey::SuperAdmin);
    match stored {
        Some(admin) if admin == *address => {}
        _ => panic_with_error!(env, Error::Unauthorized),
    }
}
