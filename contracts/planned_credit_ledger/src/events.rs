//! # Events
//!
//! Typed event payloads and emit helpers for every ledger mutation.
//!
//! Supply-changing events ([`BatchCreated`], [`UnitsMinted`], [`UnitsBurned`])
//! carry the post-operation batch supply and group aggregate supply, so an
//! off-chain observer can reconstruct the full supply ledger from the event
//! stream alone, without ever querying the contract.
//!
//! Topic layout:
//!
//! | Topic 0     | Topic 1+            | Data                |
//! |-------------|---------------------|---------------------|
//! | `created`   | batch id            | [`BatchCreated`]    |
//! | `minted`    | batch id            | [`UnitsMinted`]     |
//! | `burned`    | batch id            | [`UnitsBurned`]     |
//! | `updated`   | batch id, field     | [`BatchUpdated`]    |
//! | `xfer`      | batch id            | [`BulkTransferLeg`] |
//! | `role_set`  | target, role symbol | granting caller     |
//! | `role_del`  | target, role symbol | revoking caller     |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol};

use crate::rbac::Role;

/// Field symbols for the `updated` topic.
pub const FIELD_DELIVERY_YEAR: Symbol = symbol_short!("d_year");
pub const FIELD_DELIVERY_ESTIMATE: Symbol = symbol_short!("estimate");
pub const FIELD_URI: Symbol = symbol_short!("uri");

/// A batch was created and its initial supply issued.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchCreated {
    pub project: String,
    pub commodity: String,
    pub owner: Address,
    pub vintage: u32,
    pub initial_supply: i128,
    /// Group aggregate supply after this creation.
    pub aggregate_supply: i128,
}

/// Additional units were minted against an existing batch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitsMinted {
    pub project: String,
    pub commodity: String,
    pub receiver: Address,
    pub amount: i128,
    /// Batch supply after the mint.
    pub batch_supply: i128,
    /// Group aggregate supply after the mint.
    pub aggregate_supply: i128,
}

/// Units were burned from a batch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitsBurned {
    pub project: String,
    pub commodity: String,
    pub owner: Address,
    pub amount: i128,
    /// Batch supply after the burn.
    pub batch_supply: i128,
    /// Group aggregate supply after the burn.
    pub aggregate_supply: i128,
}

/// A batch metadata field was overwritten. No supply side effects.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchUpdated {
    pub project: String,
    pub commodity: String,
    pub updated_at: u64,
}

/// One leg of a bulk transfer. Ownership moved; supply conserved.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BulkTransferLeg {
    pub from: Address,
    pub to: Address,
    pub amount: i128,
}

pub fn emit_batch_created(env: &Env, batch_id: &Address, data: BatchCreated) {
    env.events()
        .publish((symbol_short!("created"), batch_id.clone()), data);
}

pub fn emit_units_minted(env: &Env, batch_id: &Address, data: UnitsMinted) {
    env.events()
        .publish((symbol_short!("minted"), batch_id.clone()), data);
}

pub fn emit_units_burned(env: &Env, batch_id: &Address, data: UnitsBurned) {
    env.events()
        .publish((symbol_short!("burned"), batch_id.clone()), data);
}

pub fn emit_batch_updated(env: &Env, batch_id: &Address, field: Symbol, data: BatchUpdated) {
    env.events()
        .publish((symbol_short!("updated"), batch_id.clone(), field), data);
}

pub fn emit_transfer_leg(env: &Env, batch_id: &Address, data: BulkTransferLeg) {
    env.events()
        .publish((symbol_short!("xfer"), batch_id.clone()), data);
}

pub fn emit_role_set(env: &Env, target: &Address, role: Role, caller: &Address) {
    env.events().publish(
        (symbol_short!("role_set"), target.clone(), role_symbol(role)),
        caller.clone(),
    );
}

pub fn emit_role_del(env: &Env, target: &Address, role: Role, caller: &Address) {
    env.events().publish(
        (symbol_short!("role_del"), target.clone(), role_symbol(role)),
        caller.clone(),
    );
}

fn role_symbol(role: Role) -> Symbol {
    match role {
        Role::SuperAdmin => symbol_short!("s_admin"),
        Role::Manager => symbol_short!("manager"),
    }
}
