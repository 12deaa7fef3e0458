//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the ledger:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key          | Type      | Description                          |
//! |--------------|-----------|--------------------------------------|
//! | `Factory`    | `Address` | Unit-holder factory collaborator     |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//! Role storage also lives in the instance tier, under `RbacKey` in `rbac.rs`.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                          | Type           | Description                               |
//! |------------------------------|----------------|-------------------------------------------|
//! | `BatchConfig(batch)`         | `BatchConfig`  | Immutable batch configuration             |
//! | `BatchState(batch)`          | `BatchState`   | Mutable batch state                       |
//! | `Supply(project, commodity)` | `i128`         | Aggregate supply of the group             |
//! | `ProjectList`                | `Vec<String>`  | Every project with at least one batch     |
//! | `CommodityList(project)`     | `Vec<String>`  | Commodities under a project               |
//! | `BatchList(project, commodity)` | `Vec<Address>` | Batch ids under a group                |
//! | `UsedToken(project, commodity, token)` | `bool` | Consumed uniqueness tokens          |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! ## Why split Config and State?
//!
//! Mints and burns are the high-frequency writes. Rewriting the grouping
//! keys and unit-holder binding on every supply change is wasteful, and
//! keeping them in a write-once entry also makes the "grouping never
//! changes after creation" invariant structural rather than procedural.

use soroban_sdk::{contracttype, panic_with_error, Address, Env, String, Vec};

use crate::types::{Batch, BatchConfig, BatchState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
///
/// The instance-tier `Factory` key lives as long as the contract.
/// Persistent-tier keys hold per-batch and per-group data with
/// independent TTLs.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Unit-holder factory collaborator address (Instance).
    Factory,
    /// Immutable batch configuration keyed by batch id (Persistent).
    BatchConfig(Address),
    /// Mutable batch state keyed by batch id (Persistent).
    BatchState(Address),
    /// Aggregate supply per (project, commodity) (Persistent).
    Supply(String, String),
    /// Discovery index: all known projects (Persistent).
    ProjectList,
    /// Discovery index: commodities per project (Persistent).
    CommodityList(String),
    /// Discovery index: batch ids per (project, commodity) (Persistent).
    BatchList(String, String),
    /// Consumed uniqueness tokens per (project, commodity) (Persistent).
    UsedToken(String, String, String),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
pub(crate) fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Return `true` once `init` has bound the factory collaborator.
pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Factory)
}

/// Bind the unit-holder factory collaborator address.
pub fn set_factory(env: &Env, factory: &Address) {
    env.storage().instance().set(&DataKey::Factory, factory);
    bump_instance(env);
}

/// Retrieve the bound factory address.
/// Panics with `NotInitialized` if `init` has not run.
pub fn get_factory(env: &Env) -> Address {
    bump_instance(env);
    match env.storage().instance().get(&DataKey::Factory) {
        Some(factory) => factory,
        None => panic_with_error!(env, Error::NotInitialized),
    }
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save both the immutable config and initial mutable state for a new batch.
pub fn save_batch(env: &Env, batch: &Batch) {
    let config_key = DataKey::BatchConfig(batch.unit_holder.clone());
    let state_key = DataKey::BatchState(batch.unit_holder.clone());

    let config = BatchConfig {
        unit_holder: batch.unit_holder.clone(),
        project: batch.project.clone(),
        commodity: batch.commodity.clone(),
        vintage: batch.vintage,
    };

    let state = BatchState {
        owner: batch.owner.clone(),
        supply: batch.supply,
        delivery_year: batch.delivery_year,
        delivery_estimate: batch.delivery_estimate.clone(),
        uri: batch.uri.clone(),
        updated_at: batch.updated_at,
    };

    env.storage().persistent().set(&config_key, &config);
    env.storage().persistent().set(&state_key, &state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full [`Batch`] by combining config and state.
/// Panics with `BatchNotFound` if the batch was never registered.
pub fn load_batch(env: &Env, batch_id: &Address) -> Batch {
    let config = load_batch_config(env, batch_id);
    let state = load_batch_state(env, batch_id);
    Batch {
        unit_holder: config.unit_holder,
        project: config.project,
        commodity: config.commodity,
        vintage: config.vintage,
        owner: state.owner,
        supply: state.supply,
        delivery_year: state.delivery_year,
        delivery_estimate: state.delivery_estimate,
        uri: state.uri,
        updated_at: state.updated_at,
    }
}

/// Load only the immutable batch configuration.
pub fn load_batch_config(env: &Env, batch_id: &Address) -> BatchConfig {
    let key = DataKey::BatchConfig(batch_id.clone());
    let config: BatchConfig = match env.storage().persistent().get(&key) {
        Some(config) => config,
        None => panic_with_error!(env, Error::BatchNotFound),
    };
    bump_persistent(env, &key);
    config
}

/// Load only the mutable batch state.
pub fn load_batch_state(env: &Env, batch_id: &Address) -> BatchState {
    let key = DataKey::BatchState(batch_id.clone());
    let state: BatchState = match env.storage().persistent().get(&key) {
        Some(state) => state,
        None => panic_with_error!(env, Error::BatchNotFound),
    };
    bump_persistent(env, &key);
    state
}

/// Return `true` if a batch is registered, without panicking.
pub fn has_batch(env: &Env, batch_id: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::BatchState(batch_id.clone()))
}

/// Save only the mutable batch state (the mint/burn/update fast path).
pub fn save_batch_state(env: &Env, batch_id: &Address, state: &BatchState) {
    let key = DataKey::BatchState(batch_id.clone());
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

// ── Aggregate Supply ─────────────────────────────────────────────────

/// Aggregate supply of a (project, commodity) group. Zero when no batch
/// under the group has ever been created.
pub fn get_group_supply(env: &Env, project: &String, commodity: &String) -> i128 {
    let key = DataKey::Supply(project.clone(), commodity.clone());
    let supply = env.storage().persistent().get(&key).unwrap_or(0i128);
    if env.storage().persistent().has(&key) {
        bump_persistent(env, &key);
    }
    supply
}

/// Apply `delta` to the group's aggregate supply and return the new value.
///
/// Callers must have validated the delta already (positive for mints and
/// creation, never driving the aggregate below zero for burns).
pub fn add_group_supply(env: &Env, project: &String, commodity: &String, delta: i128) -> i128 {
    let key = DataKey::Supply(project.clone(), commodity.clone());
    let current: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    let updated = current + delta;
    env.storage().persistent().set(&key, &updated);
    bump_persistent(env, &key);
    updated
}

// ── Discovery Indices ────────────────────────────────────────────────

/// Every project with at least one batch, in creation order.
pub fn get_project_list(env: &Env) -> Vec<String> {
    let key = DataKey::ProjectList;
    let list: Vec<String> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));
    if env.storage().persistent().has(&key) {
        bump_persistent(env, &key);
    }
    list
}

/// Commodities under a project, in creation order.
pub fn get_commodity_list(env: &Env, project: &String) -> Vec<String> {
    let key = DataKey::CommodityList(project.clone());
    let list: Vec<String> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));
    if env.storage().persistent().has(&key) {
        bump_persistent(env, &key);
    }
    list
}

/// Batch ids under a (project, commodity) group, in creation order.
pub fn get_batch_list(env: &Env, project: &String, commodity: &String) -> Vec<Address> {
    let key = DataKey::BatchList(project.clone(), commodity.clone());
    let list: Vec<Address> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));
    if env.storage().persistent().has(&key) {
        bump_persistent(env, &key);
    }
    list
}

/// Register a new batch in the discovery indices: append the batch id to
/// its group, and make the commodity and project discoverable if this is
/// the first batch under them.
pub fn index_batch(env: &Env, project: &String, commodity: &String, batch_id: &Address) {
    let mut projects = get_project_list(env);
    if !projects.contains(project) {
        projects.push_back(project.clone());
        let key = DataKey::ProjectList;
        env.storage().persistent().set(&key, &projects);
        bump_persistent(env, &key);
    }

    let mut commodities = get_commodity_list(env, project);
    if !commodities.contains(commodity) {
        commodities.push_back(commodity.clone());
        let key = DataKey::CommodityList(project.clone());
        env.storage().persistent().set(&key, &commodities);
        bump_persistent(env, &key);
    }

    let mut batches = get_batch_list(env, project, commodity);
    batches.push_back(batch_id.clone());
    let key = DataKey::BatchList(project.clone(), commodity.clone());
    env.storage().persistent().set(&key, &batches);
    bump_persistent(env, &key);
}

// ── Uniqueness Tokens ────────────────────────────────────────────────

/// Whether a uniqueness token has been consumed for the group.
pub fn is_token_used(env: &Env, project: &String, commodity: &String, token: &String) -> bool {
    env.storage().persistent().has(&DataKey::UsedToken(
        project.clone(),
        commodity.clone(),
        token.clone(),
    ))
}

/// Consume a uniqueness token for the group. Irreversible.
pub fn mark_token_used(env: &Env, project: &String, commodity: &String, token: &String) {
    let key = DataKey::UsedToken(project.clone(), commodity.clone(), token.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}
