//! # Planned-Credit Ledger Contract
//!
//! This is the root crate of the **planned-credit batch ledger**. It exposes
//! the single Soroban contract `PlannedCreditLedger`, which tracks issuance
//! and transfer of forward credit units organised by project and commodity
//! and subdivided into owner-held batches:
//!
//! | Phase          | Entry Point(s)                                          |
//! |----------------|---------------------------------------------------------|
//! | Bootstrap      | [`PlannedCreditLedger::init`], `upgrade`                |
//! | Role admin     | `grant_role`, `revoke_role`, `transfer_super_admin`     |
//! | Batch registry | [`PlannedCreditLedger::create_batch`], `mint_more_in_a_batch`, `burn_from_a_batch`, metadata updates |
//! | Bulk transfer  | [`PlannedCreditLedger::many_to_many_batch_transfer`]    |
//! | Queries        | `get_project_list`, `get_commodity_list_for_a_project`, `get_batch_list_for_a_commodity_in_a_project`, `get_batch_details`, `get_project_commodity_total_supply`, `role_of`, `has_role` |
//!
//! ## Architecture
//!
//! Authorization is fully delegated to [`rbac`]. Storage access is fully
//! delegated to [`storage`]. Batch-identifier allocation and validation go
//! through the external factory collaborator via [`factory`]. Per-account
//! balances live in one unit-holder token contract per batch; the ledger
//! only records per-batch and per-group aggregate supply. This file
//! contains **only** the public entry points and event emissions — no
//! business logic lives here directly.
//!
//! ## Atomicity
//!
//! Every entry point checks authorization first, then validates, then
//! writes registry state, and only then invokes the unit holder. Any
//! failure — a failed check here or a rejection by a collaborator —
//! panics, and the host reverts every storage write and sub-call of the
//! invocation, so partial mutations are never observable.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, BytesN, Env, String,
    Vec,
};

pub mod events;
pub mod factory;
pub mod rbac;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_bulk_transfer;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod testutils;

pub use rbac::Role;
pub use types::{Batch, UnitHolderOrigin};

use storage::{
    add_group_supply, get_batch_list, get_commodity_list, get_factory, get_group_supply,
    get_project_list, has_batch, index_batch, is_initialized, is_token_used, load_batch,
    load_batch_state, mark_token_used, save_batch, save_batch_state, set_factory,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Caller does not hold the role required for the operation.
    Unauthorized = 1,
    /// Uniqueness token already consumed for this (project, commodity).
    DuplicateBatch = 2,
    /// Batch identifier is not registered under the claimed group.
    BatchNotFound = 3,
    /// The factory does not recognise the batch identifier, or resolves
    /// it to a different (project, commodity) pair.
    UnknownBatch = 4,
    /// Burn amount exceeds the batch's recorded supply.
    InsufficientSupply = 5,
    /// Bulk transfer input vectors have unequal lengths.
    LengthMismatch = 6,
    /// `init` was already called.
    AlreadyInitialized = 7,
    /// `init` has not been called yet.
    NotInitialized = 8,
    /// Amount must be positive (or non-negative at creation).
    InvalidAmount = 9,
    /// Revocation target does not hold the named role.
    RoleNotFound = 10,
}

#[contract]
pub struct PlannedCreditLedger;

#[contractimpl]
impl PlannedCreditLedger {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the ledger: bind the first SuperAdmin and the
    /// unit-holder factory collaborator.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls panic with `Error::AlreadyInitialized`.
    pub fn init(env: Env, super_admin: Address, factory: Address) {
        super_admin.require_auth();
        if is_initialized(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        set_factory(&env, &factory);
        rbac::init_super_admin(&env, &super_admin);
    }

    /// Replace the contract's executable WASM in place; all batch, role,
    /// and supply state is preserved.
    ///
    /// - `caller` must authorize and hold `SuperAdmin`.
    pub fn upgrade(env: Env, caller: Address, new_wasm_hash: BytesN<32>) {
        caller.require_auth();
        rbac::require_super_admin(&env, &caller);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Grant `role` to `target`.
    ///
    /// - `caller` must hold `SuperAdmin`.
    /// - `SuperAdmin` itself cannot be granted; use `transfer_super_admin`.
    pub fn grant_role(env: Env, caller: Address, target: Address, role: Role) {
        rbac::grant_role(&env, &caller, &target, role);
    }

    /// Revoke `role` from `target`.
    ///
    /// - `caller` must hold `SuperAdmin`.
    /// - Panics with `RoleNotFound` if `target` does not hold `role`.
    pub fn revoke_role(env: Env, caller: Address, target: Address, role: Role) {
        rbac::revoke_role(&env, &caller, &target, role);
    }

    /// Transfer SuperAdmin to `new_super_admin`.
    ///
    /// - `current_super_admin` must authorize and hold the role.
    /// - The previous SuperAdmin loses the role immediately.
    pub fn transfer_super_admin(env: Env, current_super_admin: Address, new_super_admin: Address) {
        rbac::transfer_super_admin(&env, &current_super_admin, &new_super_admin);
    }

    /// Return the role held by `address`, or `None`.
    pub fn role_of(env: Env, address: Address) -> Option<Role> {
        rbac::role_of(&env, &address)
    }

    /// Return `true` if `address` holds `role`.
    pub fn has_role(env: Env, address: Address, role: Role) -> bool {
        rbac::has_role(&env, &address, role)
    }

    // ─────────────────────────────────────────────────────────
    // Batch registry
    // ─────────────────────────────────────────────────────────

    /// Create a new batch under (project, commodity) and issue its
    /// initial supply to `owner`.
    ///
    /// The batch identifier is the address of the unit-holder token the
    /// factory deploys for this call; the caller never chooses it. The
    /// caller-chosen `uniqueness_token` is the sole duplicate guard: it
    /// is consumed for the group, and reusing it panics with
    /// `Error::DuplicateBatch` before any state changes.
    ///
    /// - `caller` must authorize and hold `Manager` (or `SuperAdmin`).
    pub fn create_batch(
        env: Env,
        caller: Address,
        project: String,
        commodity: String,
        owner: Address,
        initial_supply: i128,
        delivery_year: u32,
        delivery_estimate: String,
        uri: String,
        uniqueness_token: String,
    ) -> Batch {
        caller.require_auth();
        rbac::require_manager_or_above(&env, &caller);

        if initial_supply < 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        if is_token_used(&env, &project, &commodity, &uniqueness_token) {
            panic_with_error!(&env, Error::DuplicateBatch);
        }

        let factory_addr = get_factory(&env);
        let batch_id = factory::deploy(&env, &factory_addr, &project, &commodity, delivery_year);

        mark_token_used(&env, &project, &commodity, &uniqueness_token);

        let batch = Batch {
            unit_holder: batch_id.clone(),
            project: project.clone(),
            commodity: commodity.clone(),
            vintage: delivery_year,
            owner: owner.clone(),
            supply: initial_supply,
            delivery_year,
            delivery_estimate,
            uri,
            updated_at: env.ledger().timestamp(),
        };
        save_batch(&env, &batch);
        index_batch(&env, &project, &commodity, &batch_id);
        let aggregate_supply = add_group_supply(&env, &project, &commodity, initial_supply);

        if initial_supply > 0 {
            token::StellarAssetClient::new(&env, &batch_id).mint(&owner, &initial_supply);
        }

        events::emit_batch_created(
            &env,
            &batch_id,
            events::BatchCreated {
                project,
                commodity,
                owner,
                vintage: delivery_year,
                initial_supply,
                aggregate_supply,
            },
        );
        batch
    }

    /// Mint `amount` additional units against an existing batch, credited
    /// to `receiver` on the batch's unit holder.
    ///
    /// The batch identifier is validated against the factory before the
    /// registry record is touched, so a batch can never be mutated under
    /// the wrong grouping.
    ///
    /// - `caller` must authorize and hold `Manager` (or `SuperAdmin`).
    pub fn mint_more_in_a_batch(
        env: Env,
        caller: Address,
        project: String,
        commodity: String,
        batch_id: Address,
        amount: i128,
        receiver: Address,
    ) {
        caller.require_auth();
        rbac::require_manager_or_above(&env, &caller);

        if amount <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        let factory_addr = get_factory(&env);
        factory::verify_origin(&env, &factory_addr, &batch_id, &project, &commodity);

        let mut state = load_batch_state(&env, &batch_id);
        state.supply += amount;
        state.updated_at = env.ledger().timestamp();
        save_batch_state(&env, &batch_id, &state);
        let aggregate_supply = add_group_supply(&env, &project, &commodity, amount);

        token::StellarAssetClient::new(&env, &batch_id).mint(&receiver, &amount);

        events::emit_units_minted(
            &env,
            &batch_id,
            events::UnitsMinted {
                project,
                commodity,
                receiver,
                amount,
                batch_supply: state.supply,
                aggregate_supply,
            },
        );
    }

    /// Burn `amount` units from a batch, debited from `owner_address` on
    /// the batch's unit holder.
    ///
    /// Panics with `Error::InsufficientSupply` when `amount` exceeds the
    /// batch's recorded supply; no partial burn ever occurs.
    ///
    /// - `caller` must authorize and hold `Manager` (or `SuperAdmin`).
    /// - `owner_address` must have authorized the burn on the unit holder.
    pub fn burn_from_a_batch(
        env: Env,
        caller: Address,
        project: String,
        commodity: String,
        batch_id: Address,
        amount: i128,
        owner_address: Address,
    ) {
        caller.require_auth();
        rbac::require_manager_or_above(&env, &caller);

        if amount <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        let factory_addr = get_factory(&env);
        factory::verify_origin(&env, &factory_addr, &batch_id, &project, &commodity);

        let mut state = load_batch_state(&env, &batch_id);
        if state.supply < amount {
            panic_with_error!(&env, Error::InsufficientSupply);
        }
        state.supply -= amount;
        state.updated_at = env.ledger().timestamp();
        save_batch_state(&env, &batch_id, &state);
        let aggregate_supply = add_group_supply(&env, &project, &commodity, -amount);

        token::Client::new(&env, &batch_id).burn(&owner_address, &amount);

        events::emit_units_burned(
            &env,
            &batch_id,
            events::UnitsBurned {
                project,
                commodity,
                owner: owner_address,
                amount,
                batch_supply: state.supply,
                aggregate_supply,
            },
        );
    }

    /// Overwrite a batch's planned delivery year. No supply side effects.
    ///
    /// - `caller` must authorize and hold `Manager` (or `SuperAdmin`).
    pub fn update_batch_planned_delivery_year(
        env: Env,
        caller: Address,
        project: String,
        commodity: String,
        batch_id: Address,
        delivery_year: u32,
    ) {
        caller.require_auth();
        rbac::require_manager_or_above(&env, &caller);
        let factory_addr = get_factory(&env);
        factory::verify_origin(&env, &factory_addr, &batch_id, &project, &commodity);

        let mut state = load_batch_state(&env, &batch_id);
        state.delivery_year = delivery_year;
        state.updated_at = env.ledger().timestamp();
        save_batch_state(&env, &batch_id, &state);

        events::emit_batch_updated(
            &env,
            &batch_id,
            events::FIELD_DELIVERY_YEAR,
            events::BatchUpdated {
                project,
                commodity,
                updated_at: state.updated_at,
            },
        );
    }

    /// Overwrite a batch's free-form delivery estimate.
    ///
    /// - `caller` must authorize and hold `Manager` (or `SuperAdmin`).
    pub fn update_batch_delivery_estimate(
        env: Env,
        caller: Address,
        project: String,
        commodity: String,
        batch_id: Address,
        delivery_estimate: String,
    ) {
        caller.require_auth();
        rbac::require_manager_or_above(&env, &caller);
        let factory_addr = get_factory(&env);
        factory::verify_origin(&env, &factory_addr, &batch_id, &project, &commodity);

        let mut state = load_batch_state(&env, &batch_id);
        state.delivery_estimate = delivery_estimate;
        state.updated_at = env.ledger().timestamp();
        save_batch_state(&env, &batch_id, &state);

        events::emit_batch_updated(
            &env,
            &batch_id,
            events::FIELD_DELIVERY_ESTIMATE,
            events::BatchUpdated {
                project,
                commodity,
                updated_at: state.updated_at,
            },
        );
    }

    /// Overwrite a batch's metadata URI.
    ///
    /// - `caller` must authorize and hold `Manager` (or `SuperAdmin`).
    pub fn update_batch_uri(
        env: Env,
        caller: Address,
        project: String,
        commodity: String,
        batch_id: Address,
        uri: String,
    ) {
        caller.require_auth();
        rbac::require_manager_or_above(&env, &caller);
        let factory_addr = get_factory(&env);
        factory::verify_origin(&env, &factory_addr, &batch_id, &project, &commodity);

        let mut state = load_batch_state(&env, &batch_id);
        state.uri = uri;
        state.updated_at = env.ledger().timestamp();
        save_batch_state(&env, &batch_id, &state);

        events::emit_batch_updated(
            &env,
            &batch_id,
            events::FIELD_URI,
            events::BatchUpdated {
                project,
                commodity,
                updated_at: state.updated_at,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Bulk transfer
    // ─────────────────────────────────────────────────────────

    /// Move units in bulk: for each index `i`, transfer `amounts[i]`
    /// units of batch `batch_ids[i]` from `caller` to `recipients[i]`.
    ///
    /// The three vectors must have equal length; otherwise the call
    /// panics with `Error::LengthMismatch` before any leg is attempted.
    /// Legs run in order and the whole call is atomic — one failing leg
    /// reverts them all. No batch's recorded supply changes; only the
    /// unit holders' per-account balances move.
    ///
    /// - `caller` must authorize and hold `Manager` (or `SuperAdmin`).
    pub fn many_to_many_batch_transfer(
        env: Env,
        caller: Address,
        batch_ids: Vec<Address>,
        recipients: Vec<Address>,
        amounts: Vec<i128>,
    ) {
        caller.require_auth();
        rbac::require_manager_or_above(&env, &caller);

        if batch_ids.len() != recipients.len() || batch_ids.len() != amounts.len() {
            panic_with_error!(&env, Error::LengthMismatch);
        }

        for i in 0..batch_ids.len() {
            let batch_id = batch_ids.get_unchecked(i);
            let recipient = recipients.get_unchecked(i);
            let amount = amounts.get_unchecked(i);

            if amount <= 0 {
                panic_with_error!(&env, Error::InvalidAmount);
            }
            if !has_batch(&env, &batch_id) {
                panic_with_error!(&env, Error::BatchNotFound);
            }

            token::Client::new(&env, &batch_id).transfer(&caller, &recipient, &amount);

            events::emit_transfer_leg(
                &env,
                &batch_id,
                events::BulkTransferLeg {
                    from: caller.clone(),
                    to: recipient,
                    amount,
                },
            );
        }
    }

    // ─────────────────────────────────────────────────────────
    // Queries (no role gate)
    // ─────────────────────────────────────────────────────────

    /// Every project with at least one batch.
    pub fn get_project_list(env: Env) -> Vec<String> {
        get_project_list(&env)
    }

    /// Commodities under a project.
    pub fn get_commodity_list_for_a_project(env: Env, project: String) -> Vec<String> {
        get_commodity_list(&env, &project)
    }

    /// Batch identifiers under a (project, commodity) group.
    pub fn get_batch_list_for_a_commodity_in_a_project(
        env: Env,
        project: String,
        commodity: String,
    ) -> Vec<Address> {
        get_batch_list(&env, &project, &commodity)
    }

    /// Full record of one batch. Panics with `Error::BatchNotFound` when
    /// the identifier is not registered under the claimed group.
    pub fn get_batch_details(env: Env, project: String, commodity: String, batch_id: Address) -> Batch {
        let batch = load_batch(&env, &batch_id);
        if batch.project != project || batch.commodity != commodity {
            panic_with_error!(&env, Error::BatchNotFound);
        }
        batch
    }

    /// Aggregate supply of a (project, commodity) group. Zero for groups
    /// with no batches.
    pub fn get_project_commodity_total_supply(env: Env, project: String, commodity: String) -> i128 {
        get_group_supply(&env, &project, &commodity)
    }

    /// The bound unit-holder factory collaborator.
    pub fn get_factory(env: Env) -> Address {
        get_factory(&env)
    }
}
