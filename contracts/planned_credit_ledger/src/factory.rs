//! # Factory binding
//!
//! Thin adapter over the external unit-holder factory collaborator.
//!
//! The factory deploys one unit-holder token contract per batch and keeps
//! the authoritative mapping from a unit holder back to its
//! (project, commodity, vintage) origin. The ledger never constructs a
//! batch identifier itself: it asks the factory for one at creation, and
//! it re-validates every caller-supplied identifier against the factory
//! before trusting the claimed grouping.

use soroban_sdk::{contractclient, panic_with_error, Address, Env, String};

use crate::types::UnitHolderOrigin;
use crate::Error;

/// Interface consumed from the external factory contract.
///
/// The ledger only ever calls it; it never mutates factory state beyond
/// what `deploy_unit_holder` itself records.
#[contractclient(name = "UnitFactoryClient")]
pub trait UnitFactory {
    /// Deploy a fresh unit-holder token for the group and return its
    /// address. The returned address becomes the batch identifier.
    fn deploy_unit_holder(env: Env, project: String, commodity: String, vintage: u32) -> Address;

    /// Resolve a unit holder back to its deployment origin, or `None`
    /// when the factory never deployed it.
    fn resolve(env: Env, unit_holder: Address) -> Option<UnitHolderOrigin>;
}

/// Ask the factory for a new unit holder for (project, commodity, vintage).
pub fn deploy(
    env: &Env,
    factory: &Address,
    project: &String,
    commodity: &String,
    vintage: u32,
) -> Address {
    UnitFactoryClient::new(env, factory).deploy_unit_holder(project, commodity, &vintage)
}

/// Validate that `batch_id` was deployed by the factory for exactly the
/// claimed (project, commodity) pair.
///
/// Panics with `UnknownBatch` when the factory cannot resolve the address
/// or resolves it to a different grouping. Returns the resolved origin so
/// callers do not need a second round trip for the vintage.
pub fn verify_origin(
    env: &Env,
    factory: &Address,
    batch_id: &Address,
    project: &String,
    commodity: &String,
) -> UnitHolderOrigin {
    let origin = match UnitFactoryClient::new(env, factory).resolve(batch_id) {
        Some(origin) => origin,
        None => panic_with_error!(env, Error::UnknownBatch),
    };
    if origin.project != *project || origin.commodity != *commodity {
        panic_with_error!(env, Error::UnknownBatch);
    }
    origin
}
