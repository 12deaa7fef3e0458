//! # Types
//!
//! Shared data structures used across all modules of the ledger.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Batch` is internally stored as two separate ledger entries:
//!
//! - [`BatchConfig`] — written once at creation; never mutated. Pins the
//!   batch to its (project, commodity) group and its unit-holder token.
//! - [`BatchState`] — written on every mint, burn, and metadata update.
//!
//! The public API exposes the reconstructed [`Batch`] struct for convenience.
//!
//! ### The batch identifier is the unit holder
//!
//! Each batch is backed by exactly one token contract (the unit holder) that
//! carries per-account balances. The unit holder's address doubles as the
//! batch identifier, so a batch can always be validated against the factory
//! that deployed it.

use soroban_sdk::{contracttype, Address, String};

/// Immutable batch configuration, written once at creation.
///
/// The grouping keys and the unit-holder binding are fixed for the lifetime
/// of the batch; a batch never moves to another (project, commodity) pair.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchConfig {
    /// Address of the unit-holder token contract; doubles as the batch id.
    pub unit_holder: Address,
    pub project: String,
    pub commodity: String,
    /// Vintage year assigned by the factory at deployment.
    pub vintage: u32,
}

/// Mutable batch state, updated on mints, burns, and metadata changes.
///
/// Kept separate from [`BatchConfig`] so the high-frequency writes (supply
/// changes) touch only this small entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchState {
    /// Account the batch was issued to.
    pub owner: Address,
    /// Units currently outstanding in this batch. Never negative.
    pub supply: i128,
    /// Planned delivery year of the underlying credits.
    pub delivery_year: u32,
    /// Free-form delivery estimate (e.g. "Q3 2027").
    pub delivery_estimate: String,
    /// Metadata URI for off-chain batch documents.
    pub uri: String,
    /// Ledger timestamp of the last mutation.
    pub updated_at: u64,
}

/// Full representation of a planned-credit batch.
///
/// Used as the public API return type; reconstructed internally from the
/// split `BatchConfig` + `BatchState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Batch {
    /// Unit-holder token address; the batch identifier.
    pub unit_holder: Address,
    pub project: String,
    pub commodity: String,
    pub vintage: u32,
    pub owner: Address,
    pub supply: i128,
    pub delivery_year: u32,
    pub delivery_estimate: String,
    pub uri: String,
    pub updated_at: u64,
}

/// Grouping metadata the factory reports for a unit holder it deployed.
///
/// Returned by the factory's `resolve` and used to validate that a
/// caller-supplied batch identifier really belongs to the claimed
/// (project, commodity) pair.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitHolderOrigin {
    pub project: String,
    pub commodity: String,
    pub vintage: u32,
}
