//! Canonical event types emitted by the planned-credit ledger contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/planned_credit_ledger/src/events.rs` and the role events from
//! `contracts/planned_credit_ledger/src/rbac.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the ledger contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A batch was created and its initial supply issued (`created` topic).
    BatchCreated,
    /// Additional units were minted against a batch (`minted` topic).
    UnitsMinted,
    /// Units were burned from a batch (`burned` topic).
    UnitsBurned,
    /// A batch metadata field was overwritten (`updated` topic).
    BatchUpdated,
    /// One leg of a bulk ownership transfer (`xfer` topic).
    BulkTransfer,
    /// A role was granted (`role_set` topic).
    RoleSet,
    /// A role was revoked (`role_del` topic).
    RoleDel,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::BatchCreated,
            "minted" => Self::UnitsMinted,
            "burned" => Self::UnitsBurned,
            "updated" => Self::BatchUpdated,
            "xfer" => Self::BulkTransfer,
            "role_set" => Self::RoleSet,
            "role_del" => Self::RoleDel,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BatchCreated => "batch_created",
            Self::UnitsMinted => "units_minted",
            Self::UnitsBurned => "units_burned",
            Self::BatchUpdated => "batch_updated",
            Self::BulkTransfer => "bulk_transfer",
            Self::RoleSet => "role_set",
            Self::RoleDel => "role_del",
            Self::Unknown => "unknown",
        }
    }

    /// Whether events of this kind move supply during replay.
    pub fn affects_supply(&self) -> bool {
        matches!(
            self,
            Self::BatchCreated | Self::UnitsMinted | Self::UnitsBurned
        )
    }
}

/// A fully decoded ledger event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Opaque unique event id assigned by the RPC; the idempotency key.
    pub event_id: Option<String>,
    pub event_type: String,
    /// Batch identifier (unit-holder address) for batch events.
    pub batch_id: Option<String>,
    pub project: Option<String>,
    pub commodity: Option<String>,
    /// Owner / receiver / sender / granting caller, depending on the kind.
    pub actor: Option<String>,
    /// Transfer recipient or role target.
    pub counterparty: Option<String>,
    pub amount: Option<String>,
    /// Batch supply after the operation, for supply-moving events.
    pub batch_supply: Option<String>,
    /// Group aggregate supply after the operation.
    pub aggregate_supply: Option<String>,
    /// Updated field name or role symbol, where applicable.
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: Option<String>,
    pub event_type: String,
    pub batch_id: Option<String>,
    pub project: Option<String>,
    pub commodity: Option<String>,
    pub actor: Option<String>,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
    pub batch_supply: Option<String>,
    pub aggregate_supply: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
