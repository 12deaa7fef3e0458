//! Test double for the external unit-holder factory collaborator.
//!
//! The real factory deploys a fresh token contract per batch. Deploying
//! contracts from inside a contract is irrelevant to what the ledger
//! tests exercise, so [`MockUnitFactory`] is pre-loaded with unit-holder
//! addresses (Stellar Asset Contracts created by the test) and hands one
//! out per `deploy_unit_holder` call, recording the origin it was asked
//! to deploy for.

extern crate std;

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String, Vec};

use crate::types::UnitHolderOrigin;

#[contracttype]
#[derive(Clone)]
enum MockKey {
    /// Unit holders queued for hand-out, FIFO.
    Queue,
    /// Recorded origin per handed-out unit holder.
    Origin(Address),
}

#[contract]
pub struct MockUnitFactory;

#[contractimpl]
impl MockUnitFactory {
    /// Queue a pre-created unit holder for the next `deploy_unit_holder`.
    pub fn add_unit_holder(env: Env, unit_holder: Address) {
        let mut queue: Vec<Address> = env
            .storage()
            .instance()
            .get(&MockKey::Queue)
            .unwrap_or_else(|| Vec::new(&env));
        queue.push_back(unit_holder);
        env.storage().instance().set(&MockKey::Queue, &queue);
    }

    pub fn deploy_unit_holder(
        env: Env,
        project: String,
        commodity: String,
        vintage: u32,
    ) -> Address {
        let mut queue: Vec<Address> = env
            .storage()
            .instance()
            .get(&MockKey::Queue)
            .unwrap_or_else(|| Vec::new(&env));
        let unit_holder = queue.pop_front().expect("mock factory queue empty");
        env.storage().instance().set(&MockKey::Queue, &queue);
        env.storage().instance().set(
            &MockKey::Origin(unit_holder.clone()),
            &UnitHolderOrigin {
                project,
                commodity,
                vintage,
            },
        );
        unit_holder
    }

    pub fn resolve(env: Env, unit_holder: Address) -> Option<UnitHolderOrigin> {
        env.storage().instance().get(&MockKey::Origin(unit_holder))
    }
}
