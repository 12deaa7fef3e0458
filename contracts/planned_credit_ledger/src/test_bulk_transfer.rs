extern crate std;

use soroban_sdk::{testutils::Address as _, token, vec, Address, Env, String};

use crate::invariants;
use crate::testutils::{MockUnitFactory, MockUnitFactoryClient};
use crate::types::Batch;
use crate::{Error, PlannedCreditLedger, PlannedCreditLedgerClient, Role};

fn setup() -> (
    Env,
    PlannedCreditLedgerClient<'static>,
    Address,
    MockUnitFactoryClient<'static>,
) {
    let env = Env::default();
    env.mock_all_auths();
    let factory_id = env.register(MockUnitFactory, ());
    let factory = MockUnitFactoryClient::new(&env, &factory_id);
    let contract_id = env.register(PlannedCreditLedger, ());
    let client = PlannedCreditLedgerClient::new(&env, &contract_id);
    let super_admin = Address::generate(&env);
    client.init(&super_admin, &factory_id);

    let manager = Address::generate(&env);
    client.grant_role(&super_admin, &manager, &Role::Manager);
    (env, client, manager, factory)
}

fn s(env: &Env, v: &str) -> String {
    String::from_str(env, v)
}

/// Create a batch whose initial supply is issued to `manager`, so the
/// manager has units to move in the transfer tests.
fn create_manager_batch(
    env: &Env,
    client: &PlannedCreditLedgerClient,
    factory: &MockUnitFactoryClient,
    manager: &Address,
    commodity: &str,
    initial_supply: i128,
    uniqueness_token: &str,
) -> Batch {
    let sac = env.register_stellar_asset_contract_v2(client.address.clone());
    factory.add_unit_holder(&sac.address());
    client.create_batch(
        manager,
        &s(env, "P1"),
        &s(env, commodity),
        manager,
        &initial_supply,
        &2027u32,
        &s(env, "Q4 2027"),
        &s(env, "ipfs://batch"),
        &s(env, uniqueness_token),
    )
}

#[test]
fn test_length_mismatch_rejected_before_any_leg() {
    let (env, client, manager, factory) = setup();
    let batch_a = create_manager_batch(&env, &client, &factory, &manager, "C1", 1_000, "T1");
    let batch_b = create_manager_batch(&env, &client, &factory, &manager, "C2", 1_000, "T2");
    let r1 = Address::generate(&env);
    let r2 = Address::generate(&env);
    let r3 = Address::generate(&env);

    let res = client.try_many_to_many_batch_transfer(
        &manager,
        &vec![
            &env,
            batch_a.unit_holder.clone(),
            batch_b.unit_holder.clone(),
            batch_a.unit_holder.clone(),
        ],
        &vec![&env, r1.clone(), r2.clone(), r3.clone()],
        &vec![&env, 100i128, 200i128],
    );
    assert_eq!(res, Err(Ok(Error::LengthMismatch)));

    // Zero transfers happened.
    let holder_a = token::Client::new(&env, &batch_a.unit_holder);
    let holder_b = token::Client::new(&env, &batch_b.unit_holder);
    assert_eq!(holder_a.balance(&r1), 0);
    assert_eq!(holder_b.balance(&r2), 0);
    assert_eq!(holder_a.balance(&manager), 1_000);
    assert_eq!(holder_b.balance(&manager), 1_000);
}

#[test]
fn test_many_to_many_transfer_moves_balances_conserves_supply() {
    let (env, client, manager, factory) = setup();
    let batch_a = create_manager_batch(&env, &client, &factory, &manager, "C1", 1_000, "T1");
    let batch_b = create_manager_batch(&env, &client, &factory, &manager, "C2", 500, "T2");
    let r1 = Address::generate(&env);
    let r2 = Address::generate(&env);

    client.many_to_many_batch_transfer(
        &manager,
        &vec![
            &env,
            batch_a.unit_holder.clone(),
            batch_b.unit_holder.clone(),
            batch_a.unit_holder.clone(),
        ],
        &vec![&env, r1.clone(), r2.clone(), r2.clone()],
        &vec![&env, 100i128, 250i128, 50i128],
    );

    let holder_a = token::Client::new(&env, &batch_a.unit_holder);
    let holder_b = token::Client::new(&env, &batch_b.unit_holder);
    assert_eq!(holder_a.balance(&r1), 100);
    assert_eq!(holder_a.balance(&r2), 50);
    assert_eq!(holder_a.balance(&manager), 850);
    assert_eq!(holder_b.balance(&r2), 250);
    assert_eq!(holder_b.balance(&manager), 250);

    // Ownership moved; recorded supplies did not.
    let details_a = client.get_batch_details(&s(&env, "P1"), &s(&env, "C1"), &batch_a.unit_holder);
    let details_b = client.get_batch_details(&s(&env, "P1"), &s(&env, "C2"), &batch_b.unit_holder);
    assert_eq!(details_a.supply, 1_000);
    assert_eq!(details_b.supply, 500);
    assert_eq!(
        client.get_project_commodity_total_supply(&s(&env, "P1"), &s(&env, "C1")),
        1_000
    );
    assert_eq!(
        client.get_project_commodity_total_supply(&s(&env, "P1"), &s(&env, "C2")),
        500
    );
    invariants::assert_group_supply_consistent(&client, &s(&env, "P1"), &s(&env, "C1"));
    invariants::assert_group_supply_consistent(&client, &s(&env, "P1"), &s(&env, "C2"));
}

#[test]
fn test_unregistered_batch_leg_reverts_whole_call() {
    let (env, client, manager, factory) = setup();
    let batch = create_manager_batch(&env, &client, &factory, &manager, "C1", 1_000, "T1");
    let stranger = Address::generate(&env);
    let r1 = Address::generate(&env);
    let r2 = Address::generate(&env);

    let res = client.try_many_to_many_batch_transfer(
        &manager,
        &vec![&env, batch.unit_holder.clone(), stranger],
        &vec![&env, r1.clone(), r2.clone()],
        &vec![&env, 100i128, 100i128],
    );
    assert_eq!(res, Err(Ok(Error::BatchNotFound)));

    // The first leg was rolled back with the rest of the call.
    let holder = token::Client::new(&env, &batch.unit_holder);
    assert_eq!(holder.balance(&r1), 0);
    assert_eq!(holder.balance(&manager), 1_000);
}

#[test]
fn test_insufficient_balance_leg_reverts_whole_call() {
    let (env, client, manager, factory) = setup();
    let batch_a = create_manager_batch(&env, &client, &factory, &manager, "C1", 1_000, "T1");
    let batch_b = create_manager_batch(&env, &client, &factory, &manager, "C2", 10, "T2");
    let r1 = Address::generate(&env);
    let r2 = Address::generate(&env);

    // Second leg exceeds the manager's balance on batch_b's unit holder;
    // the collaborator's rejection propagates and undoes the first leg.
    let res = client.try_many_to_many_batch_transfer(
        &manager,
        &vec![&env, batch_a.unit_holder.clone(), batch_b.unit_holder.clone()],
        &vec![&env, r1.clone(), r2.clone()],
        &vec![&env, 100i128, 500i128],
    );
    assert!(res.is_err());

    let holder_a = token::Client::new(&env, &batch_a.unit_holder);
    let holder_b = token::Client::new(&env, &batch_b.unit_holder);
    assert_eq!(holder_a.balance(&r1), 0);
    assert_eq!(holder_a.balance(&manager), 1_000);
    assert_eq!(holder_b.balance(&r2), 0);
    assert_eq!(holder_b.balance(&manager), 10);
}

#[test]
fn test_bulk_transfer_requires_manager_role() {
    let (env, client, manager, factory) = setup();
    let batch = create_manager_batch(&env, &client, &factory, &manager, "C1", 1_000, "T1");
    let rando = Address::generate(&env);
    let r1 = Address::generate(&env);

    let res = client.try_many_to_many_batch_transfer(
        &rando,
        &vec![&env, batch.unit_holder.clone()],
        &vec![&env, r1],
        &vec![&env, 100i128],
    );
    assert_eq!(res, Err(Ok(Error::Unauthorized)));
}

#[test]
fn test_zero_amount_leg_rejected() {
    let (env, client, manager, factory) = setup();
    let batch = create_manager_batch(&env, &client, &factory, &manager, "C1", 1_000, "T1");
    let r1 = Address::generate(&env);

    let res = client.try_many_to_many_batch_transfer(
        &manager,
        &vec![&env, batch.unit_holder.clone()],
        &vec![&env, r1],
        &vec![&env, 0i128],
    );
    assert_eq!(res, Err(Ok(Error::InvalidAmount)));
}

#[test]
fn test_empty_bulk_transfer_is_a_noop() {
    let (env, client, manager, _factory) = setup();
    client.many_to_many_batch_transfer(
        &manager,
        &vec![&env],
        &vec![&env],
        &vec![&env],
    );
}
