extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, Env, IntoVal, String, TryIntoVal, Val,
};

use crate::events::{BatchCreated, BatchUpdated, BulkTransferLeg, UnitsBurned, UnitsMinted};
use crate::testutils::{MockUnitFactory, MockUnitFactoryClient};
use crate::types::Batch;
use crate::{PlannedCreditLedger, PlannedCreditLedgerClient, Role};

fn setup() -> (
    Env,
    PlannedCreditLedgerClient<'static>,
    Address,
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
    (env, client, super_admin, manager, factory)
}

fn s(env: &Env, v: &str) -> String {
    String::from_str(env, v)
}

fn create_batch(
    env: &Env,
    client: &PlannedCreditLedgerClient,
    factory: &MockUnitFactoryClient,
    manager: &Address,
    owner: &Address,
    initial_supply: i128,
    uniqueness_token: &str,
) -> Batch {
    let sac = env.register_stellar_asset_contract_v2(client.address.clone());
    factory.add_unit_holder(&sac.address());
    client.create_batch(
        manager,
        &s(env, "P1"),
        &s(env, "C1"),
        owner,
        &initial_supply,
        &2027u32,
        &s(env, "Q4 2027"),
        &s(env, "ipfs://batch"),
        &s(env, uniqueness_token),
    )
}

/// Events emitted by the ledger contract itself, in order, dropping the
/// unit holders' own token events.
fn ledger_events(env: &Env, contract: &Address) -> std::vec::Vec<(Address, soroban_sdk::Vec<Val>, Val)> {
    env.events()
        .all()
        .iter()
        .filter(|e| e.0 == *contract)
        .collect()
}

#[test]
fn test_batch_created_event() {
    let (env, client, _super_admin, manager, factory) = setup();
    let owner = Address::generate(&env);

    let batch = create_batch(&env, &client, &factory, &manager, &owner, 1_000, "T1");

    let events = ledger_events(&env, &client.address);
    let last = events.last().expect("no ledger events");

    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        batch.unit_holder.into_val(&env),
    ];
    assert_eq!(last.1, expected_topics);

    let data: BatchCreated = last.2.try_into_val(&env).unwrap();
    assert_eq!(
        data,
        BatchCreated {
            project: s(&env, "P1"),
            commodity: s(&env, "C1"),
            owner: owner.clone(),
            vintage: 2027,
            initial_supply: 1_000,
            aggregate_supply: 1_000,
        }
    );
}

#[test]
fn test_units_minted_event_carries_post_supplies() {
    let (env, client, _super_admin, manager, factory) = setup();
    let owner = Address::generate(&env);
    let receiver = Address::generate(&env);
    let batch = create_batch(&env, &client, &factory, &manager, &owner, 1_000, "T1");

    client.mint_more_in_a_batch(
        &manager,
        &s(&env, "P1"),
        &s(&env, "C1"),
        &batch.unit_holder,
        &500i128,
        &receiver,
    );

    let events = ledger_events(&env, &client.address);
    let last = events.last().expect("no ledger events");

    let expected_topics = vec![
        &env,
        symbol_short!("minted").into_val(&env),
        batch.unit_holder.into_val(&env),
    ];
    assert_eq!(last.1, expected_topics);

    let data: UnitsMinted = last.2.try_into_val(&env).unwrap();
    assert_eq!(
        data,
        UnitsMinted {
            project: s(&env, "P1"),
            commodity: s(&env, "C1"),
            receiver: receiver.clone(),
            amount: 500,
            batch_supply: 1_500,
            aggregate_supply: 1_500,
        }
    );
}

#[test]
fn test_units_burned_event_carries_post_supplies() {
    let (env, client, _super_admin, manager, factory) = setup();
    let owner = Address::generate(&env);
    let batch = create_batch(&env, &client, &factory, &manager, &owner, 1_000, "T1");

    client.burn_from_a_batch(
        &manager,
        &s(&env, "P1"),
        &s(&env, "C1"),
        &batch.unit_holder,
        &400i128,
        &owner,
    );

    let events = ledger_events(&env, &client.address);
    let last = events.last().expect("no ledger events");

    let expected_topics = vec![
        &env,
        symbol_short!("burned").into_val(&env),
        batch.unit_holder.into_val(&env),
    ];
    assert_eq!(last.1, expected_topics);

    let data: UnitsBurned = last.2.try_into_val(&env).unwrap();
    assert_eq!(
        data,
        UnitsBurned {
            project: s(&env, "P1"),
            commodity: s(&env, "C1"),
            owner: owner.clone(),
            amount: 400,
            batch_supply: 600,
            aggregate_supply: 600,
        }
    );
}

#[test]
fn test_batch_updated_event_names_the_field() {
    let (env, client, _super_admin, manager, factory) = setup();
    let owner = Address::generate(&env);
    let batch = create_batch(&env, &client, &factory, &manager, &owner, 100, "T1");

    client.update_batch_uri(
        &manager,
        &s(&env, "P1"),
        &s(&env, "C1"),
        &batch.unit_holder,
        &s(&env, "ipfs://revised"),
    );

    let events = ledger_events(&env, &client.address);
    let last = events.last().expect("no ledger events");

    let expected_topics = vec![
        &env,
        symbol_short!("updated").into_val(&env),
        batch.unit_holder.into_val(&env),
        symbol_short!("uri").into_val(&env),
    ];
    assert_eq!(last.1, expected_topics);

    let data: BatchUpdated = last.2.try_into_val(&env).unwrap();
    assert_eq!(data.project, s(&env, "P1"));
    assert_eq!(data.commodity, s(&env, "C1"));
}

#[test]
fn test_bulk_transfer_emits_one_event_per_leg() {
    let (env, client, _super_admin, manager, factory) = setup();
    let batch = create_batch(&env, &client, &factory, &manager, &manager, 1_000, "T1");
    let r1 = Address::generate(&env);
    let r2 = Address::generate(&env);

    client.many_to_many_batch_transfer(
        &manager,
        &vec![&env, batch.unit_holder.clone(), batch.unit_holder.clone()],
        &vec![&env, r1.clone(), r2.clone()],
        &vec![&env, 100i128, 200i128],
    );

    let events = ledger_events(&env, &client.address);
    assert!(events.len() >= 2);
    let leg2 = &events[events.len() - 1];
    let leg1 = &events[events.len() - 2];

    let expected_topics = vec![
        &env,
        symbol_short!("xfer").into_val(&env),
        batch.unit_holder.into_val(&env),
    ];
    assert_eq!(leg1.1, expected_topics);
    assert_eq!(leg2.1, expected_topics);

    let data1: BulkTransferLeg = leg1.2.try_into_val(&env).unwrap();
    let data2: BulkTransferLeg = leg2.2.try_into_val(&env).unwrap();
    assert_eq!(
        data1,
        BulkTransferLeg {
            from: manager.clone(),
            to: r1.clone(),
            amount: 100,
        }
    );
    assert_eq!(
        data2,
        BulkTransferLeg {
            from: manager.clone(),
            to: r2.clone(),
            amount: 200,
        }
    );
}

#[test]
fn test_role_set_event() {
    let (env, client, super_admin, _manager, _factory) = setup();
    let target = Address::generate(&env);

    client.grant_role(&super_admin, &target, &Role::Manager);

    let events = ledger_events(&env, &client.address);
    let last = events.last().expect("no ledger events");

    let expected_topics = vec![
        &env,
        symbol_short!("role_set").into_val(&env),
        target.into_val(&env),
        symbol_short!("manager").into_val(&env),
    ];
    assert_eq!(last.1, expected_topics);

    let caller: Address = last.2.try_into_val(&env).unwrap();
    assert_eq!(caller, super_admin);
}

#[test]
fn test_role_del_event() {
    let (env, client, super_admin, _manager, _factory) = setup();
    let target = Address::generate(&env);
    client.grant_role(&super_admin, &target, &Role::Manager);

    client.revoke_role(&super_admin, &target, &Role::Manager);

    let events = ledger_events(&env, &client.address);
    let last = events.last().expect("no ledger events");

    let expected_topics = vec![
        &env,
        symbol_short!("role_del").into_val(&env),
        target.into_val(&env),
        symbol_short!("manager").into_val(&env),
    ];
    assert_eq!(last.1, expected_topics);
}
