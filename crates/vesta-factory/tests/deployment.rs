//! Deployer behavior: address prediction, collisions, rollback and
//! sequence-based deployment.

use assert_matches::assert_matches;
use vesta_account::{AccountCall, KeyOwnershipModule, OwnershipCall, SmartAccount};
use vesta_core::{Address, Event, LedgerConfig, VestaError};
use vesta_factory::{compute_address, AccountFactory, FactoryCall};
use vesta_ledger::codec::Interface;
use vesta_ledger::{Ledger, Receipt};
use vesta_testkit::{install, Reverter, HANDLER, OUTSIDER, PRIMARY};

const FACTORY: Address = Address::from_low_u64(0xfac0);
const LOGIC: Address = Address::from_low_u64(0x10c0);
const OWNERSHIP: Address = Address::from_low_u64(0x0e10);
const REVERTER: Address = Address::from_low_u64(0x4e00);

fn setup(ledger: &mut Ledger) {
    install(ledger, LOGIC, SmartAccount::new(PRIMARY));
    install(ledger, FACTORY, AccountFactory::new(LOGIC));
    install(ledger, OWNERSHIP, KeyOwnershipModule::default());
    install(ledger, REVERTER, Reverter::default());
}

fn world() -> Ledger {
    let mut ledger = vesta_testkit::ledger();
    setup(&mut ledger);
    ledger
}

fn init_data(owner: u64) -> Vec<u8> {
    AccountCall::Init {
        handler: HANDLER,
        module_setup: OWNERSHIP,
        module_setup_data: OwnershipCall::InitForAccount {
            owner: Address::from_low_u64(owner),
        }
        .encode_call(),
    }
    .encode_call()
}

fn predicted(ledger: &Ledger, init_data: Vec<u8>, index: u64) -> Address {
    ledger
        .query(OUTSIDER, FACTORY, &FactoryCall::ComputeAddress { init_data, index }.encode_call())
        .decode()
        .unwrap()
}

fn deploy(ledger: &mut Ledger, init_data: Vec<u8>, index: u64) -> Receipt {
    ledger.transact(
        OUTSIDER,
        FACTORY,
        0,
        &FactoryCall::DeployDeterministic { init_data, index }.encode_call(),
    )
}

#[test]
fn test_computed_address_is_pure_and_chain_independent() {
    let ledger = world();
    let first = predicted(&ledger, init_data(1), 7);
    assert_eq!(first, predicted(&ledger, init_data(1), 7));
    assert_eq!(first, compute_address(&FACTORY, &LOGIC, &init_data(1), 7));

    let mut other_chain = Ledger::new(LedgerConfig {
        chain_id: 99,
        ..LedgerConfig::default()
    })
    .unwrap();
    setup(&mut other_chain);
    assert_eq!(first, predicted(&other_chain, init_data(1), 7));
}

#[test]
fn test_index_and_initializer_change_the_address() {
    let ledger = world();
    let base = predicted(&ledger, init_data(1), 0);
    assert_ne!(base, predicted(&ledger, init_data(1), 1));
    assert_ne!(base, predicted(&ledger, init_data(2), 0));
}

#[test]
fn test_deploys_at_the_predicted_address() {
    let mut ledger = world();
    let expected = predicted(&ledger, init_data(1), 3);

    let receipt = deploy(&mut ledger, init_data(1), 3);
    assert!(receipt.is_success(), "deploy failed: {:?}", receipt.error());
    assert_eq!(receipt.outcome.decode::<Address>().unwrap(), expected);
    assert!(receipt.logs.iter().any(|entry| entry.event
        == Event::AccountCreated {
            account: expected,
            initial_module: OWNERSHIP,
            index: Some(3),
        }));

    assert_eq!(ledger.logic_of(&expected), Some(LOGIC));
    let enabled = ledger.query(
        OUTSIDER,
        expected,
        &AccountCall::IsModuleEnabled { module: OWNERSHIP }.encode_call(),
    );
    assert!(enabled.decode::<bool>().unwrap());
    let owner = ledger.query(
        OUTSIDER,
        OWNERSHIP,
        &OwnershipCall::OwnerOf { account: expected }.encode_call(),
    );
    assert_eq!(owner.decode::<Address>().unwrap(), Address::from_low_u64(1));
}

#[test]
fn test_redeploying_the_same_inputs_collides() {
    let mut ledger = world();
    let expected = predicted(&ledger, init_data(1), 0);
    assert!(deploy(&mut ledger, init_data(1), 0).is_success());

    let again = deploy(&mut ledger, init_data(1), 0);
    assert_matches!(
        again.error(),
        Some(VestaError::DeploymentCollision { address }) if address == expected
    );
    assert!(deploy(&mut ledger, init_data(1), 1).is_success());
}

#[test]
fn test_failed_initialization_rolls_back_the_deployment() {
    let mut ledger = world();
    let bad_init = AccountCall::Init {
        handler: HANDLER,
        module_setup: REVERTER,
        module_setup_data: b"setup".to_vec(),
    }
    .encode_call();
    let address = predicted(&ledger, bad_init.clone(), 0);

    let receipt = deploy(&mut ledger, bad_init, 0);
    assert!(!receipt.is_success());
    assert!(!ledger.has_code(&address));
    assert!(ledger
        .logs()
        .iter()
        .all(|entry| !matches!(entry.event, Event::AccountCreated { .. })));
}

#[test]
fn test_initializer_must_be_an_init_call() {
    let mut ledger = world();
    let receipt = deploy(&mut ledger, AccountCall::Implementation.encode_call(), 0);
    assert_matches!(receipt.error(), Some(VestaError::Configuration { .. }));

    let receipt = deploy(&mut ledger, b"garbage".to_vec(), 0);
    assert!(!receipt.is_success());
}

#[test]
fn test_prefunded_address_deploys_and_keeps_its_balance() {
    let mut ledger = world();
    let expected = predicted(&ledger, init_data(1), 0);
    ledger.fund(expected, 500);

    assert!(deploy(&mut ledger, init_data(1), 0).is_success());
    assert!(ledger.has_code(&expected));
    assert_eq!(ledger.balance(&expected), 500);
}

#[test]
fn test_sequence_deployment_gives_fresh_addresses() {
    let mut ledger = world();
    let mut deployed = Vec::new();
    for _ in 0..2 {
        let receipt = ledger.transact(
            OUTSIDER,
            FACTORY,
            0,
            &FactoryCall::DeployWithoutIndex {
                init_data: init_data(1),
            }
            .encode_call(),
        );
        assert!(receipt.is_success(), "deploy failed: {:?}", receipt.error());
        let account = receipt.outcome.decode::<Address>().unwrap();
        assert!(receipt.logs.iter().any(|entry| entry.event
            == Event::AccountCreated {
                account,
                initial_module: OWNERSHIP,
                index: None,
            }));
        deployed.push(account);
    }
    assert_ne!(deployed[0], deployed[1]);
    assert!(deployed.iter().all(|account| ledger.has_code(account)));
}

#[test]
fn test_reports_account_logic() {
    let ledger = world();
    let logic = ledger.query(OUTSIDER, FACTORY, &FactoryCall::Logic.encode_call());
    assert_eq!(logic.decode::<Address>().unwrap(), LOGIC);
}
