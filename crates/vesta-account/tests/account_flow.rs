//! End-to-end account behavior on the ledger: initialization, caller classes,
//! module execution, validation routing and administration.

use assert_matches::assert_matches;
use vesta_account::{
    AccountCall, KeyOwnershipModule, ModuleExecution, OperationKind, OwnershipCall, Page,
    SmartAccount,
};
use vesta_core::{
    Address, Event, Hash32, Operation, SignatureEnvelope, SignatureMagic, ValidationData,
    ValidityWindow, VestaError,
};
use vesta_ledger::codec::Interface;
use vesta_ledger::{Ledger, Receipt};
use vesta_testkit::{
    install, recorded_calls, KeyTestFixture, Recorder, Relay, RelayCall, Reverter, HANDLER,
    OUTSIDER, PRIMARY,
};

const ACCOUNT: Address = Address::from_low_u64(0xacc0);
const OWNERSHIP: Address = Address::from_low_u64(0x0e10);
const RELAY: Address = Address::from_low_u64(0x4e10);
const RECORDER: Address = Address::from_low_u64(0x4ec0);
const REVERTER: Address = Address::from_low_u64(0x4e00);

struct Fixture {
    ledger: Ledger,
    owner: KeyTestFixture,
}

impl Fixture {
    fn new() -> Self {
        let mut ledger = vesta_testkit::ledger();
        install(&mut ledger, ACCOUNT, SmartAccount::new(PRIMARY));
        install(&mut ledger, OWNERSHIP, KeyOwnershipModule::default());
        install(&mut ledger, RELAY, Relay);
        install(&mut ledger, RECORDER, Recorder);
        install(&mut ledger, REVERTER, Reverter::default());
        install(&mut ledger, HANDLER, Recorder);

        let owner = KeyTestFixture::from_seed_string("account owner");
        let init = AccountCall::Init {
            handler: HANDLER,
            module_setup: OWNERSHIP,
            module_setup_data: OwnershipCall::InitForAccount {
                owner: owner.address(),
            }
            .encode_call(),
        };
        let mut fixture = Self { ledger, owner };
        let receipt = fixture.call(PRIMARY, init);
        assert!(receipt.is_success(), "init failed: {:?}", receipt.error());
        fixture
    }

    fn call(&mut self, from: Address, call: AccountCall) -> Receipt {
        self.ledger.transact(from, ACCOUNT, 0, &call.encode_call())
    }

    /// Have the relay call the account, as a module would.
    fn as_module(&mut self, call: AccountCall) -> Receipt {
        self.ledger.transact(
            OUTSIDER,
            RELAY,
            0,
            &RelayCall::forward(ACCOUNT, call.encode_call()),
        )
    }

    fn enable_relay(&mut self) {
        let receipt = self.call(PRIMARY, AccountCall::EnableModule { module: RELAY });
        assert!(receipt.is_success());
    }

    fn signed_operation(&self, nonce: u64, module: Address) -> (Operation, Hash32) {
        let operation = Operation::new(ACCOUNT, nonce, b"transfer".to_vec());
        let hash = operation.hash(&PRIMARY, self.ledger.config().chain_id);
        let envelope = SignatureEnvelope::new(self.owner.sign(&hash), module);
        (operation.with_envelope(&envelope), hash)
    }

    fn validate(&mut self, operation: Operation, operation_hash: Hash32) -> Receipt {
        self.call(
            PRIMARY,
            AccountCall::ValidateOperation {
                operation,
                operation_hash,
                missing_funds: 0,
            },
        )
    }

    fn has_event(&self, event: &Event) -> bool {
        self.ledger.logs().iter().any(|entry| entry.event == *event)
    }
}

#[test]
fn test_init_enables_first_module_once() {
    let mut f = Fixture::new();
    assert!(f.has_event(&Event::ModuleEnabled { module: OWNERSHIP }));

    let enabled = f
        .ledger
        .query(OUTSIDER, ACCOUNT, &AccountCall::IsModuleEnabled { module: OWNERSHIP }.encode_call());
    assert!(enabled.decode::<bool>().unwrap());

    let handler = f
        .ledger
        .query(OUTSIDER, ACCOUNT, &AccountCall::FallbackHandler.encode_call());
    assert_eq!(handler.decode::<Address>().unwrap(), HANDLER);

    let again = f.call(
        OUTSIDER,
        AccountCall::Init {
            handler: HANDLER,
            module_setup: RELAY,
            module_setup_data: RelayCall::Announce.encode_call(),
        },
    );
    assert_matches!(again.error(), Some(VestaError::AlreadyInitialized));
    assert!(!f.has_event(&Event::ModuleEnabled { module: RELAY }));
}

#[test]
fn test_init_rejects_zero_handler() {
    let mut f = Fixture::new();
    let fresh = Address::from_low_u64(0xacc1);
    install(&mut f.ledger, fresh, SmartAccount::new(PRIMARY));
    let init = AccountCall::Init {
        handler: Address::ZERO,
        module_setup: RELAY,
        module_setup_data: RelayCall::Announce.encode_call(),
    };
    let receipt = f.ledger.transact(PRIMARY, fresh, 0, &init.encode_call());
    assert_matches!(receipt.error(), Some(VestaError::Configuration { .. }));
}

#[test]
fn test_primary_calls_fail_hard_and_are_gated() {
    let mut f = Fixture::new();
    let receipt = f.call(
        PRIMARY,
        AccountCall::ExecuteAsPrimary {
            target: RECORDER,
            value: 0,
            payload: b"hi".to_vec(),
        },
    );
    assert_eq!(receipt.into_result().unwrap(), b"hi".to_vec());
    assert_eq!(recorded_calls(&f.ledger, &RECORDER)[0].caller, ACCOUNT);

    let receipt = f.call(
        PRIMARY,
        AccountCall::ExecuteAsPrimary {
            target: REVERTER,
            value: 0,
            payload: Vec::new(),
        },
    );
    assert_eq!(receipt.error(), Some(VestaError::execution_failed("reverter")));

    let receipt = f.call(
        OUTSIDER,
        AccountCall::ExecuteAsPrimary {
            target: RECORDER,
            value: 0,
            payload: b"nope".to_vec(),
        },
    );
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));
    assert_eq!(recorded_calls(&f.ledger, &RECORDER).len(), 1);
}

#[test]
fn test_primary_batch_rolls_back_on_any_failure() {
    let mut f = Fixture::new();
    let receipt = f.call(
        PRIMARY,
        AccountCall::ExecuteBatchAsPrimary {
            targets: vec![RECORDER, REVERTER],
            values: Vec::new(),
            payloads: vec![b"a".to_vec(), b"b".to_vec()],
        },
    );
    assert!(!receipt.is_success());
    assert!(recorded_calls(&f.ledger, &RECORDER).is_empty());

    let receipt = f.call(
        PRIMARY,
        AccountCall::ExecuteBatchAsPrimary {
            targets: vec![RECORDER, RECORDER],
            values: Vec::new(),
            payloads: vec![b"a".to_vec()],
        },
    );
    assert_matches!(
        receipt.error(),
        Some(VestaError::MalformedBatch { targets: 2, payloads: 1, .. })
    );
}

#[test]
fn test_module_calls_fail_soft_and_emit_events() {
    let mut f = Fixture::new();
    f.enable_relay();

    let receipt = f.as_module(AccountCall::ExecuteAsModule(ModuleExecution::direct(
        REVERTER,
        0,
        Vec::new(),
    )));
    assert!(receipt.is_success());
    assert!(!receipt.outcome.decode::<bool>().unwrap());
    assert!(f.has_event(&Event::ModuleExecutionFailure { module: RELAY }));

    let receipt = f.as_module(AccountCall::ExecuteAsModuleReturnData(ModuleExecution::direct(
        RECORDER,
        0,
        b"echo".to_vec(),
    )));
    let (success, data) = receipt.outcome.decode::<(bool, Vec<u8>)>().unwrap();
    assert!(success);
    assert_eq!(data, b"echo".to_vec());
    assert!(f.has_event(&Event::ModuleExecutionSuccess { module: RELAY }));
}

#[test]
fn test_disabled_module_never_reaches_callee() {
    let mut f = Fixture::new();
    let receipt = f.as_module(AccountCall::ExecuteAsModule(ModuleExecution::direct(
        RECORDER,
        0,
        b"x".to_vec(),
    )));
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));
    assert!(recorded_calls(&f.ledger, &RECORDER).is_empty());

    f.enable_relay();
    let receipt = f.call(
        PRIMARY,
        AccountCall::DisableModule {
            prev: Address::SENTINEL,
            module: RELAY,
        },
    );
    assert!(receipt.is_success());
    let receipt = f.as_module(AccountCall::ExecuteAsModule(ModuleExecution::direct(
        RECORDER,
        0,
        b"x".to_vec(),
    )));
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));
    assert!(recorded_calls(&f.ledger, &RECORDER).is_empty());
}

#[test]
fn test_module_batch_returns_only_last_outcome() {
    let mut f = Fixture::new();
    f.enable_relay();

    let batch = |targets: Vec<Address>| AccountCall::ExecuteBatchAsModule {
        values: vec![0; targets.len()],
        payloads: vec![Vec::new(); targets.len()],
        kinds: vec![OperationKind::DirectCall; targets.len()],
        targets,
    };

    let receipt = f.as_module(batch(vec![REVERTER, RECORDER]));
    assert!(receipt.outcome.decode::<bool>().unwrap());
    assert!(f.has_event(&Event::ModuleExecutionFailure { module: RELAY }));

    let receipt = f.as_module(batch(vec![RECORDER, REVERTER]));
    assert!(!receipt.outcome.decode::<bool>().unwrap());
    assert_eq!(recorded_calls(&f.ledger, &RECORDER).len(), 2);

    let receipt = f.as_module(batch(Vec::new()));
    assert_matches!(receipt.error(), Some(VestaError::MalformedBatch { targets: 0, .. }));
}

#[test]
fn test_context_sharing_call_writes_account_storage() {
    let mut f = Fixture::new();
    f.enable_relay();
    let receipt = f.as_module(AccountCall::ExecuteAsModule(ModuleExecution::context_sharing(
        RECORDER,
        b"inside".to_vec(),
    )));
    assert!(receipt.outcome.decode::<bool>().unwrap());
    assert!(recorded_calls(&f.ledger, &RECORDER).is_empty());

    let calls = recorded_calls(&f.ledger, &ACCOUNT);
    assert_eq!(calls.len(), 1);
    // The account's own caller is preserved across the hop.
    assert_eq!(calls[0].caller, RELAY);
}

#[test]
fn test_capped_module_budget_fails_softly() {
    let mut f = Fixture::new();
    f.enable_relay();
    // The relay cannot pay for its own nested call.
    let nested = RelayCall::forward(RECORDER, b"x".to_vec());
    let receipt = f.as_module(AccountCall::ExecuteAsModule(
        ModuleExecution::direct(RELAY, 0, nested).with_budget(0),
    ));
    assert!(receipt.is_success());
    assert!(!receipt.outcome.decode::<bool>().unwrap());
    assert!(recorded_calls(&f.ledger, &RECORDER).is_empty());
}

#[test]
fn test_validation_routes_to_enabled_module() {
    let mut f = Fixture::new();
    let (operation, hash) = f.signed_operation(0, OWNERSHIP);
    let receipt = f.validate(operation, hash);
    assert_eq!(
        receipt.outcome.decode::<ValidationData>().unwrap(),
        ValidationData::ACCEPTED
    );

    let stranger = KeyTestFixture::from_seed_string("stranger");
    let operation = Operation::new(ACCOUNT, 1, Vec::new());
    let hash = operation.hash(&PRIMARY, f.ledger.config().chain_id);
    let operation = operation.with_envelope(&SignatureEnvelope::new(stranger.sign(&hash), OWNERSHIP));
    let receipt = f.validate(operation, hash);
    assert_eq!(
        receipt.outcome.decode::<ValidationData>().unwrap(),
        ValidationData::SIG_VALIDATION_FAILED
    );
}

#[test]
fn test_validity_window_passes_through_untouched() {
    let mut f = Fixture::new();
    let window = ValidityWindow::new(100, 200);
    let operation = Operation::new(ACCOUNT, 0, Vec::new());
    let hash = operation.hash(&PRIMARY, f.ledger.config().chain_id);
    let operation =
        operation.with_envelope(&SignatureEnvelope::new(f.owner.sign_within(&hash, window), OWNERSHIP));
    let verdict = f.validate(operation, hash).outcome.decode::<ValidationData>().unwrap();
    assert!(verdict.is_accepted());
    assert_eq!(verdict.window(), Some(window));
}

#[test]
fn test_validated_hash_is_rejected_on_second_attempt() {
    let mut f = Fixture::new();
    let (operation, hash) = f.signed_operation(0, OWNERSHIP);
    assert!(f.validate(operation.clone(), hash).is_success());

    // A different but otherwise valid signature over the same hash.
    let resigned = Operation {
        signature: SignatureEnvelope::new(
            f.owner.sign_within(&hash, ValidityWindow::new(0, 1_000)),
            OWNERSHIP,
        )
        .encode(),
        ..operation
    };
    let receipt = f.validate(resigned, hash);
    assert_eq!(
        receipt.outcome.decode::<ValidationData>().unwrap(),
        ValidationData::SIG_VALIDATION_FAILED
    );
}

#[test]
fn test_unknown_module_and_wrong_caller_are_rejected() {
    let mut f = Fixture::new();
    let (operation, hash) = f.signed_operation(0, RELAY);
    let receipt = f.validate(operation, hash);
    assert_eq!(
        receipt.error(),
        Some(VestaError::UnknownValidationModule { module: RELAY })
    );

    let (operation, hash) = f.signed_operation(0, OWNERSHIP);
    let receipt = f.call(
        OUTSIDER,
        AccountCall::ValidateOperation {
            operation,
            operation_hash: hash,
            missing_funds: 0,
        },
    );
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));
}

#[test]
fn test_validation_pays_missing_funds_best_effort() {
    let mut f = Fixture::new();
    f.ledger.fund(ACCOUNT, 100);
    let (operation, hash) = f.signed_operation(0, OWNERSHIP);
    let receipt = f.call(
        PRIMARY,
        AccountCall::ValidateOperation {
            operation,
            operation_hash: hash,
            missing_funds: 40,
        },
    );
    assert!(receipt.is_success());
    assert_eq!(f.ledger.balance(&PRIMARY), 40);

    let (operation, hash) = f.signed_operation(1, OWNERSHIP);
    let receipt = f.call(
        PRIMARY,
        AccountCall::ValidateOperation {
            operation,
            operation_hash: hash,
            missing_funds: 1_000,
        },
    );
    assert!(receipt.is_success());
    assert_eq!(f.ledger.balance(&ACCOUNT), 60);
}

#[test]
fn test_signature_queries_return_module_magic() {
    let f = Fixture::new();
    let digest = Hash32::digest(b"message");
    let good = SignatureEnvelope::new(f.owner.sign(&digest), OWNERSHIP).encode();
    let bad = SignatureEnvelope::new(f.owner.sign(&Hash32::digest(b"other")), OWNERSHIP).encode();

    let query = |signature: Vec<u8>| {
        f.ledger.query(
            OUTSIDER,
            ACCOUNT,
            &AccountCall::IsValidSignature {
                data_hash: digest,
                signature,
            }
            .encode_call(),
        )
    };
    assert_eq!(query(good).decode::<SignatureMagic>().unwrap(), SignatureMagic::VALID);
    assert_eq!(query(bad).decode::<SignatureMagic>().unwrap(), SignatureMagic::INVALID);

    let unknown = SignatureEnvelope::new(f.owner.sign(&digest), RELAY).encode();
    assert_eq!(
        query(unknown).error(),
        Some(VestaError::UnknownValidationModule { module: RELAY })
    );
}

#[test]
fn test_disable_checks_predecessor_and_pagination_walks_registry() {
    let mut f = Fixture::new();
    f.enable_relay();

    // Registry order: RELAY -> OWNERSHIP
    let receipt = f.call(
        PRIMARY,
        AccountCall::DisableModule {
            prev: Address::SENTINEL,
            module: OWNERSHIP,
        },
    );
    assert_eq!(
        receipt.error(),
        Some(VestaError::LinkageMismatch {
            expected: RELAY,
            actual: OWNERSHIP,
            prev: Address::SENTINEL,
        })
    );

    let page = f
        .ledger
        .query(
            OUTSIDER,
            ACCOUNT,
            &AccountCall::ModulesPaginated {
                start: Address::SENTINEL,
                page_size: 1,
            }
            .encode_call(),
        )
        .decode::<Page>()
        .unwrap();
    assert_eq!(page.modules, vec![RELAY]);
    assert_eq!(page.next, RELAY);

    let receipt = f.call(
        PRIMARY,
        AccountCall::DisableModule {
            prev: page.next,
            module: OWNERSHIP,
        },
    );
    assert!(receipt.is_success());
    assert!(f.has_event(&Event::ModuleDisabled { module: OWNERSHIP }));

    let zero_page = f.ledger.query(
        OUTSIDER,
        ACCOUNT,
        &AccountCall::ModulesPaginated {
            start: Address::SENTINEL,
            page_size: 0,
        }
        .encode_call(),
    );
    assert_matches!(zero_page.error(), Some(VestaError::Configuration { .. }));
}

#[test]
fn test_setup_and_enable_module_uses_setup_answer() {
    let mut f = Fixture::new();
    let receipt = f.call(
        OUTSIDER,
        AccountCall::SetupAndEnableModule {
            setup: RELAY,
            setup_data: RelayCall::Announce.encode_call(),
        },
    );
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));

    let receipt = f.call(
        PRIMARY,
        AccountCall::SetupAndEnableModule {
            setup: RELAY,
            setup_data: RelayCall::Announce.encode_call(),
        },
    );
    assert_eq!(receipt.outcome.decode::<Address>().unwrap(), RELAY);
    assert!(f.has_event(&Event::ModuleEnabled { module: RELAY }));

    let receipt = f.call(PRIMARY, AccountCall::EnableModule { module: RELAY });
    assert_eq!(receipt.error(), Some(VestaError::AlreadyEnabled { module: RELAY }));
}

#[test]
fn test_primary_authority_changes_only_through_self() {
    let mut f = Fixture::new();
    let next = Address::from_low_u64(0xe1);

    let receipt = f.call(PRIMARY, AccountCall::SetPrimaryAuthority { authority: next });
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));

    let receipt = f.call(
        PRIMARY,
        AccountCall::ExecuteAsPrimary {
            target: ACCOUNT,
            value: 0,
            payload: AccountCall::SetPrimaryAuthority { authority: next }.encode_call(),
        },
    );
    assert!(receipt.is_success());
    assert!(f.has_event(&Event::PrimaryAuthorityChanged {
        previous: PRIMARY,
        current: next,
    }));

    let current = f
        .ledger
        .query(OUTSIDER, ACCOUNT, &AccountCall::PrimaryAuthority.encode_call());
    assert_eq!(current.decode::<Address>().unwrap(), next);

    let receipt = f.call(
        PRIMARY,
        AccountCall::ExecuteAsPrimary {
            target: RECORDER,
            value: 0,
            payload: Vec::new(),
        },
    );
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));
}

#[test]
fn test_implementation_update_switches_logic() {
    let mut f = Fixture::new();
    let new_logic = Address::from_low_u64(0xa001);
    let other_authority = Address::from_low_u64(0xe2);
    install(&mut f.ledger, new_logic, SmartAccount::new(other_authority));

    let update = AccountCall::UpdateImplementation { logic: new_logic }.encode_call();
    let receipt = f.call(PRIMARY, AccountCall::UpdateImplementation { logic: new_logic });
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));

    let receipt = f.call(
        PRIMARY,
        AccountCall::ExecuteAsPrimary {
            target: ACCOUNT,
            value: 0,
            payload: update,
        },
    );
    assert!(receipt.is_success());
    assert!(f.has_event(&Event::ImplementationUpdated {
        previous: ACCOUNT,
        current: new_logic,
    }));

    let logic = f
        .ledger
        .query(OUTSIDER, ACCOUNT, &AccountCall::Implementation.encode_call());
    assert_eq!(logic.decode::<Address>().unwrap(), new_logic);

    // The new logic's default authority applies; no override was stored.
    let authority = f
        .ledger
        .query(OUTSIDER, ACCOUNT, &AccountCall::PrimaryAuthority.encode_call());
    assert_eq!(authority.decode::<Address>().unwrap(), other_authority);
}

#[test]
fn test_unrecognized_calls_reach_fallback_handler() {
    let mut f = Fixture::new();
    let input = RelayCall::Announce.encode_call();
    let receipt = f.ledger.transact(OUTSIDER, ACCOUNT, 0, &input);
    assert_eq!(receipt.into_result().unwrap(), input);

    let calls = recorded_calls(&f.ledger, &HANDLER);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].caller, ACCOUNT);
}

#[test]
fn test_plain_value_transfer_is_accepted() {
    let mut f = Fixture::new();
    f.ledger.fund(OUTSIDER, 5);
    assert!(f.ledger.transact(OUTSIDER, ACCOUNT, 5, &[]).is_success());
    assert_eq!(f.ledger.balance(&ACCOUNT), 5);
}

#[test]
fn test_recorded_calls_carry_ledger_time() {
    let mut f = Fixture::new();
    f.ledger.advance_time(50);
    let now = f.ledger.timestamp();
    let receipt = f.call(
        PRIMARY,
        AccountCall::ExecuteAsPrimary {
            target: RECORDER,
            value: 0,
            payload: Vec::new(),
        },
    );
    assert!(receipt.is_success());
    assert_eq!(recorded_calls(&f.ledger, &RECORDER)[0].timestamp, now);
}

/// Callees of the primary authority re-entering the account get no
/// privileges from the enclosing call.
#[test]
fn test_reentrant_callee_cannot_use_privileged_calls() {
    let mut f = Fixture::new();
    let reenter = |f: &mut Fixture, call: AccountCall| {
        f.call(
            PRIMARY,
            AccountCall::ExecuteAsPrimary {
                target: RELAY,
                value: 0,
                payload: RelayCall::forward(ACCOUNT, call.encode_call()),
            },
        )
    };

    let receipt = reenter(
        &mut f,
        AccountCall::Init {
            handler: HANDLER,
            module_setup: RELAY,
            module_setup_data: RelayCall::Announce.encode_call(),
        },
    );
    assert_matches!(receipt.error(), Some(VestaError::AlreadyInitialized));

    let receipt = reenter(&mut f, AccountCall::EnableModule { module: RELAY });
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));

    let receipt = reenter(&mut f, AccountCall::SetPrimaryAuthority { authority: RELAY });
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));

    let receipt = reenter(
        &mut f,
        AccountCall::ExecuteAsPrimary {
            target: RECORDER,
            value: 0,
            payload: Vec::new(),
        },
    );
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));

    assert!(!f.has_event(&Event::ModuleEnabled { module: RELAY }));
    let authority = f
        .ledger
        .query(OUTSIDER, ACCOUNT, &AccountCall::PrimaryAuthority.encode_call());
    assert_eq!(authority.decode::<Address>().unwrap(), PRIMARY);
    assert!(recorded_calls(&f.ledger, &RECORDER).is_empty());
}

/// Module authorization is checked once when a batch is dispatched. A batch
/// that disables its own module still runs to the end; later calls from the
/// module are refused.
#[test]
fn test_module_batch_disabling_its_module_runs_to_completion() {
    let mut f = Fixture::new();
    f.enable_relay();

    // Registry order: RELAY -> OWNERSHIP, so RELAY's predecessor is the sentinel.
    let disable_self = AccountCall::DisableModule {
        prev: Address::SENTINEL,
        module: RELAY,
    }
    .encode_call();
    let receipt = f.as_module(AccountCall::ExecuteBatchAsModule {
        targets: vec![ACCOUNT, RECORDER],
        values: vec![0, 0],
        payloads: vec![disable_self, b"after".to_vec()],
        kinds: vec![OperationKind::DirectCall; 2],
    });
    assert!(receipt.is_success(), "batch failed: {:?}", receipt.error());
    assert!(receipt.outcome.decode::<bool>().unwrap());
    assert!(f.has_event(&Event::ModuleDisabled { module: RELAY }));

    let calls = recorded_calls(&f.ledger, &RECORDER);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].input, b"after".to_vec());

    let receipt = f.as_module(AccountCall::ExecuteAsModule(ModuleExecution::direct(
        RECORDER,
        0,
        b"late".to_vec(),
    )));
    assert_matches!(receipt.error(), Some(VestaError::Authorization { .. }));
    assert_eq!(recorded_calls(&f.ledger, &RECORDER).len(), 1);
}
