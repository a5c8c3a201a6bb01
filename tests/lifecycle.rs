use std::collections::BTreeSet;

use custom_authority::{
    authority::{AuthorityStore, CreateOp, DeleteOp},
    config,
    error::ValidationError,
    restriction::Restriction,
    schema::{self, op_type, Assert, Operation, Transfer},
    value::{Asset, Authority, GenericValue, TimePointSec},
};

fn transfer(amount: i64) -> Operation {
    Operation::Transfer(Transfer {
        from: 1,
        to: 2,
        amount: Asset {
            amount,
            asset_id: 0,
        },
        memo: None,
    })
}

// S1: create a custom authority, confirm it is retrievable by account.
#[test]
fn create_and_list_by_account() {
    let op = CreateOp {
        fee: 0,
        account: 42,
        enabled: true,
        valid_from: TimePointSec(100),
        valid_to: TimePointSec(200),
        operation_type: op_type::TRANSFER,
        restrictions: vec![Restriction::Lt {
            field: "amount".into(),
            threshold: 1000,
        }],
        auth: Authority::default(),
    };
    op.validate().expect("well-formed create should validate");

    let mut store = AuthorityStore::new();
    let id = op.apply(&mut store);

    let owned = store.by_account(42);
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, id);

    let applicable = store.applicable(42, &transfer(500), TimePointSec(150));
    assert_eq!(applicable.len(), 1);

    let out_of_window = store.applicable(42, &transfer(500), TimePointSec(9999));
    assert!(out_of_window.is_empty());

    let over_limit = store.applicable(42, &transfer(5000), TimePointSec(150));
    assert!(over_limit.is_empty());
}

// S2: reserved accounts can never own a custom authority.
#[test]
fn reserved_account_cannot_create() {
    for account in [
        config::TEMP_ACCOUNT,
        config::COMMITTEE_ACCOUNT,
        config::WITNESS_ACCOUNT,
        config::RELAXED_COMMITTEE_ACCOUNT,
    ] {
        let op = CreateOp {
            fee: 0,
            account,
            enabled: true,
            valid_from: TimePointSec(1),
            valid_to: TimePointSec(2),
            operation_type: op_type::TRANSFER,
            restrictions: vec![],
            auth: Authority::default(),
        };
        assert_eq!(op.validate(), Err(ValidationError::ReservedAccount));
    }
}

// S6: every static-validation rule rejects at create time, before any
// operation is ever evaluated against the stored record.
#[test]
fn static_validation_rejects_malformed_authorities() {
    let unsupported_schema_field = CreateOp {
        fee: 0,
        account: 7,
        enabled: true,
        valid_from: TimePointSec(1),
        valid_to: TimePointSec(2),
        operation_type: 9999, // unregistered
        restrictions: vec![],
        auth: Authority::default(),
    };
    assert_eq!(
        unsupported_schema_field.validate(),
        Err(ValidationError::UnknownOperation(9999))
    );

    let unknown_field = CreateOp {
        fee: 0,
        account: 7,
        enabled: true,
        valid_from: TimePointSec(1),
        valid_to: TimePointSec(2),
        operation_type: op_type::TRANSFER,
        restrictions: vec![Restriction::Eq {
            field: "does_not_exist".into(),
            value: GenericValue::Bool(true),
        }],
        auth: Authority::default(),
    };
    assert_eq!(
        unknown_field.validate(),
        Err(ValidationError::UnknownField("does_not_exist".into()))
    );

    let list_on_scalar = CreateOp {
        fee: 0,
        account: 7,
        enabled: true,
        valid_from: TimePointSec(1),
        valid_to: TimePointSec(2),
        operation_type: op_type::TRANSFER,
        restrictions: vec![Restriction::ContainsAll {
            field: "amount".into(),
            values: vec![],
        }],
        auth: Authority::default(),
    };
    assert!(matches!(
        list_on_scalar.validate(),
        Err(ValidationError::ListRestrictionOnNonList(_, _))
    ));

    let negative_fee = CreateOp {
        fee: -1,
        account: 7,
        enabled: true,
        valid_from: TimePointSec(1),
        valid_to: TimePointSec(2),
        operation_type: op_type::TRANSFER,
        restrictions: vec![],
        auth: Authority::default(),
    };
    assert_eq!(negative_fee.validate(), Err(ValidationError::NegativeFee));
}

// Invariant 7: (de)serializing a custom authority round-trips, both over
// the wire-facing SCALE codec and the human-facing JSON encoding.
#[test]
fn custom_authority_round_trips() {
    use parity_scale_codec::{Decode, Encode};

    let op = CreateOp {
        fee: 0,
        account: 7,
        enabled: true,
        valid_from: TimePointSec(10),
        valid_to: TimePointSec(20),
        operation_type: op_type::ASSERT,
        restrictions: vec![
            Restriction::ContainsAll {
                field: "required_auths".into(),
                values: vec![GenericValue::AccountId(1), GenericValue::AccountId(2)],
            },
            Restriction::Ge {
                field: "fee_paying_account".into(),
                threshold: 0,
            },
        ],
        auth: Authority::default(),
    };
    let mut store = AuthorityStore::new();
    let id = op.apply(&mut store);
    let record = store.get(id).unwrap().clone();

    let encoded = record.encode();
    let decoded = custom_authority::CustomAuthority::decode(&mut &encoded[..]).unwrap();
    assert_eq!(record, decoded);

    let json = serde_json::to_string(&record).unwrap();
    let from_json: custom_authority::CustomAuthority = serde_json::from_str(&json).unwrap();
    assert_eq!(record, from_json);
}

// Invariant 8: create followed by delete leaves the store as if the
// authority had never existed.
#[test]
fn create_then_delete_leaves_no_trace() {
    let op = CreateOp {
        fee: 0,
        account: 7,
        enabled: true,
        valid_from: TimePointSec(1),
        valid_to: TimePointSec(2),
        operation_type: op_type::TRANSFER,
        restrictions: vec![],
        auth: Authority::default(),
    };
    let mut store = AuthorityStore::new();
    let id = op.apply(&mut store);
    assert_eq!(store.by_account(7).len(), 1);

    let delete = DeleteOp {
        fee: 0,
        account: 7,
        custom_authority_id: id,
    };
    delete.validate().unwrap();
    delete.apply(&mut store);

    assert!(store.get(id).is_none());
    assert!(store.by_account(7).is_empty());
}

// An authority bound to `assert` never becomes applicable to a `transfer`,
// even when every restriction it carries would otherwise be satisfied.
#[test]
fn authority_never_crosses_operation_types() {
    let op = CreateOp {
        fee: 0,
        account: 7,
        enabled: true,
        valid_from: TimePointSec(1),
        valid_to: TimePointSec(100),
        operation_type: op_type::ASSERT,
        restrictions: vec![],
        auth: Authority::default(),
    };
    let mut store = AuthorityStore::new();
    op.apply(&mut store);

    let applicable = store.applicable(7, &transfer(1), TimePointSec(50));
    assert!(applicable.is_empty());

    let assert_op = Operation::Assert(Assert {
        fee_paying_account: 7,
        required_auths: BTreeSet::new(),
        required_key_auths: BTreeSet::new(),
    });
    let applicable = store.applicable(7, &assert_op, TimePointSec(50));
    assert_eq!(applicable.len(), 1);
    let _ = schema::schema_of(&assert_op);
}
