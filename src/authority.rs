//! Custom-authority record and lifecycle (spec §3, §4.4).
//!
//! Grounded on `custom_authority_object.cpp` (the `validate(op, now)`
//! entrypoint) and `custom_authority_evaluator.cpp` (the create/update/
//! delete `do_evaluate`/`do_apply` pairs), reworked into plain library
//! methods: `do_evaluate` becomes `validate()`, `do_apply` becomes
//! `apply()`, matching the precondition-then-mutation split
//! `iroha_core`'s evaluators use.

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config,
    error::{EvaluationError, ValidationError},
    fee::{self, FeeParameters},
    restriction::{self, Restriction},
    schema::{self, Operation},
    value::{Authority, TimePointSec},
};

/// Stable identifier of a stored [`CustomAuthority`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct CustomAuthorityId(pub u64);

/// A stored custom-authority record (spec §3).
///
/// Serialized field order is `id, account, enabled, valid_from, valid_to,
/// operation_type, restrictions` (spec §6); this is consensus-visible,
/// do not reorder the struct's fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct CustomAuthority {
    pub id: CustomAuthorityId,
    pub account: u64,
    pub enabled: bool,
    pub valid_from: TimePointSec,
    pub valid_to: TimePointSec,
    pub operation_type: u32,
    pub restrictions: Vec<Restriction>,
}

impl CustomAuthority {
    /// The authority-against-operation entrypoint used by the transaction
    /// pipeline (spec §4.4). Does **not** check `enabled`; the caller
    /// filters on that before invoking this (spec §9).
    pub fn validate(&self, op: &Operation, now: TimePointSec) -> Result<(), EvaluationError> {
        if now.0 < self.valid_from.0 || now.0 > self.valid_to.0 {
            return Err(EvaluationError::OutOfWindow);
        }
        if op.op_type_id() != self.operation_type {
            return Err(EvaluationError::OperationTypeMismatch);
        }
        for (index, r) in self.restrictions.iter().enumerate() {
            restriction::evaluate(r, op, index)?;
        }
        Ok(())
    }
}

fn validate_common(
    account: u64,
    valid_from: TimePointSec,
    valid_to: TimePointSec,
    operation_type: u32,
    restrictions: &[Restriction],
) -> Result<(), ValidationError> {
    if config::is_reserved(account) {
        return Err(ValidationError::ReservedAccount);
    }
    if valid_from.0 >= valid_to.0 {
        return Err(ValidationError::InvalidWindow);
    }
    let schema = schema::schema_by_id(operation_type)
        .ok_or(ValidationError::UnknownOperation(operation_type))?;
    for r in restrictions {
        restriction::validate_against_schema(r, schema)?;
    }
    Ok(())
}

/// Creates a new [`CustomAuthority`] (spec §4.4).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateOp {
    pub fee: i64,
    pub account: u64,
    pub enabled: bool,
    pub valid_from: TimePointSec,
    pub valid_to: TimePointSec,
    pub operation_type: u32,
    pub restrictions: Vec<Restriction>,
    pub auth: Authority,
}

impl CreateOp {
    /// Static validation: fee non-negative, account not reserved, window
    /// well-formed, every restriction valid against the target schema,
    /// and (spec `SPEC_FULL.md` §C) `auth.address_auths` empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fee < 0 {
            return Err(ValidationError::NegativeFee);
        }
        if !self.auth.address_auths.is_empty() {
            return Err(ValidationError::AddressAuthNotSupported);
        }
        validate_common(
            self.account,
            self.valid_from,
            self.valid_to,
            self.operation_type,
            &self.restrictions,
        )
    }

    /// The hardfork gate (spec §6): rejected if the head block time is at
    /// or before the activation instant.
    pub fn check_hardfork(&self, head_block_time: TimePointSec) -> Result<(), ValidationError> {
        if head_block_time.0 <= config::HARDFORK_CORE_1285_TIME.0 {
            return Err(ValidationError::HardforkNotYetActive);
        }
        Ok(())
    }

    pub fn calculate_fee(&self, params: &FeeParameters) -> u64 {
        let window_seconds = (self.valid_to.0 - self.valid_from.0) as u64;
        fee::create_fee(
            params,
            self.enabled,
            window_seconds,
            &self.auth,
            &self.restrictions,
        )
    }

    /// Inserts a new record into `store` and returns its fresh id.
    pub fn apply(&self, store: &mut AuthorityStore) -> CustomAuthorityId {
        let id = store.next_id();
        let record = CustomAuthority {
            id,
            account: self.account,
            enabled: self.enabled,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            operation_type: self.operation_type,
            restrictions: self.restrictions.clone(),
        };
        debug!(account = self.account, ?id, "creating custom authority");
        store.insert(record);
        id
    }
}

/// Replaces every mutable field of a referenced [`CustomAuthority`] (spec
/// §4.4). `delta_units` is an opaque fee-calculation cost parameter only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateOp {
    pub fee: i64,
    pub account: u64,
    pub custom_authority_id: CustomAuthorityId,
    pub enabled: bool,
    pub valid_from: TimePointSec,
    pub valid_to: TimePointSec,
    pub operation_type: u32,
    pub restrictions: Vec<Restriction>,
    pub delta_units: u64,
}

impl UpdateOp {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fee < 0 {
            return Err(ValidationError::NegativeFee);
        }
        validate_common(
            self.account,
            self.valid_from,
            self.valid_to,
            self.operation_type,
            &self.restrictions,
        )
    }

    pub fn check_hardfork(&self, head_block_time: TimePointSec) -> Result<(), ValidationError> {
        if head_block_time.0 <= config::HARDFORK_CORE_1285_TIME.0 {
            return Err(ValidationError::HardforkNotYetActive);
        }
        Ok(())
    }

    pub fn calculate_fee(&self, params: &FeeParameters) -> u64 {
        fee::update_fee(params, self.delta_units)
    }

    /// Replaces every field but `id` on the referenced record. Fails if
    /// the id is not present in `store`.
    pub fn apply(&self, store: &mut AuthorityStore) -> Result<(), EvaluationError> {
        let old_account = store
            .get_mut(self.custom_authority_id)
            .ok_or(EvaluationError::UnknownField("custom_authority_id".into()))?
            .account;
        if old_account != self.account {
            store.reindex_account(self.custom_authority_id, old_account, self.account);
        }
        let record = store
            .get_mut(self.custom_authority_id)
            .expect("just looked up by the same id");
        record.account = self.account;
        record.enabled = self.enabled;
        record.valid_from = self.valid_from;
        record.valid_to = self.valid_to;
        record.operation_type = self.operation_type;
        record.restrictions = self.restrictions.clone();
        debug!(id = ?self.custom_authority_id, "updated custom authority");
        Ok(())
    }
}

/// Destroys a [`CustomAuthority`] (spec §4.4). Validation is trivial.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteOp {
    pub fee: i64,
    pub account: u64,
    pub custom_authority_id: CustomAuthorityId,
}

impl DeleteOp {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fee < 0 {
            return Err(ValidationError::NegativeFee);
        }
        Ok(())
    }

    pub fn check_hardfork(&self, head_block_time: TimePointSec) -> Result<(), ValidationError> {
        if head_block_time.0 <= config::HARDFORK_CORE_1285_TIME.0 {
            return Err(ValidationError::HardforkNotYetActive);
        }
        Ok(())
    }

    pub fn calculate_fee(&self, params: &FeeParameters) -> u64 {
        fee::delete_fee(params)
    }

    pub fn apply(&self, store: &mut AuthorityStore) {
        if store.remove(self.custom_authority_id).is_none() {
            warn!(id = ?self.custom_authority_id, "deleting custom authority that was not found");
        }
    }
}

/// In-memory stand-in for the chain-database index "by account" spec §3
/// requires the transaction pipeline to have; the engine itself makes no
/// assumptions about how the host stores records (spec §5).
#[derive(Clone, Debug, Default)]
pub struct AuthorityStore {
    records: BTreeMap<u64, CustomAuthority>,
    by_account: BTreeMap<u64, Vec<u64>>,
    next_id: u64,
}

impl AuthorityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> CustomAuthorityId {
        let id = self.next_id;
        self.next_id += 1;
        CustomAuthorityId(id)
    }

    fn insert(&mut self, record: CustomAuthority) {
        self.by_account
            .entry(record.account)
            .or_default()
            .push(record.id.0);
        self.records.insert(record.id.0, record);
    }

    pub fn get(&self, id: CustomAuthorityId) -> Option<&CustomAuthority> {
        self.records.get(&id.0)
    }

    fn get_mut(&mut self, id: CustomAuthorityId) -> Option<&mut CustomAuthority> {
        self.records.get_mut(&id.0)
    }

    /// Moves `id` from `old_account`'s index entry to `new_account`'s.
    /// Does not touch `self.records`; callers update the record's own
    /// `account` field separately.
    fn reindex_account(&mut self, id: CustomAuthorityId, old_account: u64, new_account: u64) {
        if let Some(ids) = self.by_account.get_mut(&old_account) {
            ids.retain(|i| *i != id.0);
        }
        self.by_account.entry(new_account).or_default().push(id.0);
    }

    fn remove(&mut self, id: CustomAuthorityId) -> Option<CustomAuthority> {
        let record = self.records.remove(&id.0)?;
        if let Some(ids) = self.by_account.get_mut(&record.account) {
            ids.retain(|i| *i != id.0);
        }
        Some(record)
    }

    /// All authorities owned by `account`, cheap to enumerate (spec §3:
    /// "index by `account`").
    pub fn by_account(&self, account: u64) -> Vec<&CustomAuthority> {
        self.by_account
            .get(&account)
            .into_iter()
            .flatten()
            .filter_map(|id| self.records.get(id))
            .collect()
    }

    /// Authorities the transaction pipeline would apply for `op` at `now`:
    /// enabled, in-window, matching operation type (spec §2's "data flow
    /// at operation submission").
    pub fn applicable(
        &self,
        account: u64,
        op: &Operation,
        now: TimePointSec,
    ) -> Vec<&CustomAuthority> {
        self.by_account(account)
            .into_iter()
            .filter(|a| a.enabled)
            .filter(|a| a.validate(op, now).is_ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Asset, GenericValue};

    fn transfer_op(amount: i64) -> Operation {
        Operation::Transfer(crate::schema::Transfer {
            from: 1,
            to: 2,
            amount: Asset {
                amount,
                asset_id: 0,
            },
            memo: None,
        })
    }

    // S1
    #[test]
    fn create_then_query_by_account() {
        let op = CreateOp {
            fee: 0,
            account: 42, // "dan"
            enabled: true,
            valid_from: TimePointSec(1),
            valid_to: TimePointSec(2),
            operation_type: schema::op_type::TRANSFER,
            restrictions: vec![Restriction::Eq {
                field: "amount".into(),
                value: GenericValue::Asset(Asset {
                    amount: 100,
                    asset_id: 0,
                }),
            }],
            auth: Authority::default(),
        };
        op.validate().unwrap();

        let mut store = AuthorityStore::new();
        let id = op.apply(&mut store);

        let found = store.by_account(42);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(found[0].restrictions, op.restrictions);
    }

    // S2
    #[test]
    fn create_for_reserved_account_fails() {
        let op = CreateOp {
            fee: 0,
            account: config::COMMITTEE_ACCOUNT,
            enabled: true,
            valid_from: TimePointSec(1),
            valid_to: TimePointSec(2),
            operation_type: schema::op_type::TRANSFER,
            restrictions: vec![],
            auth: Authority::default(),
        };
        assert_eq!(op.validate(), Err(ValidationError::ReservedAccount));
    }

    #[test]
    fn invalid_window_rejected() {
        let op = CreateOp {
            fee: 0,
            account: 7,
            enabled: true,
            valid_from: TimePointSec(5),
            valid_to: TimePointSec(5),
            operation_type: schema::op_type::TRANSFER,
            restrictions: vec![],
            auth: Authority::default(),
        };
        assert_eq!(op.validate(), Err(ValidationError::InvalidWindow));
    }

    #[test]
    fn address_auth_rejected() {
        let mut auth = Authority::default();
        auth.address_auths.push((vec![1, 2, 3], 1));
        let op = CreateOp {
            fee: 0,
            account: 7,
            enabled: true,
            valid_from: TimePointSec(1),
            valid_to: TimePointSec(2),
            operation_type: schema::op_type::TRANSFER,
            restrictions: vec![],
            auth,
        };
        assert_eq!(op.validate(), Err(ValidationError::AddressAuthNotSupported));
    }

    #[test]
    fn authority_validate_checks_window_then_type_then_restrictions() {
        let authority = CustomAuthority {
            id: CustomAuthorityId(1),
            account: 42,
            enabled: true,
            valid_from: TimePointSec(10),
            valid_to: TimePointSec(20),
            operation_type: schema::op_type::TRANSFER,
            restrictions: vec![Restriction::Eq {
                field: "amount".into(),
                value: GenericValue::Asset(Asset {
                    amount: 5,
                    asset_id: 0,
                }),
            }],
        };

        assert_eq!(
            authority.validate(&transfer_op(5), TimePointSec(5)),
            Err(EvaluationError::OutOfWindow)
        );
        assert!(authority.validate(&transfer_op(5), TimePointSec(15)).is_ok());
        assert!(authority
            .validate(&transfer_op(6), TimePointSec(15))
            .is_err());

        let account_op = Operation::AccountCreate(crate::schema::AccountCreate {
            registrar: 1,
            referrer: 2,
            referrer_percent: 1,
            name: "x".into(),
            owner: Authority::default(),
            active: Authority::default(),
        });
        assert_eq!(
            authority.validate(&account_op, TimePointSec(15)),
            Err(EvaluationError::OperationTypeMismatch)
        );
    }

    #[test]
    fn create_then_delete_is_a_no_op() {
        let op = CreateOp {
            fee: 0,
            account: 7,
            enabled: true,
            valid_from: TimePointSec(1),
            valid_to: TimePointSec(2),
            operation_type: schema::op_type::TRANSFER,
            restrictions: vec![],
            auth: Authority::default(),
        };
        let mut store = AuthorityStore::new();
        let id = op.apply(&mut store);
        assert!(store.get(id).is_some());

        let del = DeleteOp {
            fee: 0,
            account: 7,
            custom_authority_id: id,
        };
        del.validate().unwrap();
        del.apply(&mut store);
        assert!(store.get(id).is_none());
        assert!(store.by_account(7).is_empty());
    }

    #[test]
    fn update_replaces_all_fields_but_id() {
        let create = CreateOp {
            fee: 0,
            account: 7,
            enabled: true,
            valid_from: TimePointSec(1),
            valid_to: TimePointSec(2),
            operation_type: schema::op_type::TRANSFER,
            restrictions: vec![],
            auth: Authority::default(),
        };
        let mut store = AuthorityStore::new();
        let id = create.apply(&mut store);

        let update = UpdateOp {
            fee: 0,
            account: 8,
            custom_authority_id: id,
            enabled: false,
            valid_from: TimePointSec(3),
            valid_to: TimePointSec(4),
            operation_type: schema::op_type::ASSERT,
            restrictions: vec![],
            delta_units: 0,
        };
        update.validate().unwrap();
        update.apply(&mut store).unwrap();

        let record = store.get(id).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.account, 8);
        assert!(!record.enabled);
        assert_eq!(record.operation_type, schema::op_type::ASSERT);
        assert!(store.by_account(7).is_empty());
        assert_eq!(store.by_account(8).len(), 1);
    }
}
