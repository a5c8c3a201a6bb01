//! The closed value model: every type a restriction can carry or read off
//! an operation field.
//!
//! `GenericValue` mirrors the closed `static_variant` the original engine
//! used (`generic_member` in the source), but as an ordinary tagged union
//! instead of a compile-time type list walked by visitors.

#[cfg(not(feature = "std"))]
use alloc::{
    collections::BTreeSet,
    string::{String, ToString},
    vec::Vec,
};
#[cfg(feature = "std")]
use std::collections::BTreeSet;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::EnumDiscriminants;

use crate::error::TypeError;

/// A public key, carried opaquely; the engine never verifies signatures,
/// only compares and stores key bytes.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct PublicKey(pub Vec<u8>);

/// Seconds since the Unix epoch, stored as `u32` per spec §6.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub struct TimePointSec(pub u32);

/// `amount` of `asset_id`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode)]
pub struct Asset {
    pub amount: i64,
    pub asset_id: u64,
}

/// A base/quote exchange rate between two assets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Price {
    pub base: Asset,
    pub quote: Asset,
}

/// A signed price feed submission, as published by a witness or committee
/// member for a market-pegged asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct PriceFeed {
    pub settlement_price: Price,
    pub maintenance_collateral_ratio: u16,
    pub maximum_short_squeeze_ratio: u16,
    pub core_exchange_rate: Price,
}

/// A signed share amount; distinct from the unsigned ids and integers
/// above because the chain tracks it as its own reflected type upstream.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub struct ShareType(pub i64);

/// Initializer for a linear vesting policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct VestingPolicyInit {
    pub begin_timestamp: u32,
    pub vesting_cliff_seconds: u32,
    pub vesting_duration_seconds: u32,
}

/// Initializer for a worker proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct WorkerInit {
    pub work_begin_date: u32,
    pub work_end_date: u32,
    pub daily_pay: i64,
    pub name: String,
    pub url: String,
}

/// Opaque, unparsed extension bytes. Never value-model supported for
/// `Eq`/`Neq`/`AnyOf`/`NoneOf` (see [`TypeTag::is_value_model_supported`]),
/// but still sizeable via [`to_i64`].
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct Extensions(pub Vec<u8>);

/// As [`Extensions`], reserved for a future protocol version's extension
/// point.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct FutureExtensions(pub Vec<u8>);

/// A weighted multi-signature authority. `address_auths` is carried for
/// wire compatibility only; the lifecycle rejects any authority whose
/// `address_auths` is non-empty (see [`crate::authority`]).
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct Authority {
    pub weight_threshold: u32,
    pub account_auths: Vec<(u64, u16)>,
    pub key_auths: Vec<(PublicKey, u16)>,
    pub address_auths: Vec<(Vec<u8>, u16)>,
}

impl Authority {
    pub fn num_auths(&self) -> u64 {
        (self.account_auths.len() + self.key_auths.len() + self.address_auths.len()) as u64
    }
}

/// Opaque nested-predicate payload, used only by [`crate::restriction::Restriction::AttributeAssert`].
/// Never value-model supported for scalar predicates.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct PredicateList(pub Vec<u8>);

/// The closed union of values a restriction may carry or a field may hold.
///
/// Equality is defined for every variant (cross-variant comparisons are
/// always `false`, see [`equal`]); ordering is not defined on the type
/// itself; ordered predicates project through [`to_i64`] instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode, EnumDiscriminants)]
#[strum_discriminants(name(TypeTag))]
#[strum_discriminants(derive(Hash, PartialOrd, Ord))]
pub enum GenericValue {
    U8(u8),
    U16(u16),
    U32(u32),
    UnsignedVarInt(u64),

    AssetId(u64),
    AccountId(u64),
    BalanceId(u64),
    ProposalId(u64),
    FbaAccumulatorId(u64),
    LimitOrderId(u64),
    WithdrawPermissionId(u64),
    WitnessId(u64),
    ForceSettlementId(u64),
    CommitteeMemberId(u64),

    PublicKey(PublicKey),
    TimePointSec(TimePointSec),
    Bool(bool),

    Bytes(Vec<u8>),
    Text(String),

    Asset(Asset),
    Price(Price),
    PriceFeed(PriceFeed),
    ShareType(ShareType),
    VestingPolicyInit(VestingPolicyInit),
    WorkerInit(WorkerInit),
    Extensions(Extensions),
    FutureExtensions(FutureExtensions),
    Authority(Authority),
    PredicateList(PredicateList),

    AccountIdSet(BTreeSet<u64>),
    PublicKeySet(BTreeSet<PublicKey>),
}

impl GenericValue {
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::from(self)
    }
}

impl TypeTag {
    /// Is this type one the value model accepts for `Eq`/`Neq`/`AnyOf`/
    /// `NoneOf` restrictions? Rejects the three types spec §4.3 names
    /// explicitly (`Extensions`, `FutureExtensions`, `PredicateList`).
    pub fn is_value_model_supported(self) -> bool {
        !matches!(
            self,
            TypeTag::Extensions | TypeTag::FutureExtensions | TypeTag::PredicateList
        )
    }

    /// Is this a set-typed field, eligible for `ContainsAll`/`ContainsNone`?
    pub fn is_set(self) -> bool {
        matches!(self, TypeTag::AccountIdSet | TypeTag::PublicKeySet)
    }

    /// The element type of a set-typed field, if any.
    pub fn set_element_type(self) -> Option<TypeTag> {
        match self {
            TypeTag::AccountIdSet => Some(TypeTag::AccountId),
            TypeTag::PublicKeySet => Some(TypeTag::PublicKey),
            _ => None,
        }
    }
}

/// `true` iff `a` and `b` are the same variant and that variant's defined
/// equality holds. Cross-variant comparisons are always `false`; this is
/// a type mismatch, not an error (spec §3).
pub fn equal(a: &GenericValue, b: &GenericValue) -> bool {
    use GenericValue::*;
    match (a, b) {
        (U8(x), U8(y)) => x == y,
        (U16(x), U16(y)) => x == y,
        (U32(x), U32(y)) => x == y,
        (UnsignedVarInt(x), UnsignedVarInt(y)) => x == y,
        (AssetId(x), AssetId(y)) => x == y,
        (AccountId(x), AccountId(y)) => x == y,
        (BalanceId(x), BalanceId(y)) => x == y,
        (ProposalId(x), ProposalId(y)) => x == y,
        (FbaAccumulatorId(x), FbaAccumulatorId(y)) => x == y,
        (LimitOrderId(x), LimitOrderId(y)) => x == y,
        (WithdrawPermissionId(x), WithdrawPermissionId(y)) => x == y,
        (WitnessId(x), WitnessId(y)) => x == y,
        (ForceSettlementId(x), ForceSettlementId(y)) => x == y,
        (CommitteeMemberId(x), CommitteeMemberId(y)) => x == y,
        (PublicKey(x), PublicKey(y)) => x == y,
        (TimePointSec(x), TimePointSec(y)) => x == y,
        (Bool(x), Bool(y)) => x == y,
        (Bytes(x), Bytes(y)) => x == y,
        (Text(x), Text(y)) => x == y,
        (Asset(x), Asset(y)) => x == y,
        (Price(x), Price(y)) => x == y,
        (PriceFeed(x), PriceFeed(y)) => x == y,
        (ShareType(x), ShareType(y)) => x == y,
        (VestingPolicyInit(x), VestingPolicyInit(y)) => x == y,
        (WorkerInit(x), WorkerInit(y)) => x == y,
        (Extensions(x), Extensions(y)) => x == y,
        (FutureExtensions(x), FutureExtensions(y)) => x == y,
        (Authority(x), Authority(y)) => x == y,
        (PredicateList(x), PredicateList(y)) => x == y,
        (AccountIdSet(x), AccountIdSet(y)) => x == y,
        (PublicKeySet(x), PublicKeySet(y)) => x == y,
        _ => false,
    }
}

/// Projects `v` onto a 64-bit integer so ordered predicates (`Lt`…`Ge`)
/// can compare otherwise-incomparable values.
///
/// Preserves the source's oddity verbatim (spec §4.1, §9): numeric
/// variants cast directly; `Text`/`Bytes`/sets measure element count;
/// every domain struct measures its *serialized byte size*, not its
/// semantic magnitude. Undefined for `Bool`, keys, ids, and time.
pub fn to_i64(v: &GenericValue) -> Result<i64, TypeError> {
    use GenericValue::*;
    match v {
        U8(x) => Ok(i64::from(*x)),
        U16(x) => Ok(i64::from(*x)),
        U32(x) => Ok(i64::from(*x)),
        UnsignedVarInt(x) => Ok(*x as i64),

        Bytes(x) => Ok(x.len() as i64),
        Text(x) => Ok(x.chars().count() as i64),
        AccountIdSet(x) => Ok(x.len() as i64),
        PublicKeySet(x) => Ok(x.len() as i64),

        Asset(x) => Ok(x.encode().len() as i64),
        Price(x) => Ok(x.encode().len() as i64),
        PriceFeed(x) => Ok(x.encode().len() as i64),
        ShareType(x) => Ok(x.encode().len() as i64),
        VestingPolicyInit(x) => Ok(x.encode().len() as i64),
        WorkerInit(x) => Ok(x.encode().len() as i64),
        Extensions(x) => Ok(x.encode().len() as i64),
        FutureExtensions(x) => Ok(x.encode().len() as i64),
        Authority(x) => Ok(x.encode().len() as i64),
        PredicateList(x) => Ok(x.encode().len() as i64),

        AssetId(_) | AccountId(_) | BalanceId(_) | ProposalId(_) | FbaAccumulatorId(_)
        | LimitOrderId(_) | WithdrawPermissionId(_) | WitnessId(_) | ForceSettlementId(_)
        | CommitteeMemberId(_) | PublicKey(_) | TimePointSec(_) | Bool(_) => {
            Err(TypeError::NotComparable(v.type_tag()))
        }
    }
}

/// Lifts the elements of a set-typed value back into [`GenericValue`]s so
/// they can be compared against restriction operands with [`equal`].
/// Fails for any non-set variant.
pub fn as_set(v: &GenericValue) -> Result<Vec<GenericValue>, TypeError> {
    match v {
        GenericValue::AccountIdSet(set) => {
            Ok(set.iter().copied().map(GenericValue::AccountId).collect())
        }
        GenericValue::PublicKeySet(set) => Ok(set
            .iter()
            .cloned()
            .map(GenericValue::PublicKey)
            .collect()),
        other => Err(TypeError::NotASet(other.type_tag())),
    }
}
