//! Error kinds of spec §7, grouped by failure domain the way
//! `iroha_data_model::isi::error` groups `TypeError`/`MathError`/
//! `MintabilityError` instead of one crate-wide enum.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use displaydoc::Display;
#[cfg(feature = "std")]
use thiserror::Error;

use crate::value::TypeTag;

/// Failures of [`crate::value::to_i64`] / [`crate::value::as_set`].
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum TypeError {
    /// `to_i64` is undefined for type `{0:?}`
    NotComparable(TypeTag),
    /// expected a set-typed value, found `{0:?}`
    NotASet(TypeTag),
}

/// Failures of [`crate::restriction::validate_against_schema`] and of the
/// lifecycle's pre-condition checks at create/update time.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum ValidationError {
    /// operation type `{0}` is not registered
    UnknownOperation(u32),
    /// field `{0}` is not declared by this operation's schema
    UnknownField(String),
    /// type `{0:?}` is not supported by the value model for this restriction
    UnsupportedType(TypeTag),
    /// restriction applies a list predicate to non-list field `{0}` (declared type `{1:?}`)
    ListRestrictionOnNonList(String, TypeTag),
    /// `valid_from` must be earlier than `valid_to`
    InvalidWindow,
    /// account is reserved and cannot own a custom authority
    ReservedAccount,
    /// address-based authorities are not supported
    AddressAuthNotSupported,
    /// fee amount cannot be negative
    NegativeFee,
    /// operation submitted before the custom-authority hardfork is active
    HardforkNotYetActive,
}

/// Failures of [`crate::restriction::evaluate`] and of
/// [`crate::authority::CustomAuthority::validate`].
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum EvaluationError {
    /// field `{0}` is not declared by this operation's schema
    UnknownField(String),
    /// restriction failed: {kind} on field `{field}`: {detail}
    RestrictionFailed {
        /// index of the failing restriction within the authority's list
        index: usize,
        kind: &'static str,
        field: String,
        detail: String,
    },
    /// `to_i64` projection is undefined for field `{0}`
    TypeNotComparable(String),
    /// field `{0}` is not a set
    NotASet(String),
    /// `now` is outside the authority's validity window
    OutOfWindow,
    /// submitted operation's type does not match the authority's operation type
    OperationTypeMismatch,
}
