//! A restriction engine for user-defined custom authorities: accounts bind
//! a policy (target operation type, validity window, and a list of
//! predicates over that operation's fields), and the embedding chain
//! evaluates the policy against each submitted operation before it is
//! allowed to authorize a transaction.
//!
//! The crate is split the way the engine's own pipeline is: [`value`] is
//! the closed value model every predicate operand and operation field is
//! drawn from, [`schema`] is the closed operation catalog and its
//! reflection-free field dispatch, [`restriction`] is the predicate
//! language itself (static validation plus dynamic evaluation), and
//! [`authority`] is the lifecycle (create, update, delete) built on top
//! of the other three. [`fee`] and [`config`] supply the ambient
//! parameters those lifecycle operations consult.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod authority;
pub mod config;
pub mod error;
pub mod fee;
pub mod restriction;
pub mod schema;
pub mod value;

pub use authority::{AuthorityStore, CreateOp, CustomAuthority, CustomAuthorityId, DeleteOp, UpdateOp};
pub use error::{EvaluationError, TypeError, ValidationError};
pub use fee::FeeParameters;
pub use restriction::Restriction;
pub use schema::Operation;
pub use value::GenericValue;
