//! Process-wide configuration constants (spec §6).
//!
//! These are genuinely configuration, not chain state; the embedding
//! system supplies them once at startup, the way `iroha_config` builds its
//! typed config structures once and treats them as read-only thereafter.
//! This crate has no file-based config surface of its own; the values
//! below are its compiled-in defaults.

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeSet;
#[cfg(feature = "std")]
use std::collections::BTreeSet;

use once_cell::sync::Lazy;

use crate::value::TimePointSec;

/// `GRAPHENE_TEMP_ACCOUNT` and friends: account ids whose owner is the
/// protocol, not a user. A custom authority may never be created for one
/// of these (spec §6, §3 invariants).
pub static RESERVED_ACCOUNTS: Lazy<BTreeSet<u64>> = Lazy::new(|| {
    let mut set = BTreeSet::new();
    set.insert(TEMP_ACCOUNT);
    set.insert(COMMITTEE_ACCOUNT);
    set.insert(WITNESS_ACCOUNT);
    set.insert(RELAXED_COMMITTEE_ACCOUNT);
    set
});

pub const TEMP_ACCOUNT: u64 = 0;
pub const COMMITTEE_ACCOUNT: u64 = 1;
pub const WITNESS_ACCOUNT: u64 = 2;
pub const RELAXED_COMMITTEE_ACCOUNT: u64 = 3;

pub fn is_reserved(account: u64) -> bool {
    RESERVED_ACCOUNTS.contains(&account)
}

/// `HARDFORK_CORE_1285_TIME`: the instant after which custom-authority
/// lifecycle operations may execute. The activation instant is
/// configuration, not state (spec §6): the embedding chain supplies the
/// real value; this default is a placeholder for standalone use of the
/// crate (e.g. in tests).
pub static HARDFORK_CORE_1285_TIME: Lazy<TimePointSec> = Lazy::new(|| TimePointSec(0));

pub fn is_hardfork_active(now: TimePointSec) -> bool {
    now.0 > HARDFORK_CORE_1285_TIME.0
}
