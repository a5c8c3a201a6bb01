//! Restriction model and evaluator (spec §3, §4.3).
//!
//! Grounded on `examples/original_source/.../protocol/restrictions.hpp`'s
//! `equal`/`not_equal`/`less`/…/`contains_none` functors, reimplemented as
//! a closed `enum` with two free functions instead of template visitors
//! applied through `member_visitor`.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String, vec::Vec};

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::{
    error::{EvaluationError, ValidationError},
    schema::{Operation, OperationSchema},
    value::{self, GenericValue},
};

/// A predicate over a single named field of one operation (spec §3).
///
/// `AttributeAssert` is carried structurally for wire compatibility but is
/// inert: it is accepted by [`validate_against_schema`] and always
/// succeeds in [`evaluate`] (spec §9, "structurally accepted ... no
/// active evaluation logic").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum Restriction {
    Eq {
        field: String,
        value: GenericValue,
    },
    Neq {
        field: String,
        value: GenericValue,
    },
    Lt {
        field: String,
        threshold: i64,
    },
    Le {
        field: String,
        threshold: i64,
    },
    Gt {
        field: String,
        threshold: i64,
    },
    Ge {
        field: String,
        threshold: i64,
    },
    AnyOf {
        field: String,
        values: Vec<GenericValue>,
    },
    NoneOf {
        field: String,
        values: Vec<GenericValue>,
    },
    ContainsAll {
        field: String,
        values: Vec<GenericValue>,
    },
    ContainsNone {
        field: String,
        values: Vec<GenericValue>,
    },
    AttributeAssert {
        field: String,
        inner: Vec<Restriction>,
    },
}

impl Restriction {
    /// The restriction's own field name, for error reporting.
    pub fn field(&self) -> &str {
        match self {
            Restriction::Eq { field, .. }
            | Restriction::Neq { field, .. }
            | Restriction::Lt { field, .. }
            | Restriction::Le { field, .. }
            | Restriction::Gt { field, .. }
            | Restriction::Ge { field, .. }
            | Restriction::AnyOf { field, .. }
            | Restriction::NoneOf { field, .. }
            | Restriction::ContainsAll { field, .. }
            | Restriction::ContainsNone { field, .. }
            | Restriction::AttributeAssert { field, .. } => field,
        }
    }

    /// Stable kind label, used in [`EvaluationError::RestrictionFailed`].
    pub fn kind(&self) -> &'static str {
        match self {
            Restriction::Eq { .. } => "Eq",
            Restriction::Neq { .. } => "Neq",
            Restriction::Lt { .. } => "Lt",
            Restriction::Le { .. } => "Le",
            Restriction::Gt { .. } => "Gt",
            Restriction::Ge { .. } => "Ge",
            Restriction::AnyOf { .. } => "AnyOf",
            Restriction::NoneOf { .. } => "NoneOf",
            Restriction::ContainsAll { .. } => "ContainsAll",
            Restriction::ContainsNone { .. } => "ContainsNone",
            Restriction::AttributeAssert { .. } => "AttributeAssert",
        }
    }
}

/// Does `r` make sense against the declared schema of its target operation
/// type? Does not see a concrete operation instance (spec §4.3).
pub fn validate_against_schema(
    r: &Restriction,
    schema: &OperationSchema,
) -> Result<(), ValidationError> {
    let Some(descriptor) = schema.field(r.field()) else {
        return Err(ValidationError::UnknownField(r.field().into()));
    };

    match r {
        Restriction::Eq { .. } | Restriction::Neq { .. } | Restriction::AnyOf { .. } | Restriction::NoneOf { .. } => {
            if !descriptor.declared_type.is_value_model_supported() {
                return Err(ValidationError::UnsupportedType(descriptor.declared_type));
            }
            Ok(())
        }
        // Comparison passes unconditionally: `to_i64` handles the runtime
        // incompatibility (spec §4.3).
        Restriction::Lt { .. } | Restriction::Le { .. } | Restriction::Gt { .. } | Restriction::Ge { .. } => Ok(()),
        Restriction::ContainsAll { .. } | Restriction::ContainsNone { .. } => {
            if !descriptor.declared_type.is_set() {
                return Err(ValidationError::ListRestrictionOnNonList(
                    r.field().into(),
                    descriptor.declared_type,
                ));
            }
            let element_type = descriptor
                .declared_type
                .set_element_type()
                .expect("is_set() implies a set element type");
            if !element_type.is_value_model_supported() {
                return Err(ValidationError::UnsupportedType(element_type));
            }
            Ok(())
        }
        Restriction::AttributeAssert { inner, .. } => {
            // Structurally accepted; only unknown-field checking on the
            // nested field name itself would apply here, and there is
            // none to do since the nested restrictions target sub-object
            // fields this engine does not schema-check (spec §9).
            let _ = inner;
            Ok(())
        }
    }
}

/// Does `r` hold against `op`? (spec §4.3)
///
/// `index` is this restriction's position within its authority's list,
/// used only to annotate [`EvaluationError::RestrictionFailed`].
pub fn evaluate(r: &Restriction, op: &Operation, index: usize) -> Result<(), EvaluationError> {
    let schema = crate::schema::schema_of(op);
    if !schema.has_field(r.field()) {
        return Err(EvaluationError::UnknownField(r.field().into()));
    }

    let Some(v) = op.get_field(r.field()) else {
        // Optional field, currently unset: unconstrained (spec §4.3, §9).
        return Ok(());
    };

    let fail = |detail: String| EvaluationError::RestrictionFailed {
        index,
        kind: r.kind(),
        field: r.field().into(),
        detail,
    };

    match r {
        Restriction::Eq { value, .. } => {
            if value::equal(value, &v) {
                Ok(())
            } else {
                Err(fail("value does not equal field".into()))
            }
        }
        Restriction::Neq { value, .. } => {
            if !value::equal(value, &v) {
                Ok(())
            } else {
                Err(fail("value equals field".into()))
            }
        }
        Restriction::Lt { threshold, .. } => compare(&v, *threshold, |a, b| a < b, r, index),
        Restriction::Le { threshold, .. } => compare(&v, *threshold, |a, b| a <= b, r, index),
        Restriction::Gt { threshold, .. } => compare(&v, *threshold, |a, b| a > b, r, index),
        Restriction::Ge { threshold, .. } => compare(&v, *threshold, |a, b| a >= b, r, index),
        Restriction::AnyOf { values, .. } => {
            if values.iter().any(|w| value::equal(w, &v)) {
                Ok(())
            } else {
                Err(fail("field value not present in list".into()))
            }
        }
        Restriction::NoneOf { values, .. } => {
            if values.iter().any(|w| value::equal(w, &v)) {
                Err(fail("field value present in list".into()))
            } else {
                Ok(())
            }
        }
        Restriction::ContainsAll { values, .. } => {
            let elements = value::as_set(&v).map_err(|_| EvaluationError::NotASet(r.field().into()))?;
            if values
                .iter()
                .all(|w| elements.iter().any(|e| value::equal(w, e)))
            {
                Ok(())
            } else {
                Err(fail("field set does not contain all required values".into()))
            }
        }
        Restriction::ContainsNone { values, .. } => {
            let elements = value::as_set(&v).map_err(|_| EvaluationError::NotASet(r.field().into()))?;
            if values
                .iter()
                .any(|w| elements.iter().any(|e| value::equal(w, e)))
            {
                Err(fail("field set contains a forbidden value".into()))
            } else {
                Ok(())
            }
        }
        Restriction::AttributeAssert { .. } => Ok(()),
    }
}

fn compare(
    v: &GenericValue,
    threshold: i64,
    op: impl Fn(i64, i64) -> bool,
    r: &Restriction,
    index: usize,
) -> Result<(), EvaluationError> {
    let projected = value::to_i64(v).map_err(|_| EvaluationError::TypeNotComparable(r.field().into()))?;
    if op(projected, threshold) {
        Ok(())
    } else {
        Err(EvaluationError::RestrictionFailed {
            index,
            kind: r.kind(),
            field: r.field().into(),
            detail: format!("{projected} does not satisfy threshold {threshold}"),
        })
    }
}
