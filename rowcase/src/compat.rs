//! Argument-to-parameter assignability.
//!
//! This module implements the pure predicate that decides whether a raw
//! argument value satisfies a declared parameter type. The rules, in order:
//!
//! 1. Null is assignable to any reference parameter type, never to a
//!    primitive one.
//! 2. A value whose runtime kind equals the declared kind is assignable.
//!    The host language's boxed/unboxed pairs collapse into plain kind
//!    equality here.
//! 3. A reference value is assignable to a reference parameter type that
//!    its runtime type names as itself or as an ancestor.
//! 4. A numeric primitive of strictly narrower representable range widens
//!    into the declared kind per the fixed table in [`widens_to`]. Nothing
//!    outside that table is assignable, narrowing included.
//!
//! The predicate is deterministic, total, and has no side effects;
//! acceptance never re-encodes the value.

use crate::types::{ParamType, PrimitiveKind};
use crate::value::Value;

/// Whether a primitive kind widens into another per the host widening table.
///
/// The table is closed:
///
/// ```text
/// i8        -> i16, i32, i64, f32, f64
/// i16, char -> i32, i64, f32, f64
/// i32       -> i64, f32, f64
/// i64       -> f32, f64
/// f32       -> f64
/// ```
pub fn widens_to(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    use PrimitiveKind::*;
    matches!(
        (from, to),
        (I8, I16 | I32 | I64 | F32 | F64)
            | (I16 | Char, I32 | I64 | F32 | F64)
            | (I32, I64 | F32 | F64)
            | (I64, F32 | F64)
            | (F32, F64)
    )
}

/// Whether `argument` satisfies the declared parameter type `target`.
pub fn is_assignable(argument: &Value, target: &ParamType) -> bool {
    // Rule 1: null fits any reference type and no primitive type.
    if argument.is_null() {
        return !matches!(target, ParamType::Primitive(_));
    }

    match (argument, target) {
        // Rule 2: exact kind equality for the non-primitive kinds.
        (Value::Str(_), ParamType::Str) => true,
        (Value::Enum(value), ParamType::Enum(ty)) => value.ty == ty.name,

        // Rule 3: polymorphic reference assignability.
        (Value::Enum(value), ParamType::Reference(name)) => value.ty == *name,
        (Value::Object(value), ParamType::Reference(name)) => {
            value.type_name == *name || value.supertypes.contains(name)
        }

        // Rules 2 and 4 for primitives: exact kind, else widening.
        (_, ParamType::Primitive(to)) => match argument.primitive_kind() {
            Some(from) => from == *to || widens_to(from, *to),
            None => false,
        },

        // Rule 5: everything else is rejected.
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnumType;
    use crate::value::{EnumValue, ObjectValue};

    const NUMERIC: [PrimitiveKind; 7] = [
        PrimitiveKind::Char,
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
    ];

    fn sample(kind: PrimitiveKind) -> Value {
        match kind {
            PrimitiveKind::Bool => Value::Bool(true),
            PrimitiveKind::Char => Value::Char('a'),
            PrimitiveKind::I8 => Value::I8(1),
            PrimitiveKind::I16 => Value::I16(2),
            PrimitiveKind::I32 => Value::I32(3),
            PrimitiveKind::I64 => Value::I64(4),
            PrimitiveKind::F32 => Value::F32(5.5),
            PrimitiveKind::F64 => Value::F64(6.6),
        }
    }

    /// The host widening table, written out pair by pair.
    fn widening_table() -> Vec<(PrimitiveKind, PrimitiveKind)> {
        use PrimitiveKind::*;
        vec![
            (I8, I16),
            (I8, I32),
            (I8, I64),
            (I8, F32),
            (I8, F64),
            (I16, I32),
            (I16, I64),
            (I16, F32),
            (I16, F64),
            (Char, I32),
            (Char, I64),
            (Char, F32),
            (Char, F64),
            (I32, I64),
            (I32, F32),
            (I32, F64),
            (I64, F32),
            (I64, F64),
            (F32, F64),
        ]
    }

    // ============================================================
    // Exact Match
    // ============================================================

    #[test]
    fn test_every_kind_is_assignable_to_itself() {
        let all = [
            PrimitiveKind::Bool,
            PrimitiveKind::Char,
            PrimitiveKind::I8,
            PrimitiveKind::I16,
            PrimitiveKind::I32,
            PrimitiveKind::I64,
            PrimitiveKind::F32,
            PrimitiveKind::F64,
        ];
        for kind in all {
            assert!(
                is_assignable(&sample(kind), &ParamType::Primitive(kind)),
                "exact match failed for {kind}"
            );
        }
    }

    #[test]
    fn test_string_and_enum_exact_matches() {
        assert!(is_assignable(&Value::from("b"), &ParamType::string()));

        let color = EnumType::new("Color", ["Red", "Green"]);
        let value = Value::Enum(EnumValue::new("Color", "Red"));
        assert!(is_assignable(&value, &ParamType::enumeration(color)));

        let other = EnumType::new("Shade", ["Light", "Dark"]);
        assert!(!is_assignable(&value, &ParamType::enumeration(other)));
    }

    // ============================================================
    // Null Handling
    // ============================================================

    #[test]
    fn test_null_is_assignable_to_reference_types() {
        assert!(is_assignable(&Value::Null, &ParamType::string()));
        assert!(is_assignable(&Value::Null, &ParamType::reference("Number")));
        let color = EnumType::new("Color", ["Red"]);
        assert!(is_assignable(&Value::Null, &ParamType::enumeration(color)));
    }

    #[test]
    fn test_null_is_never_assignable_to_primitive_types() {
        for ty in [
            ParamType::bool(),
            ParamType::char(),
            ParamType::i8(),
            ParamType::i16(),
            ParamType::i32(),
            ParamType::i64(),
            ParamType::f32(),
            ParamType::f64(),
        ] {
            assert!(!is_assignable(&Value::Null, &ty), "null fit {ty}");
        }
    }

    // ============================================================
    // Widening Closure
    // ============================================================

    #[test]
    fn test_every_pair_in_the_widening_table_is_assignable() {
        for (from, to) in widening_table() {
            assert!(
                is_assignable(&sample(from), &ParamType::Primitive(to)),
                "{from} should widen to {to}"
            );
        }
    }

    #[test]
    fn test_no_pair_outside_the_widening_table_is_assignable() {
        let table = widening_table();
        for from in NUMERIC {
            for to in NUMERIC {
                if from == to || table.contains(&(from, to)) {
                    continue;
                }
                assert!(
                    !is_assignable(&sample(from), &ParamType::Primitive(to)),
                    "{from} must not be assignable to {to}"
                );
            }
        }
    }

    #[test]
    fn test_narrowing_conversions_are_rejected() {
        assert!(!is_assignable(&Value::I64(1), &ParamType::i32()));
        assert!(!is_assignable(&Value::F32(1.0), &ParamType::i32()));
        assert!(!is_assignable(&Value::F64(1.0), &ParamType::f32()));
        assert!(!is_assignable(&Value::I32(1), &ParamType::i16()));
        assert!(!is_assignable(&Value::I32(1), &ParamType::char()));
    }

    #[test]
    fn test_bool_neither_widens_nor_accepts_widening() {
        assert!(!is_assignable(&Value::Bool(true), &ParamType::i32()));
        assert!(!is_assignable(&Value::I8(1), &ParamType::bool()));
    }

    // ============================================================
    // Reference Subtyping
    // ============================================================

    #[test]
    fn test_object_is_assignable_to_its_own_type() {
        let value = Value::Object(ObjectValue::new("BigInt", "1"));
        assert!(is_assignable(&value, &ParamType::reference("BigInt")));
        assert!(!is_assignable(&value, &ParamType::reference("Decimal")));
    }

    #[test]
    fn test_object_is_assignable_to_declared_supertypes() {
        let value = Value::Object(
            ObjectValue::new("BigInt", "1").with_supertypes(["Number", "Comparable"]),
        );
        assert!(is_assignable(&value, &ParamType::reference("Number")));
        assert!(is_assignable(&value, &ParamType::reference("Comparable")));
        assert!(!is_assignable(&value, &ParamType::reference("Iterator")));
    }

    #[test]
    fn test_primitive_is_not_assignable_to_unrelated_reference() {
        assert!(!is_assignable(&Value::I32(1), &ParamType::reference("Number")));
        assert!(!is_assignable(&Value::from("1"), &ParamType::i32()));
    }
}
