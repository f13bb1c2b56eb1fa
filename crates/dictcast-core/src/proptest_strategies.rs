//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random
//! value trees, scalar descriptors and path expressions.

#![cfg(test)]

use crate::conversion::descriptor::{ScalarType, TypeDescriptor};
use crate::error::StrictMode;
use crate::{Mapping, Value};
use proptest::collection::vec;
use proptest::prelude::*;

/// Keys that are plain path segments
pub fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,10}"
}

/// Strategy for finite floats
pub fn float_strategy() -> impl Strategy<Value = f64> {
    -1.0e9f64..1.0e9f64
}

/// Strategy for scalar leaves
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        float_strategy().prop_map(Value::Float),
        "[a-zA-Z0-9 .]{0,20}".prop_map(Value::Str),
    ]
}

/// Strategy for scalars that mostly survive numeric construction
pub fn numeric_like_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1_000_000i64..1_000_000).prop_map(Value::Int),
        (-1.0e6f64..1.0e6f64).prop_map(Value::Float),
        (-1_000_000i64..1_000_000).prop_map(|n| Value::Str(n.to_string())),
        any::<bool>().prop_map(Value::Bool),
    ]
}

/// Strategy for nested value trees with string-keyed mappings
pub fn value_tree_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![Just(Value::Null), scalar_value_strategy()];

    leaf.prop_recursive(
        3,  // max depth
        24, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                vec(inner.clone(), 0..5).prop_map(Value::List),
                vec((key_strategy(), inner), 0..5).prop_map(|pairs| {
                    Value::Map(
                        pairs
                            .into_iter()
                            .map(|(k, v)| (Value::Str(k), v))
                            .collect::<Mapping>(),
                    )
                }),
            ]
        },
    )
}

/// Strategy for scalar target types that have a native construction
pub fn native_scalar_strategy() -> impl Strategy<Value = ScalarType> {
    prop_oneof![
        Just(ScalarType::Bool),
        Just(ScalarType::Int),
        Just(ScalarType::Float),
        Just(ScalarType::Str),
    ]
}

/// Strategy for container descriptors over native scalars
pub fn container_descriptor_strategy() -> impl Strategy<Value = TypeDescriptor> {
    native_scalar_strategy().prop_flat_map(|scalar| {
        let element = TypeDescriptor::Scalar(scalar);
        prop_oneof![
            Just(TypeDescriptor::list(element.clone())),
            Just(TypeDescriptor::set(element.clone())),
            Just(TypeDescriptor::tuple_of(element.clone())),
            Just(TypeDescriptor::dict(TypeDescriptor::string(), element)),
        ]
    })
}

/// Strategy for path expressions made of keys, wildcards and predicates
pub fn path_expression_strategy() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        key_strategy(),
        Just(String::new()),
        Just("*".to_string()),
        (key_strategy(), "[a-z0-9]{0,4}").prop_map(|(f, v)| format!("*{{{}={}}}", f, v)),
    ];
    vec(segment, 1..5).prop_map(|segments| segments.join("/"))
}

/// Strategy for generating strict modes
pub fn strict_mode_strategy() -> impl Strategy<Value = StrictMode> {
    prop_oneof![
        Just(StrictMode::Strict),
        Just(StrictMode::Warn),
        Just(StrictMode::Coerce),
    ]
}
