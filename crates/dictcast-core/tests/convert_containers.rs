//! Integration tests for the public conversion and extraction functions

use dictcast_core::{
    convert, convert_with, extract, get_or_default, Chart, ConversionOptions, ConverterRegistry,
    Error, FromValue, Mapping, MappingKind, Path, SequenceKind, StrictMode, TypeDescriptor, Value,
};
use dictcast_core::conversion::Coercer;
use serde_json::json;
use std::collections::BTreeMap;

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

#[test]
fn test_list_tuple_set() {
    let input = v(json!([3.4, "7", "8"]));

    let ints = convert(input.clone(), &TypeDescriptor::list(TypeDescriptor::int())).unwrap();
    assert_eq!(Vec::<i64>::from_value(ints).unwrap(), vec![3, 7, 8]);

    let mixed = convert(
        input.clone(),
        &TypeDescriptor::tuple(vec![
            TypeDescriptor::float(),
            TypeDescriptor::string(),
            TypeDescriptor::int(),
        ]),
    )
    .unwrap();
    let (a, b, c) = <(f64, String, i64)>::from_value(mixed).unwrap();
    assert_eq!((a, b.as_str(), c), (3.4, "7", 8));

    let strings = convert(input, &TypeDescriptor::set(TypeDescriptor::string())).unwrap();
    assert_eq!(
        strings,
        Value::Set(vec![Value::from("8"), Value::from("7"), Value::from("3.4")])
    );
}

#[test]
fn test_arity_mismatch() {
    let err = convert(
        v(json!([3.4, "7"])),
        &TypeDescriptor::tuple(vec![
            TypeDescriptor::float(),
            TypeDescriptor::string(),
            TypeDescriptor::int(),
        ]),
    )
    .unwrap_err();
    assert!(err.is_shape_error());
}

#[test]
fn test_dict_keys_and_values() {
    let mut source = Mapping::default();
    source.insert(Value::from("aa"), Value::from("3.4"));
    source.insert(Value::Int(4), Value::Float(6.5));
    source.insert(Value::from("bb"), Value::from("1"));

    let converted = convert(
        Value::Map(source.clone()),
        &TypeDescriptor::dict(TypeDescriptor::string(), TypeDescriptor::float()),
    )
    .unwrap();
    let typed = BTreeMap::<String, f64>::from_value(converted).unwrap();
    assert_eq!(typed["aa"], 3.4);
    assert_eq!(typed["4"], 6.5);
    assert_eq!(typed["bb"], 1.0);

    // a bare dict keeps keys and values as they are
    let bare = convert(
        Value::Map(source.clone()),
        &TypeDescriptor::dict(TypeDescriptor::Any, TypeDescriptor::Any),
    )
    .unwrap();
    assert_eq!(bare, Value::Map(source));
}

#[test]
fn test_dict_of_bare_tuples() {
    let converted = convert(
        v(json!({"aa": ["3.4"], "bb": ["1"]})),
        &TypeDescriptor::dict(TypeDescriptor::string(), TypeDescriptor::bare(SequenceKind::Tuple)),
    )
    .unwrap();
    let map = converted.as_map().unwrap();
    assert_eq!(map.get_str("aa"), Some(&Value::Tuple(vec![Value::from("3.4")])));
}

#[test]
fn test_negative_shapes() {
    let err = convert(
        v(json!([3.14, "str"])),
        &TypeDescriptor::dict(TypeDescriptor::string(), TypeDescriptor::bare(SequenceKind::List)),
    )
    .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    let err = convert(
        v(json!({"a": 1})),
        &TypeDescriptor::dict(TypeDescriptor::list(TypeDescriptor::int()), TypeDescriptor::Any),
    );
    // a list key cannot be built out of a string
    assert!(err.is_err());
    assert!(TypeDescriptor::dict(TypeDescriptor::list(TypeDescriptor::int()), TypeDescriptor::Any)
        .validate()
        .is_err());
}

#[test]
fn test_frozen_dict_widening() {
    let descriptor = TypeDescriptor::frozen_dict(TypeDescriptor::string(), TypeDescriptor::int());
    let registry = ConverterRegistry::new();

    let widened = Coercer::new(&registry)
        .convert(v(json!({"a": "1"})), &descriptor)
        .unwrap();
    assert_eq!(widened.as_map().unwrap().kind(), MappingKind::Dict);

    let strict = Coercer::new(&registry)
        .with_options(ConversionOptions::default().with_strict_mode(StrictMode::Strict))
        .convert(v(json!({"a": "1"})), &descriptor);
    assert!(matches!(strict, Err(Error::Conversion { .. })));
}

#[test]
fn test_convert_with_registry_and_chart() {
    let mut registry = ConverterRegistry::new();
    registry.register(TypeDescriptor::string(), |value| {
        Ok(Value::from(value.to_string().to_uppercase()))
    });
    let chart = Chart::new();

    let converted = convert_with(
        v(json!(["a", 1, true])),
        &TypeDescriptor::list(TypeDescriptor::string()),
        &registry,
        Some(&chart),
    )
    .unwrap();
    // "a" already is a string and is left alone
    assert_eq!(converted, v(json!(["a", "1", "TRUE"])));
}

#[test]
fn test_extract_and_convert() {
    let data = v(json!({
        "e": [{"g": 120}, {"f": 30, "g": "100"}, {"f": 20, "g": 14}, {"f": 30, "g": 200.5}]
    }));

    let raw = extract(&data, "e/*{f==30}/g").unwrap();
    let converted = convert(raw, &TypeDescriptor::list(TypeDescriptor::int())).unwrap();
    assert_eq!(converted, v(json!([100, 200])));

    assert_eq!(get_or_default(&data, "x/y", Value::Null).unwrap(), Value::Null);
    assert!(extract(&data, "x/y").unwrap_err().is_key_not_found());
}

#[test]
fn test_flatten_option() {
    let data = v(json!({
        "c": {"de": {"f": [
            {"g": [10.3, 100]}, {"g": [11, 200]}, {"g": [12.1, 300]}, {"g": [13.2, 400]}
        ]}}
    }));

    let flat = Path::parse("c/de/f/g").unwrap().extract(&data).unwrap();
    assert_eq!(flat, v(json!([10.3, 100, 11, 200, 12.1, 300, 13.2, 400])));

    let nested = Path::parse("c/de/f/g")
        .unwrap()
        .with_flatten(false)
        .extract(&data)
        .unwrap();
    let converted = convert(
        nested,
        &TypeDescriptor::list(TypeDescriptor::tuple(vec![
            TypeDescriptor::float(),
            TypeDescriptor::int(),
        ])),
    )
    .unwrap();
    let pairs = Vec::<(f64, i64)>::from_value(converted).unwrap();
    assert_eq!(pairs, vec![(10.3, 100), (11.0, 200), (12.1, 300), (13.2, 400)]);
}

#[test]
fn test_malformed_predicate() {
    let err = extract(&v(json!({})), "e/*{=3}").unwrap_err();
    assert!(matches!(err, Error::Path(dictcast_core::PathError::Syntax { .. })));
}
