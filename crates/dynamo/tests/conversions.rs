//! End-to-end conversions through the shared tagged codec.

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use bytes::Bytes;
use cerealbox_core::number::number_text;
use cerealbox_core::{Class, EnumMember, Error, Object, Value, ValueSet};
use cerealbox_dynamo::json::{from_json, to_json};
use cerealbox_dynamo::{decode_tagged, encode_tagged, DynamoCodec, Tag, Wire};
use serde_json::json;

fn wire(doc: serde_json::Value) -> Wire {
    from_json(&doc).unwrap()
}

fn decimal(text: &str) -> Value {
    Value::Decimal(BigDecimal::from_str(text).unwrap())
}

#[test]
fn test_conversion_table() {
    let cases = vec![
        (Value::Null, json!({"NULL": true})),
        (Value::Int(1), json!({"N": "1"})),
        (Value::Float(1.0), json!({"N": "1.0"})),
        (decimal("0.3"), json!({"N": "0.3"})),
        (Value::Bool(true), json!({"BOOL": true})),
        (Value::Bool(false), json!({"BOOL": false})),
        (Value::from("Hello"), json!({"S": "Hello"})),
        (Value::from(&b"Hello"[..]), json!({"B": "SGVsbG8="})),
        (Value::ByteArray(vec![2, 3, 5, 7]), json!({"B": "AgMFBw=="})),
        (
            Value::list([Value::Int(1), Value::Int(2), Value::Int(3)]),
            json!({"L": [{"N": "1"}, {"N": "2"}, {"N": "3"}]}),
        ),
        (
            Value::list([Value::from("1"), Value::from("2"), Value::Int(3)]),
            json!({"L": [{"S": "1"}, {"S": "2"}, {"N": "3"}]}),
        ),
        (
            Value::map([("a", Value::Int(1)), ("b", Value::from("2"))]),
            json!({"M": {"a": {"N": "1"}, "b": {"S": "2"}}}),
        ),
    ];

    for (value, doc) in cases {
        let encoded = encode_tagged(&value).unwrap();
        assert_eq!(to_json(&encoded), doc, "encoding {}", value);
        assert_eq!(decode_tagged(&wire(doc)).unwrap(), value, "decoding {}", value);
    }
}

#[test]
fn test_set_conversions() {
    let cases = vec![
        (
            Value::set([Value::Int(1), Value::Int(2)]),
            json!({"NS": ["1", "2"]}),
        ),
        (
            Value::set([Value::from("1"), Value::from("Hello")]),
            json!({"SS": ["1", "Hello"]}),
        ),
        (
            Value::set([Value::from(&b"Hello"[..]), Value::from(&b"World"[..])]),
            json!({"BS": ["SGVsbG8=", "V29ybGQ="]}),
        ),
    ];

    for (value, doc) in cases {
        assert_eq!(decode_tagged(&wire(doc)).unwrap(), value);
        let round_trip = decode_tagged(&encode_tagged(&value).unwrap()).unwrap();
        assert_eq!(round_trip, value);
    }
}

#[test]
fn test_frozenset_decodes_as_set() {
    let frozen = Value::FrozenSet(ValueSet::from_iter([Value::Int(1)]));
    let decoded = decode_tagged(&encode_tagged(&frozen).unwrap()).unwrap();
    assert!(matches!(decoded, Value::Set(_)));
    assert_eq!(decoded, frozen);
}

#[test]
fn test_tuple_encodes_as_list() {
    let encoded = encode_tagged(&Value::tuple([Value::Int(1), Value::Int(2)])).unwrap();
    assert_eq!(to_json(&encoded), json!({"L": [{"N": "1"}, {"N": "2"}]}));
}

#[test]
fn test_binary_payloads_are_immutable_bytes() {
    for value in [
        Value::ByteArray(vec![2, 3, 5, 7]),
        Value::Bytes(Bytes::from_static(b"Hello")),
    ] {
        let encoded = encode_tagged(&value).unwrap();
        let (_, payload) = encoded.as_attribute().unwrap();
        assert!(matches!(payload, Wire::Bytes(_)));
    }
}

#[test]
fn test_datetime() {
    let sample = Value::DateTime(time::macros::datetime!(2020-01-01 0:00));
    assert_eq!(
        to_json(&encode_tagged(&sample).unwrap()),
        json!({"S": "2020-01-01T00:00:00"})
    );
}

#[test]
fn test_enum() {
    let gender = Class::enumeration("Gender");
    let female = EnumMember::new(&gender, "FEMALE", "Female");
    assert_eq!(
        to_json(&encode_tagged(&Value::Enum(female)).unwrap()),
        json!({"S": "Female"})
    );
}

#[test]
fn test_uuid() {
    let sample = uuid::Uuid::new_v4();
    assert_eq!(
        to_json(&encode_tagged(&Value::Uuid(sample)).unwrap()),
        json!({"S": sample.to_string()})
    );
}

#[test]
fn test_set_with_mixed_types() {
    let err = encode_tagged(&Value::set([Value::Int(1), Value::from("2")])).unwrap_err();
    match err {
        Error::InvalidWireTag { reason, valid } => {
            assert_eq!(
                reason,
                "All values in a set must be of the same family of types (numbers, strings or bytes)"
            );
            assert_eq!(valid, vec!["NS", "SS", "BS"]);
        }
        other => panic!("expected InvalidWireTag, got {:?}", other),
    }
}

#[test]
fn test_invalid_dynamodb_json() {
    let err = decode_tagged(&wire(json!({"a": {"N": "1"}, "b": {"K": "1"}}))).unwrap_err();
    assert!(err
        .to_string()
        .starts_with("DynamoDB does not have a type K. Use one of"));
}

#[test]
fn test_with_and_without_map_type() {
    let bare = decode_tagged(&wire(json!({"a": {"N": "1"}}))).unwrap();
    let tagged = decode_tagged(&wire(json!({"M": {"a": {"N": "1"}}}))).unwrap();
    assert_eq!(bare, tagged);
    assert_eq!(bare, Value::map([("a", Value::Int(1))]));
}

#[test]
fn test_single_tag_named_root_is_read_as_tag() {
    // A real map `{"S": {"S": "x"}}` cannot be told apart from an `S` attribute.
    let err = decode_tagged(&wire(json!({"S": {"S": "x"}}))).unwrap_err();
    assert!(matches!(err, Error::MalformedPayload { .. }));

    let explicit = decode_tagged(&wire(json!({"M": {"S": {"S": "x"}}}))).unwrap();
    assert_eq!(explicit, Value::map([("S", Value::from("x"))]));
}

#[test]
fn test_every_encoded_node_has_exactly_one_tag() {
    fn assert_tagged(wire: &Wire) {
        let (name, payload) = wire.as_attribute().expect("one-key map");
        let tag = Tag::parse(name).expect("recognized tag");
        match (tag, payload) {
            (Tag::List, Wire::List(items)) => items.iter().for_each(assert_tagged),
            (Tag::Map, Wire::Map(entries)) => entries.values().for_each(assert_tagged),
            (Tag::List | Tag::Map, other) => panic!("unexpected payload {:?}", other),
            _ => {}
        }
    }

    let value = Value::map([
        ("none", Value::Null),
        ("flag", Value::Bool(true)),
        ("n", Value::Float(2.5)),
        ("tags", Value::set([Value::from("a")])),
        (
            "nested",
            Value::list([Value::map([("x", Value::tuple([Value::Int(1)]))])]),
        ),
    ]);
    assert_tagged(&encode_tagged(&value).unwrap());
}

#[test]
fn test_mapping_subclass_encodes_as_map() {
    let ordered = Class::new("OrderedDict");
    let value = Value::Object(Object::new(
        &ordered,
        Value::map([("a", Value::Int(1))]),
    ));
    let encoded = encode_tagged(&value).unwrap();
    assert_eq!(to_json(&encoded), json!({"M": {"a": {"N": "1"}}}));
}

#[test]
fn test_wrapped_value_falls_through_to_its_rule() {
    let blob = Class::new("Blob");
    let encoded = encode_tagged(&Value::Object(Object::new(
        &blob,
        Value::ByteArray(vec![1]),
    )))
    .unwrap();
    assert_eq!(encoded, Wire::tagged(Tag::Binary, Bytes::from_static(&[1])));
}

#[test]
fn test_non_finite_float_is_unconvertible() {
    let codec = DynamoCodec::new();
    let err = codec
        .encode(&Value::list([Value::Float(f64::INFINITY)]))
        .unwrap_err();
    assert_eq!(err.to_string(), "Unable to serialize value inf of type float");
}

#[test]
fn test_decoded_numbers_are_decimals() {
    let decoded = decode_tagged(&wire(json!({"L": [{"N": "1"}, {"N": "1.50"}]}))).unwrap();
    match decoded {
        Value::List(items) => {
            assert!(items.iter().all(|item| matches!(item, Value::Decimal(_))));
            assert_eq!(items[1], decimal("1.5"));
        }
        other => panic!("expected a list, got {}", other),
    }
}

#[test]
fn test_numbers_beyond_fixed_precision_round_trip() {
    let values = [
        Value::Float(1e30),
        Value::Float(1e-30),
        Value::Float(5e-324),
        Value::Float(f64::MAX),
        Value::Float(-f64::MAX),
        decimal("12345678901234567890123456789012345678"),
        decimal("1E+100"),
    ];
    for value in values {
        let encoded = encode_tagged(&value).unwrap();
        assert_eq!(decode_tagged(&encoded).unwrap(), value, "{}", value);
    }

    let decoded = decode_tagged(&wire(json!({"N": "12345678901234567890123456789012345678"})))
        .unwrap();
    assert_eq!(
        number_text(&decoded).as_deref(),
        Some("12345678901234567890123456789012345678")
    );
}

#[test]
fn test_decode_json_round_trip() {
    let codec = DynamoCodec::new();
    let mut item = BTreeMap::new();
    item.insert("name".to_string(), Value::from("Jane"));
    item.insert("age".to_string(), Value::Int(12));
    item.insert(
        "allergies".to_string(),
        Value::set([Value::from("Pollen"), Value::from("Nuts")]),
    );
    let value = Value::Map(item);

    let doc = codec.encode_json(&value).unwrap();
    let text = serde_json::to_string(&doc).unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(codec.decode_json(&reparsed).unwrap(), value);
}
