//! Tagged decoder: wire attributes back into values.
//!
//! Numbers come back as decimals, lists as lists (never tuples), binary as
//! immutable bytes and sets as plain sets.

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use cerealbox_core::number::parse_decimal;
use cerealbox_core::{CodecConfig, Error, Value, ValueSet};
use tracing::debug;

use crate::wire::{Tag, Wire};

const ROOT: &str = "<root>";
const ATTRIBUTE: &str = "<attribute>";

#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: CodecConfig,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Decoder { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decodes a root attribute.
    ///
    /// A root map that is not exactly one recognized tag (several keys, a
    /// single non-tag key, or no keys at all) is treated as the payload of an
    /// implicit `M`. A real one-attribute map whose key happens to be a tag
    /// name is therefore read as that tag; pass an explicit `{"M": ...}` root
    /// to avoid it.
    pub fn decode(&self, wire: &Wire) -> Result<Value, Error> {
        let entries = wire.as_map().ok_or_else(|| {
            Error::malformed(ROOT, format!("expected a map, found {}", wire.kind()))
        })?;

        if wire.tag().is_some() {
            return self.decode_attribute(wire, 0);
        }

        debug!(keys = entries.len(), "decoding untagged root as a map");
        self.decode_map(entries, 0)
    }

    fn decode_attribute(&self, wire: &Wire, depth: usize) -> Result<Value, Error> {
        if depth > self.config.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }

        let (name, payload) = wire.as_attribute().ok_or_else(|| {
            Error::malformed(
                ATTRIBUTE,
                format!("expected a single-key attribute map, found {}", attribute_shape(wire)),
            )
        })?;
        let tag = Tag::parse(name).ok_or_else(|| {
            Error::invalid_tag(format!("DynamoDB does not have a type {}", name), &Tag::NAMES)
        })?;

        self.decode_payload(tag, payload, depth)
    }

    fn decode_payload(&self, tag: Tag, payload: &Wire, depth: usize) -> Result<Value, Error> {
        match tag {
            Tag::Null => Ok(Value::Null),
            Tag::Bool => match payload {
                Wire::Bool(b) => Ok(Value::Bool(*b)),
                other => Err(unexpected(tag, "a boolean", other)),
            },
            Tag::Number => decode_number(payload).map(Value::Decimal),
            Tag::String => match payload {
                Wire::Str(s) => Ok(Value::Text(s.clone())),
                other => Err(unexpected(tag, "a string", other)),
            },
            Tag::Binary => match payload {
                Wire::Bytes(b) => Ok(Value::Bytes(b.clone())),
                other => Err(unexpected(tag, "bytes", other)),
            },
            Tag::NumberSet => decode_set(tag, payload, |member| {
                decode_number(member).map(Value::Decimal)
            }),
            Tag::StringSet => decode_set(tag, payload, |member| match member {
                Wire::Str(s) => Ok(Value::Text(s.clone())),
                other => Err(unexpected(tag, "string members", other)),
            }),
            Tag::BinarySet => decode_set(tag, payload, |member| match member {
                Wire::Bytes(b) => Ok(Value::Bytes(b.clone())),
                other => Err(unexpected(tag, "bytes members", other)),
            }),
            Tag::List => {
                let items = payload
                    .as_list()
                    .ok_or_else(|| unexpected(tag, "a list", payload))?;
                let items = items
                    .iter()
                    .map(|item| self.decode_attribute(item, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(items))
            }
            Tag::Map => {
                let entries = payload
                    .as_map()
                    .ok_or_else(|| unexpected(tag, "a map", payload))?;
                self.decode_map(entries, depth)
            }
        }
    }

    fn decode_map(&self, entries: &BTreeMap<String, Wire>, depth: usize) -> Result<Value, Error> {
        let entries = entries
            .iter()
            .map(|(k, v)| Ok((k.clone(), self.decode_attribute(v, depth + 1)?)))
            .collect::<Result<BTreeMap<_, _>, Error>>()?;
        Ok(Value::Map(entries))
    }
}

fn decode_number(payload: &Wire) -> Result<BigDecimal, Error> {
    let text = payload
        .as_str()
        .ok_or_else(|| unexpected(Tag::Number, "numeric text", payload))?;
    parse_decimal(text).ok_or_else(|| {
        Error::malformed(Tag::Number.as_str(), format!("`{}` is not a number", text))
    })
}

fn decode_set<F>(tag: Tag, payload: &Wire, member: F) -> Result<Value, Error>
where
    F: Fn(&Wire) -> Result<Value, Error>,
{
    let members = payload
        .as_list()
        .ok_or_else(|| unexpected(tag, "a list", payload))?;
    let set = members.iter().map(member).collect::<Result<ValueSet, _>>()?;
    Ok(Value::Set(set))
}

fn unexpected(tag: Tag, expected: &str, found: &Wire) -> Error {
    Error::malformed(tag.as_str(), format!("expected {}, found {}", expected, found.kind()))
}

fn attribute_shape(wire: &Wire) -> String {
    match wire.as_map() {
        Some(entries) => format!("a map with {} keys", entries.len()),
        None => wire.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::str::FromStr;

    fn dec(text: &str) -> Value {
        Value::Decimal(BigDecimal::from_str(text).unwrap())
    }

    fn map(entries: impl IntoIterator<Item = (&'static str, Wire)>) -> Wire {
        Wire::Map(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn test_scalars() {
        let decoder = Decoder::new();
        assert_eq!(decoder.decode(&Wire::tagged(Tag::Null, true)).unwrap(), Value::Null);
        assert_eq!(
            decoder.decode(&Wire::tagged(Tag::Bool, false)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(decoder.decode(&Wire::tagged(Tag::Number, "1")).unwrap(), dec("1"));
        assert_eq!(
            decoder.decode(&Wire::tagged(Tag::String, "Hello")).unwrap(),
            Value::from("Hello")
        );
        assert_eq!(
            decoder
                .decode(&Wire::tagged(Tag::Binary, Bytes::from_static(b"Hi")))
                .unwrap(),
            Value::Bytes(Bytes::from_static(b"Hi"))
        );
    }

    #[test]
    fn test_null_payload_is_ignored() {
        let decoder = Decoder::new();
        assert_eq!(decoder.decode(&Wire::tagged(Tag::Null, false)).unwrap(), Value::Null);
        assert_eq!(decoder.decode(&Wire::tagged(Tag::Null, "x")).unwrap(), Value::Null);
    }

    #[test]
    fn test_number_accepts_scientific_notation() {
        let value = Decoder::new()
            .decode(&Wire::tagged(Tag::Number, "1e20"))
            .unwrap();
        assert_eq!(value, dec("100000000000000000000"));
    }

    #[test]
    fn test_number_keeps_every_digit() {
        let decoder = Decoder::new();
        let wide = "12345678901234567890123456789012345678";
        let value = decoder.decode(&Wire::tagged(Tag::Number, wide)).unwrap();
        assert_eq!(value, dec(wide));
        assert_ne!(value, dec("12345678901234567890123456789012345670"));

        let googol = decoder.decode(&Wire::tagged(Tag::Number, "1E+100")).unwrap();
        assert_eq!(googol, dec(&format!("1{}", "0".repeat(100))));

        let tiny = decoder.decode(&Wire::tagged(Tag::Number, "5e-324")).unwrap();
        assert_eq!(tiny, Value::Float(5e-324));
    }

    #[test]
    fn test_number_set() {
        let value = Decoder::new()
            .decode(&Wire::tagged(
                Tag::NumberSet,
                vec![Wire::from("1"), Wire::from("2.5")],
            ))
            .unwrap();
        assert_eq!(value, Value::set([dec("1"), dec("2.5")]));
    }

    #[test]
    fn test_nested_list_and_map() {
        let wire = Wire::tagged(
            Tag::Map,
            map([(
                "items",
                Wire::tagged(
                    Tag::List,
                    vec![Wire::tagged(Tag::String, "a"), Wire::tagged(Tag::Number, "2")],
                ),
            )]),
        );
        let expected = Value::map([("items", Value::list([Value::from("a"), dec("2")]))]);
        assert_eq!(Decoder::new().decode(&wire).unwrap(), expected);
    }

    #[test]
    fn test_bare_map_root() {
        let bare = map([("a", Wire::tagged(Tag::Number, "1"))]);
        let explicit = Wire::tagged(Tag::Map, bare.clone());
        let decoder = Decoder::new();
        assert_eq!(decoder.decode(&bare).unwrap(), decoder.decode(&explicit).unwrap());
    }

    #[test]
    fn test_empty_root_is_empty_map() {
        let value = Decoder::new().decode(&Wire::Map(BTreeMap::new())).unwrap();
        assert_eq!(value, Value::Map(BTreeMap::new()));
    }

    #[test]
    fn test_unknown_tag_lists_all_tags() {
        let wire = map([
            ("a", Wire::tagged(Tag::Number, "1")),
            ("b", map([("K", Wire::from("1"))])),
        ]);
        let err = Decoder::new().decode(&wire).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidWireTag {
                reason: "DynamoDB does not have a type K".to_string(),
                valid: Tag::NAMES.to_vec(),
            }
        );
        assert!(err.to_string().contains("type K"));
    }

    #[test]
    fn test_non_map_root_is_malformed() {
        let err = Decoder::new().decode(&Wire::from("N")).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload { ref tag, .. } if tag == "<root>"));
    }

    #[test]
    fn test_nested_attribute_must_be_single_key_map() {
        let wire = Wire::tagged(Tag::List, vec![Wire::from("a")]);
        let err = Decoder::new().decode(&wire).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed `<attribute>` payload: expected a single-key attribute map, found a string"
        );
    }

    #[test]
    fn test_payload_shape_is_checked() {
        let decoder = Decoder::new();
        let err = decoder.decode(&Wire::tagged(Tag::Number, true)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed `N` payload: expected numeric text, found a boolean"
        );
        let err = decoder.decode(&Wire::tagged(Tag::Number, "abc")).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload { .. }));
        let err = decoder
            .decode(&Wire::tagged(Tag::StringSet, vec![Wire::Bool(true)]))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedPayload { ref tag, .. } if tag == "SS"));
    }

    #[test]
    fn test_depth_limit() {
        let mut wire = Wire::tagged(Tag::Null, true);
        for _ in 0..10 {
            wire = Wire::tagged(Tag::List, vec![wire]);
        }
        let decoder = Decoder::with_config(CodecConfig::default().with_max_depth(5));
        assert_eq!(
            decoder.decode(&wire).unwrap_err(),
            Error::DepthLimitExceeded { limit: 5 }
        );
        assert!(Decoder::new().decode(&wire).is_ok());
    }
}
