//! cerealbox-dynamo: DynamoDB attribute-value codec.
//!
//! Encodes [`Value`]s into tagged [`Wire`] attributes (`{"N": "1"}`,
//! `{"L": [...]}`) and decodes them back. Encoding dispatches through a
//! [`cerealbox_core::Encoder`] built from [`encode::rules`], so callers can
//! override or add rules per type; decoding is a fixed ten-tag table.
//!
//! ```text
//! Value --encode--> Wire --to_json--> DynamoDB JSON
//! Value <--decode-- Wire <-from_json- DynamoDB JSON
//! ```
//!
//! # Public API
//!
//! - [`DynamoCodec`] -- encoder plus decoder, optionally extended
//! - [`encode_tagged`], [`decode_tagged`] -- shared default codec
//! - [`Wire`], [`Tag`] -- the wire tree
//! - [`json::to_json`], [`json::from_json`] -- DynamoDB JSON text interop

pub mod decode;
pub mod encode;
pub mod json;
pub mod wire;

use std::sync::OnceLock;

use cerealbox_core::{CodecConfig, Encoder, Error, RuleTable, Value};

pub use decode::Decoder;
pub use wire::{Tag, Wire};

/// Tagged encoder and decoder sharing one configuration.
#[derive(Debug, Clone)]
pub struct DynamoCodec {
    encoder: Encoder<Wire>,
    decoder: Decoder,
}

impl DynamoCodec {
    pub fn new() -> Self {
        DynamoCodec::with_config(CodecConfig::default())
    }

    pub fn with_config(config: CodecConfig) -> Self {
        DynamoCodec {
            encoder: Encoder::with_config(encode::rules(), config),
            decoder: Decoder::with_config(config),
        }
    }

    /// A codec whose encoder uses `extensions` over the default rules.
    /// Entries replace defaults by exact type identifier only.
    pub fn with_extensions(extensions: RuleTable<Wire>) -> Self {
        DynamoCodec::new().extended(extensions)
    }

    pub fn extended(mut self, extensions: RuleTable<Wire>) -> Self {
        self.encoder.extend(extensions);
        self
    }

    pub fn encoder(&self) -> &Encoder<Wire> {
        &self.encoder
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn encode(&self, value: &Value) -> Result<Wire, Error> {
        self.encoder.encode(value)
    }

    pub fn decode(&self, wire: &Wire) -> Result<Value, Error> {
        self.decoder.decode(wire)
    }

    /// Encodes straight to DynamoDB JSON.
    pub fn encode_json(&self, value: &Value) -> Result<serde_json::Value, Error> {
        self.encode(value).map(|wire| json::to_json(&wire))
    }

    /// Decodes a DynamoDB JSON document.
    pub fn decode_json(&self, doc: &serde_json::Value) -> Result<Value, Error> {
        self.decode(&json::from_json(doc)?)
    }
}

impl Default for DynamoCodec {
    fn default() -> Self {
        DynamoCodec::new()
    }
}

fn shared() -> &'static DynamoCodec {
    static CODEC: OnceLock<DynamoCodec> = OnceLock::new();
    CODEC.get_or_init(DynamoCodec::new)
}

/// Encodes `value` with the default rules.
pub fn encode_tagged(value: &Value) -> Result<Wire, Error> {
    shared().encode(value)
}

/// Decodes `wire` with the default decoder.
pub fn decode_tagged(wire: &Wire) -> Result<Value, Error> {
    shared().decode(wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerealbox_core::TypeId;
    use serde_json::json;

    #[test]
    fn test_extension_overrides_int_only() {
        let codec = DynamoCodec::with_extensions(RuleTable::new().direct(TypeId::Int, |v| {
            match v {
                Value::Int(i) => Ok(Wire::tagged(Tag::Number, (i + 10).to_string())),
                other => Err(Error::unconvertible(other)),
            }
        }));
        assert_eq!(
            codec.encode(&Value::Int(20)).unwrap(),
            Wire::tagged(Tag::Number, "30")
        );
        assert_eq!(
            codec.encode(&Value::Float(20.0)).unwrap(),
            Wire::tagged(Tag::Number, "20.0")
        );
        assert_eq!(
            codec.encode(&Value::Bool(true)).unwrap(),
            Wire::tagged(Tag::Bool, true)
        );
    }

    #[test]
    fn test_json_helpers() {
        let codec = DynamoCodec::new();
        let value = Value::map([("blob", Value::from(&b"Hi"[..]))]);
        let doc = codec.encode_json(&value).unwrap();
        assert_eq!(doc, json!({"M": {"blob": {"B": "SGk="}}}));
        assert_eq!(codec.decode_json(&doc).unwrap(), value);
    }

    #[test]
    fn test_shared_codec_round_trip() {
        let value = Value::list([Value::from("a"), Value::Null]);
        assert_eq!(decode_tagged(&encode_tagged(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_codec_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DynamoCodec>();
    }
}
