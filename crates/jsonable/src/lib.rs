//! cerealbox-jsonable: lossy untagged encoder.
//!
//! Turns a [`Value`] into plain `serde_json::Value` that any JSON library
//! can serialize. Type information is dropped (decimals and UUIDs become
//! strings, sets become arrays), so there is no way back.

pub mod encode;

use std::sync::OnceLock;

use cerealbox_core::{CodecConfig, Encoder, Error, RuleTable, Value};

#[derive(Debug, Clone)]
pub struct JsonableCodec {
    encoder: Encoder<serde_json::Value>,
}

impl JsonableCodec {
    pub fn new() -> Self {
        JsonableCodec::with_config(CodecConfig::default())
    }

    pub fn with_config(config: CodecConfig) -> Self {
        JsonableCodec {
            encoder: Encoder::with_config(encode::rules(), config),
        }
    }

    /// A codec using `extensions` over the default rules, by exact type identifier.
    pub fn with_extensions(extensions: RuleTable<serde_json::Value>) -> Self {
        JsonableCodec::new().extended(extensions)
    }

    pub fn extended(mut self, extensions: RuleTable<serde_json::Value>) -> Self {
        self.encoder.extend(extensions);
        self
    }

    pub fn encoder(&self) -> &Encoder<serde_json::Value> {
        &self.encoder
    }

    pub fn encode(&self, value: &Value) -> Result<serde_json::Value, Error> {
        self.encoder.encode(value)
    }
}

impl Default for JsonableCodec {
    fn default() -> Self {
        JsonableCodec::new()
    }
}

/// Encodes `value` with the default untagged rules.
pub fn encode_untagged(value: &Value) -> Result<serde_json::Value, Error> {
    static CODEC: OnceLock<JsonableCodec> = OnceLock::new();
    CODEC.get_or_init(JsonableCodec::new).encode(value)
}
