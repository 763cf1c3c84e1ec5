//! The wire tree and the ten attribute tags.
//!
//! A tagged attribute is a [`Wire::Map`] with exactly one key, the tag, whose
//! value is the payload: `{"N": "1"}`, `{"L": [{"S": "a"}]}`.

use bytes::Bytes;
use cerealbox_core::{Passthrough, Value};
use std::collections::BTreeMap;
use std::fmt;

// ──────────────────────────────────────────────
// Tags
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Null,
    Bool,
    Number,
    String,
    Binary,
    NumberSet,
    StringSet,
    BinarySet,
    List,
    Map,
}

impl Tag {
    pub const ALL: [Tag; 10] = [
        Tag::Null,
        Tag::Bool,
        Tag::Number,
        Tag::String,
        Tag::Binary,
        Tag::NumberSet,
        Tag::StringSet,
        Tag::BinarySet,
        Tag::List,
        Tag::Map,
    ];

    /// Every tag as it appears on the wire, in [`Tag::ALL`] order.
    pub const NAMES: [&'static str; 10] = [
        "NULL", "BOOL", "N", "S", "B", "NS", "SS", "BS", "L", "M",
    ];

    pub const SET_NAMES: [&'static str; 3] = ["NS", "SS", "BS"];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Null => "NULL",
            Tag::Bool => "BOOL",
            Tag::Number => "N",
            Tag::String => "S",
            Tag::Binary => "B",
            Tag::NumberSet => "NS",
            Tag::StringSet => "SS",
            Tag::BinarySet => "BS",
            Tag::List => "L",
            Tag::Map => "M",
        }
    }

    pub fn parse(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.as_str() == name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Wire tree
// ──────────────────────────────────────────────

/// Plain nested data as exchanged with a DynamoDB client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wire {
    Null,
    Bool(bool),
    Str(String),
    Bytes(Bytes),
    List(Vec<Wire>),
    Map(BTreeMap<String, Wire>),
}

impl Wire {
    /// A one-key map `{tag: payload}`.
    pub fn tagged(tag: Tag, payload: impl Into<Wire>) -> Wire {
        let mut entries = BTreeMap::new();
        entries.insert(tag.as_str().to_string(), payload.into());
        Wire::Map(entries)
    }

    /// The key and payload of a one-key map.
    pub fn as_attribute(&self) -> Option<(&str, &Wire)> {
        match self {
            Wire::Map(entries) if entries.len() == 1 => {
                entries.iter().next().map(|(k, v)| (k.as_str(), v))
            }
            _ => None,
        }
    }

    /// The tag of a tagged attribute; `None` for anything else.
    pub fn tag(&self) -> Option<Tag> {
        self.as_attribute().and_then(|(name, _)| Tag::parse(name))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Wire::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Wire]> {
        match self {
            Wire::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Wire>> {
        match self {
            Wire::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Short description of the node's shape for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Wire::Null => "null",
            Wire::Bool(_) => "a boolean",
            Wire::Str(_) => "a string",
            Wire::Bytes(_) => "bytes",
            Wire::List(_) => "a list",
            Wire::Map(_) => "a map",
        }
    }
}

impl Passthrough for Wire {
    fn passthrough(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Wire::Null),
            Value::Bool(b) => Some(Wire::Bool(*b)),
            Value::Text(s) => Some(Wire::Str(s.clone())),
            Value::Bytes(b) => Some(Wire::Bytes(b.clone())),
            Value::ByteArray(b) => Some(Wire::Bytes(Bytes::copy_from_slice(b))),
            _ => None,
        }
    }
}

impl From<bool> for Wire {
    fn from(b: bool) -> Self {
        Wire::Bool(b)
    }
}

impl From<String> for Wire {
    fn from(s: String) -> Self {
        Wire::Str(s)
    }
}

impl From<&str> for Wire {
    fn from(s: &str) -> Self {
        Wire::Str(s.to_string())
    }
}

impl From<Bytes> for Wire {
    fn from(b: Bytes) -> Self {
        Wire::Bytes(b)
    }
}

impl From<Vec<Wire>> for Wire {
    fn from(items: Vec<Wire>) -> Self {
        Wire::List(items)
    }
}

impl From<BTreeMap<String, Wire>> for Wire {
    fn from(entries: BTreeMap<String, Wire>) -> Self {
        Wire::Map(entries)
    }
}
