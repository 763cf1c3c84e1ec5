//! DynamoDB JSON text interop.
//!
//! DynamoDB's JSON documents carry `B` and `BS` payloads as base64 strings.
//! [`to_json`] encodes them; [`from_json`] reads a document back into a
//! [`Wire`] tree, decoding base64 only where a binary tag says so.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use cerealbox_core::Error;
use serde_json::{Map, Value as Json};

use crate::wire::{Tag, Wire};

/// Renders a wire tree as DynamoDB JSON.
pub fn to_json(wire: &Wire) -> Json {
    match wire {
        Wire::Null => Json::Null,
        Wire::Bool(b) => Json::Bool(*b),
        Wire::Str(s) => Json::String(s.clone()),
        Wire::Bytes(b) => Json::String(BASE64.encode(b)),
        Wire::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Wire::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect::<Map<String, Json>>(),
        ),
    }
}

/// Reads a DynamoDB JSON document. A root object that is not a single tagged
/// attribute is read as a bare attribute map.
pub fn from_json(json: &Json) -> Result<Wire, Error> {
    match json {
        Json::Object(entries) if single_tag(entries).is_some() => attribute(json),
        Json::Object(entries) => attribute_map(entries).map(Wire::Map),
        other => Ok(plain(other)),
    }
}

fn single_tag(entries: &Map<String, Json>) -> Option<(Tag, &Json)> {
    if entries.len() != 1 {
        return None;
    }
    let (name, payload) = entries.iter().next()?;
    Tag::parse(name).map(|tag| (tag, payload))
}

fn attribute(json: &Json) -> Result<Wire, Error> {
    let Json::Object(entries) = json else {
        return Ok(plain(json));
    };
    let Some((tag, payload)) = single_tag(entries) else {
        return Ok(plain(json));
    };

    let payload = match tag {
        Tag::Binary => Wire::Bytes(binary(tag, payload)?),
        Tag::BinarySet => Wire::List(
            elements(tag, payload)?
                .iter()
                .map(|member| binary(tag, member).map(Wire::Bytes))
                .collect::<Result<_, _>>()?,
        ),
        Tag::List => Wire::List(
            elements(tag, payload)?
                .iter()
                .map(attribute)
                .collect::<Result<_, _>>()?,
        ),
        Tag::Map => match payload {
            Json::Object(entries) => Wire::Map(attribute_map(entries)?),
            other => return Err(unexpected(tag, "an object", other)),
        },
        _ => plain(payload),
    };
    Ok(Wire::tagged(tag, payload))
}

fn attribute_map(entries: &Map<String, Json>) -> Result<BTreeMap<String, Wire>, Error> {
    entries
        .iter()
        .map(|(k, v)| Ok((k.clone(), attribute(v)?)))
        .collect()
}

fn elements(tag: Tag, payload: &Json) -> Result<&Vec<Json>, Error> {
    payload
        .as_array()
        .ok_or_else(|| unexpected(tag, "an array", payload))
}

fn binary(tag: Tag, payload: &Json) -> Result<Bytes, Error> {
    let text = payload
        .as_str()
        .ok_or_else(|| unexpected(tag, "a base64 string", payload))?;
    BASE64
        .decode(text)
        .map(Bytes::from)
        .map_err(|e| Error::malformed(tag.as_str(), format!("invalid base64: {}", e)))
}

/// Structural conversion with no tag awareness. Numbers keep their literal
/// text.
fn plain(json: &Json) -> Wire {
    match json {
        Json::Null => Wire::Null,
        Json::Bool(b) => Wire::Bool(*b),
        Json::Number(n) => Wire::Str(n.to_string()),
        Json::String(s) => Wire::Str(s.clone()),
        Json::Array(items) => Wire::List(items.iter().map(plain).collect()),
        Json::Object(entries) => Wire::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), plain(v)))
                .collect(),
        ),
    }
}

fn unexpected(tag: Tag, expected: &str, found: &Json) -> Error {
    let kind = match found {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    };
    Error::malformed(tag.as_str(), format!("expected {}, found {}", expected, kind))
}
