//! Encode rule table.
//!
//! ```text
//! Value                         Wire
//! -----                         ----
//! None                          {"NULL": true}
//! bool                          {"BOOL": b}
//! int / float / Decimal         {"N": "<text>"}
//! str                           {"S": s}
//! bytes / bytearray             {"B": bytes}
//! set of numbers                {"NS": ["<text>", ...]}
//! set of str                    {"SS": [s, ...]}
//! set of bytes                  {"BS": [bytes, ...]}
//! list / tuple                  {"L": [attribute, ...]}
//! dict                          {"M": {key: attribute, ...}}
//! date / datetime / time        {"S": "<ISO-8601>"}
//! timedelta                     {"N": "<total seconds>"}
//! Enum                          {"S": str(member.value)}
//! UUID                          {"S": "<hyphenated>"}
//! ```

use bytes::Bytes;
use cerealbox_core::number::number_text;
use cerealbox_core::temporal::{isoformat_date, isoformat_datetime, isoformat_time, total_seconds};
use cerealbox_core::{Context, Error, RuleTable, TypeId, Value, ValueSet};

use crate::wire::{Tag, Wire};

/// Reason reported when a set's members span more than one family.
pub const MIXED_SET: &str =
    "All values in a set must be of the same family of types (numbers, strings or bytes)";

/// The default tagged rule table.
pub fn rules() -> RuleTable<Wire> {
    RuleTable::new()
        .direct(TypeId::NoneType, |_| Ok(Wire::tagged(Tag::Null, true)))
        .direct(TypeId::Bool, encode_bool)
        .direct(TypeId::Int, encode_number)
        .direct(TypeId::Float, encode_number)
        .direct(TypeId::Decimal, encode_number)
        .direct(TypeId::Str, encode_text)
        .direct(TypeId::Bytes, encode_binary)
        .direct(TypeId::ByteArray, encode_binary)
        .recursive(TypeId::List, encode_list)
        .recursive(TypeId::Tuple, encode_list)
        .recursive(TypeId::Dict, encode_map)
        .direct(TypeId::Set, encode_set)
        .direct(TypeId::FrozenSet, encode_set)
        .direct(TypeId::AbstractSet, encode_set)
        .direct(TypeId::Date, encode_temporal)
        .direct(TypeId::DateTime, encode_temporal)
        .direct(TypeId::Time, encode_temporal)
        .direct(TypeId::TimeDelta, encode_duration)
        .direct(TypeId::Enum, encode_enum)
        .direct(TypeId::Uuid, encode_uuid)
}

fn encode_bool(value: &Value) -> Result<Wire, Error> {
    match value {
        Value::Bool(b) => Ok(Wire::tagged(Tag::Bool, *b)),
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_number(value: &Value) -> Result<Wire, Error> {
    number_text(value)
        .map(|text| Wire::tagged(Tag::Number, text))
        .ok_or_else(|| Error::unconvertible(value))
}

fn encode_text(value: &Value) -> Result<Wire, Error> {
    match value {
        Value::Text(s) => Ok(Wire::tagged(Tag::String, s.as_str())),
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_binary(value: &Value) -> Result<Wire, Error> {
    match value {
        Value::Bytes(b) => Ok(Wire::tagged(Tag::Binary, b.clone())),
        Value::ByteArray(b) => Ok(Wire::tagged(Tag::Binary, Bytes::copy_from_slice(b))),
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_list(value: &Value, cx: &Context<'_, Wire>) -> Result<Wire, Error> {
    match value {
        Value::List(items) | Value::Tuple(items) => {
            let items = items
                .iter()
                .map(|item| cx.encode(item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Wire::tagged(Tag::List, items))
        }
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_map(value: &Value, cx: &Context<'_, Wire>) -> Result<Wire, Error> {
    match value {
        Value::Map(entries) => {
            let entries = entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), cx.encode(v)?)))
                .collect::<Result<_, Error>>()?;
            Ok(Wire::tagged(Tag::Map, Wire::Map(entries)))
        }
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_set(value: &Value) -> Result<Wire, Error> {
    match value {
        Value::Set(members) | Value::FrozenSet(members) => set_attribute(members),
        other => Err(Error::unconvertible(other)),
    }
}

/// Picks the set tag from the members' family. Every member is checked
/// before anything is emitted.
fn set_attribute(members: &ValueSet) -> Result<Wire, Error> {
    let members: Vec<&Value> = members.iter().map(Value::base).collect();

    if members.iter().all(|member| member.is_number()) {
        let texts = members
            .iter()
            .map(|member| {
                number_text(member)
                    .map(Wire::Str)
                    .ok_or_else(|| Error::unconvertible(member))
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Wire::tagged(Tag::NumberSet, texts));
    }

    if let Some(texts) = members
        .iter()
        .map(|member| member.as_str().map(Wire::from))
        .collect::<Option<Vec<_>>>()
    {
        return Ok(Wire::tagged(Tag::StringSet, texts));
    }

    if let Some(blobs) = members
        .iter()
        .map(|member| member.as_bytes().map(|b| Wire::Bytes(Bytes::copy_from_slice(b))))
        .collect::<Option<Vec<_>>>()
    {
        return Ok(Wire::tagged(Tag::BinarySet, blobs));
    }

    Err(Error::invalid_tag(MIXED_SET, &Tag::SET_NAMES))
}

fn encode_temporal(value: &Value) -> Result<Wire, Error> {
    let text = match value {
        Value::Date(d) => isoformat_date(*d),
        Value::DateTime(dt) => isoformat_datetime(*dt, 'T'),
        Value::Time(t) => isoformat_time(*t),
        other => return Err(Error::unconvertible(other)),
    }
    .map_err(|_| Error::unconvertible(value))?;
    Ok(Wire::tagged(Tag::String, text))
}

fn encode_duration(value: &Value) -> Result<Wire, Error> {
    match value {
        Value::Duration(d) => Ok(Wire::tagged(Tag::Number, total_seconds(*d).to_string())),
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_enum(value: &Value) -> Result<Wire, Error> {
    match value {
        Value::Enum(member) => Ok(Wire::tagged(Tag::String, member.value().to_string())),
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_uuid(value: &Value) -> Result<Wire, Error> {
    match value {
        Value::Uuid(u) => Ok(Wire::tagged(Tag::String, u.hyphenated().to_string())),
        other => Err(Error::unconvertible(other)),
    }
}
