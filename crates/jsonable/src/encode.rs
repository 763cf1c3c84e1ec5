//! Untagged rule table.
//!
//! | Value                          | JSON                      |
//! |--------------------------------|---------------------------|
//! | None, bool, int, float, str    | unchanged                 |
//! | Decimal, UUID                  | string                    |
//! | date, datetime, time           | ISO-8601 string           |
//! | timedelta                      | number of seconds         |
//! | Enum                           | the member's value        |
//! | list, tuple, set, frozenset    | array                     |
//! | dict                           | object                    |
//!
//! Bytes have no rule. The output is lossy and there is no decoder.

use cerealbox_core::temporal::{
    isoformat_date, isoformat_datetime, isoformat_time, total_seconds_f64,
};
use cerealbox_core::{Context, Error, RuleTable, TypeId, Value};
use serde_json::{Map, Number, Value as Json};

/// The default untagged rule table.
pub fn rules() -> RuleTable<Json> {
    RuleTable::new()
        .identity(TypeId::NoneType)
        .identity(TypeId::Bool)
        .identity(TypeId::Int)
        .identity(TypeId::Float)
        .identity(TypeId::Str)
        .direct(TypeId::Decimal, encode_decimal)
        .direct(TypeId::Uuid, encode_uuid)
        .direct(TypeId::Date, encode_temporal)
        .direct(TypeId::DateTime, encode_temporal)
        .direct(TypeId::Time, encode_temporal)
        .direct(TypeId::TimeDelta, encode_duration)
        .recursive(TypeId::Enum, encode_enum)
        .recursive(TypeId::List, encode_array)
        .recursive(TypeId::Tuple, encode_array)
        .recursive(TypeId::Set, encode_array)
        .recursive(TypeId::FrozenSet, encode_array)
        .recursive(TypeId::AbstractSet, encode_array)
        .recursive(TypeId::Dict, encode_object)
}

fn encode_decimal(value: &Value) -> Result<Json, Error> {
    match value {
        Value::Decimal(d) => Ok(Json::String(d.to_string())),
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_uuid(value: &Value) -> Result<Json, Error> {
    match value {
        Value::Uuid(u) => Ok(Json::String(u.hyphenated().to_string())),
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_temporal(value: &Value) -> Result<Json, Error> {
    let text = match value {
        Value::Date(d) => isoformat_date(*d),
        Value::DateTime(dt) => isoformat_datetime(*dt, 'T'),
        Value::Time(t) => isoformat_time(*t),
        other => return Err(Error::unconvertible(other)),
    };
    text.map(Json::String)
        .map_err(|_| Error::unconvertible(value))
}

fn encode_duration(value: &Value) -> Result<Json, Error> {
    match value {
        Value::Duration(d) => Number::from_f64(total_seconds_f64(*d))
            .map(Json::Number)
            .ok_or_else(|| Error::unconvertible(value)),
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_enum(value: &Value, cx: &Context<'_, Json>) -> Result<Json, Error> {
    match value {
        Value::Enum(member) => cx.encode(member.value()),
        other => Err(Error::unconvertible(other)),
    }
}

fn encode_array(value: &Value, cx: &Context<'_, Json>) -> Result<Json, Error> {
    let items: Vec<&Value> = match value {
        Value::List(items) | Value::Tuple(items) => items.iter().collect(),
        Value::Set(members) | Value::FrozenSet(members) => members.iter().collect(),
        other => return Err(Error::unconvertible(other)),
    };
    items
        .into_iter()
        .map(|item| cx.encode(item))
        .collect::<Result<Vec<_>, _>>()
        .map(Json::Array)
}

fn encode_object(value: &Value, cx: &Context<'_, Json>) -> Result<Json, Error> {
    match value {
        Value::Map(entries) => entries
            .iter()
            .map(|(k, v)| Ok((k.clone(), cx.encode(v)?)))
            .collect::<Result<Map<String, Json>, Error>>()
            .map(Json::Object),
        other => Err(Error::unconvertible(other)),
    }
}
