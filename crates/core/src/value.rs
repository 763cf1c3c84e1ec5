//! Runtime value model.
//!
//! [`Value`] is the universal input of every encoder and the output of the
//! tagged decoder. Equality follows the conventions of dynamically typed
//! data: numbers compare by value across `Int`, `Float` and `Decimal`, byte
//! buffers compare by content, and sets ignore member order.

use bigdecimal::BigDecimal;
use bytes::Bytes;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use time::{Date, Duration, PrimitiveDateTime, Time};
use uuid::Uuid;

use crate::number::{float_text, float_to_decimal};
use crate::temporal::{duration_text, isoformat_date, isoformat_datetime, isoformat_time};
use crate::types::{Class, TypeId};

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Arbitrary-precision decimal; holds any wire number exactly.
    Decimal(BigDecimal),
    Text(String),
    /// Immutable byte sequence; the canonical byte form.
    Bytes(Bytes),
    /// Mutable byte buffer.
    ByteArray(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Set(ValueSet),
    FrozenSet(ValueSet),
    Date(Date),
    DateTime(PrimitiveDateTime),
    Time(Time),
    Duration(Duration),
    Enum(EnumMember),
    Uuid(Uuid),
    Object(Object),
}

impl Value {
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The concrete type's name, as used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Enum(member) => member.class.name(),
            Value::Object(object) => object.class.name(),
            other => other.lineage()[0].name(),
        }
    }

    /// The value's own type followed by its supertypes, most specific first.
    ///
    /// For [`Value::Object`] this is the class lineage only; the wrapped
    /// value contributes its own lineage after it (see [`Value::unwrap_object`]).
    pub fn lineage(&self) -> &[TypeId] {
        static NONE: [TypeId; 1] = [TypeId::NoneType];
        static BOOL: [TypeId; 2] = [TypeId::Bool, TypeId::Int];
        static INT: [TypeId; 1] = [TypeId::Int];
        static FLOAT: [TypeId; 1] = [TypeId::Float];
        static DECIMAL: [TypeId; 1] = [TypeId::Decimal];
        static STR: [TypeId; 1] = [TypeId::Str];
        static BYTES: [TypeId; 1] = [TypeId::Bytes];
        static BYTE_ARRAY: [TypeId; 1] = [TypeId::ByteArray];
        static LIST: [TypeId; 1] = [TypeId::List];
        static TUPLE: [TypeId; 1] = [TypeId::Tuple];
        static DICT: [TypeId; 1] = [TypeId::Dict];
        static SET: [TypeId; 2] = [TypeId::Set, TypeId::AbstractSet];
        static FROZEN_SET: [TypeId; 2] = [TypeId::FrozenSet, TypeId::AbstractSet];
        static DATE: [TypeId; 1] = [TypeId::Date];
        static DATE_TIME: [TypeId; 2] = [TypeId::DateTime, TypeId::Date];
        static TIME: [TypeId; 1] = [TypeId::Time];
        static TIME_DELTA: [TypeId; 1] = [TypeId::TimeDelta];
        static UUID: [TypeId; 1] = [TypeId::Uuid];

        match self {
            Value::Null => &NONE,
            Value::Bool(_) => &BOOL,
            Value::Int(_) => &INT,
            Value::Float(_) => &FLOAT,
            Value::Decimal(_) => &DECIMAL,
            Value::Text(_) => &STR,
            Value::Bytes(_) => &BYTES,
            Value::ByteArray(_) => &BYTE_ARRAY,
            Value::List(_) => &LIST,
            Value::Tuple(_) => &TUPLE,
            Value::Map(_) => &DICT,
            Value::Set(_) => &SET,
            Value::FrozenSet(_) => &FROZEN_SET,
            Value::Date(_) => &DATE,
            Value::DateTime(_) => &DATE_TIME,
            Value::Time(_) => &TIME,
            Value::Duration(_) => &TIME_DELTA,
            Value::Uuid(_) => &UUID,
            Value::Enum(member) => member.class.lineage(),
            Value::Object(object) => object.class.lineage(),
        }
    }

    /// The value an [`Object`] wraps; `None` for every other variant.
    pub fn unwrap_object(&self) -> Option<&Value> {
        match self {
            Value::Object(object) => Some(&object.inner),
            _ => None,
        }
    }

    /// Strips any number of [`Object`] wrappers.
    pub fn base(&self) -> &Value {
        let mut current = self;
        while let Some(inner) = current.unwrap_object() {
            current = inner;
        }
        current
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Decimal(_))
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(&b[..]),
            Value::ByteArray(b) => Some(&b[..]),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Quoted rendering used for container members.
    fn fmt_member(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "'{}'", s.escape_default()),
            other => fmt::Display::fmt(other, f),
        }
    }
}

fn fmt_members<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt_member(f)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => match float_text(*x) {
                Some(text) => f.write_str(&text),
                None if x.is_nan() => f.write_str("nan"),
                None if *x > 0.0 => f.write_str("inf"),
                None => f.write_str("-inf"),
            },
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "b'{}'", b.escape_ascii()),
            Value::ByteArray(b) => write!(f, "bytearray(b'{}')", b.escape_ascii()),
            Value::List(items) => {
                f.write_str("[")?;
                fmt_members(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                fmt_members(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{}': ", k.escape_default())?;
                    v.fmt_member(f)?;
                }
                f.write_str("}")
            }
            Value::Set(set) if set.is_empty() => f.write_str("set()"),
            Value::Set(set) => {
                f.write_str("{")?;
                fmt_members(f, set)?;
                f.write_str("}")
            }
            Value::FrozenSet(set) if set.is_empty() => f.write_str("frozenset()"),
            Value::FrozenSet(set) => {
                f.write_str("frozenset({")?;
                fmt_members(f, set)?;
                f.write_str("})")
            }
            Value::Date(d) => f.write_str(&isoformat_date(*d).map_err(|_| fmt::Error)?),
            Value::DateTime(dt) => {
                f.write_str(&isoformat_datetime(*dt, ' ').map_err(|_| fmt::Error)?)
            }
            Value::Time(t) => f.write_str(&isoformat_time(*t).map_err(|_| fmt::Error)?),
            Value::Duration(d) => f.write_str(&duration_text(*d)),
            Value::Enum(member) => write!(f, "{}.{}", member.class.name(), member.name),
            Value::Uuid(u) => write!(f, "{}", u.hyphenated()),
            Value::Object(object) => {
                write!(f, "{}(", object.class.name())?;
                object.inner.fmt_member(f)?;
                f.write_str(")")
            }
        }
    }
}

fn numeric_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Decimal(a), Value::Decimal(b)) => a == b,
        (Value::Int(i), Value::Decimal(d)) | (Value::Decimal(d), Value::Int(i)) => {
            BigDecimal::from(*i) == *d
        }
        (Value::Int(i), Value::Float(x)) | (Value::Float(x), Value::Int(i)) => *i as f64 == *x,
        (Value::Float(x), Value::Decimal(d)) | (Value::Decimal(d), Value::Float(x)) => {
            float_to_decimal(*x).is_some_and(|converted| converted == *d)
        }
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Set(a) | Value::FrozenSet(a), Value::Set(b) | Value::FrozenSet(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => match (self.as_bytes(), other.as_bytes()) {
                (Some(a), Some(b)) => a == b,
                _ => numeric_eq(self, other),
            },
        }
    }
}

// ──────────────────────────────────────────────
// Enumerations and application objects
// ──────────────────────────────────────────────

/// A member of an enumeration class, carrying its underlying value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    class: Arc<Class>,
    name: String,
    value: Box<Value>,
}

impl EnumMember {
    /// `class` must be declared with [`Class::enumeration`] (or derive from
    /// one) so that its lineage reaches [`TypeId::Enum`].
    pub fn new(class: &Arc<Class>, name: impl Into<String>, value: impl Into<Value>) -> Self {
        debug_assert!(
            class.is_enum(),
            "enum member of `{}`, which does not derive from Enum",
            class.name()
        );
        EnumMember {
            class: Arc::clone(class),
            name: name.into(),
            value: Box::new(value.into()),
        }
    }

    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// An instance of an application class wrapping the value that holds its data.
///
/// A class declared as a subclass of a builtin family (say, a mapping)
/// wraps a value of that family; rules registered for the builtin then see
/// the wrapped value.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    class: Arc<Class>,
    inner: Box<Value>,
}

impl Object {
    pub fn new(class: &Arc<Class>, inner: impl Into<Value>) -> Self {
        Object {
            class: Arc::clone(class),
            inner: Box::new(inner.into()),
        }
    }

    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    pub fn inner(&self) -> &Value {
        &self.inner
    }
}

// ──────────────────────────────────────────────
// Sets
// ──────────────────────────────────────────────

/// Distinct members in insertion order. Equality ignores order.
///
/// Text and byte members are looked up through a content hash. Every other
/// member is found by a linear scan, since numbers compare equal across
/// kinds; building a set of `n` such members costs O(n²).
#[derive(Clone, Default)]
pub struct ValueSet {
    members: Vec<Value>,
    index: HashMap<u64, Vec<usize>>,
}

/// Hash of a text or byte member's content; `None` for every other kind.
fn content_hash(value: &Value) -> Option<u64> {
    let mut hasher = DefaultHasher::new();
    match value {
        Value::Text(s) => {
            0u8.hash(&mut hasher);
            s.hash(&mut hasher);
        }
        Value::Bytes(_) | Value::ByteArray(_) => {
            1u8.hash(&mut hasher);
            value.as_bytes()?.hash(&mut hasher);
        }
        _ => return None,
    }
    Some(hasher.finish())
}

impl ValueSet {
    pub fn new() -> Self {
        ValueSet::default()
    }

    /// Adds `value` unless an equal member is present. Returns whether it was added.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        if let Some(hash) = content_hash(&value) {
            self.index.entry(hash).or_default().push(self.members.len());
        }
        self.members.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        match content_hash(value) {
            Some(hash) => self.index.get(&hash).is_some_and(|slots| {
                slots.iter().any(|&slot| self.members[slot] == *value)
            }),
            None => self.members.iter().any(|member| member == value),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.members.iter()
    }
}

impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(&self.members).finish()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &ValueSet) -> bool {
        self.len() == other.len() && self.iter().all(|member| other.contains(member))
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

// ──────────────────────────────────────────────
// Conversions
// ──────────────────────────────────────────────

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    BigDecimal => Decimal,
    String => Text,
    &str => Text,
    Bytes => Bytes,
    Vec<Value> => List,
    BTreeMap<String, Value> => Map,
    ValueSet => Set,
    Date => Date,
    PrimitiveDateTime => DateTime,
    Time => Time,
    Duration => Duration,
    Uuid => Uuid,
    EnumMember => Enum,
    Object => Object,
}

impl From<rust_decimal::Decimal> for Value {
    fn from(v: rust_decimal::Decimal) -> Self {
        Value::Decimal(BigDecimal::new(v.mantissa().into(), i64::from(v.scale())))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
