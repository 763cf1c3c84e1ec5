//! Type identifiers and class lineages used by the dispatch engine.
//!
//! Every [`Value`](crate::Value) has a lineage: its own type identifier
//! followed by its supertypes, most specific first. Builtin lineages are
//! fixed; application classes precompute theirs when they are declared.

use std::fmt;
use std::sync::Arc;

/// Identifies a type that a rule can be registered for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeId {
    NoneType,
    Bool,
    Int,
    Float,
    Decimal,
    Str,
    Bytes,
    ByteArray,
    List,
    Tuple,
    Dict,
    Set,
    FrozenSet,
    /// The abstract set family shared by `set` and `frozenset`.
    AbstractSet,
    Date,
    DateTime,
    Time,
    TimeDelta,
    /// Root of every enumeration class.
    Enum,
    Uuid,
    /// An application-defined class, identified by name.
    Class(Arc<str>),
}

impl TypeId {
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        TypeId::Class(name.into())
    }

    /// The name used for this type in error messages.
    pub fn name(&self) -> &str {
        match self {
            TypeId::NoneType => "NoneType",
            TypeId::Bool => "bool",
            TypeId::Int => "int",
            TypeId::Float => "float",
            TypeId::Decimal => "Decimal",
            TypeId::Str => "str",
            TypeId::Bytes => "bytes",
            TypeId::ByteArray => "bytearray",
            TypeId::List => "list",
            TypeId::Tuple => "tuple",
            TypeId::Dict => "dict",
            TypeId::Set => "set",
            TypeId::FrozenSet => "frozenset",
            TypeId::AbstractSet => "Set",
            TypeId::Date => "date",
            TypeId::DateTime => "datetime",
            TypeId::Time => "time",
            TypeId::TimeDelta => "timedelta",
            TypeId::Enum => "Enum",
            TypeId::Uuid => "UUID",
            TypeId::Class(name) => name,
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An application-defined class with single-parent inheritance.
///
/// The lineage is computed once, when the class is declared, so dispatch
/// never has to chase parent pointers.
///
/// A class is identified by its name: two classes declared with the same
/// name share one [`TypeId`] and therefore one rule table entry. Names must
/// be unique within a codec.
#[derive(Debug, PartialEq, Eq)]
pub struct Class {
    name: Arc<str>,
    lineage: Vec<TypeId>,
}

impl Class {
    /// Declares a root class with no superclass.
    pub fn new(name: impl Into<Arc<str>>) -> Arc<Class> {
        let name = name.into();
        Arc::new(Class {
            lineage: vec![TypeId::Class(name.clone())],
            name,
        })
    }

    /// Declares an enumeration class; its lineage ends at [`TypeId::Enum`].
    pub fn enumeration(name: impl Into<Arc<str>>) -> Arc<Class> {
        let name = name.into();
        Arc::new(Class {
            lineage: vec![TypeId::Class(name.clone()), TypeId::Enum],
            name,
        })
    }

    /// Declares a class whose superclass is `parent`.
    pub fn subclass(name: impl Into<Arc<str>>, parent: &Class) -> Arc<Class> {
        let name = name.into();
        let mut lineage = Vec::with_capacity(parent.lineage.len() + 1);
        lineage.push(TypeId::Class(name.clone()));
        lineage.extend(parent.lineage.iter().cloned());
        Arc::new(Class { name, lineage })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        TypeId::Class(self.name.clone())
    }

    /// This class followed by its ancestors, most specific first.
    pub fn lineage(&self) -> &[TypeId] {
        &self.lineage
    }

    pub fn is_enum(&self) -> bool {
        self.lineage.contains(&TypeId::Enum)
    }

    pub fn inherits(&self, ty: &TypeId) -> bool {
        self.lineage.contains(ty)
    }
}
