//! Conversion rules and the tables that map type identifiers to them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::encoder::Context;
use crate::error::Error;
use crate::types::TypeId;
use crate::value::Value;

/// A rule that converts a value without looking at nested values.
pub type DirectFn<T> = dyn Fn(&Value) -> Result<T, Error> + Send + Sync;

/// A rule that converts nested values through the encoder it is running in.
pub type RecursiveFn<T> = dyn Fn(&Value, &Context<'_, T>) -> Result<T, Error> + Send + Sync;

/// How a registered type is converted. The calling convention is chosen at
/// registration time and never inferred.
pub enum Rule<T> {
    /// Hand the value back unchanged (see [`Passthrough`](crate::Passthrough)).
    Identity,
    Direct(Arc<DirectFn<T>>),
    Recursive(Arc<RecursiveFn<T>>),
}

impl<T> Rule<T> {
    pub fn direct<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<T, Error> + Send + Sync + 'static,
    {
        Rule::Direct(Arc::new(f))
    }

    pub fn recursive<F>(f: F) -> Self
    where
        F: Fn(&Value, &Context<'_, T>) -> Result<T, Error> + Send + Sync + 'static,
    {
        Rule::Recursive(Arc::new(f))
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Rule::Identity)
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        match self {
            Rule::Identity => Rule::Identity,
            Rule::Direct(f) => Rule::Direct(Arc::clone(f)),
            Rule::Recursive(f) => Rule::Recursive(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Identity => f.write_str("Identity"),
            Rule::Direct(_) => f.write_str("Direct"),
            Rule::Recursive(_) => f.write_str("Recursive"),
        }
    }
}

/// Maps type identifiers to rules. Registering an identifier twice keeps the
/// last rule.
pub struct RuleTable<T> {
    rules: BTreeMap<TypeId, Rule<T>>,
}

impl<T> RuleTable<T> {
    pub fn new() -> Self {
        RuleTable {
            rules: BTreeMap::new(),
        }
    }

    /// Registers `rule` for `ty`, returning the rule it replaced.
    pub fn insert(&mut self, ty: TypeId, rule: Rule<T>) -> Option<Rule<T>> {
        self.rules.insert(ty, rule)
    }

    pub fn identity(mut self, ty: TypeId) -> Self {
        self.insert(ty, Rule::Identity);
        self
    }

    pub fn direct<F>(mut self, ty: TypeId, f: F) -> Self
    where
        F: Fn(&Value) -> Result<T, Error> + Send + Sync + 'static,
    {
        self.insert(ty, Rule::direct(f));
        self
    }

    pub fn recursive<F>(mut self, ty: TypeId, f: F) -> Self
    where
        F: Fn(&Value, &Context<'_, T>) -> Result<T, Error> + Send + Sync + 'static,
    {
        self.insert(ty, Rule::recursive(f));
        self
    }

    pub fn get(&self, ty: &TypeId) -> Option<&Rule<T>> {
        self.rules.get(ty)
    }

    /// The registered identifier equal to `ty`, with its rule.
    pub fn get_key_value(&self, ty: &TypeId) -> Option<(&TypeId, &Rule<T>)> {
        self.rules.get_key_value(ty)
    }

    pub fn contains(&self, ty: &TypeId) -> bool {
        self.rules.contains_key(ty)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn type_ids(&self) -> impl Iterator<Item = &TypeId> {
        self.rules.keys()
    }
}

impl<T> Default for RuleTable<T> {
    fn default() -> Self {
        RuleTable::new()
    }
}

impl<T> Clone for RuleTable<T> {
    fn clone(&self) -> Self {
        RuleTable {
            rules: self.rules.clone(),
        }
    }
}

impl<T> fmt::Debug for RuleTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.rules.iter()).finish()
    }
}

impl<T> Extend<(TypeId, Rule<T>)> for RuleTable<T> {
    fn extend<I: IntoIterator<Item = (TypeId, Rule<T>)>>(&mut self, iter: I) {
        for (ty, rule) in iter {
            self.insert(ty, rule);
        }
    }
}

impl<T> FromIterator<(TypeId, Rule<T>)> for RuleTable<T> {
    fn from_iter<I: IntoIterator<Item = (TypeId, Rule<T>)>>(iter: I) -> Self {
        let mut table = RuleTable::new();
        table.extend(iter);
        table
    }
}

impl<T> IntoIterator for RuleTable<T> {
    type Item = (TypeId, Rule<T>);
    type IntoIter = std::collections::btree_map::IntoIter<TypeId, Rule<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}
