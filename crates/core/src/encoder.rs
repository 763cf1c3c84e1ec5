//! The dispatch engine.
//!
//! [`Encoder`] resolves a rule for a value by walking the value's lineage
//! from most to least specific, so a rule registered for a family (any
//! enumeration, any set) covers every member of it while an exact-type
//! registration still takes precedence. [`Value::Object`] instances are
//! tried by class lineage first and then by the lineage of the value they
//! wrap; in that case the wrapped value is what the rule receives.

use std::fmt;

use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::error::Error;
use crate::rule::{Rule, RuleTable};
use crate::types::TypeId;
use crate::value::Value;

/// Output types that can hold a value returned unchanged by [`Rule::Identity`].
pub trait Passthrough: Sized {
    /// `None` when `value` has no unchanged representation in `Self`.
    fn passthrough(value: &Value) -> Option<Self>;
}

impl Passthrough for Value {
    fn passthrough(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl Passthrough for serde_json::Value {
    fn passthrough(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(serde_json::Value::Null),
            Value::Bool(b) => Some(serde_json::Value::Bool(*b)),
            Value::Int(i) => Some(serde_json::Value::from(*i)),
            Value::Float(f) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number),
            Value::Text(s) => Some(serde_json::Value::String(s.clone())),
            _ => None,
        }
    }
}

/// A registry of rules plus the entry point that applies them.
///
/// The registry is only mutated through [`Encoder::extend`], which takes
/// `&mut self`; once shared, an encoder is read-only and can be used from
/// any number of threads.
pub struct Encoder<T> {
    rules: RuleTable<T>,
    config: CodecConfig,
}

impl<T> Encoder<T> {
    pub fn new(rules: RuleTable<T>) -> Self {
        Encoder::with_config(rules, CodecConfig::default())
    }

    pub fn with_config(rules: RuleTable<T>, config: CodecConfig) -> Self {
        debug!(
            rules = rules.len(),
            max_depth = config.max_depth,
            "built encoder"
        );
        Encoder { rules, config }
    }

    /// Merges `extensions` over the registered rules, by exact type identifier.
    pub fn extend(&mut self, extensions: RuleTable<T>) {
        debug!(extensions = extensions.len(), "extending encoder rules");
        self.rules.extend(extensions);
    }

    pub fn extended(mut self, extensions: RuleTable<T>) -> Self {
        self.extend(extensions);
        self
    }

    pub fn rules(&self) -> &RuleTable<T> {
        &self.rules
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The registered type identifier that would handle `value`.
    pub fn resolve(&self, value: &Value) -> Option<&TypeId> {
        self.lookup(value).map(|(ty, _, _)| ty)
    }

    /// Finds the rule for `value` and the value it should be applied to.
    fn lookup<'v>(&self, value: &'v Value) -> Option<(&TypeId, &Rule<T>, &'v Value)> {
        let mut current = value;
        loop {
            for ty in current.lineage() {
                if let Some((registered, rule)) = self.rules.get_key_value(ty) {
                    return Some((registered, rule, current));
                }
            }
            current = current.unwrap_object()?;
        }
    }
}

impl<T> Clone for Encoder<T> {
    fn clone(&self) -> Self {
        Encoder {
            rules: self.rules.clone(),
            config: self.config,
        }
    }
}

impl<T> fmt::Debug for Encoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("rules", &self.rules)
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Passthrough> Encoder<T> {
    /// Converts `value` with the most specific rule in its lineage.
    pub fn encode(&self, value: &Value) -> Result<T, Error> {
        self.encode_at(value, 0)
    }

    fn encode_at(&self, value: &Value, depth: usize) -> Result<T, Error> {
        if depth > self.config.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }

        let (ty, rule, target) = self
            .lookup(value)
            .ok_or_else(|| Error::unconvertible(value))?;
        trace!(type_id = %ty, value_type = value.type_name(), depth, "resolved rule");

        match rule {
            Rule::Identity => T::passthrough(target).ok_or_else(|| Error::unconvertible(target)),
            Rule::Direct(f) => f(target),
            Rule::Recursive(f) => f(
                target,
                &Context {
                    encoder: self,
                    depth,
                },
            ),
        }
    }
}

/// Handed to recursive rules so they can convert nested values with the
/// encoder they are registered in.
pub struct Context<'a, T> {
    encoder: &'a Encoder<T>,
    depth: usize,
}

impl<'a, T> Context<'a, T> {
    pub fn encoder(&self) -> &'a Encoder<T> {
        self.encoder
    }

    /// Nesting depth of the value currently being converted.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<'a, T: Passthrough> Context<'a, T> {
    /// Converts a nested value one level below the current one.
    pub fn encode(&self, value: &Value) -> Result<T, Error> {
        self.encoder.encode_at(value, self.depth + 1)
    }
}
