use crate::value::Value;

/// All errors that can be returned while encoding or decoding a value.
///
/// Conversions are fail-fast: the first invalid subtree aborts the whole
/// call and no partial result is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No rule is registered for the value's type or any type in its lineage.
    #[error("Unable to serialize value {value} of type {type_name}")]
    UnconvertibleType { value: String, type_name: String },

    /// A wire tag is not one of the recognized tags, or a set cannot be
    /// given any of the set tags because its members span several families.
    #[error("{reason}. Use one of {valid:?}")]
    InvalidWireTag {
        reason: String,
        valid: Vec<&'static str>,
    },

    /// A recognized tag carries a payload of the wrong shape.
    #[error("malformed `{tag}` payload: {message}")]
    MalformedPayload { tag: String, message: String },

    /// The input nests deeper than the configured limit.
    #[error("value nesting exceeds the maximum depth of {limit}")]
    DepthLimitExceeded { limit: usize },
}

impl Error {
    /// Builds an [`Error::UnconvertibleType`] naming `value` and its concrete type.
    pub fn unconvertible(value: &Value) -> Self {
        Error::UnconvertibleType {
            value: value.to_string(),
            type_name: value.type_name().to_string(),
        }
    }

    pub fn invalid_tag(reason: impl Into<String>, valid: &[&'static str]) -> Self {
        Error::InvalidWireTag {
            reason: reason.into(),
            valid: valid.to_vec(),
        }
    }

    pub fn malformed(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedPayload {
            tag: tag.into(),
            message: message.into(),
        }
    }
}
