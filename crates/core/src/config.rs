use serde::{Deserialize, Serialize};

/// Nesting depth accepted when no limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Limits applied by encoders and decoders.
///
/// Deserializable with every field optional, so hosts can embed it in their
/// own configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Deepest container nesting accepted; the root value is depth 0.
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecConfig {
    /// No depth limit. Only for inputs of trusted, bounded nesting.
    pub fn unbounded() -> Self {
        CodecConfig {
            max_depth: usize::MAX,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
