//! Conversion options
//!
//! Options are plain serde data so they can be loaded from a config file next to
//! the routing tables an application keeps for each upstream data source.

use crate::StrictMode;
use serde::{Deserialize, Serialize};

/// Default recursion limit for nested conversions
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options controlling a conversion call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Convert resolved field values to their declared types
    pub convert_types: bool,
    /// What to do when a container cannot be built as requested
    pub strict_mode: StrictMode,
    /// Maximum nesting depth of containers and objects
    pub max_depth: usize,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            convert_types: true,
            strict_mode: StrictMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConversionOptions {
    pub fn with_convert_types(mut self, convert_types: bool) -> Self {
        self.convert_types = convert_types;
        self
    }

    pub fn with_strict_mode(mut self, strict_mode: StrictMode) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
