//! Configuration for the template resolver

use serde::{Deserialize, Serialize};

/// Resolver configuration
///
/// Controls the syntactic markers that identify function-call nodes and the
/// template fields the resolver reads. Missing fields in a serialized
/// configuration take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Key of a reference node (`{"Ref": "Name"}`)
    pub reference_key: String,
    /// Prefix of intrinsic function keys (`{"Fn::Join": [...]}`)
    pub function_prefix: String,
    /// Namespace of runtime-only pseudo parameters
    pub pseudo_parameter_prefix: String,
    /// Field of a parameter definition carrying its pre-resolved value
    pub resolved_value_field: String,
    /// Maximum nesting depth to prevent unbounded recursion
    pub max_depth: usize,
    /// Upper bound on the length of a string built by a function whose
    /// output size is not bounded by its inputs (`Fn::Indent`)
    pub max_string_length: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            reference_key: "Ref".to_string(),
            function_prefix: "Fn::".to_string(),
            pseudo_parameter_prefix: "ALIYUN::".to_string(),
            resolved_value_field: "ResolvedValue".to_string(),
            max_depth: 512,
            max_string_length: 4 * 1024 * 1024,
        }
    }
}

impl ResolverConfig {
    /// Load a configuration from a JSON document
    pub fn from_json_str(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }

    pub fn with_pseudo_parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.pseudo_parameter_prefix = prefix.into();
        self
    }
}
