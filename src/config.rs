//! Registration configuration.
//!
//! [`RegistrarConfig`] controls the parts of type registration that are policy rather than
//! structure: where the constant declaration lives in a definition body, what happens to a
//! declared constant without a value, and how deep a hierarchy may grow.

/// Namespace key holding the list of names to promote to constants
pub const DEFAULT_DECLARATION_KEY: &str = "__constant_attrs__";

/// Configuration for [`crate::TypeRegistrar`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrarConfig {
    /// Namespace key of the constant declaration list
    pub declaration_key: &'static str,

    /// Turn a declared name without a value into a constant holding [`crate::Value::None`].
    /// When disabled such declarations fail with [`crate::Error::UndefinedConstant`].
    pub allow_undefined_constants: bool,

    /// Maximum inheritance depth (default: 64)
    pub max_hierarchy_depth: usize,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            declaration_key: DEFAULT_DECLARATION_KEY,
            allow_undefined_constants: true,
            max_hierarchy_depth: 64,
        }
    }
}

impl RegistrarConfig {
    /// Rejects declared constants that have no value in the definition body
    #[must_use]
    pub fn strict() -> Self {
        Self {
            allow_undefined_constants: false,
            ..Self::default()
        }
    }

    /// Use a different namespace key for the constant declaration list
    #[must_use]
    pub fn with_declaration_key(mut self, key: &'static str) -> Self {
        self.declaration_key = key;
        self
    }

    /// Limit the inheritance depth
    #[must_use]
    pub fn with_max_hierarchy_depth(mut self, depth: usize) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }
}
