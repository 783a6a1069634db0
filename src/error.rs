use strum::{Display, EnumIter};
use thiserror::Error;

macro_rules! type_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::TypeError($msg.to_string())
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::TypeError(format!($fmt, $($arg)*))
    };
}

/// The path through which a constant was reached when a write or delete was attempted.
///
/// The path only changes the wording of the resulting error. Both paths are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum AccessPath {
    /// The attribute was reached through an instance (`obj.NAME = ...`)
    Instance,
    /// The attribute was reached through the type object itself (`Type.NAME = ...`)
    Type,
}

fn modify_message(name: &str, type_name: &str, path: &AccessPath) -> String {
    match path {
        AccessPath::Instance => {
            format!("constant '{name}' of '{type_name}' object cannot be modified.")
        }
        AccessPath::Type => format!("Cannot modify constant '{type_name}.{name}'."),
    }
}

fn delete_message(name: &str, type_name: &str, path: &AccessPath) -> String {
    match path {
        AccessPath::Instance => {
            format!("constant '{name}' of '{type_name}' object cannot be deleted.")
        }
        AccessPath::Type => format!("Cannot delete constant '{type_name}.{name}'."),
    }
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Constant Violations
/// - [`Error::ImmutableModify`] - A write was attempted against a constant
/// - [`Error::ImmutableDelete`] - A removal was attempted against a constant
///
/// ## Attribute Errors
/// - [`Error::AttributeNotFound`] - Name does not resolve on the type or instance
///
/// ## Registration Errors
/// - [`Error::TypeNotFound`] - A base type is not known to the registry
/// - [`Error::DuplicateBase`] - A base type was listed twice
/// - [`Error::InconsistentHierarchy`] - No consistent inheritance order exists
/// - [`Error::InvalidDeclaration`] - The constant declaration entry is malformed
/// - [`Error::UndefinedConstant`] - A declared constant has no value (strict mode)
/// - [`Error::SlotAlreadyBound`] - A constant slot was installed twice
/// - [`Error::RecursionLimit`] - The hierarchy is deeper than allowed
///
/// ## Instantiation Errors
/// - [`Error::AbstractInstantiation`] - An abstract type was instantiated
///
/// # Examples
///
/// ```rust
/// use typeconst::{ClassBuilder, Error, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// let class = ClassBuilder::new("A").constant("foo", 42).build(&registry)?;
///
/// match class.set_attr("foo", 1.into()) {
///     Err(Error::ImmutableModify { name, .. }) => assert_eq!(name, "foo"),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// # Ok::<(), typeconst::Error>(())
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A write was attempted against a name that resolves to a constant.
    ///
    /// The message wording depends on `path`: instance writes report
    /// `constant '<name>' of '<type>' object cannot be modified.`, type writes
    /// report `Cannot modify constant '<type>.<name>'.`
    #[error("{}", modify_message(.name, .type_name, .path))]
    ImmutableModify {
        /// The constant's name
        name: String,
        /// The accessing type's name
        type_name: String,
        /// Whether the write went through an instance or the type itself
        path: AccessPath,
    },

    /// A removal was attempted against a name that resolves to a constant.
    ///
    /// Symmetric to [`Error::ImmutableModify`].
    #[error("{}", delete_message(.name, .type_name, .path))]
    ImmutableDelete {
        /// The constant's name
        name: String,
        /// The accessing type's name
        type_name: String,
        /// Whether the removal went through an instance or the type itself
        path: AccessPath,
    },

    /// The attribute does not resolve on the type or instance.
    #[error("'{type_name}' object has no attribute '{name}'")]
    AttributeNotFound {
        /// The requested attribute name
        name: String,
        /// The type the lookup started from
        type_name: String,
    },

    /// A base type is not registered in the registry defining the new type.
    #[error("Failed to find type in registry - {0}")]
    TypeNotFound(String),

    /// The same base type was listed more than once.
    #[error("duplicate base type '{0}'")]
    DuplicateBase(String),

    /// No inheritance order exists that keeps every base's own order intact.
    #[error("Cannot create a consistent inheritance order for bases {0}")]
    InconsistentHierarchy(String),

    /// The constant declaration entry of a namespace is not a list of names.
    #[error("'{key}' of type '{type_name}' must be a list of attribute names")]
    InvalidDeclaration {
        /// The namespace key holding the declaration
        key: String,
        /// The type under construction
        type_name: String,
    },

    /// A declared constant has no value in the definition body.
    #[error("constant '{type_name}.{name}' is declared but has no value")]
    UndefinedConstant {
        /// The declared constant name
        name: String,
        /// The type under construction
        type_name: String,
    },

    /// A constant slot was bound to a name twice.
    #[error("{0} is already bound")]
    SlotAlreadyBound(String),

    /// An abstract type was instantiated.
    #[error("Can't instantiate abstract type '{0}'")]
    AbstractInstantiation(String),

    /// The inheritance hierarchy is deeper than the configured limit.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// General type system operation error.
    #[error("{0}")]
    TypeError(String),
}

impl Error {
    /// Returns `true` for the two structural constant violations.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(
            self,
            Error::ImmutableModify { .. } | Error::ImmutableDelete { .. }
        )
    }
}
