//! # typeconst Prelude
//!
//! The most commonly used types, for glob import.
//!
//! ```rust
//! use typeconst::prelude::*;
//!
//! let registry = TypeRegistry::new();
//! let class = ClassBuilder::new("Currency").constant("code", "USD").build(&registry)?;
//! assert!(class.is_constant("code"));
//! # Ok::<(), Error>(())
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all typeconst operations
pub use crate::Error;

/// The result type used throughout typeconst
pub use crate::Result;

/// Path a constant violation was observed through
pub use crate::AccessPath;

/// Registration policy
pub use crate::RegistrarConfig;

// ================================================================================================
// Type System
// ================================================================================================

/// Registry, builder and registered types
pub use crate::typesystem::{ClassBuilder, ClassFlags, ClassRc, ClassType, TypeRegistry};

/// Constants and their access control
pub use crate::typesystem::{AccessContext, AccessGuard, ConstantSet, ConstantSlot};

/// Definition bodies and objects
pub use crate::typesystem::{Instance, Namespace};

/// Attribute payload and type tokens
pub use crate::{Token, Value};
