//! Builder for type definitions.
//!
//! [`ClassBuilder`] offers a fluent API for assembling a definition body and defining it
//! through a [`TypeRegistry`]. Constant declarations are written under the registry's
//! configured declaration key when the type is built.
//!
//! # Example
//!
//! ```rust
//! use typeconst::{ClassBuilder, ConstantSlot, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new();
//! let loan = ClassBuilder::new("Loan")
//!     .abstract_type()
//!     .declare("loan_type")
//!     .attr("outstanding", 0)
//!     .build(&registry)?;
//! let mortgage = ClassBuilder::new("Mortgage")
//!     .base(&loan)
//!     .constant("loan_type", "mortgage")
//!     .constant_slot("term_years", ConstantSlot::new(30).with_doc("amortization term"))
//!     .build(&registry)?;
//!
//! assert_eq!(loan.get_attr("loan_type")?, Value::None);
//! assert_eq!(mortgage.get_attr("loan_type")?, Value::from("mortgage"));
//! assert_eq!(mortgage.constants(), &["loan_type", "term_years"]);
//! # Ok::<(), typeconst::Error>(())
//! ```

use crate::{
    typesystem::{ClassFlags, ClassRc, ConstantSlot, Namespace, TypeRegistry},
    value::Value,
    Result,
};

/// Provides a fluent API for defining types
pub struct ClassBuilder {
    /// Name of the type being built
    name: String,
    /// Direct bases
    bases: Vec<ClassRc>,
    /// Definition body
    namespace: Namespace,
    /// Names to promote to constants
    declared: Vec<String>,
    /// Behaviour flags
    flags: ClassFlags,
}

impl ClassBuilder {
    /// Start building a type with the given name
    ///
    /// ## Arguments
    /// * 'name' - Name of the type
    #[must_use]
    pub fn new(name: &str) -> Self {
        ClassBuilder {
            name: name.to_string(),
            bases: Vec::new(),
            namespace: Namespace::new(),
            declared: Vec::new(),
            flags: ClassFlags::empty(),
        }
    }

    /// Append a direct base
    #[must_use]
    pub fn base(mut self, base: &ClassRc) -> Self {
        self.bases.push(base.clone());
        self
    }

    /// Append several direct bases, in order
    #[must_use]
    pub fn bases(mut self, bases: &[ClassRc]) -> Self {
        self.bases.extend_from_slice(bases);
        self
    }

    /// Set an ordinary attribute
    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.namespace.insert(name, value);
        self
    }

    /// Set an attribute and declare it constant
    #[must_use]
    pub fn constant(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.namespace.insert(name, value);
        self.declared.push(name.to_string());
        self
    }

    /// Install a pre-built slot under `name`
    #[must_use]
    pub fn constant_slot(mut self, name: &str, slot: ConstantSlot) -> Self {
        self.namespace.insert_constant(name, slot);
        self
    }

    /// Declare `name` constant without giving it a value here
    #[must_use]
    pub fn declare(mut self, name: &str) -> Self {
        self.declared.push(name.to_string());
        self
    }

    /// Mark the type abstract
    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.flags |= ClassFlags::ABSTRACT;
        self
    }

    /// Define the type through `registry`
    ///
    /// # Errors
    /// Returns any error of [`TypeRegistry::define`].
    pub fn build(mut self, registry: &TypeRegistry) -> Result<ClassRc> {
        if !self.declared.is_empty() {
            self.namespace
                .declare_constants_with_key(registry.config().declaration_key, self.declared);
        }
        registry.define_with_flags(&self.name, &self.bases, self.namespace, self.flags)
    }
}
