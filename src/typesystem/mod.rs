//! Runtime type system with immutable, inheritable constants.
//!
//! This module provides a small explicit object model: registered types with multiple
//! inheritance, instances with private storage, and constants that are fixed when their
//! owning type is registered. Constants stay readable through every subclass and every
//! instance and can never be reassigned or removed, neither through the type nor through an
//! instance.
//!
//! # Key Components
//!
//! - [`ClassType`]: A registered type, its bases, inheritance order and attributes
//! - [`ConstantSlot`]: Read-only accessor bound to one constant name
//! - [`TypeRegistrar`]: One-time construction step turning a definition body into a type
//! - [`AccessGuard`]: Validation consulted by every type-level write or delete
//! - [`TypeRegistry`]: Central registry that assigns tokens and publishes types
//! - [`ClassBuilder`]: Builder pattern for defining types
//! - [`Instance`]: An object of a registered type
//!
//! # Inheritance Order
//!
//! Each type lists its direct bases when it is registered. The registrar computes the
//! inheritance order once (C3 merge of the bases' own orders, most derived first) and stores
//! it on the type. Attribute lookup walks that order and the first type owning the name
//! supplies the value, so a subclass redeclaring a constant shadows its ancestor's slot
//! without touching it.
//!
//! # Examples
//!
//! ```rust
//! use typeconst::{ClassBuilder, Instance, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new();
//! let a = ClassBuilder::new("A").constant("foo", 42).build(&registry)?;
//! let b = ClassBuilder::new("B").base(&a).constant("bar", "hello there").build(&registry)?;
//!
//! assert_eq!(b.get_attr("foo")?, Value::I4(42));
//! assert_eq!(b.constants(), &["foo", "bar"]);
//!
//! let obj = Instance::new(&b)?;
//! assert!(obj.set_attr("bar", "hello".into()).is_err());
//! # Ok::<(), typeconst::Error>(())
//! ```

mod base;
mod builder;
mod guard;
mod instance;
mod namespace;
mod registrar;
mod registry;
mod slot;

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use dashmap::DashMap;

pub use base::{Attribute, ClassFlags, ClassRef, ConstantSet};
pub use builder::ClassBuilder;
pub use guard::AccessGuard;
pub use instance::{Instance, InstanceStorage};
pub use namespace::{Member, Namespace};
pub use registrar::TypeRegistrar;
pub use registry::TypeRegistry;
pub use slot::{AccessContext, ConstantGetter, ConstantSlot};

use crate::{token::Token, value::Value, Error, Result};

/// A list of `ClassRc`, append-only
pub type ClassList = Arc<boxcar::Vec<ClassRef>>;
/// Reference to a `ClassType`
pub type ClassRc = Arc<ClassType>;

/// A registered type.
///
/// Everything except the type's own ordinary attributes is fixed at registration: bases,
/// inheritance order, constant slots and the published constant-name set.
pub struct ClassType {
    /// Registry token
    pub token: Token,
    /// Type name
    pub name: String,
    /// Behaviour flags
    pub flags: ClassFlags,
    /// Direct bases, in declaration order
    bases: Vec<ClassRc>,
    /// Inheritance order without the type itself, most derived first
    ancestors: Vec<ClassRc>,
    /// Longest base chain below this type (0 for roots)
    depth: usize,
    /// The type's own attributes
    dict: DashMap<String, Attribute>,
    /// Names of all constants visible on this type, published once
    constants: OnceLock<ConstantSet>,
    /// Direct subclasses registered so far
    subclasses: ClassList,
}

impl ClassType {
    pub(crate) fn new(
        token: Token,
        name: String,
        flags: ClassFlags,
        bases: Vec<ClassRc>,
        ancestors: Vec<ClassRc>,
        dict: DashMap<String, Attribute>,
    ) -> Self {
        let depth = bases.iter().map(|base| base.depth + 1).max().unwrap_or(0);

        ClassType {
            token,
            name,
            flags,
            bases,
            ancestors,
            depth,
            dict,
            constants: OnceLock::new(),
            subclasses: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Direct bases, in declaration order
    #[must_use]
    pub fn bases(&self) -> &[ClassRc] {
        &self.bases
    }

    /// Inheritance order without the type itself, most derived first
    #[must_use]
    pub fn ancestors(&self) -> &[ClassRc] {
        &self.ancestors
    }

    /// Inheritance order starting with the type itself
    pub fn mro(&self) -> impl Iterator<Item = &ClassType> {
        std::iter::once(self).chain(self.ancestors.iter().map(AsRef::as_ref))
    }

    /// Names of the inheritance order, starting with the type itself
    #[must_use]
    pub fn mro_names(&self) -> Vec<&str> {
        self.mro().map(|class| class.name.as_str()).collect()
    }

    /// Longest base chain below this type (0 for types without bases)
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `true` if `other` is this type or one of its ancestors
    #[must_use]
    pub fn is_subclass_of(&self, other: &ClassType) -> bool {
        self.mro().any(|class| class.token == other.token)
    }

    /// Direct subclasses that are still alive
    #[must_use]
    pub fn subclasses(&self) -> Vec<ClassRc> {
        self.subclasses
            .iter()
            .filter_map(|(_, sub)| sub.upgrade())
            .collect()
    }

    /// Returns `true` for types flagged [`ClassFlags::ABSTRACT`]
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(ClassFlags::ABSTRACT)
    }

    /// The published set of every constant name visible on this type
    #[must_use]
    pub fn constants(&self) -> &ConstantSet {
        self.constants.get().unwrap_or(&base::EMPTY_CONSTANTS)
    }

    /// Names of the constants this type declares itself
    #[must_use]
    pub fn own_constants(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .dict
            .iter()
            .filter(|entry| entry.value().is_constant())
            .map(|entry| entry.key().clone())
            .collect();
        names.sort_unstable();
        names
    }

    /// Names of all attributes this type defines itself
    #[must_use]
    pub fn own_attributes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dict.iter().map(|entry| entry.key().clone()).collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` if `name` is in this type's own dictionary
    #[must_use]
    pub fn defines(&self, name: &str) -> bool {
        self.dict.contains_key(name)
    }

    /// Returns `true` if `name` is a constant on this type.
    ///
    /// This matches the type-level guard: a plain attribute defined over an inherited
    /// constant still counts.
    #[must_use]
    pub fn is_constant(&self, name: &str) -> bool {
        AccessGuard::is_guarded(self, name)
    }

    /// Resolve `name` through the inheritance order.
    ///
    /// Returns the entry of the most derived type that defines `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Attribute> {
        self.mro()
            .find_map(|class| class.dict.get(name).map(|entry| entry.value().clone()))
    }

    /// Resolve `name` and return the slot, if it resolves to a constant
    #[must_use]
    pub fn lookup_constant(&self, name: &str) -> Option<Arc<ConstantSlot>> {
        match self.lookup(name) {
            Some(Attribute::Constant(slot)) => Some(slot),
            _ => None,
        }
    }

    /// Read an attribute through the type.
    ///
    /// # Errors
    /// Returns [`Error::AttributeNotFound`] if `name` does not resolve.
    pub fn get_attr(&self, name: &str) -> Result<Value> {
        match self.lookup(name) {
            Some(Attribute::Constant(slot)) => Ok(slot.get(None, self)),
            Some(Attribute::Value(value)) => Ok(value),
            None => Err(Error::AttributeNotFound {
                name: name.to_string(),
                type_name: self.name.clone(),
            }),
        }
    }

    /// Assign an attribute on the type.
    ///
    /// # Errors
    /// Returns [`Error::ImmutableModify`] if `name` is a constant.
    pub fn set_attr(&self, name: &str, value: Value) -> Result<()> {
        AccessGuard::guard_set(self, name, value)
    }

    /// Delete an attribute from the type.
    ///
    /// # Errors
    /// Returns [`Error::ImmutableDelete`] if `name` is a constant, or
    /// [`Error::AttributeNotFound`] if the type does not define `name` itself.
    pub fn del_attr(&self, name: &str) -> Result<()> {
        AccessGuard::guard_delete(self, name)
    }

    /// Ordinary assignment into the own dictionary, after the guard has passed
    pub(crate) fn store(&self, name: &str, value: Value) {
        self.dict.insert(name.to_string(), Attribute::Value(value));
    }

    /// Ordinary removal from the own dictionary, after the guard has passed
    pub(crate) fn remove(&self, name: &str) -> Result<()> {
        match self.dict.remove(name) {
            Some(_) => Ok(()),
            None => Err(Error::AttributeNotFound {
                name: name.to_string(),
                type_name: self.name.clone(),
            }),
        }
    }

    /// Returns `true` if this type's own dictionary holds a slot under `name`
    pub(crate) fn owns_constant(&self, name: &str) -> bool {
        self.dict
            .get(name)
            .is_some_and(|entry| entry.value().is_constant())
    }

    /// Slots declared directly on this type
    pub(crate) fn own_slots(&self) -> Vec<Arc<ConstantSlot>> {
        self.dict
            .iter()
            .filter_map(|entry| entry.value().as_constant().cloned())
            .collect()
    }

    pub(crate) fn publish_constants(&self, constants: ConstantSet) -> Result<()> {
        self.constants
            .set(constants)
            .map_err(|_| type_error!("constants of '{}' are already published", self.name))
    }

    pub(crate) fn add_subclass(&self, sub: &ClassRc) {
        self.subclasses.push(sub.into());
    }
}

impl fmt::Debug for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassType")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("mro", &self.mro_names())
            .field("constants", self.constants())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<type '{}'>", self.name)
    }
}
