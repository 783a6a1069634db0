//! Validation of writes and deletes against constants.
//!
//! Every type-level assignment or removal goes through [`AccessGuard`] before it reaches
//! the type's own dictionary. A name is guarded on a type when it is in the type's
//! published constant-name set and some type in the inheritance order holds a
//! [`ConstantSlot`] under it. A plain attribute a subclass defines over an inherited
//! constant is therefore guarded on the type as well.
//!
//! Instance-level operations use [`AccessGuard::resolve_constant`] instead, which follows
//! attribute resolution: the first entry found in the inheritance order decides, and a
//! resolved slot rejects the operation with instance wording.
//!
//! Ordinary attributes are never affected.

use std::sync::Arc;

use crate::{
    error::AccessPath,
    typesystem::{ClassType, ConstantSlot},
    value::Value,
    Error, Result,
};

/// Stateless filter for attribute writes and deletes
pub struct AccessGuard;

impl AccessGuard {
    /// Returns `true` if type-level writes and deletes of `name` on `class` are rejected.
    #[must_use]
    pub fn is_guarded(class: &ClassType, name: &str) -> bool {
        class.constants().contains(name) && class.mro().any(|owner| owner.owns_constant(name))
    }

    /// Returns the slot `name` resolves to on `class`, if that entry is a constant.
    #[must_use]
    pub fn resolve_constant(class: &ClassType, name: &str) -> Option<Arc<ConstantSlot>> {
        if !class.constants().contains(name) {
            return None;
        }
        class.lookup_constant(name)
    }

    /// Assign `value` to `name` directly on `class`, unless `name` is a constant.
    ///
    /// # Errors
    /// Returns [`Error::ImmutableModify`] naming `<type>.<name>` if `name` is a constant.
    pub fn guard_set(class: &ClassType, name: &str, value: Value) -> Result<()> {
        if Self::is_guarded(class, name) {
            return Err(Error::ImmutableModify {
                name: name.to_string(),
                type_name: class.name.clone(),
                path: AccessPath::Type,
            });
        }

        class.store(name, value);
        Ok(())
    }

    /// Remove `name` directly from `class`, unless `name` is a constant.
    ///
    /// # Errors
    /// Returns [`Error::ImmutableDelete`] naming `<type>.<name>` if `name` is a constant, or
    /// [`Error::AttributeNotFound`] if `class` does not define `name` itself.
    pub fn guard_delete(class: &ClassType, name: &str) -> Result<()> {
        if Self::is_guarded(class, name) {
            return Err(Error::ImmutableDelete {
                name: name.to_string(),
                type_name: class.name.clone(),
                path: AccessPath::Type,
            });
        }

        class.remove(name)
    }
}
