//! Objects of registered types.
//!
//! An [`Instance`] holds its type and a private storage bag. Attribute resolution on an
//! instance follows a fixed precedence:
//!
//! 1. A name resolving to a [`ConstantSlot`] on the type is always answered by the slot,
//!    reads and writes alike. Storage is never consulted for constants.
//! 2. Otherwise the instance's own storage.
//! 3. Otherwise the type's ordinary attributes.
//!
//! The storage bag is reachable through [`Instance::storage`] and accepts raw writes that
//! bypass every check; by rule 1 such writes cannot change what a constant reads as.

use std::fmt;

use dashmap::DashMap;

use crate::{
    typesystem::{AccessGuard, Attribute, ClassRc},
    value::Value,
    Error, Result,
};

/// Private per-instance attribute storage.
///
/// Writes here are unchecked. Constants resolved through the instance's type take precedence
/// over anything stored here.
#[derive(Debug, Default)]
pub struct InstanceStorage {
    entries: DashMap<String, Value>,
}

impl InstanceStorage {
    /// Store `value` under `name`, returning the previous value
    pub fn insert(&self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(name.to_string(), value.into())
    }

    /// Copy of the value stored under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    /// Remove and return the value stored under `name`
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.entries.remove(name).map(|(_, value)| value)
    }

    /// Returns `true` if `name` is stored
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Stored names, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An object of a registered type
pub struct Instance {
    class: ClassRc,
    storage: InstanceStorage,
}

impl Instance {
    /// Create an instance of `class`
    ///
    /// # Errors
    /// Returns [`Error::AbstractInstantiation`] if `class` is abstract.
    pub fn new(class: &ClassRc) -> Result<Self> {
        if class.is_abstract() {
            return Err(Error::AbstractInstantiation(class.name.clone()));
        }

        Ok(Instance {
            class: class.clone(),
            storage: InstanceStorage::default(),
        })
    }

    /// Create an instance of `class` and assign initial attributes.
    ///
    /// Each attribute goes through [`Instance::set_attr`], so constants cannot be passed as
    /// initial attributes.
    ///
    /// # Errors
    /// Returns [`Error::AbstractInstantiation`] if `class` is abstract, or
    /// [`Error::ImmutableModify`] for the first attribute naming a constant.
    pub fn with_attrs<I, K, V>(class: &ClassRc, attrs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let instance = Instance::new(class)?;
        for (name, value) in attrs {
            instance.set_attr(name.as_ref(), value.into())?;
        }
        Ok(instance)
    }

    /// The instance's type
    #[must_use]
    pub fn class(&self) -> &ClassRc {
        &self.class
    }

    /// The private storage bag
    #[must_use]
    pub fn storage(&self) -> &InstanceStorage {
        &self.storage
    }

    /// Read an attribute.
    ///
    /// # Errors
    /// Returns [`Error::AttributeNotFound`] if `name` is neither stored nor resolvable on
    /// the type.
    pub fn get_attr(&self, name: &str) -> Result<Value> {
        let resolved = self.class.lookup(name);
        if let Some(Attribute::Constant(slot)) = &resolved {
            return Ok(slot.get(Some(self), &self.class));
        }

        if let Some(value) = self.storage.get(name) {
            return Ok(value);
        }

        match resolved {
            Some(Attribute::Value(value)) => Ok(value),
            _ => Err(Error::AttributeNotFound {
                name: name.to_string(),
                type_name: self.class.name.clone(),
            }),
        }
    }

    /// Assign an attribute on the instance.
    ///
    /// # Errors
    /// Returns [`Error::ImmutableModify`] if `name` is a constant on the instance's type.
    pub fn set_attr(&self, name: &str, value: Value) -> Result<()> {
        if let Some(slot) = AccessGuard::resolve_constant(&self.class, name) {
            return slot.set(self, value);
        }

        self.storage.insert(name, value);
        Ok(())
    }

    /// Delete an attribute from the instance.
    ///
    /// # Errors
    /// Returns [`Error::ImmutableDelete`] if `name` is a constant on the instance's type, or
    /// [`Error::AttributeNotFound`] if `name` is not stored on the instance.
    pub fn del_attr(&self, name: &str) -> Result<()> {
        if let Some(slot) = AccessGuard::resolve_constant(&self.class, name) {
            return slot.delete(self);
        }

        match self.storage.remove(name) {
            Some(_) => Ok(()),
            None => Err(Error::AttributeNotFound {
                name: name.to_string(),
                type_name: self.class.name.clone(),
            }),
        }
    }

    /// Returns `true` if reading `name` would succeed
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.storage.contains(name) || self.class.lookup(name).is_some()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name)
            .field("storage", &self.storage.keys())
            .finish()
    }
}
