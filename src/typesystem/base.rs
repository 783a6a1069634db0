use std::{
    collections::BTreeSet,
    fmt,
    sync::{Arc, Weak},
};

use bitflags::bitflags;

use crate::{
    typesystem::{ClassRc, ClassType, ConstantSlot},
    value::Value,
};

/// A smart reference to a `ClassType` that automatically handles weak references
/// to prevent circular reference memory leaks while providing a clean API.
///
/// Constant slots point back at their owning type and types point at their
/// subclasses through this reference; strong ownership only flows from a type
/// to its bases.
#[derive(Clone)]
pub struct ClassRef {
    weak_ref: Weak<ClassType>,
}

impl ClassRef {
    /// Create a new `ClassRef` from a strong reference
    pub fn new(strong_ref: &ClassRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<ClassRc> {
        self.weak_ref.upgrade()
    }
}

impl From<&ClassRc> for ClassRef {
    fn from(strong_ref: &ClassRc) -> Self {
        ClassRef::new(strong_ref)
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(class) => write!(f, "ClassRef({} {})", class.name, class.token),
            None => write!(f, "ClassRef(<dropped>)"),
        }
    }
}

bitflags! {
    /// Flags that modify how a registered type behaves.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClassFlags: u32 {
        /// The type can be subclassed but never instantiated.
        const ABSTRACT = 0x0001;
    }
}

/// The published, write-once set of every constant name visible on a type.
///
/// The set holds the type's own constant names plus those of every ancestor. It is
/// computed once during registration and exposes no mutating methods.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstantSet(BTreeSet<String>);

/// Returned for types whose set has not been published yet
pub(crate) static EMPTY_CONSTANTS: ConstantSet = ConstantSet(BTreeSet::new());

impl ConstantSet {
    /// Returns `true` if `name` is a constant on the type
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Number of constant names
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the type has no constants
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns `true` if every name of `other` is also in this set
    #[must_use]
    pub fn is_superset(&self, other: &ConstantSet) -> bool {
        self.0.is_superset(&other.0)
    }
}

impl From<BTreeSet<String>> for ConstantSet {
    fn from(names: BTreeSet<String>) -> Self {
        ConstantSet(names)
    }
}

impl<'a> IntoIterator for &'a ConstantSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: AsRef<str>> PartialEq<[S]> for ConstantSet {
    fn eq(&self, other: &[S]) -> bool {
        let other: BTreeSet<&str> = other.iter().map(AsRef::as_ref).collect();
        other.len() == self.0.len() && other.iter().all(|name| self.0.contains(*name))
    }
}

impl<S: AsRef<str>, const N: usize> PartialEq<[S; N]> for ConstantSet {
    fn eq(&self, other: &[S; N]) -> bool {
        *self == other[..]
    }
}

/// An entry in a registered type's own attribute dictionary
#[derive(Debug, Clone)]
pub enum Attribute {
    /// An ordinary attribute; replaceable and removable through the type
    Value(Value),
    /// A constant; neither replaceable nor removable
    Constant(Arc<ConstantSlot>),
}

impl Attribute {
    /// Returns the slot if this attribute is a constant
    #[must_use]
    pub fn as_constant(&self) -> Option<&Arc<ConstantSlot>> {
        match self {
            Attribute::Constant(slot) => Some(slot),
            Attribute::Value(_) => None,
        }
    }

    /// Returns `true` if this attribute is a constant
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self, Attribute::Constant(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        token::Token,
        typesystem::{Namespace, TypeRegistrar},
    };

    #[test]
    fn constant_set_comparisons() {
        let set = ConstantSet::from(BTreeSet::from([
            "foo".to_string(),
            "bar".to_string(),
            "gaz".to_string(),
        ]));

        assert_eq!(set, ["foo", "bar", "gaz"]);
        assert_ne!(set, ["foo", "bar"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["bar", "foo", "gaz"]);

        let parent = ConstantSet::from(BTreeSet::from(["foo".to_string()]));
        assert!(set.is_superset(&parent));
        assert!(!parent.is_superset(&set));
        assert!(EMPTY_CONSTANTS.is_empty());
    }

    #[test]
    fn attribute_kinds() {
        let plain = Attribute::Value(Value::I4(1));
        assert!(!plain.is_constant());
        assert!(plain.as_constant().is_none());

        let constant = Attribute::Constant(Arc::new(ConstantSlot::new(1)));
        assert!(constant.is_constant());
    }

    #[test]
    fn class_ref_does_not_keep_type_alive() {
        let class = TypeRegistrar::default()
            .register(
                Token::new(1),
                "Loan",
                &[],
                Namespace::new(),
                ClassFlags::empty(),
            )
            .unwrap();
        let weak = ClassRef::from(&class);
        assert_eq!(weak.upgrade().unwrap().name, "Loan");
        assert_eq!(format!("{weak:?}"), "ClassRef(Loan 0x00000001)");

        drop(class);
        assert!(weak.upgrade().is_none());
        assert_eq!(format!("{weak:?}"), "ClassRef(<dropped>)");
    }

    #[test]
    fn class_flags_default() {
        assert!(ClassFlags::default().is_empty());
        assert!(ClassFlags::ABSTRACT.contains(ClassFlags::ABSTRACT));
    }
}
