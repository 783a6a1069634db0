//! Definition bodies of types under construction.
//!
//! A [`Namespace`] collects everything a new type defines before it is handed to the
//! registrar: ordinary attribute values, pre-built [`ConstantSlot`]s, and the declaration
//! entry listing which names should become constants. The declaration entry lives under a
//! reserved key (by default [`DEFAULT_DECLARATION_KEY`]) and is consumed during registration;
//! it never shows up as an attribute of the finished type.

use std::collections::{btree_map, BTreeMap};

use crate::{config::DEFAULT_DECLARATION_KEY, typesystem::ConstantSlot, value::Value};

/// One entry of a definition body
#[derive(Debug)]
pub enum Member {
    /// A raw value; becomes an ordinary attribute unless declared constant
    Value(Value),
    /// A pre-built slot; always becomes a constant
    Constant(ConstantSlot),
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        Member::Value(value)
    }
}

impl From<ConstantSlot> for Member {
    fn from(slot: ConstantSlot) -> Self {
        Member::Constant(slot)
    }
}

/// The definition body of a type: name to raw value or pre-built slot.
///
/// Inserting a name that is already present replaces the earlier entry, the same way a
/// later assignment in a definition body wins over an earlier one.
#[derive(Debug, Default)]
pub struct Namespace {
    members: BTreeMap<String, Member>,
}

impl Namespace {
    /// Create an empty namespace
    #[must_use]
    pub fn new() -> Self {
        Namespace::default()
    }

    /// Set an ordinary value
    ///
    /// ## Arguments
    /// * 'name'  - Attribute name
    /// * 'value' - Raw value
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.members
            .insert(name.to_string(), Member::Value(value.into()));
    }

    /// Place a pre-built slot under `name`
    ///
    /// ## Arguments
    /// * 'name' - Attribute name
    /// * 'slot' - Custom accessor, bound to `name` during registration
    pub fn insert_constant(&mut self, name: &str, slot: ConstantSlot) {
        self.members
            .insert(name.to_string(), Member::Constant(slot));
    }

    /// Declare `names` as constants under the default declaration key
    pub fn declare_constants<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare_constants_with_key(DEFAULT_DECLARATION_KEY, names);
    }

    /// Declare `names` as constants under a custom declaration key
    ///
    /// Names are appended to an existing declaration list. Any other entry under `key` is
    /// replaced.
    pub fn declare_constants_with_key<I, S>(&mut self, key: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(|name| Value::String(name.into()));

        match self.members.get_mut(key) {
            Some(Member::Value(Value::List(existing))) => existing.extend(names),
            _ => {
                self.members.insert(
                    key.to_string(),
                    Member::Value(Value::List(names.collect())),
                );
            }
        }
    }

    /// Borrow the entry under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Remove and return the entry under `name`
    pub fn remove(&mut self, name: &str) -> Option<Member> {
        self.members.remove(name)
    }

    /// Returns `true` if `name` has an entry
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Returns `true` if the entry under `name` is a pre-built slot
    #[must_use]
    pub fn is_constant(&self, name: &str) -> bool {
        matches!(self.members.get(name), Some(Member::Constant(_)))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(name, member)| (name.as_str(), member))
    }
}

impl IntoIterator for Namespace {
    type Item = (String, Member);
    type IntoIter = btree_map::IntoIter<String, Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Namespace {
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        let members = iter
            .into_iter()
            .map(|(name, value)| (name.into(), Member::Value(value.into())))
            .collect();
        Namespace { members }
    }
}
