//! One-time construction of registered types.
//!
//! [`TypeRegistrar::register`] turns a definition body into a published [`ClassType`]:
//!
//! 1. The constant declaration list is removed from the namespace.
//! 2. Every declared name is promoted: a pre-built slot is kept as-is, a raw value is moved
//!    into a fresh [`ConstantSlot`], and a name with no entry becomes a constant holding
//!    [`Value::None`] (or an error, under [`RegistrarConfig::strict`]).
//! 3. The type is constructed from the processed namespace. Every slot is bound to its name.
//! 4. The names of all slots in the type's own dictionary form the working set.
//! 5. Every ancestor's published set is merged into the working set.
//! 6. The working set is published and never changes again.
//!
//! Because step 5 reads sets the ancestors published during their own registration, the
//! published set of a type always contains the sets of all its ancestors.

use std::{collections::BTreeSet, sync::Arc};

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::{
    config::RegistrarConfig,
    token::Token,
    typesystem::{
        Attribute, ClassFlags, ClassRc, ClassType, ConstantSet, ConstantSlot, Member, Namespace,
    },
    value::Value,
    Error, Result,
};

/// Runs the construction steps for new types
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeRegistrar {
    config: RegistrarConfig,
}

impl TypeRegistrar {
    /// Create a registrar using `config`
    #[must_use]
    pub fn new(config: RegistrarConfig) -> Self {
        TypeRegistrar { config }
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &RegistrarConfig {
        &self.config
    }

    /// Construct and publish a type.
    ///
    /// ## Arguments
    /// * 'token'     - Token assigned to the new type
    /// * 'name'      - Type name
    /// * 'bases'     - Direct bases, most significant first
    /// * 'namespace' - Definition body
    /// * 'flags'     - Behaviour flags
    ///
    /// # Errors
    /// Returns an error if the bases are duplicated or cannot be ordered consistently, if the
    /// hierarchy is too deep, or if the constant declaration is malformed.
    pub fn register(
        &self,
        token: Token,
        name: &str,
        bases: &[ClassRc],
        mut namespace: Namespace,
        flags: ClassFlags,
    ) -> Result<ClassRc> {
        let ancestors = self.linearize(bases)?;

        let declared = self.take_declaration(name, &mut namespace)?;
        for attr in &declared {
            let slot = match namespace.remove(attr) {
                Some(Member::Constant(slot)) => slot,
                Some(Member::Value(value)) => ConstantSlot::new(value),
                None if self.config.allow_undefined_constants => ConstantSlot::new(Value::None),
                None => {
                    return Err(Error::UndefinedConstant {
                        name: attr.clone(),
                        type_name: name.to_string(),
                    })
                }
            };
            namespace.insert_constant(attr, slot);
        }

        let dict = DashMap::with_capacity(namespace.len());
        for (attr, member) in namespace {
            let attribute = match member {
                Member::Value(value) => Attribute::Value(value),
                Member::Constant(slot) => {
                    slot.bind(&attr)?;
                    trace!(type_name = name, constant = %attr, "installed constant slot");
                    Attribute::Constant(Arc::new(slot))
                }
            };
            dict.insert(attr, attribute);
        }

        let class = Arc::new(ClassType::new(
            token,
            name.to_string(),
            flags,
            bases.to_vec(),
            ancestors,
            dict,
        ));

        let mut working: BTreeSet<String> = class.own_constants().into_iter().collect();
        for ancestor in class.ancestors() {
            working.extend(ancestor.constants().iter().map(str::to_string));
        }
        class.publish_constants(ConstantSet::from(working))?;

        for slot in class.own_slots() {
            slot.attach(&class)?;
        }
        for base in bases {
            base.add_subclass(&class);
        }

        debug!(
            type_name = name,
            token = %token,
            bases = bases.len(),
            constants = class.constants().len(),
            "registered type"
        );
        Ok(class)
    }

    /// Remove the declaration entry from `namespace` and return the declared names.
    fn take_declaration(&self, name: &str, namespace: &mut Namespace) -> Result<BTreeSet<String>> {
        let key = self.config.declaration_key;
        let invalid = || Error::InvalidDeclaration {
            key: key.to_string(),
            type_name: name.to_string(),
        };

        match namespace.remove(key) {
            None => Ok(BTreeSet::new()),
            Some(Member::Value(value)) => value
                .as_list()
                .ok_or_else(invalid)?
                .iter()
                .map(|entry| entry.as_str().map(str::to_string).ok_or_else(invalid))
                .collect(),
            Some(Member::Constant(_)) => Err(invalid()),
        }
    }

    /// Compute the inheritance order of a new type with direct `bases`.
    ///
    /// This is the C3 merge: the result keeps the order of `bases` and of every base's own
    /// inheritance order, and lists every type before its ancestors.
    fn linearize(&self, bases: &[ClassRc]) -> Result<Vec<ClassRc>> {
        for (i, base) in bases.iter().enumerate() {
            if bases[..i].iter().any(|other| other.token == base.token) {
                return Err(Error::DuplicateBase(base.name.clone()));
            }
            if base.depth() + 1 > self.config.max_hierarchy_depth {
                return Err(Error::RecursionLimit(self.config.max_hierarchy_depth));
            }
        }

        let mut sequences: Vec<Vec<ClassRc>> = bases
            .iter()
            .map(|base| {
                let mut sequence = Vec::with_capacity(base.ancestors().len() + 1);
                sequence.push(base.clone());
                sequence.extend(base.ancestors().iter().cloned());
                sequence
            })
            .collect();
        sequences.push(bases.to_vec());

        let mut order = Vec::new();
        loop {
            sequences.retain(|sequence| !sequence.is_empty());
            if sequences.is_empty() {
                return Ok(order);
            }

            let next = sequences
                .iter()
                .map(|sequence| &sequence[0])
                .find(|head| {
                    !sequences
                        .iter()
                        .any(|sequence| sequence[1..].iter().any(|c| c.token == head.token))
                })
                .cloned();

            let Some(next) = next else {
                let names: Vec<&str> = bases.iter().map(|base| base.name.as_str()).collect();
                return Err(Error::InconsistentHierarchy(names.join(", ")));
            };

            for sequence in &mut sequences {
                if sequence[0].token == next.token {
                    sequence.remove(0);
                }
            }
            order.push(next);
        }
    }
}
