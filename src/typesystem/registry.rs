//! Central type registry.
//!
//! The [`TypeRegistry`] is the type-definition facility: it assigns tokens, runs the
//! [`TypeRegistrar`] for each new type and publishes the result for lookup.
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: Primary index using registry tokens
//! - **Name-based lookup**: Secondary index by type name (names need not be unique)
//!
//! # Thread Safety
//!
//! - Lock-free primary storage (`SkipMap`)
//! - Concurrent hash map for the name index (`DashMap`)
//! - Atomic token generation
//!
//! Tokens are allocated before a definition is validated, so a failed definition leaves a
//! gap in the token sequence. Tokens stay unique and increase in definition order.
//!
//! Types can be defined at any point, including long after their bases. Each definition
//! produces a new type; nothing about an existing type changes except that it learns about
//! its new subclass.
//!
//! # Examples
//!
//! ```rust
//! use typeconst::{Namespace, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new();
//!
//! let mut body = Namespace::new();
//! body.insert("code", "USD");
//! body.insert("precision", 2);
//! body.declare_constants(["code", "precision"]);
//!
//! let usd = registry.define("USD", &[], body)?;
//! assert_eq!(usd.get_attr("code")?, Value::from("USD"));
//! assert_eq!(registry.get_by_name("USD").len(), 1);
//! # Ok::<(), typeconst::Error>(())
//! ```

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    config::RegistrarConfig,
    token::Token,
    typesystem::{ClassFlags, ClassRc, Namespace, TypeRegistrar},
    Error, Result,
};

/// First token handed out by a registry
const FIRST_TOKEN: u32 = 0x0100_0001;

/// Central registry for all types defined through it
pub struct TypeRegistry {
    /// Primary type storage indexed by tokens
    types: SkipMap<Token, ClassRc>,
    /// Atomic counter for generating unique tokens for new types
    next_token: AtomicU32,
    /// Secondary index: types indexed by name (may have duplicates)
    types_by_name: DashMap<String, Vec<Token>>,
    /// Construction step for new types
    registrar: TypeRegistrar,
}

impl TypeRegistry {
    /// Create an empty registry with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistrarConfig::default())
    }

    /// Create an empty registry using `config` for every registration
    #[must_use]
    pub fn with_config(config: RegistrarConfig) -> Self {
        TypeRegistry {
            types: SkipMap::new(),
            next_token: AtomicU32::new(FIRST_TOKEN),
            types_by_name: DashMap::new(),
            registrar: TypeRegistrar::new(config),
        }
    }

    /// The configuration applied to every registration
    #[must_use]
    pub fn config(&self) -> &RegistrarConfig {
        self.registrar.config()
    }

    fn next_token(&self) -> Result<Token> {
        self.next_token
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |token| {
                token.checked_add(1)
            })
            .map(Token::new)
            .map_err(|_| type_error!("registry ran out of type tokens"))
    }

    /// Define a new type.
    ///
    /// ## Arguments
    /// * 'name'      - Type name
    /// * 'bases'     - Direct bases, most significant first; must belong to this registry
    /// * 'namespace' - Definition body
    ///
    /// A definition that fails after its bases were checked still uses up a token.
    ///
    /// # Errors
    /// Returns [`Error::TypeNotFound`] if a base was not defined through this registry, or any
    /// error of [`TypeRegistrar::register`].
    pub fn define(&self, name: &str, bases: &[ClassRc], namespace: Namespace) -> Result<ClassRc> {
        self.define_with_flags(name, bases, namespace, ClassFlags::empty())
    }

    /// Define a new type with behaviour flags.
    ///
    /// # Errors
    /// See [`TypeRegistry::define`].
    pub fn define_with_flags(
        &self,
        name: &str,
        bases: &[ClassRc],
        namespace: Namespace,
        flags: ClassFlags,
    ) -> Result<ClassRc> {
        for base in bases {
            if !self.contains(base) {
                return Err(Error::TypeNotFound(format!("{} ({})", base.name, base.token)));
            }
        }

        let token = self.next_token()?;
        let class = self
            .registrar
            .register(token, name, bases, namespace, flags)?;

        self.types.insert(token, class.clone());
        self.types_by_name
            .entry(name.to_string())
            .or_default()
            .push(token);

        Ok(class)
    }

    /// Look up a type by token
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<ClassRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// All types with the given name, in definition order
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Vec<ClassRc> {
        if let Some(tokens) = self.types_by_name.get(name) {
            tokens.iter().filter_map(|token| self.get(token)).collect()
        } else {
            Vec::new()
        }
    }

    /// Returns `true` if `class` was defined through this registry
    #[must_use]
    pub fn contains(&self, class: &ClassRc) -> bool {
        self.types
            .get(&class.token)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), class))
    }

    /// Number of defined types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type has been defined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate all types in definition order
    pub fn iter(&self) -> impl Iterator<Item = ClassRc> + '_ {
        self.types.iter().map(|entry| entry.value().clone())
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
