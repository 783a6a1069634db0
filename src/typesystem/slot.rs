//! Read-only accessors for constants.
//!
//! A [`ConstantSlot`] is the only thing stored under a constant's name in a type's own
//! attribute dictionary. It hands out its value on every read and turns every write or
//! delete into an error; there is no code path that changes the value it was created with.
//!
//! Slots come in two flavours:
//! - **Captured** ([`ConstantSlot::new`]): the value sitting in the definition body is moved
//!   into the slot when the type is registered.
//! - **Computed** ([`ConstantSlot::with_getter`]): a getter is called on every read and sees
//!   the [`AccessContext`] the constant was read through.
//!
//! # Example
//!
//! ```rust
//! use typeconst::{AccessContext, ClassBuilder, ConstantSlot, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new();
//! let class = ClassBuilder::new("Circle")
//!     .constant("PI", 3.14159)
//!     .constant_slot(
//!         "KIND",
//!         ConstantSlot::with_getter(|ctx: AccessContext<'_>| ctx.class().name.clone().into()),
//!     )
//!     .build(&registry)?;
//!
//! assert_eq!(class.get_attr("PI")?, Value::R8(3.14159));
//! assert_eq!(class.get_attr("KIND")?, Value::from("Circle"));
//! # Ok::<(), typeconst::Error>(())
//! ```

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{
    error::AccessPath,
    typesystem::{ClassRc, ClassRef, ClassType, Instance},
    value::Value,
    Error, Result,
};

/// Getter backing a computed constant
pub type ConstantGetter = Arc<dyn Fn(AccessContext<'_>) -> Value + Send + Sync>;

/// The object a constant was read through.
///
/// Type-level reads carry the type used for the lookup, which is not necessarily the type
/// that declared the constant.
#[derive(Clone, Copy)]
pub enum AccessContext<'a> {
    /// Read through an instance
    Instance(&'a Instance),
    /// Read through a type object
    Type(&'a ClassType),
}

impl<'a> AccessContext<'a> {
    /// The type the read went through (the instance's type for instance reads)
    #[must_use]
    pub fn class(&self) -> &'a ClassType {
        match *self {
            AccessContext::Instance(instance) => instance.class().as_ref(),
            AccessContext::Type(class) => class,
        }
    }

    /// The instance, if the read went through one
    #[must_use]
    pub fn instance(&self) -> Option<&'a Instance> {
        match *self {
            AccessContext::Instance(instance) => Some(instance),
            AccessContext::Type(_) => None,
        }
    }
}

enum SlotSource {
    Captured(Value),
    Computed(ConstantGetter),
}

/// A read-only accessor bound to one constant name.
pub struct ConstantSlot {
    name: OnceLock<String>,
    owner: OnceLock<ClassRef>,
    source: SlotSource,
    doc: Option<String>,
}

impl ConstantSlot {
    /// Create a slot holding `value`
    ///
    /// ## Arguments
    /// * 'value' - The constant's value, fixed for the lifetime of the owning type
    pub fn new(value: impl Into<Value>) -> Self {
        ConstantSlot {
            name: OnceLock::new(),
            owner: OnceLock::new(),
            source: SlotSource::Captured(value.into()),
            doc: None,
        }
    }

    /// Create a slot whose value is produced by `getter` on every read
    ///
    /// ## Arguments
    /// * 'getter' - Called with the context of each read
    pub fn with_getter<F>(getter: F) -> Self
    where
        F: Fn(AccessContext<'_>) -> Value + Send + Sync + 'static,
    {
        ConstantSlot {
            name: OnceLock::new(),
            owner: OnceLock::new(),
            source: SlotSource::Computed(Arc::new(getter)),
            doc: None,
        }
    }

    /// Attach a doc string
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// The name this slot is bound to, `None` before registration
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.get().map(String::as_str)
    }

    /// The doc string, if any
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// The type that declared this slot (if registered and still alive)
    #[must_use]
    pub fn owner(&self) -> Option<ClassRc> {
        self.owner.get().and_then(ClassRef::upgrade)
    }

    /// Returns `true` if the value is computed by a getter
    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self.source, SlotSource::Computed(_))
    }

    /// Bind the display name. Only the registrar calls this, while installing the slot.
    ///
    /// # Errors
    /// Returns [`Error::SlotAlreadyBound`] if the slot already carries a name.
    pub(crate) fn bind(&self, name: &str) -> Result<()> {
        self.name
            .set(name.to_string())
            .map_err(|_| Error::SlotAlreadyBound(self.to_string()))
    }

    /// Record the owning type once it has been published.
    ///
    /// # Errors
    /// Returns [`Error::SlotAlreadyBound`] if the slot already has an owner.
    pub(crate) fn attach(&self, owner: &ClassRc) -> Result<()> {
        self.owner
            .set(owner.into())
            .map_err(|_| Error::SlotAlreadyBound(self.to_string()))
    }

    /// Read the constant.
    ///
    /// With no instance the accessing type is used as context, so getters can still see
    /// which type the constant was read through.
    ///
    /// ## Arguments
    /// * 'instance' - The instance read through, if any
    /// * 'class'    - The type the lookup started from
    #[must_use]
    pub fn get(&self, instance: Option<&Instance>, class: &ClassType) -> Value {
        let context = match instance {
            Some(instance) => AccessContext::Instance(instance),
            None => AccessContext::Type(class),
        };

        match &self.source {
            SlotSource::Captured(value) => value.clone(),
            SlotSource::Computed(getter) => getter(context),
        }
    }

    /// Reject a write through `instance`.
    ///
    /// # Errors
    /// Always returns [`Error::ImmutableModify`].
    pub fn set(&self, instance: &Instance, _value: Value) -> Result<()> {
        Err(Error::ImmutableModify {
            name: self.display_name().to_string(),
            type_name: instance.class().name.clone(),
            path: AccessPath::Instance,
        })
    }

    /// Reject a removal through `instance`.
    ///
    /// # Errors
    /// Always returns [`Error::ImmutableDelete`].
    pub fn delete(&self, instance: &Instance) -> Result<()> {
        Err(Error::ImmutableDelete {
            name: self.display_name().to_string(),
            type_name: instance.class().name.clone(),
            path: AccessPath::Instance,
        })
    }

    fn display_name(&self) -> &str {
        self.name().unwrap_or("<unbound>")
    }
}

impl fmt::Display for ConstantSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constant '{}'", self.display_name())
    }
}

impl fmt::Debug for ConstantSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ConstantSlot");
        debug.field("name", &self.name());
        match &self.source {
            SlotSource::Captured(value) => debug.field("value", value),
            SlotSource::Computed(_) => debug.field("value", &"<computed>"),
        };
        debug.field("owner", &self.owner.get()).finish()
    }
}
