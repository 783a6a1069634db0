// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # typeconst
//!
//! Immutable, inheritable, class-scoped constants for a runtime type registry.
//!
//! `typeconst` lets simulation code declare fixed metadata on user-defined types (currency
//! identity fields, loan-type tags, calendar parameters) without any risk of the values
//! changing at runtime. A constant's value is fixed the moment its owning type is
//! registered. It stays readable through every subclass and every instance, and every
//! attempt to reassign or remove it, through the type or through an instance, fails
//! immediately.
//!
//! ## Features
//!
//! - **Explicit registration** - types are defined through a [`TypeRegistry`], once
//! - **Multiple inheritance** - explicit base lists with a C3 inheritance order
//! - **Published constant sets** - every type exposes all constant names visible on it
//! - **Two-level protection** - type-level and instance-level writes are both rejected
//! - **Computed constants** - slots backed by a getter that sees the reading context
//! - **Lock-free reads** - published metadata is never written again
//!
//! ## Quick Start
//!
//! ```rust
//! use typeconst::prelude::*;
//!
//! let registry = TypeRegistry::new();
//! let a = ClassBuilder::new("A").constant("foo", 42).build(&registry)?;
//! let b = ClassBuilder::new("B").base(&a).constant("bar", "hello there").build(&registry)?;
//! let c = ClassBuilder::new("C").build(&registry)?;
//! let d = ClassBuilder::new("D")
//!     .bases(&[c.clone(), b.clone()])
//!     .constant("gaz", -1)
//!     .build(&registry)?;
//!
//! assert_eq!(d.constants(), &["foo", "bar", "gaz"]);
//!
//! let obj = Instance::new(&d)?;
//! assert_eq!(obj.get_attr("bar")?, Value::from("hello there"));
//!
//! let err = obj.set_attr("bar", "hello".into()).unwrap_err();
//! assert_eq!(err.to_string(), "constant 'bar' of 'D' object cannot be modified.");
//!
//! let err = d.del_attr("gaz").unwrap_err();
//! assert_eq!(err.to_string(), "Cannot delete constant 'D.gaz'.");
//! # Ok::<(), typeconst::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`typesystem`] - Types, constant slots, registration and the access guard
//! - [`value`] - The dynamically typed attribute payload
//! - [`config`] - Registration policy
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Constant violations are reported as [`Error::ImmutableModify`] and
//! [`Error::ImmutableDelete`]. They are raised at the offending call and never caught or
//! logged by the crate.
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
pub mod prelude;

/// Registration configuration
pub mod config;

/// Registry tokens
pub mod token;

/// Attribute and constant values
pub mod value;

/// Registered types, constant slots and attribute access
pub mod typesystem;

/// `typeconst` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `typeconst` Error type
///
/// The main error type for all operations in this crate.
pub use error::{AccessPath, Error};

pub use config::{RegistrarConfig, DEFAULT_DECLARATION_KEY};
pub use token::Token;
pub use typesystem::{
    AccessContext, AccessGuard, Attribute, ClassBuilder, ClassFlags, ClassRc, ClassRef,
    ClassType, ConstantSet, ConstantSlot, Instance, InstanceStorage, Member, Namespace,
    TypeRegistrar, TypeRegistry,
};
pub use value::Value;
