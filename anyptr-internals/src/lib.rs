#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`anyptr`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased data structures and unsafe
//! operations that power the [`anyptr`] library: erased pointers that can be
//! recovered as pointers to any registered base of the original pointee.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`anyptr`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`hierarchy`]**: The explicit base-class registry
//!   - [`Upcast`]: Lists the direct bases of a type as [`BaseEntry`] values
//!   - [`Pointee`]: Splits a pointee into its unqualified type and
//!     [`Qualifiers`]
//!   - [`locate_base`]: Walks the base graph and detects ambiguous bases
//!
//! - **[`probe`]**: Conversion checks after type erasure
//!   - [`Probe`]: Captured per stored type `T`, answers whether a pointer to
//!     `T` converts to a pointer to a [`CastTarget`] and computes the adjusted
//!     address
//!   - [`ProbeVtable`]: Function pointers instantiated for `T`
//!
//! - **[`shared`]**: Type-erased shared ownership
//!   - [`RawShared`]: A [`triomphe::Arc`] of erased type that can alias a
//!     sub-object of the object it keeps alive
//!   - [`OwnerVtable`]: Function pointers for reference counting
//!
//! # Safety Strategy
//!
//! - **Module-based encapsulation**: Safety-critical types keep fields
//!   module-private, making invariants locally verifiable within a single file
//! - **`'static` vtables created in `const` blocks**: A vtable is always
//!   created together with the pointer it describes, from the same type
//!   parameter
//! - **`unsafe` registration**: Base offsets can only be declared through an
//!   `unsafe` constructor; the public crate wraps it in a macro that derives
//!   the offsets with [`core::mem::offset_of!`]
//!
//! [`anyptr`]: https://docs.rs/anyptr/latest/anyptr/
//! [`Upcast`]: hierarchy::Upcast
//! [`Pointee`]: hierarchy::Pointee
//! [`BaseEntry`]: hierarchy::BaseEntry
//! [`Qualifiers`]: hierarchy::Qualifiers
//! [`locate_base`]: hierarchy::locate_base
//! [`Probe`]: probe::Probe
//! [`CastTarget`]: probe::CastTarget
//! [`ProbeVtable`]: probe::vtable::ProbeVtable
//! [`RawShared`]: shared::RawShared
//! [`OwnerVtable`]: shared::vtable::OwnerVtable

extern crate alloc;

pub mod hierarchy;
pub mod probe;
pub mod shared;
mod util;

pub use hierarchy::{BaseEntry, BaseLookup, Pointee, Qualifiers, Upcast};
pub use probe::{CastTarget, Probe};
pub use shared::RawShared;
