#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Type-erased pointers that remember how to upcast.
//!
//! ## Overview
//!
//! A `Box<dyn Any>` forgets everything about the value it holds except its
//! exact type: the value can be recovered as what it was, and as nothing
//! else. The pointers in this crate also erase the type of their pointee, but
//! they can be recovered as a pointer to the original pointee, to any of its
//! registered bases, or to a more qualified version of either, without the
//! caller ever naming the original type again.
//!
//! ## Quick Example
//!
//! ```
//! use anyptr::{Const, ErasedPtr, bases};
//!
//! struct Engine {
//!     horsepower: u32,
//! }
//! bases!(Engine);
//!
//! struct Car {
//!     wheels: u8,
//!     engine: Engine,
//! }
//! bases!(Car { engine: Engine });
//!
//! let car = Car {
//!     wheels: 4,
//!     engine: Engine { horsepower: 120 },
//! };
//! let erased = ErasedPtr::from_ref(&car);
//!
//! // A shared reference is erased as a pointer to `Const<Car>`, so it can be
//! // recovered as a pointer to a `Const` base, but never as a mutable pointer.
//! let engine = erased.cast::<Const<Engine>>()?;
//! // SAFETY: `car` is alive.
//! assert_eq!(unsafe { (&*engine).horsepower }, 120);
//! assert!(erased.try_cast::<Engine>().is_none());
//! # let _ = car.wheels;
//! # Ok::<(), anyptr::BadCast>(())
//! ```
//!
//! ## Core Concepts
//!
//! **Registration.** Rust has no inheritance, so the base classes of a type
//! are fields the type declares as bases using the [`bases!`] macro. A type
//! has to be registered, possibly without any bases, before pointers to it can
//! be erased. Common types from `core` and `alloc` are registered already.
//!
//! **Conversions.** A pointer to `T` converts to a pointer to `U` if `U` is
//! `T`, [`c_void`](core::ffi::c_void), or a base of `T` reachable through
//! exactly one path, and if `U` carries at least the qualifiers of `T`. The
//! qualifiers are expressed with the wrappers [`Const`], [`Volatile`] and
//! [`ConstVolatile`]. Qualifiers may be gained in a conversion, never lost.
//!
//! **Containers.** There are three of them:
//!
//! - [`ErasedPtr`]: a non-owning raw pointer of erased type.
//! - [`SharedBox`]: an owning [`Shared`] handle of erased type. Casting it
//!   produces a new handle that shares ownership with the stored one, even
//!   when it looks at a base sub-object.
//! - [`InlineSharedBox`]: the same as [`SharedBox`], but built around a
//!   holder object stored inline and operated through its vtable.
//!
//! **Identities.** Every container reports the [`TypeIdentity`] of what it
//! stores, and every failed checked cast returns a [`BadCast`] that names both
//! sides of the conversion.
//!
//! ## Thread Safety
//!
//! [`ErasedPtr`] holds a raw pointer, so it is neither `Send` nor `Sync`. The
//! shared handles and boxes carry a thread-safety marker from the [`markers`]
//! module, see there for details.
//!
//! ## Features
//!
//! - `std`: Enables the `std` feature of `triomphe`.
//! - `tracing`: Emits a `trace` event with target `anyptr` for every rejected
//!   cast, through the [`tracing`](https://docs.rs/tracing) crate.
//!
//! For implementation details, see the [`anyptr-internals`] crate.
//!
//! [`anyptr-internals`]: anyptr_internals

extern crate alloc;

#[macro_use]
mod macros;

pub mod markers;
pub mod prelude;

mod cast;
mod erased_ptr;
mod error;
mod identity;
mod qualified;
mod shared;
mod shared_box;
mod util;

pub use anyptr_internals::{Pointee, Qualifiers, Upcast};

pub use self::{
    cast::{
        cast, cast_shared, make_inline_shared_box, make_shared_box, make_shared_box_default,
        try_cast, try_cast_shared,
    },
    erased_ptr::ErasedPtr,
    error::BadCast,
    identity::{HandleKind, TypeIdentity},
    qualified::{Const, ConstVolatile, Volatile},
    shared::Shared,
    shared_box::{InlineSharedBox, SharedBox, SharedCast},
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use anyptr_internals::{BaseEntry, Pointee, Qualifiers, Upcast};
}
