//! Marker types and traits for thread-safety semantics.
//!
//! The shared-ownership types of this crate ([`Shared`], [`SharedBox`] and
//! [`InlineSharedBox`]) take a thread-safety marker as their last type
//! parameter:
//!
//! - [`SendSync`]: Everything reachable through the handle is `Send + Sync`,
//!   so the handle itself is `Send + Sync`. This is the default.
//! - [`Local`]: The handle may own non-thread-safe data (like `Rc` or `Cell`)
//!   and can never leave the thread that created it.
//!
//! # Design Philosophy
//!
//! The constraints encoded by these markers are enforced at construction time.
//! A `Shared<T, SendSync>` can only be created from a value that is
//! `Send + Sync`, and every handle derived from it (clones, upcasts, erased
//! boxes) shares the same owner. Since the reference count is atomic, the
//! owner may be released from whichever thread drops the last handle.
//!
//! Converting from [`SendSync`] to [`Local`] is always allowed, see
//! [`Shared::into_local`]. The other direction is not.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//!
//! use anyptr::{
//!     Shared,
//!     markers::{Local, SendSync},
//! };
//!
//! let thread_safe: Shared<String, SendSync> = Shared::new("hello".to_string());
//! std::thread::spawn(move || assert_eq!(*thread_safe, "hello"))
//!     .join()
//!     .unwrap();
//!
//! let local: Shared<Rc<u32>, Local> = Shared::new_local(Rc::new(5));
//! assert_eq!(**local, 5);
//! ```
//!
//! [`Shared`]: crate::Shared
//! [`Shared::into_local`]: crate::Shared::into_local
//! [`SharedBox`]: crate::SharedBox
//! [`InlineSharedBox`]: crate::InlineSharedBox

/// Marker type for handles whose contents are `Send + Sync`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct SendSync;

/// Marker type for handles that must stay on the current thread.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Local;

mod sealed_thread_safety {
    use super::*;

    pub trait Sealed: 'static {}

    impl Sealed for SendSync {}
    impl Sealed for Local {}
}

/// Marker trait for the thread-safety semantics of shared handles.
///
/// This trait is implemented for [`SendSync`] and [`Local`].
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait ThreadSafety: sealed_thread_safety::Sealed {}

impl ThreadSafety for SendSync {}
impl ThreadSafety for Local {}

/// Marker trait for objects that may be owned by a handle with the
/// thread-safety marker `T`.
///
/// Every `'static` type can be owned by a [`Local`] handle, while only
/// `Send + Sync` types can be owned by a [`SendSync`] handle. This trait is
/// used as a bound wherever a new owner is created, which is what makes the
/// `Send` and `Sync` implementations of the [`SendSync`] handles sound.
pub trait ObjectMarkerFor<T: ThreadSafety>: Sized + 'static {}

impl<O: Sized + 'static> ObjectMarkerFor<Local> for O {}

impl<O: Sized + 'static> ObjectMarkerFor<SendSync> for O where O: Send + Sync {}
