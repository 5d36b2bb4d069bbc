//! Shared-ownership erased boxes.
//!
//! Two interchangeable containers hold a [`Shared`] handle of erased type:
//!
//! - [`SharedBox`] stores the erased handle and the [`Probe`] of the stored
//!   pointee next to each other.
//! - [`InlineSharedBox`] stores a holder object in an inline slot, and
//!   performs every operation through the `'static` vtable of that holder. The
//!   empty state has a holder of its own, so the box never needs to check for
//!   emptiness itself.
//!
//! Casting either box never copies the pointee: the returned [`Shared`] joins
//! the reference count of the stored object, and keeps the complete object
//! alive even if it only looks at a base sub-object of it.
//!
//! Both boxes implement [`SharedCast`], which is what the free functions
//! [`try_cast_shared`](crate::try_cast_shared) and
//! [`cast_shared`](crate::cast_shared) accept.
//!
//! [`Probe`]: anyptr_internals::Probe

mod holder;
mod inline;
mod window;

use anyptr_internals::Pointee;

pub use self::{inline::InlineSharedBox, window::SharedBox};
use crate::{BadCast, Shared, TypeIdentity, markers::ThreadSafety};

mod sealed_shared_cast {
    pub trait Sealed {}

    impl<S: crate::markers::ThreadSafety> Sealed for super::SharedBox<S> {}
    impl<S: crate::markers::ThreadSafety> Sealed for super::InlineSharedBox<S> {}
}

/// The operations shared by [`SharedBox`] and [`InlineSharedBox`].
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait SharedCast: sealed_shared_cast::Sealed {
    /// The thread-safety marker of the handles stored in this box.
    type ThreadSafety: ThreadSafety;

    /// Returns the identity of the stored handle, or [`TypeIdentity::void`]
    /// if empty.
    fn type_identity(&self) -> TypeIdentity;

    /// Gets the number of handles sharing ownership of the stored object, or
    /// 0 if empty.
    fn share_count(&self) -> usize;

    /// Recovers the stored handle as a handle to `U`, or returns [`None`] if
    /// the box is empty or the stored pointee does not convert to `U`.
    fn try_cast_shared<U: Pointee>(&self) -> Option<Shared<U, Self::ThreadSafety>>;

    /// Recovers the stored handle as a handle to `U`.
    ///
    /// # Errors
    ///
    /// Returns a [`BadCast`] if the box is empty or the stored pointee does
    /// not convert to `U`.
    fn cast_shared<U: Pointee>(&self) -> Result<Shared<U, Self::ThreadSafety>, BadCast>;
}

impl<S: ThreadSafety> SharedCast for SharedBox<S> {
    type ThreadSafety = S;

    #[inline]
    fn type_identity(&self) -> TypeIdentity {
        SharedBox::type_identity(self)
    }

    #[inline]
    fn share_count(&self) -> usize {
        SharedBox::share_count(self)
    }

    #[inline]
    fn try_cast_shared<U: Pointee>(&self) -> Option<Shared<U, S>> {
        SharedBox::try_cast_shared(self)
    }

    #[inline]
    fn cast_shared<U: Pointee>(&self) -> Result<Shared<U, S>, BadCast> {
        SharedBox::cast_shared(self)
    }
}

impl<S: ThreadSafety> SharedCast for InlineSharedBox<S> {
    type ThreadSafety = S;

    #[inline]
    fn type_identity(&self) -> TypeIdentity {
        InlineSharedBox::type_identity(self)
    }

    #[inline]
    fn share_count(&self) -> usize {
        InlineSharedBox::share_count(self)
    }

    #[inline]
    fn try_cast_shared<U: Pointee>(&self) -> Option<Shared<U, S>> {
        InlineSharedBox::try_cast_shared(self)
    }

    #[inline]
    fn cast_shared<U: Pointee>(&self) -> Result<Shared<U, S>, BadCast> {
        InlineSharedBox::cast_shared(self)
    }
}
