//! Typed shared handles that may alias a sub-object.
//!
//! This module encapsulates the fields of [`Shared`], ensuring they are only
//! visible within this module. This guarantees the safety invariant: **the
//! address of the inner [`RawShared`] always points to a live `T` owned by an
//! object satisfying the thread-safety marker `S`**.

use core::marker::PhantomData;

use anyptr_internals::RawShared;

use crate::markers::{Local, ObjectMarkerFor, SendSync, ThreadSafety};

/// An atomically reference-counted handle to a `T`.
///
/// Unlike [`triomphe::Arc`], a [`Shared`] does not need to point at the object
/// it keeps alive: the handles produced by upcasting an erased box point at a
/// base sub-object, while still sharing the reference count of the complete
/// object. Dropping the last handle destroys the complete object, no matter
/// which sub-object that handle was looking at.
///
/// The thread-safety marker `S` is either [`SendSync`] (the default) or
/// [`Local`]. See the [`markers`](crate::markers) module.
///
/// # Examples
///
/// ```
/// use anyptr::Shared;
///
/// let first = Shared::new(String::from("shared"));
/// let second = first.clone();
///
/// assert_eq!(*second, "shared");
/// assert_eq!(Shared::strong_count(&first), 2);
/// assert!(Shared::ptr_eq(&first, &second));
/// ```
pub struct Shared<T, S = SendSync> {
    /// The erased handle
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. `raw.as_ptr()` points to a `T` that stays alive as long as `raw`
    ///    does.
    /// 2. The object owned by `raw` implements [`ObjectMarkerFor<S>`].
    raw: RawShared,
    /// Marker for the pointee and the thread-safety semantics
    _marker: PhantomData<(T, S)>,
}

impl<T: Send + Sync + 'static> Shared<T, SendSync> {
    /// Moves `value` into a new thread-safe shared handle.
    #[inline]
    pub fn new(value: T) -> Self {
        Self::from_arc_with_marker(triomphe::Arc::new(value))
    }

    /// Takes over the reference held by `arc`.
    #[inline]
    pub fn from_arc(arc: triomphe::Arc<T>) -> Self {
        Self::from_arc_with_marker(arc)
    }
}

impl<T: 'static> Shared<T, Local> {
    /// Moves `value` into a new shared handle bound to the current thread.
    #[inline]
    pub fn new_local(value: T) -> Self {
        Self::from_arc_with_marker(triomphe::Arc::new(value))
    }

    /// Takes over the reference held by `arc`, binding the result to the
    /// current thread.
    #[inline]
    pub fn from_arc_local(arc: triomphe::Arc<T>) -> Self {
        Self::from_arc_with_marker(arc)
    }
}

impl<T: 'static, S: ThreadSafety> Shared<T, S> {
    /// Creates a handle owning and pointing at the object in `arc`.
    #[inline]
    fn from_arc_with_marker(arc: triomphe::Arc<T>) -> Self
    where
        T: ObjectMarkerFor<S>,
    {
        let raw = RawShared::from_arc(arc);
        // SAFETY:
        // 1. A fresh `RawShared` points at the object it owns, which is a `T`.
        // 2. Guaranteed by the `T: ObjectMarkerFor<S>` bound.
        unsafe { Self::from_raw(raw) }
    }
}

impl<T, S> Shared<T, S> {
    /// Wraps an erased handle.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `raw.as_ptr()` points to a `T` that stays alive as long as the
    ///    object owned by `raw` does.
    /// 2. The object owned by `raw` implements [`ObjectMarkerFor<S>`].
    #[inline]
    pub(crate) unsafe fn from_raw(raw: RawShared) -> Self {
        Self {
            // SAFETY: Guaranteed by the caller
            raw,
            _marker: PhantomData,
        }
    }

    /// Returns the erased handle.
    #[inline]
    pub(crate) fn into_raw(this: Self) -> RawShared {
        this.raw
    }

    /// Gets the number of handles sharing ownership of the complete object,
    /// including the handles looking at other sub-objects of it.
    #[inline]
    pub fn strong_count(this: &Self) -> usize {
        this.raw.strong_count()
    }

    /// Returns `true` if this is the only handle keeping the object alive.
    #[inline]
    pub fn is_unique(this: &Self) -> bool {
        Self::strong_count(this) == 1
    }

    /// Returns the address of the `T` this handle is looking at.
    #[inline]
    pub fn as_ptr(this: &Self) -> *const T {
        this.raw.as_ptr().cast::<T>().as_ptr().cast_const()
    }

    /// Returns `true` if both handles share ownership of the same object and
    /// look at the same address.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.raw.same_owner(&other.raw) && this.raw.as_ptr() == other.raw.as_ptr()
    }

    /// Converts into a handle that is bound to the current thread.
    #[inline]
    pub fn into_local(this: Self) -> Shared<T, Local> {
        // SAFETY:
        // 1. The address and owner are unchanged.
        // 2. Every type implements `ObjectMarkerFor<Local>`.
        unsafe { Shared::from_raw(this.raw) }
    }
}

impl<T, S> core::ops::Deref for Shared<T, S> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: The address points to a live `T` as long as `self.raw` is
        // alive, and we only hand out shared access.
        unsafe { self.raw.as_ptr().cast::<T>().as_ref() }
    }
}

impl<T, S> Clone for Shared<T, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: core::fmt::Debug, S> core::fmt::Debug for Shared<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&**self, f)
    }
}

impl<T: core::fmt::Display, S> core::fmt::Display for Shared<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&**self, f)
    }
}

// SAFETY: The owner is `Send + Sync` because of the `ObjectMarkerFor<SendSync>`
// invariant, so its reference may be released on any thread. The pointee itself
// is `Send + Sync` because of the bound.
unsafe impl<T: Send + Sync> Send for Shared<T, SendSync> {}

// SAFETY: See the `Send` implementation.
unsafe impl<T: Send + Sync> Sync for Shared<T, SendSync> {}
