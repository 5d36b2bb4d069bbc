//! [`SharedBox`], the shared box that keeps the erased handle and its probe
//! side by side.
//!
//! The box is either empty or holds a window onto the stored object: the
//! type-erased [`RawShared`] handle together with the [`Probe`] that knows
//! its pointee type. Casting to the stored type is a plain clone of the
//! handle; casting to a base aliases the handle at the base's address.

use core::{marker::PhantomData, ptr::NonNull};

use anyptr_internals::{CastTarget, Pointee, Probe, RawShared};

use crate::{
    BadCast, HandleKind, Shared, TypeIdentity,
    markers::{ObjectMarkerFor, SendSync, ThreadSafety},
};

/// The stored handle together with the probe of its pointee.
#[derive(Clone)]
struct Window {
    /// The erased handle
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. `handle.as_ptr()` points to a live value of the pointee type `probe`
    ///    was created for.
    handle: RawShared,
    /// The probe of the pointee
    probe: Probe,
}

/// A shared handle of erased type that can be recovered as a handle to the
/// original pointee, to any of its registered bases, or to a more qualified
/// version of either.
///
/// Cloning the box clones the stored handle, so both boxes share the
/// ownership of the same object. Casting the box does the same.
///
/// # Examples
///
/// ```
/// use anyptr::{Shared, SharedBox, bases};
///
/// #[derive(Debug, PartialEq)]
/// struct Base(u32);
/// bases!(Base);
///
/// struct Derived {
///     label: String,
///     base: Base,
/// }
/// bases!(Derived { base: Base });
///
/// let erased = SharedBox::new(Shared::new(Derived {
///     label: "derived".to_string(),
///     base: Base(7),
/// }));
/// assert_eq!(erased.share_count(), 1);
///
/// let base: Shared<Base> = erased.cast_shared::<Base>()?;
/// assert_eq!(*base, Base(7));
/// assert_eq!(erased.share_count(), 2);
///
/// drop(erased);
/// // The handle to the base keeps the complete `Derived` alive.
/// assert_eq!(*base, Base(7));
/// assert!(Shared::is_unique(&base));
/// # Ok::<(), anyptr::BadCast>(())
/// ```
pub struct SharedBox<S = SendSync> {
    /// The stored handle, absent when empty
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The object owned by the handle implements [`ObjectMarkerFor<S>`].
    window: Option<Window>,
    /// Marker for the thread-safety semantics
    _thread_safety: PhantomData<S>,
}

impl<S: ThreadSafety> SharedBox<S> {
    /// Creates an empty box.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            window: None,
            _thread_safety: PhantomData,
        }
    }

    /// Erases `shared`.
    #[inline]
    pub fn new<T: Pointee>(shared: Shared<T, S>) -> Self {
        Self {
            // SAFETY:
            // 1. A `Shared<T, S>` points to a live `T`, and its owner implements
            //    `ObjectMarkerFor<S>`.
            window: Some(Window {
                handle: Shared::into_raw(shared),
                probe: Probe::of::<T>(),
            }),
            _thread_safety: PhantomData,
        }
    }

    /// Moves `value` into a new shared handle and erases it.
    #[inline]
    pub fn from_value<T: Pointee + ObjectMarkerFor<S>>(value: T) -> Self {
        let raw = RawShared::new(value);
        // SAFETY:
        // 1. A fresh `RawShared` points at the object it owns, which is a `T`.
        // 2. Guaranteed by the `T: ObjectMarkerFor<S>` bound.
        Self::new(unsafe { Shared::<T, S>::from_raw(raw) })
    }

    /// Returns `true` if a handle is stored.
    #[inline]
    pub fn has_value(&self) -> bool {
        self.window.is_some()
    }

    /// Returns the identity of the stored handle, or [`TypeIdentity::void`]
    /// if empty.
    #[inline]
    pub fn type_identity(&self) -> TypeIdentity {
        TypeIdentity::from_optional_probe(
            HandleKind::Shared,
            self.window.as_ref().map(|window| window.probe),
        )
    }

    /// Gets the number of handles sharing ownership of the stored object, or
    /// 0 if empty.
    #[inline]
    pub fn share_count(&self) -> usize {
        self.window
            .as_ref()
            .map_or(0, |window| window.handle.strong_count())
    }

    /// Returns `true` if this box holds the only handle to its object.
    #[inline]
    pub fn is_unique(&self) -> bool {
        self.share_count() == 1
    }

    /// Empties the box, releasing the stored handle.
    #[inline]
    pub fn reset(&mut self) {
        self.window = None;
    }

    /// Exchanges the contents of `self` and `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Takes the stored handle, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Recovers the stored handle as a handle to `U`, or returns [`None`] if
    /// the box is empty or the stored pointee does not convert to `U`.
    pub fn try_cast_shared<U: Pointee>(&self) -> Option<Shared<U, S>> {
        let target = CastTarget::of::<U>();
        let handle = self.window.as_ref().and_then(|window| {
            if window.probe.is_exactly(target) {
                return Some(window.handle.clone());
            }
            let addr = window
                .probe
                .upcast(window.handle.as_ptr().as_ptr(), target)
                .and_then(NonNull::new)?;
            // SAFETY:
            // 1. The probe produced the address of a sub-object of the stored
            //    pointee, which is owned by the handle.
            Some(unsafe { window.handle.alias(addr) })
        });

        handle.map(|handle| {
            // SAFETY:
            // 1. The handle points to the stored pointee or the `U` sub-object of
            //    it that the probe located.
            // 2. The owner is unchanged, so the invariant on `window` carries over.
            unsafe { Shared::from_raw(handle) }
        })
    }

    /// Recovers the stored handle as a handle to `U`.
    ///
    /// The conversion rules are those of
    /// [`ErasedPtr::cast`](crate::ErasedPtr::cast). On success the strong
    /// count of the stored object is incremented by one.
    ///
    /// # Errors
    ///
    /// Returns a [`BadCast`] if the box is empty or the stored pointee does
    /// not convert to `U`.
    pub fn cast_shared<U: Pointee>(&self) -> Result<Shared<U, S>, BadCast> {
        self.try_cast_shared::<U>().ok_or_else(|| {
            BadCast::new(self.type_identity(), TypeIdentity::of_shared::<U>())
        })
    }
}

impl<S: ThreadSafety> Default for SharedBox<S> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: ThreadSafety> Clone for SharedBox<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            window: self.window.clone(),
            _thread_safety: PhantomData,
        }
    }
}

impl<T: Pointee, S: ThreadSafety> From<Shared<T, S>> for SharedBox<S> {
    #[inline]
    fn from(shared: Shared<T, S>) -> Self {
        Self::new(shared)
    }
}

impl<S> core::fmt::Debug for SharedBox<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let identity = TypeIdentity::from_optional_probe(
            HandleKind::Shared,
            self.window.as_ref().map(|window| window.probe),
        );
        let share_count = self
            .window
            .as_ref()
            .map_or(0, |window| window.handle.strong_count());
        f.debug_struct("SharedBox")
            .field("identity", &identity)
            .field("share_count", &share_count)
            .finish()
    }
}

// SAFETY: The stored owner implements `ObjectMarkerFor<SendSync>`, so it is
// `Send + Sync`, and the reference count is atomic.
unsafe impl Send for SharedBox<SendSync> {}

// SAFETY: See the `Send` implementation. A shared reference to the box only
// allows cloning the handle and reading through it.
unsafe impl Sync for SharedBox<SendSync> {}
