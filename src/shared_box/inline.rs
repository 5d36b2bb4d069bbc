//! [`InlineSharedBox`], the shared box that dispatches through a holder.
//!
//! The stored handle lives in an inline slot next to a pointer to the
//! [`HolderVtable`] of the holder that owns it. Every operation goes through
//! that vtable, including the destruction of the box.

use core::marker::PhantomData;

use anyptr_internals::{CastTarget, Pointee, RawShared};

use super::holder::{HolderStorage, HolderVtable};
use crate::{
    BadCast, HandleKind, Shared, TypeIdentity,
    markers::{ObjectMarkerFor, SendSync, ThreadSafety},
};

/// A shared handle of erased type, kept in a holder object stored inline.
///
/// This behaves exactly like [`SharedBox`](crate::SharedBox), but every
/// operation is dispatched through the vtable of the holder currently in the
/// inline slot, including for the empty box.
///
/// # Examples
///
/// ```
/// use anyptr::{Const, InlineSharedBox, Shared, bases};
///
/// struct Counter(u32);
/// bases!(Counter);
///
/// struct Wrapper {
///     counter: Counter,
/// }
/// bases!(Wrapper { counter: Counter });
///
/// let erased = InlineSharedBox::new(Shared::new(Wrapper {
///     counter: Counter(3),
/// }));
/// let copy = erased.clone();
/// assert_eq!(copy.share_count(), 2);
///
/// let counter: Shared<Const<Counter>> = copy.cast_shared()?;
/// assert_eq!(counter.get().0, 3);
/// assert_eq!(erased.share_count(), 3);
/// # Ok::<(), anyptr::BadCast>(())
/// ```
pub struct InlineSharedBox<S = SendSync> {
    /// The vtable of the holder in `storage`
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. `storage` contains the holder this vtable was created for.
    /// 2. The object owned by the holder implements [`ObjectMarkerFor<S>`].
    vtable: &'static HolderVtable,
    /// The inline slot
    storage: HolderStorage,
    /// Marker for the thread-safety semantics
    _thread_safety: PhantomData<S>,
}

impl<S: ThreadSafety> InlineSharedBox<S> {
    /// Creates an empty box.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            // SAFETY:
            // 1. The empty holder occupies no bytes, so any slot contains it.
            // 2. The empty holder owns nothing.
            vtable: HolderVtable::EMPTY,
            storage: HolderStorage::uninit(),
            _thread_safety: PhantomData,
        }
    }

    /// Erases `shared`.
    #[inline]
    pub fn new<T: Pointee>(shared: Shared<T, S>) -> Self {
        // SAFETY:
        // 1. A `Shared<T, S>` points to a live `T`.
        let (vtable, storage) = unsafe { HolderVtable::store::<T>(Shared::into_raw(shared)) };
        Self {
            // SAFETY:
            // 1. The slot was just filled with the holder for `vtable`.
            // 2. The owner of a `Shared<T, S>` implements `ObjectMarkerFor<S>`.
            vtable,
            storage,
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
        self.vtable.probe().is_some()
    }

    /// Returns the identity of the stored handle, or [`TypeIdentity::void`]
    /// if empty.
    #[inline]
    pub fn type_identity(&self) -> TypeIdentity {
        TypeIdentity::from_optional_probe(HandleKind::Shared, self.vtable.probe())
    }

    /// Gets the number of handles sharing ownership of the stored object, or
    /// 0 if empty.
    #[inline]
    pub fn share_count(&self) -> usize {
        // SAFETY:
        // 1. Guaranteed by the invariants on `vtable`
        unsafe { self.vtable.share_count(&self.storage) }
    }

    /// Returns `true` if this box holds the only handle to its object.
    #[inline]
    pub fn is_unique(&self) -> bool {
        self.share_count() == 1
    }

    /// Empties the box, releasing the stored handle.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::empty();
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
        // SAFETY:
        // 1. Guaranteed by the invariants on `vtable`
        let addr = unsafe {
            self.vtable
                .attempt_upcast(&self.storage, CastTarget::of::<U>())
        };
        let handle = addr.and_then(|addr| {
            // SAFETY:
            // 1. Guaranteed by the invariants on `vtable`
            // 2. The address was just returned by `attempt_upcast` on the same slot.
            unsafe { self.vtable.make_alias(&self.storage, addr) }
        });

        handle.map(|handle| {
            // SAFETY:
            // 1. The handle points to the `U` the holder located inside its pointee.
            // 2. The owner is unchanged, so the invariant on `vtable` carries over.
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

impl<S: ThreadSafety> Default for InlineSharedBox<S> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: ThreadSafety> Clone for InlineSharedBox<S> {
    #[inline]
    fn clone(&self) -> Self {
        let mut storage = HolderStorage::uninit();
        // SAFETY:
        // 1. Guaranteed by the invariants on `vtable`
        // 2. The new slot is paired with the same vtable below.
        unsafe {
            self.vtable.clone_into(&self.storage, &mut storage);
        }
        Self {
            // SAFETY:
            // 1. The slot was just filled with a clone of the holder for `vtable`.
            // 2. The clone shares the owner of `self`.
            vtable: self.vtable,
            storage,
            _thread_safety: PhantomData,
        }
    }
}

impl<S> Drop for InlineSharedBox<S> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY:
        // 1. Guaranteed by the invariants on `vtable`
        // 2. The slot is not used after this call, as we are in the drop function.
        unsafe {
            self.vtable.drop(&mut self.storage);
        }
    }
}

impl<T: Pointee, S: ThreadSafety> From<Shared<T, S>> for InlineSharedBox<S> {
    #[inline]
    fn from(shared: Shared<T, S>) -> Self {
        Self::new(shared)
    }
}

impl<S> core::fmt::Debug for InlineSharedBox<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // SAFETY:
        // 1. Guaranteed by the invariants on `vtable`
        let share_count = unsafe { self.vtable.share_count(&self.storage) };
        f.debug_struct("InlineSharedBox")
            .field(
                "identity",
                &TypeIdentity::from_optional_probe(HandleKind::Shared, self.vtable.probe()),
            )
            .field("share_count", &share_count)
            .finish()
    }
}

// SAFETY: The stored owner implements `ObjectMarkerFor<SendSync>`, so it is
// `Send + Sync`, and the reference count is atomic.
unsafe impl Send for InlineSharedBox<SendSync> {}

// SAFETY: See the `Send` implementation. A shared reference to the box only
// allows cloning the handle and reading through it.
unsafe impl Sync for InlineSharedBox<SendSync> {}
