//! Type-erased shared handle.
//!
//! This module encapsulates the fields of [`RawShared`], ensuring they are
//! only visible within this module. This visibility restriction guarantees the
//! safety invariant: **the `owner` pointer always comes from
//! `triomphe::Arc<T>::into_raw` for the `T` its vtable was created for**.
//!
//! # Aliasing
//!
//! A [`RawShared`] tracks two addresses. The `owner` address is what keeps the
//! reference count, and is what gets released when the handle is dropped. The
//! `ptr` address is the one handed out to users. They start out equal, but
//! [`RawShared::alias`] produces a handle whose `ptr` points somewhere inside
//! the owned object, typically a base sub-object. Such a handle still shares
//! the original reference count, so dropping the last handle always destroys
//! the complete object, no matter which sub-object it was looking at.

use core::{any::TypeId, ptr::NonNull};

use crate::{shared::vtable::OwnerVtable, util::Erased};

/// A reference-counted handle to an object of some erased type, possibly
/// looking at a sub-object of it.
///
/// Cloning the handle increments the shared reference count and dropping it
/// decrements the count. The count itself is atomic, as it is the one of the
/// underlying [`triomphe::Arc`].
pub struct RawShared {
    /// The address handed out to users
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The address stays dereferenceable as long as the object behind
    ///    `owner` is alive.
    ptr: NonNull<Erased>,
    /// The pointer keeping the object alive
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer was created from a `triomphe::Arc<T>` using
    ///    `triomphe::Arc::into_raw`, where `T` is the type `vtable` was created
    ///    for.
    /// 2. This struct owns one strong reference of that `Arc`.
    owner: NonNull<Erased>,
    /// The vtable of the owned type
    vtable: &'static OwnerVtable,
}

impl RawShared {
    /// Creates a new [`RawShared`] owning `value`, with a strong count of 1.
    #[inline]
    pub fn new<T: 'static>(value: T) -> Self {
        Self::from_arc(triomphe::Arc::new(value))
    }

    /// Creates a new [`RawShared`] taking over the reference held by `arc`.
    #[inline]
    pub fn from_arc<T: 'static>(arc: triomphe::Arc<T>) -> Self {
        let ptr: *const T = triomphe::Arc::into_raw(arc);
        let ptr: *mut Erased = ptr.cast::<Erased>().cast_mut();

        // SAFETY:
        // 1. Triomphe guarantees that `Arc::into_raw` returns a non-null pointer.
        let ptr: NonNull<Erased> = unsafe { NonNull::new_unchecked(ptr) };

        Self {
            // SAFETY:
            // 1. This is the address of the object itself.
            ptr,
            // SAFETY:
            // 1. We just created the pointer using `triomphe::Arc::into_raw` and the
            //    vtable is created for the same `T`.
            // 2. We took over the reference held by `arc`.
            owner: ptr,
            vtable: OwnerVtable::new::<T>(),
        }
    }

    /// Returns the address this handle is looking at.
    #[inline]
    pub fn as_ptr(&self) -> NonNull<()> {
        self.ptr.cast::<()>()
    }

    /// Returns the address of the complete owned object.
    #[inline]
    pub fn owner_ptr(&self) -> NonNull<()> {
        self.owner.cast::<()>()
    }

    /// Returns the [`TypeId`] of the complete owned object.
    #[inline]
    pub fn owner_type_id(&self) -> TypeId {
        self.vtable.type_id()
    }

    /// Returns the [`core::any::type_name`] of the complete owned object.
    #[inline]
    pub fn owner_type_name(&self) -> &'static str {
        self.vtable.type_name()
    }

    /// Returns `true` if both handles keep the same object alive.
    #[inline]
    pub fn same_owner(&self, other: &Self) -> bool {
        self.owner == other.owner
    }

    /// Gets the strong count of the shared object.
    #[inline]
    pub fn strong_count(&self) -> usize {
        // SAFETY:
        // 1. Guaranteed by the invariants on `owner`; the reference we hold keeps
        //    the `Arc` alive.
        // 2. The vtable is created for the same `T` as `owner`.
        unsafe { self.vtable.strong_count(self.owner) }
    }

    /// Creates a new handle sharing ownership with `self` but looking at `ptr`.
    ///
    /// The strong count is incremented by one.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` stays dereferenceable for as long as the object owned by
    ///    `self` is alive, for example because it points inside that object.
    #[inline]
    pub unsafe fn alias(&self, ptr: NonNull<()>) -> Self {
        let mut aliased = self.clone();
        // SAFETY:
        // 1. Guaranteed by the caller
        aliased.ptr = ptr.cast::<Erased>();
        aliased
    }
}

impl Clone for RawShared {
    #[inline]
    fn clone(&self) -> Self {
        // SAFETY:
        // 1. Guaranteed by the invariants on `owner`; the reference we hold keeps
        //    the `Arc` alive.
        // 2. The vtable is created for the same `T` as `owner`.
        // 3. The added reference is owned by the returned handle, which releases it
        //    when dropped.
        unsafe {
            self.vtable.clone_arc(self.owner);
        }
        Self {
            ptr: self.ptr,
            owner: self.owner,
            vtable: self.vtable,
        }
    }
}

impl Drop for RawShared {
    #[inline]
    fn drop(&mut self) {
        // SAFETY:
        // 1. Guaranteed by the invariants on `owner`.
        // 2. The vtable is created for the same `T` as `owner`.
        // 3. We own one reference and the pointer is not used after this call, as we
        //    are in the drop function.
        unsafe {
            self.vtable.drop(self.owner);
        }
    }
}

impl core::fmt::Debug for RawShared {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawShared")
            .field("ptr", &self.ptr)
            .field("owner", &self.owner_type_name())
            .field("strong_count", &self.strong_count())
            .finish()
    }
}
