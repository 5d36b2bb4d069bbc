//! Vtable for type-erased reference-counting operations.
//!
//! This module contains the [`OwnerVtable`] which lets a [`RawShared`] manage
//! the [`triomphe::Arc<T>`] that keeps its object alive after the concrete
//! type `T` has been erased.
//!
//! This module encapsulates the fields of [`OwnerVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameter matches the type of the
//! `triomphe::Arc` stored next to it**.
//!
//! [`RawShared`]: crate::shared::RawShared

use core::{any::TypeId, ptr::NonNull};

use crate::util::Erased;

/// Vtable for type-erased reference-counting operations.
///
/// # Safety Invariant
///
/// The fields `drop`, `clone_arc` and `strong_count` point to the functions
/// defined below, instantiated with the same `T` that was used to create this
/// [`OwnerVtable`].
pub(crate) struct OwnerVtable {
    /// Gets the [`TypeId`] of the owned object.
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the owned object.
    type_name: fn() -> &'static str,
    /// Releases one reference of the [`triomphe::Arc<T>`] pointed to by this
    /// pointer.
    drop: unsafe fn(NonNull<Erased>),
    /// Adds one reference to the [`triomphe::Arc<T>`] pointed to by this
    /// pointer.
    clone_arc: unsafe fn(NonNull<Erased>),
    /// Gets the strong count of the [`triomphe::Arc<T>`] pointed to by this
    /// pointer.
    strong_count: unsafe fn(NonNull<Erased>) -> usize,
}

impl OwnerVtable {
    /// Creates a new [`OwnerVtable`] for the owned type `T`.
    pub(super) const fn new<T: 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<T>,
                type_name: core::any::type_name::<T>,
                drop: drop::<T>,
                clone_arc: clone_arc::<T>,
                strong_count: strong_count::<T>,
            }
        }
    }

    /// Gets the [`TypeId`] of the owned object.
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the owned object.
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Releases one reference of the `triomphe::Arc<T>` pointed to by this
    /// pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from a [`triomphe::Arc<T>`] turned into a pointer
    ///    via [`triomphe::Arc::into_raw`].
    /// 2. This [`OwnerVtable`] is the vtable for that `T`.
    /// 3. The caller owns the reference being released and does not use it
    ///    afterwards.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<Erased>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<T>` below.
        // That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Adds one reference to the `triomphe::Arc<T>` pointed to by this
    /// pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from a [`triomphe::Arc<T>`] turned into a pointer
    ///    via [`triomphe::Arc::into_raw`] and that `Arc` is still alive.
    /// 2. This [`OwnerVtable`] is the vtable for that `T`.
    /// 3. The added reference is eventually released through
    ///    [`OwnerVtable::drop`], or it is leaked.
    #[inline]
    pub(super) unsafe fn clone_arc(&self, ptr: NonNull<Erased>) {
        // SAFETY: We know that `self.clone_arc` points to the function
        // `clone_arc::<T>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.clone_arc)(ptr);
        }
    }

    /// Gets the strong count of the `triomphe::Arc<T>` pointed to by this
    /// pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from a [`triomphe::Arc<T>`] turned into a pointer
    ///    via [`triomphe::Arc::into_raw`] and that `Arc` is still alive.
    /// 2. This [`OwnerVtable`] is the vtable for that `T`.
    #[inline]
    pub(super) unsafe fn strong_count(&self, ptr: NonNull<Erased>) -> usize {
        // SAFETY: We know that `self.strong_count` points to the function
        // `strong_count::<T>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.strong_count)(ptr) }
    }
}

/// Releases one reference of the [`triomphe::Arc<T>`] pointed to by this
/// pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`triomphe::Arc<T>`] via
///    [`triomphe::Arc::into_raw`]
/// 2. The caller owns the reference being released and does not use it
///    afterwards.
unsafe fn drop<T: 'static>(ptr: NonNull<Erased>) {
    let ptr: *const T = ptr.cast::<T>().as_ptr();
    // SAFETY:
    // 1. The pointer has the correct type and came from `Arc::into_raw` (guaranteed
    //    by caller)
    // 2. After `from_raw`, the pointer is consumed and not accessed again
    let arc = unsafe { triomphe::Arc::from_raw(ptr) };
    core::mem::drop(arc);
}

/// Adds one reference to the [`triomphe::Arc<T>`] pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from a [`triomphe::Arc<T>`] turned into a pointer via
///    [`triomphe::Arc::into_raw`] and that `Arc` is still alive.
unsafe fn clone_arc<T: 'static>(ptr: NonNull<Erased>) {
    let ptr: *const T = ptr.cast::<T>().as_ptr();

    // SAFETY: The pointer is valid and came from `Arc::into_raw` with the correct
    // type (guaranteed by the caller), which fulfills the requirements for
    // `ArcBorrow::from_ptr`.
    let arc_borrow = unsafe { triomphe::ArcBorrow::from_ptr(ptr) };

    let arc = arc_borrow.clone_arc();
    // The new reference is now owned by whoever asked for the clone; the
    // returned pointer is the same one we were given.
    let _ = triomphe::Arc::into_raw(arc);
}

/// Gets the strong count of the [`triomphe::Arc<T>`] pointed to by this
/// pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from a [`triomphe::Arc<T>`] turned into a pointer via
///    [`triomphe::Arc::into_raw`] and that `Arc` is still alive.
unsafe fn strong_count<T: 'static>(ptr: NonNull<Erased>) -> usize {
    let ptr: *const T = ptr.cast::<T>().as_ptr();

    // SAFETY: The pointer is valid and came from `Arc::into_raw` with the correct
    // type (guaranteed by the caller), which fulfills the requirements for
    // `ArcBorrow::from_ptr`.
    let arc_borrow = unsafe { triomphe::ArcBorrow::from_ptr(ptr) };

    triomphe::ArcBorrow::strong_count(&arc_borrow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_vtable_eq() {
        let vtable1 = OwnerVtable::new::<i32>();
        let vtable2 = OwnerVtable::new::<i32>();

        assert!(core::ptr::eq(vtable1, vtable2));
    }

    #[test]
    fn test_owner_type_id() {
        let vtable = OwnerVtable::new::<i32>();
        assert_eq!(vtable.type_id(), TypeId::of::<i32>());
        assert_eq!(vtable.type_name(), "i32");
    }

    #[test]
    fn test_clone_and_drop_adjust_count() {
        let raw: *const u16 = triomphe::Arc::into_raw(triomphe::Arc::new(5_u16));
        let ptr = NonNull::new(raw.cast_mut()).unwrap().cast::<Erased>();
        let vtable = OwnerVtable::new::<u16>();

        // SAFETY: `ptr` comes from `Arc::into_raw` and the `Arc` is still alive
        unsafe {
            vtable.clone_arc(ptr);
        }
        // SAFETY: See above
        assert_eq!(unsafe { vtable.strong_count(ptr) }, 2);

        // SAFETY: We release the reference added above
        unsafe {
            vtable.drop(ptr);
        }
        // SAFETY: See above
        assert_eq!(unsafe { vtable.strong_count(ptr) }, 1);

        // SAFETY: We release the reference created by `into_raw`
        unsafe {
            vtable.drop(ptr);
        }
    }
}
