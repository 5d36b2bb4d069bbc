//! Holders stored inline in an [`InlineSharedBox`].
//!
//! A holder is the object an [`InlineSharedBox`] keeps in its inline slot.
//! The populated holder, [`Holder<T>`], owns an erased handle to a `T`. The
//! empty state is represented by a holder too, one that owns nothing, so the
//! box performs every operation through the [`HolderVtable`] of whatever
//! holder it currently stores.
//!
//! This module encapsulates the fields of [`HolderVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **a vtable is only ever paired with a slot containing the holder
//! it was created for**, which the callers uphold through the safety
//! requirements of [`HolderVtable::store`].
//!
//! [`InlineSharedBox`]: crate::InlineSharedBox

use core::{marker::PhantomData, mem::MaybeUninit, ptr::NonNull};

use anyptr_internals::{CastTarget, Pointee, Probe, RawShared};

/// The inline slot of an [`InlineSharedBox`](crate::InlineSharedBox).
///
/// It is large enough and aligned enough for every holder.
pub(super) type HolderStorage = MaybeUninit<RawShared>;

/// The holder of an erased handle to a `T`.
#[repr(transparent)]
struct Holder<T> {
    /// The erased handle
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. `handle.as_ptr()` points to a live `T`.
    handle: RawShared,
    /// Marker for the pointee type
    _pointee: PhantomData<T>,
}

impl<T: Pointee> Holder<T> {
    /// Converts the address of the held `T` to the address of `target`.
    #[inline]
    fn attempt_upcast(&self, target: CastTarget) -> Option<NonNull<()>> {
        Probe::of::<T>()
            .upcast(self.handle.as_ptr().as_ptr(), target)
            .and_then(NonNull::new)
    }

    /// Creates a new handle in the ownership group of the held one, looking at
    /// `addr`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `addr` was returned by [`Holder::attempt_upcast`] on this holder.
    #[inline]
    unsafe fn make_alias(&self, addr: NonNull<()>) -> RawShared {
        // SAFETY:
        // 1. The address points to a sub-object of the held `T`, which is kept
        //    alive by the handle.
        unsafe { self.handle.alias(addr) }
    }
}

impl<T> Clone for Holder<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            _pointee: PhantomData,
        }
    }
}

/// Vtable of a holder stored in a [`HolderStorage`].
///
/// # Safety Invariant
///
/// Either all function pointers are the `empty_*` functions below and `probe`
/// is [`None`], or they are the `holder_*` functions below instantiated with
/// the same `T` that `probe` was created for.
pub(crate) struct HolderVtable {
    /// The probe of the held pointee, [`None`] for the empty holder.
    probe: Option<Probe>,
    /// Drops the holder in the slot.
    drop: unsafe fn(&mut HolderStorage),
    /// Writes a clone of the holder in the first slot to the second slot.
    clone_into: unsafe fn(&HolderStorage, &mut HolderStorage),
    /// Gets the strong count of the held handle.
    share_count: unsafe fn(&HolderStorage) -> usize,
    /// Converts the address of the held pointee to the address of a target.
    attempt_upcast: unsafe fn(&HolderStorage, CastTarget) -> Option<NonNull<()>>,
    /// Creates a new handle in the ownership group of the held one.
    make_alias: unsafe fn(&HolderStorage, NonNull<()>) -> Option<RawShared>,
}

impl HolderVtable {
    /// The vtable of the empty holder.
    pub(super) const EMPTY: &'static Self = &Self {
        probe: None,
        drop: empty_drop,
        clone_into: empty_clone_into,
        share_count: empty_share_count,
        attempt_upcast: empty_attempt_upcast,
        make_alias: empty_make_alias,
    };

    /// Creates a new [`HolderVtable`] for a holder of a handle to `T`.
    const fn new<T: Pointee>() -> &'static Self {
        const {
            assert!(size_of::<Holder<T>>() <= size_of::<HolderStorage>());
            assert!(align_of::<Holder<T>>() <= align_of::<HolderStorage>());
            &Self {
                probe: Some(Probe::of::<T>()),
                drop: holder_drop::<T>,
                clone_into: holder_clone_into::<T>,
                share_count: holder_share_count::<T>,
                attempt_upcast: holder_attempt_upcast::<T>,
                make_alias: holder_make_alias::<T>,
            }
        }
    }

    /// Places a holder of `handle` in a new slot and returns it together with
    /// its vtable.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `handle.as_ptr()` points to a live `T`.
    #[inline]
    pub(super) unsafe fn store<T: Pointee>(handle: RawShared) -> (&'static Self, HolderStorage) {
        let mut storage = HolderStorage::uninit();
        let holder = Holder::<T> {
            // SAFETY:
            // 1. Guaranteed by the caller
            handle,
            _pointee: PhantomData,
        };
        // SAFETY: The slot is large enough and aligned enough for the holder, as
        // asserted when the vtable is created.
        unsafe {
            storage.as_mut_ptr().cast::<Holder<T>>().write(holder);
        }
        (Self::new::<T>(), storage)
    }

    /// Gets the probe of the held pointee, [`None`] for the empty holder.
    #[inline]
    pub(super) fn probe(&self) -> Option<Probe> {
        self.probe
    }

    /// Drops the holder in the slot.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The slot contains the holder this vtable was created for.
    /// 2. The slot is treated as uninitialized after this call.
    #[inline]
    pub(super) unsafe fn drop(&self, storage: &mut HolderStorage) {
        // SAFETY: We know that `self.drop` points to either `empty_drop` or
        // `holder_drop::<T>` below. Their safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.drop)(storage) }
    }

    /// Writes a clone of the holder in `src` to `dst`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` contains the holder this vtable was created for.
    /// 2. `dst` is paired with this vtable afterwards.
    #[inline]
    pub(super) unsafe fn clone_into(&self, src: &HolderStorage, dst: &mut HolderStorage) {
        // SAFETY: We know that `self.clone_into` points to either
        // `empty_clone_into` or `holder_clone_into::<T>` below. Their safety
        // requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.clone_into)(src, dst) }
    }

    /// Gets the strong count of the held handle, or 0 for the empty holder.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The slot contains the holder this vtable was created for.
    #[inline]
    pub(super) unsafe fn share_count(&self, storage: &HolderStorage) -> usize {
        // SAFETY: We know that `self.share_count` points to either
        // `empty_share_count` or `holder_share_count::<T>` below. Their safety
        // requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.share_count)(storage) }
    }

    /// Converts the address of the held pointee to the address of `target`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The slot contains the holder this vtable was created for.
    #[inline]
    pub(super) unsafe fn attempt_upcast(
        &self,
        storage: &HolderStorage,
        target: CastTarget,
    ) -> Option<NonNull<()>> {
        // SAFETY: We know that `self.attempt_upcast` points to either
        // `empty_attempt_upcast` or `holder_attempt_upcast::<T>` below. Their
        // safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.attempt_upcast)(storage, target) }
    }

    /// Creates a new handle in the ownership group of the held one, looking at
    /// `addr`. Returns [`None`] for the empty holder.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The slot contains the holder this vtable was created for.
    /// 2. `addr` was returned by [`HolderVtable::attempt_upcast`] on the same
    ///    slot.
    #[inline]
    pub(super) unsafe fn make_alias(
        &self,
        storage: &HolderStorage,
        addr: NonNull<()>,
    ) -> Option<RawShared> {
        // SAFETY: We know that `self.make_alias` points to either
        // `empty_make_alias` or `holder_make_alias::<T>` below. Their safety
        // requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.make_alias)(storage, addr) }
    }
}

/// Views the slot as a [`Holder<T>`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The slot contains a [`Holder<T>`].
#[inline]
unsafe fn holder_ref<T>(storage: &HolderStorage) -> &Holder<T> {
    // SAFETY:
    // 1. Guaranteed by the caller
    unsafe { &*storage.as_ptr().cast::<Holder<T>>() }
}

/// Drops the [`Holder<T>`] in the slot.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The slot contains a [`Holder<T>`].
/// 2. The slot is treated as uninitialized after this call.
unsafe fn holder_drop<T>(storage: &mut HolderStorage) {
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller, so the holder is not dropped twice
    unsafe { core::ptr::drop_in_place(storage.as_mut_ptr().cast::<Holder<T>>()) }
}

/// Writes a clone of the [`Holder<T>`] in `src` to `dst`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` contains a [`Holder<T>`].
/// 2. Whatever `dst` contained has already been dropped or never existed.
unsafe fn holder_clone_into<T>(src: &HolderStorage, dst: &mut HolderStorage) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let holder = unsafe { holder_ref::<T>(src) }.clone();
    // SAFETY: The slot is large enough and aligned enough for the holder, as
    // asserted in `HolderVtable::new`.
    unsafe {
        dst.as_mut_ptr().cast::<Holder<T>>().write(holder);
    }
}

/// Gets the strong count of the handle in the [`Holder<T>`] in the slot.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The slot contains a [`Holder<T>`].
unsafe fn holder_share_count<T>(storage: &HolderStorage) -> usize {
    // SAFETY:
    // 1. Guaranteed by the caller
    unsafe { holder_ref::<T>(storage) }.handle.strong_count()
}

/// Converts the address held by the [`Holder<T>`] in the slot.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The slot contains a [`Holder<T>`].
unsafe fn holder_attempt_upcast<T: Pointee>(
    storage: &HolderStorage,
    target: CastTarget,
) -> Option<NonNull<()>> {
    // SAFETY:
    // 1. Guaranteed by the caller
    unsafe { holder_ref::<T>(storage) }.attempt_upcast(target)
}

/// Creates a new handle sharing ownership with the [`Holder<T>`] in the slot.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The slot contains a [`Holder<T>`].
/// 2. `addr` was returned by [`holder_attempt_upcast`] on the same slot.
unsafe fn holder_make_alias<T: Pointee>(
    storage: &HolderStorage,
    addr: NonNull<()>,
) -> Option<RawShared> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let holder = unsafe { holder_ref::<T>(storage) };
    // SAFETY:
    // 1. Guaranteed by the caller
    Some(unsafe { holder.make_alias(addr) })
}

/// Drops the empty holder, which owns nothing.
unsafe fn empty_drop(_storage: &mut HolderStorage) {}

/// Clones the empty holder, which occupies no bytes of the slot.
unsafe fn empty_clone_into(_src: &HolderStorage, _dst: &mut HolderStorage) {}

/// The empty holder has no handle.
unsafe fn empty_share_count(_storage: &HolderStorage) -> usize {
    0
}

/// The empty holder converts to nothing, not even [`c_void`](core::ffi::c_void).
unsafe fn empty_attempt_upcast(_storage: &HolderStorage, _target: CastTarget) -> Option<NonNull<()>> {
    None
}

/// The empty holder has no ownership group to join.
unsafe fn empty_make_alias(_storage: &HolderStorage, _addr: NonNull<()>) -> Option<RawShared> {
    None
}
