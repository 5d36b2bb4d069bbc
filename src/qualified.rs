//! Qualifier wrappers for erased pointees.
//!
//! A pointer to `T` that must not be written through is stored as a pointer to
//! [`Const<T>`], one whose accesses must not be elided or reordered as a
//! pointer to [`Volatile<T>`], and one with both restrictions as a pointer to
//! [`ConstVolatile<T>`]. The wrappers are `#[repr(transparent)]`, so they have
//! exactly the layout of `T`.
//!
//! The qualifiers take part in the identity of an erased pointer. A pointer may
//! gain qualifiers when it is recovered, but it never loses one:
//!
//! ```
//! use anyptr::{Const, ConstVolatile, ErasedPtr, Volatile};
//!
//! let value = 5_u32;
//! let erased = ErasedPtr::from_ref(&value);
//!
//! assert!(erased.try_cast::<Const<u32>>().is_some());
//! assert!(erased.try_cast::<ConstVolatile<u32>>().is_some());
//! assert!(erased.try_cast::<u32>().is_none());
//! assert!(erased.try_cast::<Volatile<u32>>().is_none());
//! ```

use anyptr_internals::{Pointee, Qualifiers, Upcast};

/// A `T` that is only ever read.
///
/// This only hands out shared references to the inner value.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct Const<T>(T);

impl<T> Const<T> {
    /// Wraps `value`.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Views a shared reference as a reference to a [`Const`].
    #[inline]
    pub const fn from_ref(value: &T) -> &Self {
        // SAFETY: `Const<T>` is `#[repr(transparent)]` over `T`, and the returned
        // reference has the same lifetime and mutability as the given one.
        unsafe { &*core::ptr::from_ref(value).cast::<Self>() }
    }

    /// Returns a reference to the inner value.
    #[inline]
    pub const fn get(&self) -> &T {
        &self.0
    }

    /// Unwraps the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::ops::Deref for Const<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

/// A `T` whose every access is a volatile access.
///
/// The inner value can only be reached through [`Volatile::read`] and
/// [`Volatile::write`], which use [`core::ptr::read_volatile`] and
/// [`core::ptr::write_volatile`].
#[derive(Default)]
#[repr(transparent)]
pub struct Volatile<T>(T);

impl<T> Volatile<T> {
    /// Wraps `value`.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Unwraps the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Copy> Volatile<T> {
    /// Performs a volatile read of the inner value.
    #[inline]
    pub fn read(&self) -> T {
        // SAFETY: The pointer comes from a reference, so it is valid, aligned and
        // initialized. `T: Copy`, so reading does not duplicate ownership.
        unsafe { core::ptr::read_volatile(&raw const self.0) }
    }

    /// Performs a volatile write of the inner value.
    #[inline]
    pub fn write(&mut self, value: T) {
        // SAFETY: The pointer comes from a unique reference, so it is valid and
        // aligned. `T: Copy`, so the overwritten value needs no drop.
        unsafe { core::ptr::write_volatile(&raw mut self.0, value) }
    }
}

impl<T: Copy + core::fmt::Debug> core::fmt::Debug for Volatile<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Volatile").field(&self.read()).finish()
    }
}

/// A `T` that is only ever read, with volatile reads.
#[derive(Default)]
#[repr(transparent)]
pub struct ConstVolatile<T>(T);

impl<T> ConstVolatile<T> {
    /// Wraps `value`.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Unwraps the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Copy> ConstVolatile<T> {
    /// Performs a volatile read of the inner value.
    #[inline]
    pub fn read(&self) -> T {
        // SAFETY: The pointer comes from a reference, so it is valid, aligned and
        // initialized. `T: Copy`, so reading does not duplicate ownership.
        unsafe { core::ptr::read_volatile(&raw const self.0) }
    }
}

impl<T: Copy + core::fmt::Debug> core::fmt::Debug for ConstVolatile<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ConstVolatile").field(&self.read()).finish()
    }
}

// SAFETY: `Const<T>` is `#[repr(transparent)]` over `T`.
unsafe impl<T: Upcast> Pointee for Const<T> {
    type Unqualified = T;
    const QUALIFIERS: Qualifiers = Qualifiers::CONST;
}

// SAFETY: `Volatile<T>` is `#[repr(transparent)]` over `T`.
unsafe impl<T: Upcast> Pointee for Volatile<T> {
    type Unqualified = T;
    const QUALIFIERS: Qualifiers = Qualifiers::VOLATILE;
}

// SAFETY: `ConstVolatile<T>` is `#[repr(transparent)]` over `T`.
unsafe impl<T: Upcast> Pointee for ConstVolatile<T> {
    type Unqualified = T;
    const QUALIFIERS: Qualifiers = Qualifiers::CONST_VOLATILE;
}
