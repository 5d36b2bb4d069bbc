//! The non-owning erased pointer.

use anyptr_internals::{CastTarget, Pointee, Probe, Upcast};

use crate::{BadCast, Const, HandleKind, TypeIdentity};

/// A raw pointer of erased type that can be recovered as a pointer to the
/// original pointee, to any of its registered bases, to a more qualified
/// version of either, or to [`c_void`](core::ffi::c_void).
///
/// An [`ErasedPtr`] does not own or borrow anything. It is a plain address
/// plus a [`Probe`] describing the pointee, so it is [`Copy`] and dropping it
/// does nothing. Like a raw pointer, it is neither [`Send`] nor [`Sync`], and
/// dereferencing a recovered pointer is `unsafe`.
///
/// # Examples
///
/// ```
/// use anyptr::{Const, ErasedPtr, bases};
///
/// struct Base {
///     id: u32,
/// }
/// bases!(Base);
///
/// #[repr(C)]
/// struct Derived {
///     name: &'static str,
///     base: Base,
/// }
/// bases!(Derived { base: Base });
///
/// let mut derived = Derived {
///     name: "derived",
///     base: Base { id: 7 },
/// };
/// let erased = ErasedPtr::from_mut(&mut derived);
///
/// let base: *mut Base = erased.cast::<Base>()?;
/// // SAFETY: `derived` is alive and not otherwise borrowed.
/// assert_eq!(unsafe { (*base).id }, 7);
///
/// let base: *mut Const<Base> = erased.cast::<Const<Base>>()?;
/// // SAFETY: Same as above.
/// assert_eq!(unsafe { (&*base).id }, 7);
///
/// assert!(erased.try_cast::<String>().is_none());
/// # Ok::<(), anyptr::BadCast>(())
/// ```
#[derive(Copy, Clone)]
pub struct ErasedPtr {
    /// The stored address, null when empty
    ptr: *mut (),
    /// The probe of the stored pointee, absent when empty
    probe: Option<Probe>,
}

impl ErasedPtr {
    /// The empty pointer.
    pub const EMPTY: Self = Self {
        ptr: core::ptr::null_mut(),
        probe: None,
    };

    /// Erases `ptr`.
    ///
    /// The result has a value even if `ptr` is null; a null pointer converts
    /// to a null pointer of any type it could be converted to.
    #[inline]
    pub const fn new<T: Pointee>(ptr: *mut T) -> Self {
        Self {
            ptr: ptr.cast::<()>(),
            probe: Some(Probe::of::<T>()),
        }
    }

    /// Erases a shared reference. The pointer is stored as a pointer to
    /// [`Const<T>`], so it can never be recovered as a mutable `*mut T`.
    #[inline]
    pub const fn from_ref<T: Upcast>(value: &T) -> Self {
        Self::from_const(core::ptr::from_ref(value))
    }

    /// Erases a unique reference.
    #[inline]
    pub const fn from_mut<T: Pointee>(value: &mut T) -> Self {
        Self::new(core::ptr::from_mut(value))
    }

    /// Erases a `*const T` as a pointer to [`Const<T>`].
    #[inline]
    pub const fn from_const<T: Upcast>(ptr: *const T) -> Self {
        Self::new(ptr.cast::<Const<T>>().cast_mut())
    }

    /// Returns `true` if a pointer is stored.
    #[inline]
    pub fn has_value(&self) -> bool {
        self.probe.is_some()
    }

    /// Returns the identity of the stored pointer, or
    /// [`TypeIdentity::void`] if empty.
    #[inline]
    pub fn type_identity(&self) -> TypeIdentity {
        TypeIdentity::from_optional_probe(HandleKind::Raw, self.probe)
    }

    /// Returns the stored address with its type erased, or null if empty.
    #[inline]
    pub fn as_ptr(&self) -> *mut () {
        self.ptr
    }

    /// Empties the pointer.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }

    /// Exchanges the contents of `self` and `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Takes the stored pointer, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Recovers the stored pointer as a `*mut U`.
    ///
    /// Returns [`None`] if the pointer is empty or if the stored pointer does
    /// not implicitly convert to a pointer to `U`.
    #[inline]
    pub fn try_cast<U: Pointee>(&self) -> Option<*mut U> {
        self.probe
            .and_then(|probe| probe.upcast(self.ptr, CastTarget::of::<U>()))
            .map(<*mut ()>::cast::<U>)
    }

    /// Recovers the stored pointer as a `*mut U`.
    ///
    /// A pointer to `T` converts to a pointer to `U` if:
    ///
    /// - `U` is `T`, [`c_void`](core::ffi::c_void), or a base registered for
    ///   `T` that is reachable through exactly one path, and
    /// - `U` carries every qualifier `T` carries.
    ///
    /// # Errors
    ///
    /// Returns a [`BadCast`] if the pointer is empty or does not convert.
    #[inline]
    pub fn cast<U: Pointee>(&self) -> Result<*mut U, BadCast> {
        self.try_cast::<U>()
            .ok_or_else(|| BadCast::new(self.type_identity(), TypeIdentity::of_raw::<U>()))
    }
}

impl Default for ErasedPtr {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T: Pointee> From<*mut T> for ErasedPtr {
    #[inline]
    fn from(ptr: *mut T) -> Self {
        Self::new(ptr)
    }
}

impl<T: Upcast> From<*const T> for ErasedPtr {
    #[inline]
    fn from(ptr: *const T) -> Self {
        Self::from_const(ptr)
    }
}

impl core::fmt::Debug for ErasedPtr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ErasedPtr")
            .field("ptr", &self.ptr)
            .field("identity", &self.type_identity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use core::ffi::c_void;

    use super::*;

    #[test]
    fn test_erased_ptr_size() {
        assert_eq!(
            core::mem::size_of::<ErasedPtr>(),
            2 * core::mem::size_of::<usize>()
        );
        static_assertions::assert_not_impl_any!(ErasedPtr: Send, Sync);
    }

    #[test]
    fn test_default_is_empty() {
        let erased = ErasedPtr::default();
        assert!(!erased.has_value());
        assert!(erased.as_ptr().is_null());
        assert_eq!(erased.type_identity(), TypeIdentity::void());
        assert!(erased.try_cast::<c_void>().is_none());
    }

    #[test]
    fn test_null_has_value() {
        let erased = ErasedPtr::new(core::ptr::null_mut::<u16>());
        assert!(erased.has_value());
        assert_eq!(erased.try_cast::<u16>(), Some(core::ptr::null_mut()));
        assert_eq!(erased.try_cast::<c_void>(), Some(core::ptr::null_mut()));
    }

    #[test]
    fn test_from_ref_is_const() {
        let value = 3_i64;
        let erased = ErasedPtr::from_ref(&value);
        assert_eq!(erased.type_identity(), TypeIdentity::of_raw::<Const<i64>>());
        assert!(erased.try_cast::<i64>().is_none());

        let ptr = erased.try_cast::<Const<i64>>().map(<*mut Const<i64>>::cast::<i64>);
        assert_eq!(ptr.map(<*mut i64>::cast_const), Some(core::ptr::from_ref(&value)));
    }

    #[test]
    fn test_reset_and_take() {
        let mut value = 1_u8;
        let mut erased = ErasedPtr::from_mut(&mut value);

        let taken = erased.take();
        assert!(!erased.has_value());
        assert!(taken.has_value());

        let mut taken = taken;
        taken.reset();
        assert!(!taken.has_value());
    }
}
