//! Free-function forms of the casts and box constructors.

use anyptr_internals::Pointee;

use crate::{BadCast, ErasedPtr, InlineSharedBox, Shared, SharedBox, SharedCast};

/// Recovers the pointer stored in `ptr` as a `*mut U`.
///
/// This is the same as [`ErasedPtr::try_cast`].
#[inline]
pub fn try_cast<U: Pointee>(ptr: &ErasedPtr) -> Option<*mut U> {
    ptr.try_cast::<U>()
}

/// Recovers the pointer stored in `ptr` as a `*mut U`.
///
/// This is the same as [`ErasedPtr::cast`].
///
/// # Errors
///
/// Returns a [`BadCast`] if `ptr` is empty or does not convert.
#[inline]
pub fn cast<U: Pointee>(ptr: &ErasedPtr) -> Result<*mut U, BadCast> {
    ptr.cast::<U>()
}

/// Recovers the handle stored in a [`SharedBox`] or an [`InlineSharedBox`] as
/// a handle to `U`.
///
/// ```
/// use anyptr::{make_inline_shared_box, make_shared_box, try_cast_shared};
///
/// let window = make_shared_box(1_u8);
/// let inline = make_inline_shared_box(1_u8);
///
/// assert!(try_cast_shared::<u8, _>(&window).is_some());
/// assert!(try_cast_shared::<u8, _>(&inline).is_some());
/// assert!(try_cast_shared::<i8, _>(&inline).is_none());
/// ```
#[inline]
pub fn try_cast_shared<U: Pointee, B: SharedCast>(
    erased: &B,
) -> Option<Shared<U, B::ThreadSafety>> {
    erased.try_cast_shared::<U>()
}

/// Recovers the handle stored in a [`SharedBox`] or an [`InlineSharedBox`] as
/// a handle to `U`.
///
/// # Errors
///
/// Returns a [`BadCast`] if the box is empty or does not convert.
#[inline]
pub fn cast_shared<U: Pointee, B: SharedCast>(
    erased: &B,
) -> Result<Shared<U, B::ThreadSafety>, BadCast> {
    erased.cast_shared::<U>()
}

/// Moves `value` into a new shared handle and erases it in a [`SharedBox`].
///
/// ```
/// use anyptr::{cast_shared, make_shared_box};
///
/// let erased = make_shared_box((42, String::from("test")));
/// let pair = cast_shared::<(i32, String), _>(&erased)?;
/// assert_eq!(*pair, (42, String::from("test")));
/// # Ok::<(), anyptr::BadCast>(())
/// ```
#[inline]
pub fn make_shared_box<T: Pointee + Send + Sync>(value: T) -> SharedBox {
    SharedBox::new(Shared::new(value))
}

/// Erases a new shared handle to `T::default()` in a [`SharedBox`].
#[inline]
pub fn make_shared_box_default<T: Pointee + Default + Send + Sync>() -> SharedBox {
    make_shared_box(T::default())
}

/// Moves `value` into a new shared handle and erases it in an
/// [`InlineSharedBox`].
#[inline]
pub fn make_inline_shared_box<T: Pointee + Send + Sync>(value: T) -> InlineSharedBox {
    InlineSharedBox::new(Shared::new(value))
}
