//! The error returned by failed casts.

use crate::TypeIdentity;

/// The error returned by [`ErasedPtr::cast`](crate::ErasedPtr::cast) and the
/// other checked casts when the stored pointer does not implicitly convert to
/// the requested type.
///
/// It carries the identities of both sides of the failed conversion.
///
/// ```
/// use anyptr::{BadCast, ErasedPtr, TypeIdentity};
///
/// let mut value = 1_u8;
/// let erased = ErasedPtr::new(&raw mut value);
/// let error: BadCast = erased.cast::<u16>().unwrap_err();
///
/// assert_eq!(error.stored(), TypeIdentity::of_raw::<u8>());
/// assert_eq!(error.requested(), TypeIdentity::of_raw::<u16>());
/// assert_eq!(error.to_string(), "bad erased pointer cast from `u8*` to `u16*`");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct BadCast {
    /// The identity of the stored pointer
    stored: TypeIdentity,
    /// The identity of the requested pointer
    requested: TypeIdentity,
}

impl BadCast {
    /// Creates a new [`BadCast`] and reports it to the `tracing` subscriber
    /// when that feature is enabled.
    #[inline]
    pub(crate) fn new(stored: TypeIdentity, requested: TypeIdentity) -> Self {
        crate::util::trace_rejected(stored, requested);
        Self { stored, requested }
    }

    /// Returns the identity of the pointer that was stored.
    #[inline]
    pub fn stored(&self) -> TypeIdentity {
        self.stored
    }

    /// Returns the identity of the pointer that was requested.
    #[inline]
    pub fn requested(&self) -> TypeIdentity {
        self.requested
    }
}

impl core::fmt::Display for BadCast {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "bad erased pointer cast from `{}` to `{}`",
            self.stored, self.requested
        )
    }
}

impl core::error::Error for BadCast {}
