//! Type-erased conversion probe handles.
//!
//! A [`Probe`] is captured when a pointer to some `T` is erased. Later, a
//! caller that only knows the requested type `U` builds a [`CastTarget`] for
//! `U` and asks the probe whether, and how, the stored address converts. The
//! probe is specialized on `T` while the question is specialized on `U`, so
//! neither side needs to know the other's type.

use core::any::TypeId;

use crate::{
    hierarchy::{Pointee, Qualifiers},
    probe::vtable::ProbeVtable,
};

/// The requested side of a conversion: an unqualified pointee type and its
/// qualifiers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CastTarget {
    /// The [`TypeId`] of the unqualified pointee.
    type_id: TypeId,
    /// The requested qualifiers.
    qualifiers: Qualifiers,
}

impl CastTarget {
    /// Creates the target describing a pointer to `U`.
    #[inline]
    pub fn of<U: Pointee>() -> Self {
        Self {
            type_id: TypeId::of::<U::Unqualified>(),
            qualifiers: U::QUALIFIERS,
        }
    }

    /// Returns the [`TypeId`] of the unqualified pointee.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.type_id
    }

    /// Returns the requested qualifiers.
    #[inline]
    pub fn qualifiers(self) -> Qualifiers {
        self.qualifiers
    }
}

/// The conversion capability of an erased pointer to some `T`.
///
/// This is a single pointer to a `'static` vtable, so it is cheap to copy.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Probe {
    /// The vtable created for `T`
    vtable: &'static ProbeVtable,
}

impl Probe {
    /// Creates the probe for pointers to `T`.
    #[inline]
    pub const fn of<T: Pointee>() -> Self {
        Self {
            vtable: ProbeVtable::new::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the unqualified pointee.
    #[inline]
    pub fn pointee_type_id(self) -> TypeId {
        self.vtable.pointee_type_id()
    }

    /// Returns the [`core::any::type_name`] of the unqualified pointee.
    #[inline]
    pub fn pointee_type_name(self) -> &'static str {
        self.vtable.pointee_type_name()
    }

    /// Returns the qualifiers of the pointee.
    #[inline]
    pub fn qualifiers(self) -> Qualifiers {
        self.vtable.qualifiers()
    }

    /// Returns `true` if `target` names exactly the pointee of this probe,
    /// including its qualifiers.
    #[inline]
    pub fn is_exactly(self, target: CastTarget) -> bool {
        self.qualifiers() == target.qualifiers() && self.pointee_type_id() == target.type_id()
    }

    /// Converts `addr`, which must be the address of the `T` this probe was
    /// created for, to the address of `target`.
    ///
    /// Returns [`None`] if a pointer to `T` does not implicitly convert to a
    /// pointer to `target`. The returned address is computed with wrapping
    /// arithmetic, so this is safe to call; it is only meaningful if `addr` is
    /// either null or the address of a live `T`.
    #[inline]
    pub fn upcast(self, addr: *mut (), target: CastTarget) -> Option<*mut ()> {
        if self.is_exactly(target) {
            return Some(addr);
        }
        self.vtable.upcast(addr, target)
    }
}

impl core::fmt::Debug for Probe {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Probe")
            .field("pointee", &self.pointee_type_name())
            .field("qualifiers", &self.qualifiers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn test_probe_size() {
        assert_eq!(core::mem::size_of::<Probe>(), core::mem::size_of::<usize>());
        assert_eq!(
            core::mem::size_of::<Option<Probe>>(),
            core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_is_exactly() {
        let probe = Probe::of::<i32>();
        assert!(probe.is_exactly(CastTarget::of::<i32>()));
        assert!(!probe.is_exactly(CastTarget::of::<u32>()));
        assert!(!probe.is_exactly(CastTarget::of::<core::ffi::c_void>()));
    }

    #[test]
    fn test_cast_target_of() {
        let target = CastTarget::of::<String>();
        assert_eq!(target.type_id(), TypeId::of::<String>());
        assert_eq!(target.qualifiers(), Qualifiers::NONE);
    }
}
