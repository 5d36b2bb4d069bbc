//! Vtable for type-erased conversion checks.
//!
//! This module contains the [`ProbeVtable`] which answers "does the pointer I
//! was created for convert to a pointer to this other type?" after the
//! concrete pointee type `T` has been erased. The vtable is created once per
//! `T` and the function pointers inside it are instantiated for that `T`.
//!
//! This module encapsulates the fields of [`ProbeVtable`] so they cannot be
//! accessed directly. The only way to obtain one is [`ProbeVtable::new`],
//! which pairs the function pointers with the type `T` at compile time.

use core::{any::TypeId, ffi::c_void};

use crate::{
    hierarchy::{BaseLookup, Pointee, Qualifiers, Upcast, locate_base},
    probe::raw::CastTarget,
};

/// Vtable for type-erased conversion checks.
///
/// # Safety Invariant
///
/// All fields were filled in by [`ProbeVtable::new`] for a single pointee type
/// `T`.
pub(crate) struct ProbeVtable {
    /// Gets the [`TypeId`] of `T::Unqualified`.
    pointee_type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of `T::Unqualified`.
    pointee_type_name: fn() -> &'static str,
    /// The qualifiers of `T`.
    qualifiers: Qualifiers,
    /// Converts an address of a `T` into an address of the requested target.
    upcast: fn(*mut (), CastTarget) -> Option<*mut ()>,
}

impl ProbeVtable {
    /// Creates a new [`ProbeVtable`] for the pointee type `T`.
    pub(super) const fn new<T: Pointee>() -> &'static Self {
        const {
            &Self {
                pointee_type_id: TypeId::of::<T::Unqualified>,
                pointee_type_name: core::any::type_name::<T::Unqualified>,
                qualifiers: T::QUALIFIERS,
                upcast: upcast::<T>,
            }
        }
    }

    /// Gets the [`TypeId`] of the unqualified pointee.
    #[inline]
    pub(super) fn pointee_type_id(&self) -> TypeId {
        (self.pointee_type_id)()
    }

    /// Gets the [`core::any::type_name`] of the unqualified pointee.
    #[inline]
    pub(super) fn pointee_type_name(&self) -> &'static str {
        (self.pointee_type_name)()
    }

    /// Gets the qualifiers of the pointee.
    #[inline]
    pub(super) fn qualifiers(&self) -> Qualifiers {
        self.qualifiers
    }

    /// Converts `addr`, the address of a `T`, to the address of `target`.
    #[inline]
    pub(super) fn upcast(&self, addr: *mut (), target: CastTarget) -> Option<*mut ()> {
        (self.upcast)(addr, target)
    }
}

/// Converts `addr`, the address of a `T`, to the address of `target`.
///
/// The conversion follows the implicit pointer conversion rules:
///
/// - Qualifiers may be added but never removed.
/// - The unqualified pointee may stay the same, become [`c_void`], or become a
///   base that is reachable through exactly one path.
///
/// A null `addr` stays null.
fn upcast<T: Pointee>(addr: *mut (), target: CastTarget) -> Option<*mut ()> {
    if !target.qualifiers().contains(T::QUALIFIERS) {
        return None;
    }

    let target_type_id = target.type_id();
    if target_type_id == TypeId::of::<T::Unqualified>() || target_type_id == TypeId::of::<c_void>()
    {
        return Some(addr);
    }

    match locate_base(<T::Unqualified as Upcast>::BASES, target_type_id) {
        BaseLookup::Unique(_) if addr.is_null() => Some(addr),
        BaseLookup::Unique(offset) => Some(addr.wrapping_byte_add(offset)),
        BaseLookup::Missing | BaseLookup::Ambiguous => None,
    }
}
