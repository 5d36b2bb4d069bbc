//! Runtime identities of erased pointer types.

use core::any::TypeId;

use anyptr_internals::{Pointee, Probe, Qualifiers};

/// The kind of handle a [`TypeIdentity`] describes.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum HandleKind {
    /// The identity of an empty container.
    Void,
    /// A raw pointer, as stored by [`ErasedPtr`](crate::ErasedPtr).
    Raw,
    /// A shared handle, as stored by [`SharedBox`](crate::SharedBox) and
    /// [`InlineSharedBox`](crate::InlineSharedBox).
    Shared,
}

/// An opaque token identifying an erased pointer type, such as "raw pointer to
/// `const Foo`" or "shared handle to `Bar`".
///
/// Two identities are equal iff they describe the same kind of handle to the
/// same pointee type with the same qualifiers. Comparing, ordering and hashing
/// identities are all constant-time operations.
///
/// ```
/// use anyptr::{Const, TypeIdentity};
///
/// assert_eq!(TypeIdentity::of_raw::<u32>(), TypeIdentity::of_raw::<u32>());
/// assert_ne!(TypeIdentity::of_raw::<u32>(), TypeIdentity::of_raw::<Const<u32>>());
/// assert_ne!(TypeIdentity::of_raw::<u32>(), TypeIdentity::of_shared::<u32>());
///
/// assert_eq!(TypeIdentity::of_raw::<Const<u32>>().to_string(), "const u32*");
/// assert_eq!(TypeIdentity::void().to_string(), "void");
/// ```
#[derive(Copy, Clone)]
pub struct TypeIdentity {
    /// The kind of handle
    kind: HandleKind,
    /// The [`TypeId`] of the unqualified pointee
    pointee: TypeId,
    /// The qualifiers of the pointee
    qualifiers: Qualifiers,
    /// The [`core::any::type_name`] of the unqualified pointee
    pointee_name: &'static str,
}

impl TypeIdentity {
    /// The identity reported by empty containers.
    #[inline]
    pub fn void() -> Self {
        Self {
            kind: HandleKind::Void,
            pointee: TypeId::of::<()>(),
            qualifiers: Qualifiers::NONE,
            pointee_name: "void",
        }
    }

    /// The identity of a raw pointer to `T`.
    #[inline]
    pub fn of_raw<T: Pointee>() -> Self {
        Self::from_probe(HandleKind::Raw, Probe::of::<T>())
    }

    /// The identity of a shared handle to `T`.
    #[inline]
    pub fn of_shared<T: Pointee>() -> Self {
        Self::from_probe(HandleKind::Shared, Probe::of::<T>())
    }

    /// The identity of a handle of the given kind to the pointee described by
    /// `probe`.
    #[inline]
    pub(crate) fn from_probe(kind: HandleKind, probe: Probe) -> Self {
        Self {
            kind,
            pointee: probe.pointee_type_id(),
            qualifiers: probe.qualifiers(),
            pointee_name: probe.pointee_type_name(),
        }
    }

    /// The identity of a handle of the given kind described by `probe`, or
    /// [`TypeIdentity::void`] if there is no probe.
    #[inline]
    pub(crate) fn from_optional_probe(kind: HandleKind, probe: Option<Probe>) -> Self {
        probe.map_or_else(Self::void, |probe| Self::from_probe(kind, probe))
    }

    /// Returns the kind of handle.
    #[inline]
    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Returns `true` if this is the identity of an empty container.
    #[inline]
    pub fn is_void(&self) -> bool {
        self.kind == HandleKind::Void
    }

    /// Returns the [`TypeId`] of the pointee with its qualifiers stripped.
    #[inline]
    pub fn pointee_type_id(&self) -> TypeId {
        self.pointee
    }

    /// Returns the [`core::any::type_name`] of the pointee with its qualifiers
    /// stripped.
    #[inline]
    pub fn pointee_type_name(&self) -> &'static str {
        self.pointee_name
    }

    /// Returns the qualifiers of the pointee.
    #[inline]
    pub fn qualifiers(&self) -> Qualifiers {
        self.qualifiers
    }

    /// The part of the identity that takes part in comparisons.
    #[inline]
    fn key(&self) -> (HandleKind, TypeId, Qualifiers) {
        (self.kind, self.pointee, self.qualifiers)
    }
}

impl PartialEq for TypeIdentity {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TypeIdentity {}

impl PartialOrd for TypeIdentity {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeIdentity {
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl core::hash::Hash for TypeIdentity {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl core::fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let qualifiers = self.qualifiers.prefix();
        match self.kind {
            HandleKind::Void => f.write_str("void"),
            HandleKind::Raw => write!(f, "{qualifiers}{}*", self.pointee_name),
            HandleKind::Shared => write!(f, "Shared<{qualifiers}{}>", self.pointee_name),
        }
    }
}

impl core::fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("TypeIdentity")
            .field(&format_args!("{self}"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::ToString};

    use super::*;
    use crate::{Const, ConstVolatile, Volatile};

    #[test]
    fn test_cv_qualifications_are_distinct() {
        let identities = [
            TypeIdentity::of_raw::<i32>(),
            TypeIdentity::of_raw::<Const<i32>>(),
            TypeIdentity::of_raw::<Volatile<i32>>(),
            TypeIdentity::of_raw::<ConstVolatile<i32>>(),
        ];
        for (i, a) in identities.iter().enumerate() {
            for (j, b) in identities.iter().enumerate() {
                assert_eq!(i == j, a == b);
            }
        }
    }

    #[test]
    fn test_void_is_distinct() {
        assert!(TypeIdentity::void().is_void());
        assert_ne!(TypeIdentity::void(), TypeIdentity::of_raw::<()>());
        assert_ne!(
            TypeIdentity::void(),
            TypeIdentity::of_raw::<core::ffi::c_void>()
        );
        assert_eq!(
            TypeIdentity::from_optional_probe(HandleKind::Raw, None),
            TypeIdentity::void()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeIdentity::of_raw::<u8>().to_string(), "u8*");
        assert_eq!(
            TypeIdentity::of_raw::<ConstVolatile<u8>>().to_string(),
            "const volatile u8*"
        );
        assert_eq!(
            TypeIdentity::of_shared::<Volatile<u8>>().to_string(),
            "Shared<volatile u8>"
        );
        assert_eq!(
            format!("{:?}", TypeIdentity::void()),
            "TypeIdentity(void)"
        );
    }

    #[test]
    fn test_ordering_is_total() {
        let a = TypeIdentity::of_raw::<u8>();
        let b = TypeIdentity::of_shared::<u8>();
        assert_eq!(a.cmp(&a), core::cmp::Ordering::Equal);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        assert!(TypeIdentity::void() < a);
    }
}
