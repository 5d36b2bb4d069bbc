//! Explicit base-class registry used to answer "does `T*` convert to `U*`?"
//!
//! Rust has no inheritance, so a "base" of a type is a field that the type
//! declares as one. Every type that can be stored in an erased pointer
//! implements [`Upcast`], which lists its direct bases as [`BaseEntry`] values.
//! Each entry carries the byte offset of the base inside the derived type and a
//! link to the base's own table, so the full base graph can be walked at
//! runtime without knowing any of the types statically.
//!
//! Qualifiers are tracked separately through [`Pointee`], which is implemented
//! both by unqualified types and by the qualifier wrappers of the public crate.

mod impls;
mod qualifiers;

use core::any::TypeId;

pub use self::qualifiers::Qualifiers;

/// A type whose (public) base classes are known.
///
/// # Safety
///
/// Every entry of [`Upcast::BASES`] must describe a value of the entry's base
/// type living at the entry's offset inside every value of `Self`.
///
/// Entries are normally produced by the `bases!` macro of the public crate,
/// which derives the offsets using [`core::mem::offset_of!`] and checks that
/// the field types match the declared bases.
pub unsafe trait Upcast: 'static {
    /// The direct bases of this type.
    const BASES: &'static [BaseEntry];
}

/// A type that can be the target of an erased pointer.
///
/// This is implemented for every [`Upcast`] type with no qualifiers, and for
/// the qualifier wrappers with the corresponding qualifiers.
///
/// # Safety
///
/// `Self` must have the same size, alignment and validity as
/// `Self::Unqualified`, for example by being a `#[repr(transparent)]` wrapper
/// around it.
pub unsafe trait Pointee: 'static {
    /// The type with all qualifiers stripped.
    type Unqualified: Upcast;

    /// The qualifiers of this type.
    const QUALIFIERS: Qualifiers;
}

/// Description of a single direct base of some derived type.
#[derive(Copy, Clone)]
pub struct BaseEntry {
    /// Gets the [`TypeId`] of the base.
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the base.
    type_name: fn() -> &'static str,
    /// Byte offset of the base inside the derived type.
    offset: usize,
    /// Gets the direct bases of the base.
    bases: fn() -> &'static [BaseEntry],
}

impl BaseEntry {
    /// Creates an entry for the base `B` located `offset` bytes into the
    /// derived type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. Every value of the derived type that this entry is listed for
    ///    contains a valid `B` starting `offset` bytes after its own start.
    pub const unsafe fn new<B: Upcast>(offset: usize) -> Self {
        Self {
            type_id: TypeId::of::<B>,
            type_name: core::any::type_name::<B>,
            offset,
            bases: bases_of::<B>,
        }
    }

    /// Returns the [`TypeId`] of the base.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Returns the [`core::any::type_name`] of the base.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Returns the byte offset of the base inside the derived type.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the direct bases of the base.
    #[inline]
    pub fn bases(&self) -> &'static [BaseEntry] {
        (self.bases)()
    }
}

impl core::fmt::Debug for BaseEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BaseEntry")
            .field("type_name", &self.type_name())
            .field("offset", &self.offset)
            .finish()
    }
}

/// Returns the bases of `B`.
fn bases_of<B: Upcast>() -> &'static [BaseEntry] {
    B::BASES
}

/// Outcome of searching a base graph for a given type.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BaseLookup {
    /// The type is not a base.
    Missing,
    /// The type is reachable through exactly one path, at the given offset.
    Unique(usize),
    /// The type is reachable through more than one path.
    Ambiguous,
}

impl BaseLookup {
    /// Combines the results for two disjoint parts of the graph.
    #[inline]
    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (BaseLookup::Missing, found) | (found, BaseLookup::Missing) => found,
            _ => BaseLookup::Ambiguous,
        }
    }

    /// Shifts a found offset by `offset` bytes.
    #[inline]
    fn shifted(self, offset: usize) -> Self {
        match self {
            BaseLookup::Unique(inner) => BaseLookup::Unique(offset + inner),
            other => other,
        }
    }
}

/// Searches `bases` and, transitively, their own bases for `target`.
///
/// Every path from the derived type to `target` is counted, so a type that is
/// reachable as a base of two different bases is reported as ambiguous.
pub fn locate_base(bases: &[BaseEntry], target: TypeId) -> BaseLookup {
    bases.iter().fold(BaseLookup::Missing, |found, base| {
        let direct = if base.type_id() == target {
            BaseLookup::Unique(base.offset())
        } else {
            BaseLookup::Missing
        };
        let indirect = locate_base(base.bases(), target).shifted(base.offset());
        found.merge(direct).merge(indirect)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    struct Root {
        _value: u32,
    }

    #[repr(C)]
    struct Left {
        _tag: u64,
        root: Root,
    }

    #[repr(C)]
    struct Right {
        root: Root,
    }

    #[repr(C)]
    struct Diamond {
        left: Left,
        right: Right,
    }

    // SAFETY: no bases
    unsafe impl Upcast for Root {
        const BASES: &'static [BaseEntry] = &[];
    }

    // SAFETY: the offsets come from `offset_of!` on fields of the given types
    unsafe impl Upcast for Left {
        const BASES: &'static [BaseEntry] =
            &[unsafe { BaseEntry::new::<Root>(core::mem::offset_of!(Left, root)) }];
    }

    // SAFETY: the offsets come from `offset_of!` on fields of the given types
    unsafe impl Upcast for Right {
        const BASES: &'static [BaseEntry] =
            &[unsafe { BaseEntry::new::<Root>(core::mem::offset_of!(Right, root)) }];
    }

    // SAFETY: the offsets come from `offset_of!` on fields of the given types
    unsafe impl Upcast for Diamond {
        const BASES: &'static [BaseEntry] = &[
            unsafe { BaseEntry::new::<Left>(core::mem::offset_of!(Diamond, left)) },
            unsafe { BaseEntry::new::<Right>(core::mem::offset_of!(Diamond, right)) },
        ];
    }

    #[test]
    fn test_direct_base() {
        assert_eq!(
            locate_base(Left::BASES, TypeId::of::<Root>()),
            BaseLookup::Unique(core::mem::offset_of!(Left, root))
        );
    }

    #[test]
    fn test_transitive_base_offsets_add_up() {
        let expected = core::mem::offset_of!(Diamond, left) + core::mem::offset_of!(Left, root);
        assert_eq!(
            locate_base(Diamond::BASES, TypeId::of::<Left>()),
            BaseLookup::Unique(core::mem::offset_of!(Diamond, left))
        );
        assert_eq!(
            locate_base(Left::BASES, TypeId::of::<Root>()).shifted(core::mem::offset_of!(Diamond, left)),
            BaseLookup::Unique(expected)
        );
    }

    #[test]
    fn test_diamond_is_ambiguous() {
        assert_eq!(
            locate_base(Diamond::BASES, TypeId::of::<Root>()),
            BaseLookup::Ambiguous
        );
    }

    #[test]
    fn test_missing_base() {
        assert_eq!(
            locate_base(Diamond::BASES, TypeId::of::<u32>()),
            BaseLookup::Missing
        );
        assert_eq!(
            locate_base(Root::BASES, TypeId::of::<Root>()),
            BaseLookup::Missing
        );
    }

    #[test]
    fn test_base_entry_accessors() {
        let entry = Diamond::BASES[1];
        assert_eq!(entry.type_id(), TypeId::of::<Right>());
        assert!(entry.type_name().ends_with("Right"));
        assert_eq!(entry.offset(), core::mem::offset_of!(Diamond, right));
        assert_eq!(entry.bases().len(), 1);
    }
}
