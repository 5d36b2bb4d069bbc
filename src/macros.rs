/// Registers the bases of a type.
///
/// A base is a field of the type that a pointer to the type may be upcast to.
/// Every type that is stored behind an erased pointer needs a registration,
/// even if it has no bases, so that the pointer can be recovered at all.
///
/// The macro accepts either a list of types without bases, or a single type
/// followed by its base fields and their types in braces. The bases of a base
/// are bases too, so upcasting is transitive, but a base that is reachable
/// through more than one field is ambiguous and cannot be upcast to.
///
/// The offsets of the fields are computed with [`core::mem::offset_of!`]. The
/// type of every field is checked against the declared base, and the field
/// must be one that safe code can borrow: fields of unions and misaligned
/// fields of `#[repr(packed)]` types are rejected at compile time.
///
/// # Examples
///
/// ```
/// use anyptr::{ErasedPtr, bases};
///
/// struct Shape {
///     sides: u32,
/// }
///
/// struct Named {
///     name: &'static str,
/// }
///
/// bases!(Shape, Named);
///
/// struct Square {
///     length: f64,
///     shape: Shape,
///     named: Named,
/// }
///
/// bases!(Square {
///     shape: Shape,
///     named: Named,
/// });
///
/// let mut square = Square {
///     length: 2.0,
///     shape: Shape { sides: 4 },
///     named: Named { name: "square" },
/// };
/// let erased = ErasedPtr::from_mut(&mut square);
///
/// let shape = erased.cast::<Shape>()?;
/// let named = erased.cast::<Named>()?;
/// // SAFETY: `square` is alive and not otherwise borrowed.
/// unsafe {
///     assert_eq!((*shape).sides, 4);
///     assert_eq!((*named).name, "square");
/// }
/// # Ok::<(), anyptr::BadCast>(())
/// ```
///
/// A field whose type does not match the declared base is rejected:
///
/// ```compile_fail
/// use anyptr::bases;
///
/// struct Base;
/// bases!(Base);
///
/// struct Derived {
///     base: Box<Base>,
/// }
/// bases!(Derived { base: Base });
/// ```
///
/// So is a field that may sit at a misaligned address:
///
/// ```compile_fail
/// use anyptr::bases;
///
/// struct Base {
///     value: u32,
/// }
/// bases!(Base);
///
/// #[repr(C, packed)]
/// struct Packed {
///     tag: u8,
///     base: Base,
/// }
/// bases!(Packed { base: Base });
/// ```
///
/// And a union field, whose contents depend on the variant that is live:
///
/// ```compile_fail
/// use anyptr::bases;
///
/// #[derive(Clone, Copy)]
/// struct Base {
///     flag: bool,
/// }
/// bases!(Base);
///
/// union Either {
///     base: Base,
///     raw: u8,
/// }
/// bases!(Either { base: Base });
/// ```
#[macro_export]
macro_rules! bases {
    ($ty:ty { $($field:ident : $base:ty),+ $(,)? }) => {
        $(
            const _: () = {
                #[allow(dead_code)]
                fn field_is_base(derived: &$ty) -> *const $base {
                    &raw const derived.$field
                }

                // Rejects union fields and packed fields that may be misaligned.
                #[allow(dead_code)]
                fn field_is_borrowable(derived: &$ty) {
                    let _borrowed = &derived.$field;
                }

                assert!(
                    ::core::mem::offset_of!($ty, $field) % ::core::mem::align_of::<$base>() == 0
                        && ::core::mem::align_of::<$ty>() >= ::core::mem::align_of::<$base>(),
                    "base field is not aligned for its type",
                );
            };
        )+

        // SAFETY: every entry locates a field with `offset_of!`. The type of that
        // field was checked to be the declared base above, and the field is an
        // aligned struct field that can be borrowed.
        unsafe impl $crate::__private::Upcast for $ty {
            const BASES: &'static [$crate::__private::BaseEntry] = &[$(
                // SAFETY: see above
                unsafe {
                    $crate::__private::BaseEntry::new::<$base>(::core::mem::offset_of!($ty, $field))
                },
            )+];
        }

        $crate::__impl_unqualified!($ty);
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            // SAFETY: no bases are listed, so there are no offsets to get wrong.
            unsafe impl $crate::__private::Upcast for $ty {
                const BASES: &'static [$crate::__private::BaseEntry] = &[];
            }

            $crate::__impl_unqualified!($ty);
        )+
    };
}

/// Implements `Pointee` for a registered type without qualifiers.
#[doc(hidden)]
#[macro_export]
macro_rules! __impl_unqualified {
    ($ty:ty) => {
        // SAFETY: `Unqualified` is `Self`.
        unsafe impl $crate::__private::Pointee for $ty {
            type Unqualified = Self;
            const QUALIFIERS: $crate::__private::Qualifiers = $crate::__private::Qualifiers::NONE;
        }
    };
}
