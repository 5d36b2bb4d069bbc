//! Registry entries for types from `core` and `alloc`.
//!
//! None of these types have bases. They still need entries so that pointers
//! to them can be erased and recovered.

use alloc::{boxed::Box, rc::Rc, string::String, sync::Arc, vec::Vec};

use crate::hierarchy::{BaseEntry, Pointee, Qualifiers, Upcast};

/// Registers types without bases.
macro_rules! impl_leaf {
    ($(impl[$($generics:tt)*] $ty:ty;)*) => {
        $(
            // SAFETY: no bases are listed, so there are no offsets to get wrong.
            unsafe impl<$($generics)*> Upcast for $ty {
                const BASES: &'static [BaseEntry] = &[];
            }

            // SAFETY: `Unqualified` is `Self`.
            unsafe impl<$($generics)*> Pointee for $ty {
                type Unqualified = Self;
                const QUALIFIERS: Qualifiers = Qualifiers::NONE;
            }
        )*
    };
}

impl_leaf! {
    impl[] ();
    impl[] bool;
    impl[] char;
    impl[] u8;
    impl[] u16;
    impl[] u32;
    impl[] u64;
    impl[] u128;
    impl[] usize;
    impl[] i8;
    impl[] i16;
    impl[] i32;
    impl[] i64;
    impl[] i128;
    impl[] isize;
    impl[] f32;
    impl[] f64;
    impl[] core::ffi::c_void;
    impl[] &'static str;
    impl[] String;
    impl[T: 'static] Vec<T>;
    impl[T: ?Sized + 'static] Box<T>;
    impl[T: ?Sized + 'static] Rc<T>;
    impl[T: ?Sized + 'static] Arc<T>;
    impl[T: 'static] Option<T>;
    impl[T: 'static, const N: usize] [T; N];
    impl[A: 'static] (A,);
    impl[A: 'static, B: 'static] (A, B);
    impl[A: 'static, B: 'static, C: 'static] (A, B, C);
    impl[A: 'static, B: 'static, C: 'static, D: 'static] (A, B, C, D);
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::*;

    fn unqualified_type_id<T: Pointee>() -> TypeId {
        TypeId::of::<T::Unqualified>()
    }

    #[test]
    fn test_leaf_types_have_no_bases() {
        assert!(<i32 as Upcast>::BASES.is_empty());
        assert!(<String as Upcast>::BASES.is_empty());
        assert!(<(i32, String) as Upcast>::BASES.is_empty());
        assert!(<core::ffi::c_void as Upcast>::BASES.is_empty());
    }

    #[test]
    fn test_leaf_types_are_unqualified() {
        assert_eq!(<u8 as Pointee>::QUALIFIERS, Qualifiers::NONE);
        assert_eq!(unqualified_type_id::<Vec<u8>>(), TypeId::of::<Vec<u8>>());
    }
}
