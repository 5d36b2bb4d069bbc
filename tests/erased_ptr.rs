use core::ffi::c_void;

use anyptr::{
    BadCast, Const, ConstVolatile, ErasedPtr, Pointee, TypeIdentity, Volatile, bases, cast,
    try_cast,
};

#[derive(Debug, PartialEq)]
struct Base {
    value: i32,
}

#[derive(Debug, PartialEq)]
struct Mixin {
    label: &'static str,
}

bases!(Base, Mixin);

#[derive(Debug)]
struct Derived {
    extra: u64,
    base: Base,
    mixin: Mixin,
}

bases!(Derived {
    base: Base,
    mixin: Mixin,
});

struct MostDerived {
    derived: Derived,
}

bases!(MostDerived { derived: Derived });

struct Left {
    base: Base,
}

struct Right {
    base: Base,
}

bases!(Left { base: Base });
bases!(Right { base: Base });

struct Diamond {
    left: Left,
    right: Right,
}

bases!(Diamond {
    left: Left,
    right: Right,
});

struct Unrelated;

bases!(Unrelated);

fn derived() -> Derived {
    Derived {
        extra: 9,
        base: Base { value: 42 },
        mixin: Mixin { label: "mixin" },
    }
}

#[test]
fn test_cast_to_self_returns_exact_address() {
    let mut value = derived();
    let ptr: *mut Derived = &raw mut value;
    let erased = ErasedPtr::new(ptr);

    assert!(erased.has_value());
    assert_eq!(erased.type_identity(), TypeIdentity::of_raw::<Derived>());
    assert_eq!(erased.try_cast::<Derived>(), Some(ptr));
    assert_eq!(cast::<Derived>(&erased), Ok(ptr));
    assert_eq!(erased.as_ptr(), ptr.cast::<()>());
    assert_eq!(erased.try_cast::<c_void>(), Some(ptr.cast::<c_void>()));
}

#[test]
fn test_cast_to_bases_adjusts_address() {
    let mut value = derived();
    let erased = ErasedPtr::from_mut(&mut value);

    let base = erased.cast::<Base>().map(|base| base.cast_const());
    assert_eq!(base, Ok(&raw const value.base));

    let mixin = erased.cast::<Mixin>().map(|mixin| mixin.cast_const());
    assert_eq!(mixin, Ok(&raw const value.mixin));

    // SAFETY: `value` is alive and the pointers locate its fields.
    unsafe {
        assert_eq!(*base.unwrap(), Base { value: 42 });
        assert_eq!((*mixin.unwrap()).label, "mixin");
    }
    assert_eq!(value.extra, 9);
}

#[test]
fn test_bases_are_transitive() {
    let mut value = MostDerived { derived: derived() };
    let erased = ErasedPtr::from_mut(&mut value);

    assert_eq!(
        erased.try_cast::<Derived>().map(<*mut Derived>::cast_const),
        Some(&raw const value.derived)
    );
    assert_eq!(
        erased.try_cast::<Base>().map(<*mut Base>::cast_const),
        Some(&raw const value.derived.base)
    );
    assert_eq!(
        erased.try_cast::<Mixin>().map(<*mut Mixin>::cast_const),
        Some(&raw const value.derived.mixin)
    );
}

#[test]
fn test_ambiguous_base_is_rejected() {
    let mut value = Diamond {
        left: Left {
            base: Base { value: 1 },
        },
        right: Right {
            base: Base { value: 2 },
        },
    };
    let erased = ErasedPtr::from_mut(&mut value);

    assert!(erased.try_cast::<Left>().is_some());
    assert!(erased.try_cast::<Right>().is_some());
    assert!(erased.try_cast::<Base>().is_none());
    assert_eq!(value.left.base.value + value.right.base.value, 3);
}

#[test]
fn test_unrelated_and_derived_casts_fail() {
    let mut value = derived();
    let erased = ErasedPtr::from_mut(&mut value);

    assert!(try_cast::<Unrelated>(&erased).is_none());
    assert!(try_cast::<MostDerived>(&erased).is_none());
    assert!(try_cast::<i32>(&erased).is_none());

    let error: BadCast = erased.cast::<Unrelated>().unwrap_err();
    assert_eq!(error.stored(), TypeIdentity::of_raw::<Derived>());
    assert_eq!(error.requested(), TypeIdentity::of_raw::<Unrelated>());

    let mut base = Base { value: 0 };
    let erased = ErasedPtr::from_mut(&mut base);
    assert!(erased.try_cast::<Derived>().is_none());
}

#[test]
fn test_empty_pointer_rejects_everything() {
    let erased = ErasedPtr::default();

    assert!(!erased.has_value());
    assert_eq!(erased.type_identity(), TypeIdentity::void());
    assert!(erased.try_cast::<Base>().is_none());
    assert!(erased.try_cast::<()>().is_none());

    let error = erased.cast::<c_void>().unwrap_err();
    assert_eq!(error.stored(), TypeIdentity::void());
    let message = error.to_string();
    assert!(message.starts_with("bad erased pointer cast from `void` to `"));
    assert!(message.ends_with("c_void*`"));
}

#[test]
fn test_qualifier_promotion_matrix() {
    fn converts<Source: Pointee, Target: Pointee>() -> bool {
        let mut value = 0_i32;
        let erased = ErasedPtr::new((&raw mut value).cast::<Source>());
        erased.try_cast::<Target>().is_some()
    }

    assert!(converts::<i32, i32>());
    assert!(converts::<i32, Const<i32>>());
    assert!(converts::<i32, Volatile<i32>>());
    assert!(converts::<i32, ConstVolatile<i32>>());

    assert!(!converts::<Const<i32>, i32>());
    assert!(converts::<Const<i32>, Const<i32>>());
    assert!(!converts::<Const<i32>, Volatile<i32>>());
    assert!(converts::<Const<i32>, ConstVolatile<i32>>());

    assert!(!converts::<Volatile<i32>, i32>());
    assert!(!converts::<Volatile<i32>, Const<i32>>());
    assert!(converts::<Volatile<i32>, Volatile<i32>>());
    assert!(converts::<Volatile<i32>, ConstVolatile<i32>>());

    assert!(!converts::<ConstVolatile<i32>, i32>());
    assert!(!converts::<ConstVolatile<i32>, Const<i32>>());
    assert!(!converts::<ConstVolatile<i32>, Volatile<i32>>());
    assert!(converts::<ConstVolatile<i32>, ConstVolatile<i32>>());
}

#[test]
fn test_qualifiers_combine_with_upcasts() {
    let value = derived();
    let erased = ErasedPtr::from_ref(&value);

    assert_eq!(erased.type_identity(), TypeIdentity::of_raw::<Const<Derived>>());
    assert!(erased.try_cast::<Base>().is_none());
    assert!(erased.try_cast::<Volatile<Base>>().is_none());
    assert!(erased.try_cast::<c_void>().is_none());

    let base = erased.try_cast::<ConstVolatile<Base>>();
    assert_eq!(
        base.map(|base| base.cast_const().cast::<Base>()),
        Some(&raw const value.base)
    );
    assert!(erased.try_cast::<Const<c_void>>().is_some());
}

#[test]
fn test_from_raw_pointers() {
    let mut value = 5_u16;
    let erased = ErasedPtr::from(&raw mut value);
    assert_eq!(erased.type_identity(), TypeIdentity::of_raw::<u16>());

    let erased = ErasedPtr::from(&raw const value);
    assert_eq!(erased.type_identity(), TypeIdentity::of_raw::<Const<u16>>());
}

#[test]
fn test_swap_twice_restores_both() {
    let mut first_value = 1_u8;
    let mut second_value = 2_i64;
    let mut first = ErasedPtr::from_mut(&mut first_value);
    let mut second = ErasedPtr::from_mut(&mut second_value);
    let (first_ptr, second_ptr) = (first.as_ptr(), second.as_ptr());

    first.swap(&mut second);
    assert_eq!(first.type_identity(), TypeIdentity::of_raw::<i64>());
    assert_eq!(second.as_ptr(), first_ptr);

    first.swap(&mut second);
    assert_eq!(first.type_identity(), TypeIdentity::of_raw::<u8>());
    assert_eq!(first.as_ptr(), first_ptr);
    assert_eq!(second.type_identity(), TypeIdentity::of_raw::<i64>());
    assert_eq!(second.as_ptr(), second_ptr);
}

#[test]
fn test_reset_empties() {
    let mut value = 'x';
    let mut erased = ErasedPtr::from_mut(&mut value);
    erased.reset();
    assert!(!erased.has_value());
    assert!(erased.as_ptr().is_null());
}
