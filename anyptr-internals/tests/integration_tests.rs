//! Integration tests for the anyptr-internals crate.
//!
//! The tests are grouped by module:
//!
//! ## Hierarchy Tests
//! - `test_locate_base_through_many_levels`: Offsets of a chain of bases add
//!   up
//! - `test_locate_base_ambiguity`: A base reachable twice is ambiguous, while
//!   the intermediate bases are not
//!
//! ## Probe Tests
//! - `test_probe_identity_and_void`: Same-type and `c_void` targets keep the
//!   address
//! - `test_probe_base_adjusts_address`: Base targets get the address of the
//!   base sub-object
//! - `test_probe_qualifier_matrix`: Qualifiers can be added but never removed
//! - `test_probe_rejects_unrelated_and_downcasts`: Unrelated types and derived
//!   types are rejected
//! - `test_probe_null_stays_null`: A null address converts to null
//!
//! ## Shared Tests
//! - `test_raw_shared_alias_keeps_owner_alive`: An alias of a sub-object keeps
//!   the complete object alive and drops it exactly once
//! - `test_raw_shared_owner_metadata`: Type information of the owner survives
//!   erasure

use std::{
    any::TypeId,
    ffi::c_void,
    ptr::NonNull,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyptr_internals::{
    BaseEntry, BaseLookup, CastTarget, Pointee, Probe, Qualifiers, RawShared, Upcast,
    hierarchy::locate_base,
};

#[repr(C)]
#[derive(Debug, PartialEq)]
struct Id {
    value: u32,
}

#[repr(C)]
struct Entity {
    flags: u16,
    id: Id,
}

#[repr(C)]
struct Player {
    score: u64,
    entity: Entity,
}

#[repr(C)]
struct Twin {
    first: Entity,
    second: Entity,
}

// SAFETY: no bases
unsafe impl Upcast for Id {
    const BASES: &'static [BaseEntry] = &[];
}

// SAFETY: the offsets come from `offset_of!` on fields of the given types
unsafe impl Upcast for Entity {
    const BASES: &'static [BaseEntry] =
        &[unsafe { BaseEntry::new::<Id>(std::mem::offset_of!(Entity, id)) }];
}

// SAFETY: the offsets come from `offset_of!` on fields of the given types
unsafe impl Upcast for Player {
    const BASES: &'static [BaseEntry] =
        &[unsafe { BaseEntry::new::<Entity>(std::mem::offset_of!(Player, entity)) }];
}

// SAFETY: the offsets come from `offset_of!` on fields of the given types
unsafe impl Upcast for Twin {
    const BASES: &'static [BaseEntry] = &[
        unsafe { BaseEntry::new::<Entity>(std::mem::offset_of!(Twin, first)) },
        unsafe { BaseEntry::new::<Entity>(std::mem::offset_of!(Twin, second)) },
    ];
}

macro_rules! unqualified {
    ($($ty:ty),*) => {
        $(
            // SAFETY: `Unqualified` is `Self`.
            unsafe impl Pointee for $ty {
                type Unqualified = Self;
                const QUALIFIERS: Qualifiers = Qualifiers::NONE;
            }
        )*
    };
}

unqualified!(Id, Entity, Player, Twin);

/// A read-only view of a `T`.
#[repr(transparent)]
struct ReadOnly<T>(T);

// SAFETY: `ReadOnly<T>` is `#[repr(transparent)]` over `T`.
unsafe impl<T: Upcast> Pointee for ReadOnly<T> {
    type Unqualified = T;
    const QUALIFIERS: Qualifiers = Qualifiers::CONST;
}

/// A view of a `T` whose accesses must not be elided.
#[repr(transparent)]
struct Touchy<T>(T);

// SAFETY: `Touchy<T>` is `#[repr(transparent)]` over `T`.
unsafe impl<T: Upcast> Pointee for Touchy<T> {
    type Unqualified = T;
    const QUALIFIERS: Qualifiers = Qualifiers::VOLATILE;
}

/// A read-only view of a `T` whose accesses must not be elided.
#[repr(transparent)]
struct ReadOnlyTouchy<T>(T);

// SAFETY: `ReadOnlyTouchy<T>` is `#[repr(transparent)]` over `T`.
unsafe impl<T: Upcast> Pointee for ReadOnlyTouchy<T> {
    type Unqualified = T;
    const QUALIFIERS: Qualifiers = Qualifiers::CONST_VOLATILE;
}

fn player() -> Player {
    Player {
        score: 10,
        entity: Entity {
            flags: 3,
            id: Id { value: 77 },
        },
    }
}

#[test]
fn test_locate_base_through_many_levels() {
    let expected = std::mem::offset_of!(Player, entity) + std::mem::offset_of!(Entity, id);
    assert_eq!(
        locate_base(Player::BASES, TypeId::of::<Id>()),
        BaseLookup::Unique(expected)
    );
    assert_eq!(
        locate_base(Player::BASES, TypeId::of::<Entity>()),
        BaseLookup::Unique(std::mem::offset_of!(Player, entity))
    );
    assert_eq!(
        locate_base(Player::BASES, TypeId::of::<Twin>()),
        BaseLookup::Missing
    );
}

#[test]
fn test_locate_base_ambiguity() {
    assert_eq!(
        locate_base(Twin::BASES, TypeId::of::<Entity>()),
        BaseLookup::Ambiguous
    );
    assert_eq!(
        locate_base(Twin::BASES, TypeId::of::<Id>()),
        BaseLookup::Ambiguous
    );
}

#[test]
fn test_probe_identity_and_void() {
    let mut player = player();
    let addr = (&raw mut player).cast::<()>();
    let probe = Probe::of::<Player>();

    assert_eq!(probe.upcast(addr, CastTarget::of::<Player>()), Some(addr));
    assert_eq!(probe.upcast(addr, CastTarget::of::<c_void>()), Some(addr));
    assert_eq!(probe.pointee_type_id(), TypeId::of::<Player>());
    assert_eq!(probe.qualifiers(), Qualifiers::NONE);
}

#[test]
fn test_probe_base_adjusts_address() {
    let mut player = player();
    let addr = (&raw mut player).cast::<()>();
    let probe = Probe::of::<Player>();

    let id = probe
        .upcast(addr, CastTarget::of::<Id>())
        .map(<*mut ()>::cast::<Id>);
    assert_eq!(id, Some(&raw mut player.entity.id));
    // SAFETY: The probe located the `Id` inside `player`, which is alive.
    assert_eq!(id.map(|id| unsafe { &*id }), Some(&Id { value: 77 }));

    let entity = probe
        .upcast(addr, CastTarget::of::<ReadOnly<Entity>>())
        .map(<*mut ()>::cast::<Entity>);
    assert_eq!(entity, Some(&raw mut player.entity));
}

#[test]
fn test_probe_qualifier_matrix() {
    fn converts<From: Pointee, To: Pointee>() -> bool {
        let mut id = Id { value: 1 };
        let addr = (&raw mut id).cast::<()>();
        Probe::of::<From>()
            .upcast(addr, CastTarget::of::<To>())
            .is_some()
    }

    assert!(converts::<Id, Id>());
    assert!(converts::<Id, ReadOnly<Id>>());
    assert!(converts::<Id, Touchy<Id>>());
    assert!(converts::<Id, ReadOnlyTouchy<Id>>());

    assert!(!converts::<ReadOnly<Id>, Id>());
    assert!(converts::<ReadOnly<Id>, ReadOnly<Id>>());
    assert!(!converts::<ReadOnly<Id>, Touchy<Id>>());
    assert!(converts::<ReadOnly<Id>, ReadOnlyTouchy<Id>>());

    assert!(!converts::<Touchy<Id>, Id>());
    assert!(!converts::<Touchy<Id>, ReadOnly<Id>>());
    assert!(converts::<Touchy<Id>, Touchy<Id>>());
    assert!(converts::<Touchy<Id>, ReadOnlyTouchy<Id>>());

    assert!(!converts::<ReadOnlyTouchy<Id>, Id>());
    assert!(!converts::<ReadOnlyTouchy<Id>, ReadOnly<Id>>());
    assert!(!converts::<ReadOnlyTouchy<Id>, Touchy<Id>>());
    assert!(converts::<ReadOnlyTouchy<Id>, ReadOnlyTouchy<Id>>());

    assert!(!converts::<ReadOnly<Id>, c_void>());
    assert!(converts::<ReadOnly<Id>, ReadOnly<c_void>>());
}

#[test]
fn test_probe_rejects_unrelated_and_downcasts() {
    let mut player = player();
    let entity = (&raw mut player.entity).cast::<()>();
    let probe = Probe::of::<Entity>();

    assert!(probe.upcast(entity, CastTarget::of::<Player>()).is_none());
    assert!(probe.upcast(entity, CastTarget::of::<Twin>()).is_none());
    assert!(probe.upcast(entity, CastTarget::of::<u32>()).is_none());
}

#[test]
fn test_probe_null_stays_null() {
    let probe = Probe::of::<Player>();
    assert_eq!(
        probe.upcast(std::ptr::null_mut(), CastTarget::of::<Id>()),
        Some(std::ptr::null_mut())
    );
}

#[test]
fn test_raw_shared_alias_keeps_owner_alive() {
    struct Tracked {
        player: Player,
        drops: Arc<AtomicUsize>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    let drops = Arc::new(AtomicUsize::new(0));
    let owner = RawShared::new(Tracked {
        player: player(),
        drops: drops.clone(),
    });

    // SAFETY: The owner is a live `Tracked`.
    let tracked = unsafe { owner.as_ptr().cast::<Tracked>().as_ref() };
    let id_addr = NonNull::from(&tracked.player.entity.id).cast::<()>();
    // SAFETY: The address points inside the owned object.
    let alias = unsafe { owner.alias(id_addr) };

    assert_eq!(owner.strong_count(), 2);
    assert!(owner.same_owner(&alias));
    drop(owner);

    assert_eq!(alias.strong_count(), 1);
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    // SAFETY: The alias keeps the owner, and so the `Id`, alive.
    assert_eq!(unsafe { alias.as_ptr().cast::<Id>().as_ref() }.value, 77);

    drop(alias);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_raw_shared_owner_metadata() {
    let owner = RawShared::new(player());
    assert_eq!(owner.owner_type_id(), TypeId::of::<Player>());
    assert!(owner.owner_type_name().ends_with("Player"));
    assert_eq!(owner.owner_ptr(), owner.as_ptr());

    let clone = owner.clone();
    assert!(clone.same_owner(&owner));
    assert!(!RawShared::new(player()).same_owner(&owner));
}
