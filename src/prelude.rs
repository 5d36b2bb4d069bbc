//! Commonly used items for convenient importing.
//!
//! ```
//! use anyptr::prelude::*;
//!
//! let erased: SharedBox = make_shared_box(5_u64);
//! let value: Shared<Const<u64>> = erased.cast_shared()?;
//! assert_eq!(**value, 5);
//! # Ok::<(), BadCast>(())
//! ```

pub use crate::{
    BadCast, Const, ConstVolatile, ErasedPtr, InlineSharedBox, Shared, SharedBox, SharedCast,
    TypeIdentity, Volatile, bases, cast, cast_shared, make_inline_shared_box, make_shared_box,
    make_shared_box_default, markers, try_cast, try_cast_shared,
};
