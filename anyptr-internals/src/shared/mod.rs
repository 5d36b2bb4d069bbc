//! Module containing the type-erased, aliasing shared handle

mod raw;
mod vtable;

pub use self::raw::RawShared;
