//! Per-type conversion probes.

mod raw;
mod vtable;

pub use self::raw::{CastTarget, Probe};
