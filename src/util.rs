//! Internal helpers for reporting rejected casts.

use crate::TypeIdentity;

/// Reports a rejected conversion to the `tracing` subscriber.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_rejected(stored: TypeIdentity, requested: TypeIdentity) {
    tracing::trace!(
        target: "anyptr",
        stored = %stored,
        requested = %requested,
        "rejected erased pointer cast"
    );
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub(crate) fn trace_rejected(_stored: TypeIdentity, _requested: TypeIdentity) {}
