//! Internal utility types.

/// Marker type used when type-erasing pointers.
///
/// This zero-sized type serves as a placeholder pointee when the actual
/// concrete type has been erased. For example, `NonNull<Erased>` is a pointer
/// to an object whose type is unknown at the current scope.
///
/// Using a distinct marker type (rather than `()`) makes the intent clearer
/// in type signatures and error messages.
pub(crate) struct Erased;
