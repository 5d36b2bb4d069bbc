//! The `const`/`volatile` qualifier set attached to an erased pointee.

/// A set of pointee qualifiers.
///
/// A pointer may always gain qualifiers when it is converted, but it may never
/// lose one. [`Qualifiers::contains`] is the check used for that rule: a
/// conversion from `from` to `to` is allowed iff `to.contains(from)`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Qualifiers {
    /// Bit set made of [`Qualifiers::CONST_BIT`] and
    /// [`Qualifiers::VOLATILE_BIT`]
    bits: u8,
}

impl Qualifiers {
    /// Bit used for the `const` qualifier.
    const CONST_BIT: u8 = 0b01;
    /// Bit used for the `volatile` qualifier.
    const VOLATILE_BIT: u8 = 0b10;

    /// No qualifiers.
    pub const NONE: Self = Self { bits: 0 };
    /// Only `const`.
    pub const CONST: Self = Self {
        bits: Self::CONST_BIT,
    };
    /// Only `volatile`.
    pub const VOLATILE: Self = Self {
        bits: Self::VOLATILE_BIT,
    };
    /// Both `const` and `volatile`.
    pub const CONST_VOLATILE: Self = Self {
        bits: Self::CONST_BIT | Self::VOLATILE_BIT,
    };

    /// Returns `true` if the `const` qualifier is present.
    #[inline]
    pub const fn is_const(self) -> bool {
        self.bits & Self::CONST_BIT != 0
    }

    /// Returns `true` if the `volatile` qualifier is present.
    #[inline]
    pub const fn is_volatile(self) -> bool {
        self.bits & Self::VOLATILE_BIT != 0
    }

    /// Returns `true` if every qualifier in `other` is also in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    /// The C-like spelling of the qualifiers, including a trailing space when
    /// non-empty.
    pub const fn prefix(self) -> &'static str {
        match (self.is_const(), self.is_volatile()) {
            (false, false) => "",
            (true, false) => "const ",
            (false, true) => "volatile ",
            (true, true) => "const volatile ",
        }
    }
}

impl core::fmt::Debug for Qualifiers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match (self.is_const(), self.is_volatile()) {
            (false, false) => f.write_str("NONE"),
            (true, false) => f.write_str("CONST"),
            (false, true) => f.write_str("VOLATILE"),
            (true, true) => f.write_str("CONST_VOLATILE"),
        }
    }
}
