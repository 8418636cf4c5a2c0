// src/counter.rs

// per-key counter types and width selection

// dependencies
use std::fmt;
use std::hash::Hash;

/// Largest limit an 8-bit counter can hold.
pub const U8_MAX: u64 = u8::MAX as u64;
/// Largest limit a 16-bit counter can hold.
pub const U16_MAX: u64 = u16::MAX as u64;
/// Largest limit a 32-bit counter can hold.
pub const U32_MAX: u64 = u32::MAX as u64;

mod private {
    pub trait Sealed {}
}

/// Unsigned integer type used to store per-key event counts.
///
/// Implemented for `u8`, `u16`, `u32` and `u64`. Each tracked key costs one
/// counter per window, so a narrow type keeps large key sets small.
pub trait Counter:
    private::Sealed + Copy + Default + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Width tag for this counter type.
    const WIDTH: CounterWidth;

    fn as_u64(self) -> u64;

    /// Convert, clamping values that do not fit to the type's maximum.
    fn saturating_from_u64(value: u64) -> Self;

    fn as_f64(self) -> f64 {
        self.as_u64() as f64
    }

    fn is_zero(self) -> bool {
        self.as_u64() == 0
    }
}

macro_rules! impl_counter {
    ($($ty:ty => $width:ident),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl Counter for $ty {
                const WIDTH: CounterWidth = CounterWidth::$width;

                fn as_u64(self) -> u64 {
                    self as u64
                }

                fn saturating_from_u64(value: u64) -> Self {
                    <$ty>::try_from(value).unwrap_or(<$ty>::MAX)
                }
            }
        )*
    };
}

impl_counter!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);

/// Counter width chosen for a limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CounterWidth {
    U8,
    U16,
    U32,
    U64,
}

impl CounterWidth {
    /// The narrowest width whose maximum value is at least `limit`.
    pub fn for_limit(limit: u64) -> Self {
        if limit <= U8_MAX {
            CounterWidth::U8
        } else if limit <= U16_MAX {
            CounterWidth::U16
        } else if limit <= U32_MAX {
            CounterWidth::U32
        } else {
            CounterWidth::U64
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            CounterWidth::U8 => 8,
            CounterWidth::U16 => 16,
            CounterWidth::U32 => 32,
            CounterWidth::U64 => 64,
        }
    }

    /// Largest count representable at this width.
    pub fn max_value(self) -> u64 {
        match self {
            CounterWidth::U8 => U8_MAX,
            CounterWidth::U16 => U16_MAX,
            CounterWidth::U32 => U32_MAX,
            CounterWidth::U64 => u64::MAX,
        }
    }
}

impl fmt::Display for CounterWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.bits())
    }
}
