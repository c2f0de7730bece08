//! Byte-order conversion for fixed-width unsigned integers.
//!
//! Multi-byte register values travel over the bus in the order the chip defines,
//! which need not match the host. [`reorder`] bridges the two. The source and
//! target orders are type parameters, so whether any bytes move at all is decided
//! when the crate is compiled for a given target, never by inspecting data at
//! runtime.
//!
//! ```
//! use ina260::bytes::{reorder, BigEndian, Native};
//!
//! let wire = reorder::<BigEndian, Native, u16>(0x1234);
//! assert_eq!(wire.to_ne_bytes(), [0x12, 0x34]);
//! assert_eq!(reorder::<Native, BigEndian, u16>(wire), 0x1234);
//! ```

/// Position of the most-significant byte in a multi-byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most-significant byte first (big-endian, network order).
    MsFirst,
    /// Least-significant byte first (little-endian).
    LsFirst,
}

impl ByteOrder {
    /// Big-endian.
    pub const BIG_ENDIAN: Self = Self::MsFirst;
    /// Little-endian.
    pub const LITTLE_ENDIAN: Self = Self::LsFirst;
    /// Network byte order.
    pub const NETWORK: Self = Self::MsFirst;
    /// Byte order of the compilation target.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = Self::MsFirst;
    /// Byte order of the compilation target.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = Self::LsFirst;
    /// Byte order of the host. Same as [`ByteOrder::NATIVE`].
    pub const HOST: Self = Self::NATIVE;
    /// The opposite of the compilation target's byte order.
    pub const REVERSE: Self = Self::NATIVE.opposite();

    /// The other byte order.
    pub const fn opposite(self) -> Self {
        match self {
            Self::MsFirst => Self::LsFirst,
            Self::LsFirst => Self::MsFirst,
        }
    }

    /// Compare two orders in a `const` context.
    pub const fn is(self, other: Self) -> bool {
        self as u8 == other as u8
    }
}

/// Type-level byte order, used to parameterise [`reorder`].
pub trait Order {
    /// The byte order this marker stands for.
    const ORDER: ByteOrder;
}

/// Marker for most-significant-byte-first order.
#[derive(Debug)]
pub enum MsFirst {}

/// Marker for least-significant-byte-first order.
#[derive(Debug)]
pub enum LsFirst {}

impl Order for MsFirst {
    const ORDER: ByteOrder = ByteOrder::MsFirst;
}

impl Order for LsFirst {
    const ORDER: ByteOrder = ByteOrder::LsFirst;
}

/// Big-endian marker.
pub type BigEndian = MsFirst;
/// Little-endian marker.
pub type LittleEndian = LsFirst;
/// Network byte order marker.
pub type Network = MsFirst;

/// Byte order marker for the compilation target.
#[cfg(target_endian = "big")]
pub type Native = MsFirst;
/// Byte order marker for the compilation target.
#[cfg(target_endian = "little")]
pub type Native = LsFirst;

/// Byte order marker opposite to the compilation target.
#[cfg(target_endian = "big")]
pub type Reverse = LsFirst;
/// Byte order marker opposite to the compilation target.
#[cfg(target_endian = "little")]
pub type Reverse = MsFirst;

/// Unsigned integers whose bytes can be reversed.
///
/// For a value `N` bytes wide, the byte at position `i` (0 being least
/// significant) moves to position `N - 1 - i`. Single-byte values are unchanged.
pub trait Reorder: Copy {
    /// Width of the value in bytes.
    const WIDTH: usize;

    /// Reverse the byte order of the value.
    fn reverse_bytes(self) -> Self;
}

macro_rules! impl_reorder {
    ($($t:ty),* $(,)?) => {
        $(
            impl Reorder for $t {
                const WIDTH: usize = core::mem::size_of::<$t>();

                #[inline]
                fn reverse_bytes(self) -> Self {
                    self.swap_bytes()
                }
            }
        )*
    };
}

impl_reorder!(u8, u16, u32, u64, u128, usize);

/// Convert `value` from byte order `From` to byte order `To`.
///
/// Returns `value` unchanged when both orders are the same, and the byte-reversed
/// value otherwise. The comparison is between associated constants, so the
/// compiler resolves it and only the swap (or nothing) remains.
#[inline]
pub fn reorder<To: Order, From: Order, V: Reorder>(value: V) -> V {
    if To::ORDER.is(From::ORDER) {
        value
    } else {
        value.reverse_bytes()
    }
}
