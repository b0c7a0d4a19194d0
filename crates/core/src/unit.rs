//! Code units, byte order and unit sinks.
//!
//! A code unit is the fixed-width storage element of an encoded sequence:
//! `u8`, `u16` or `u32`. Codecs that read or write multi-byte units from a
//! byte stream do so through [`CodeUnit::read_bytes`] and
//! [`CodeUnit::write_bytes`] in an explicit [`ByteOrder`].

use smallvec::SmallVec;
use std::fmt;
use std::hash::Hash;

/// Byte order of a multi-byte unit in a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}

impl ByteOrder {
    /// Byte order of the host.
    pub const NATIVE: ByteOrder = if cfg!(target_endian = "big") {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };

    pub fn swapped(self) -> ByteOrder {
        match self {
            ByteOrder::Big => ByteOrder::Little,
            ByteOrder::Little => ByteOrder::Big,
        }
    }
}

/// Type-level byte order, used to parameterize fixed-width codecs.
pub trait Endian {
    const ORDER: ByteOrder;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BigEndian;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LittleEndian;

/// Host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NativeEndian;

impl Endian for BigEndian {
    const ORDER: ByteOrder = ByteOrder::Big;
}

impl Endian for LittleEndian {
    const ORDER: ByteOrder = ByteOrder::Little;
}

impl Endian for NativeEndian {
    const ORDER: ByteOrder = ByteOrder::NATIVE;
}

/// Destination for encoded code units.
pub trait UnitSink<U> {
    fn put(&mut self, unit: U);
}

impl<U> UnitSink<U> for Vec<U> {
    fn put(&mut self, unit: U) {
        self.push(unit);
    }
}

impl<A: smallvec::Array> UnitSink<A::Item> for SmallVec<A> {
    fn put(&mut self, unit: A::Item) {
        self.push(unit);
    }
}

impl<U, S: UnitSink<U> + ?Sized> UnitSink<U> for &mut S {
    fn put(&mut self, unit: U) {
        (**self).put(unit);
    }
}

/// Fixed-width unsigned storage element.
pub trait CodeUnit: Copy + Default + Eq + Hash + fmt::Debug + 'static {
    /// Width in bytes
    const BYTES: usize;

    /// Largest value, widened
    const MAX: u32;

    /// Value substituted when a unit of this type cannot be decoded
    const REPLACEMENT: Self;

    fn to_u32(self) -> u32;

    /// Narrow a value; `None` when it does not fit.
    fn from_u32(value: u32) -> Option<Self>;

    /// Assemble a unit from exactly `Self::BYTES` bytes.
    fn read_bytes(order: ByteOrder, bytes: &[u8]) -> Self;

    /// Emit the `Self::BYTES` bytes of this unit.
    fn write_bytes<S: UnitSink<u8> + ?Sized>(self, order: ByteOrder, out: &mut S);
}

macro_rules! impl_code_unit {
    ($t:ty, $replacement:expr) => {
        impl CodeUnit for $t {
            const BYTES: usize = std::mem::size_of::<$t>();
            const MAX: u32 = <$t>::MAX as u32;
            const REPLACEMENT: Self = $replacement;

            #[inline]
            fn to_u32(self) -> u32 {
                self as u32
            }

            #[inline]
            fn from_u32(value: u32) -> Option<Self> {
                <$t>::try_from(value).ok()
            }

            #[inline]
            fn read_bytes(order: ByteOrder, bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(&bytes[..Self::BYTES]);
                match order {
                    ByteOrder::Big => <$t>::from_be_bytes(buf),
                    ByteOrder::Little => <$t>::from_le_bytes(buf),
                }
            }

            #[inline]
            fn write_bytes<S: UnitSink<u8> + ?Sized>(self, order: ByteOrder, out: &mut S) {
                let bytes = match order {
                    ByteOrder::Big => self.to_be_bytes(),
                    ByteOrder::Little => self.to_le_bytes(),
                };
                for b in bytes {
                    out.put(b);
                }
            }
        }
    };
}

impl_code_unit!(u8, 0x3F);
impl_code_unit!(u16, 0xFFFD);
impl_code_unit!(u32, 0xFFFD);
