// Copyright 2024 The MMR Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integer types usable as mountain range coordinates.

use std::fmt;
use std::hash::Hash;

use num_bigint::BigUint;
use num_traits::{CheckedAdd, CheckedSub, One, ToPrimitive, Zero};

use crate::ser;

/// Numeric type backing a coordinate. Implemented for `u32`, `u64`, `i32`,
/// `i64` and the arbitrary precision `BigUint`. Only non-negative values are
/// meaningful coordinates, signed types simply halve the usable range.
pub trait IndexValue:
	Clone
	+ Ord
	+ Hash
	+ fmt::Debug
	+ fmt::Display
	+ Send
	+ Sync
	+ Zero
	+ One
	+ CheckedAdd
	+ CheckedSub
	+ 'static
{
	/// Whether the type is signed, which selects the zig-zag varint encoding.
	const SIGNED: bool;

	/// Number of trailing zero bits, 0 for 0.
	fn height(&self) -> u32;

	/// `2^exp`, or None if the type can't represent it as a positive value.
	fn pow2(exp: u32) -> Option<Self>;

	/// Bitwise and.
	fn bit_and(&self, other: &Self) -> Self;

	/// Bitwise xor.
	fn bit_xor(&self, other: &Self) -> Self;

	/// Conversion from a native integer, None if it doesn't fit.
	fn from_u64(v: u64) -> Option<Self>;

	/// Conversion to a native integer, None if it doesn't fit.
	fn to_u64(&self) -> Option<u64>;

	/// Appends the LEB128 (zig-zag LEB128 for signed types) encoding.
	fn write_varint(&self, buf: &mut Vec<u8>);

	/// Reads a value written by `write_varint`.
	fn read_varint(reader: &mut &[u8]) -> Result<Self, ser::Error>;

	/// Lowest bit set.
	fn is_odd(&self) -> bool {
		!self.bit_and(&Self::one()).is_zero()
	}
}

macro_rules! impl_unsigned_index {
	($t:ty) => {
		impl IndexValue for $t {
			const SIGNED: bool = false;

			fn height(&self) -> u32 {
				if *self == 0 {
					0
				} else {
					self.trailing_zeros()
				}
			}

			fn pow2(exp: u32) -> Option<Self> {
				if exp < <$t>::BITS {
					Some(1 << exp)
				} else {
					None
				}
			}

			fn bit_and(&self, other: &Self) -> Self {
				*self & *other
			}

			fn bit_xor(&self, other: &Self) -> Self {
				*self ^ *other
			}

			fn from_u64(v: u64) -> Option<Self> {
				std::convert::TryFrom::try_from(v).ok()
			}

			fn to_u64(&self) -> Option<u64> {
				Some(*self as u64)
			}

			fn write_varint(&self, buf: &mut Vec<u8>) {
				ser::write_uvarint(buf, *self as u64)
			}

			fn read_varint(reader: &mut &[u8]) -> Result<Self, ser::Error> {
				let v = ser::read_uvarint(reader)?;
				std::convert::TryFrom::try_from(v).map_err(|_| ser::Error::Overflow)
			}
		}
	};
}

macro_rules! impl_signed_index {
	($t:ty) => {
		impl IndexValue for $t {
			const SIGNED: bool = true;

			fn height(&self) -> u32 {
				if *self == 0 {
					0
				} else {
					self.trailing_zeros()
				}
			}

			fn pow2(exp: u32) -> Option<Self> {
				// the sign bit is not a usable power of two
				if exp < <$t>::BITS - 1 {
					Some(1 << exp)
				} else {
					None
				}
			}

			fn bit_and(&self, other: &Self) -> Self {
				*self & *other
			}

			fn bit_xor(&self, other: &Self) -> Self {
				*self ^ *other
			}

			fn from_u64(v: u64) -> Option<Self> {
				std::convert::TryFrom::try_from(v).ok()
			}

			fn to_u64(&self) -> Option<u64> {
				std::convert::TryFrom::try_from(*self).ok()
			}

			fn write_varint(&self, buf: &mut Vec<u8>) {
				ser::write_varint(buf, *self as i64)
			}

			fn read_varint(reader: &mut &[u8]) -> Result<Self, ser::Error> {
				let v = ser::read_varint(reader)?;
				std::convert::TryFrom::try_from(v).map_err(|_| ser::Error::Overflow)
			}
		}
	};
}

impl_unsigned_index!(u32);
impl_unsigned_index!(u64);
impl_signed_index!(i32);
impl_signed_index!(i64);

impl IndexValue for BigUint {
	const SIGNED: bool = false;

	fn height(&self) -> u32 {
		self.trailing_zeros().unwrap_or(0) as u32
	}

	fn pow2(exp: u32) -> Option<Self> {
		Some(<BigUint as One>::one() << exp)
	}

	fn bit_and(&self, other: &Self) -> Self {
		self & other
	}

	fn bit_xor(&self, other: &Self) -> Self {
		self ^ other
	}

	fn from_u64(v: u64) -> Option<Self> {
		Some(BigUint::from(v))
	}

	fn to_u64(&self) -> Option<u64> {
		ToPrimitive::to_u64(self)
	}

	fn write_varint(&self, buf: &mut Vec<u8>) {
		let digits = self.to_radix_le(128);
		if digits.is_empty() {
			buf.push(0);
			return;
		}
		let last = digits.len() - 1;
		for (i, d) in digits.iter().enumerate() {
			if i < last {
				buf.push(d | 0x80);
			} else {
				buf.push(*d);
			}
		}
	}

	fn read_varint(reader: &mut &[u8]) -> Result<Self, ser::Error> {
		let mut digits = vec![];
		loop {
			let b = ser::read_u8(reader)?;
			digits.push(b & 0x7f);
			if b & 0x80 == 0 {
				break;
			}
		}
		BigUint::from_radix_le(&digits, 128)
			.ok_or_else(|| ser::Error::CorruptedData("invalid base 128 digits".to_owned()))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn varint_bytes<I: IndexValue>(v: &I) -> Vec<u8> {
		let mut buf = vec![];
		v.write_varint(&mut buf);
		buf
	}

	#[test]
	fn heights() {
		assert_eq!(0u32.height(), 0);
		assert_eq!(1u64.height(), 0);
		assert_eq!(4i32.height(), 2);
		assert_eq!(12i64.height(), 2);
		assert_eq!(BigUint::from(0u32).height(), 0);
		assert_eq!((BigUint::from(1u32) << 100u32).height(), 100);
	}

	#[test]
	fn pow2_limits() {
		assert_eq!(u32::pow2(31), Some(1 << 31));
		assert_eq!(u32::pow2(32), None);
		assert_eq!(i32::pow2(30), Some(1 << 30));
		assert_eq!(i32::pow2(31), None);
		assert_eq!(i64::pow2(63), None);
		assert!(BigUint::pow2(200).is_some());
	}

	#[test]
	fn varints_match_across_widths() {
		// unsigned widths and BigUint share the plain LEB128 layout
		assert_eq!(varint_bytes(&300u32), vec![0xac, 0x02]);
		assert_eq!(varint_bytes(&300u64), vec![0xac, 0x02]);
		assert_eq!(varint_bytes(&BigUint::from(300u32)), vec![0xac, 0x02]);
		assert_eq!(varint_bytes(&BigUint::from(0u32)), vec![0]);
		// signed widths are zig-zagged first
		assert_eq!(varint_bytes(&150i32), vec![0xac, 0x02]);
		assert_eq!(varint_bytes(&-1i64), vec![0x01]);
	}

	#[test]
	fn varint_reads_back() {
		let big = BigUint::from(u64::MAX) * BigUint::from(u64::MAX);
		let buf = varint_bytes(&big);
		assert_eq!(BigUint::read_varint(&mut &buf[..]).unwrap(), big);

		let buf = varint_bytes(&u64::MAX);
		assert_eq!(u32::read_varint(&mut &buf[..]), Err(ser::Error::Overflow));
		assert_eq!(u64::read_varint(&mut &buf[..]), Ok(u64::MAX));
	}
}
