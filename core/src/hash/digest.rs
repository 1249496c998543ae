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

//! Digest values. A digest is an opaque byte value with a canonical byte
//! form, used both when hashing a node and when persisting it.

use std::fmt;
use std::hash::Hash;

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ser::{self, Error};
use crate::util::{from_hex, to_hex};

/// A hash output stored in the mountain range.
pub trait Digest: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {
	/// Width in bytes of every value of this type, None if it varies.
	const WIDTH: Option<usize>;

	/// Canonical byte form.
	fn to_bytes(&self) -> Vec<u8>;

	/// Parses the canonical byte form, failing with a type mismatch when
	/// the width is wrong for this type.
	fn from_bytes(bytes: &[u8]) -> Result<Self, Error>;
}

fn check_width(expected: usize, bytes: &[u8]) -> Result<(), Error> {
	if bytes.len() != expected {
		return Err(Error::TypeMismatch(format!(
			"expected a {} byte digest, got {} bytes",
			expected,
			bytes.len()
		)));
	}
	Ok(())
}

macro_rules! fixed_hash {
	($(#[$attr:meta])* $name:ident, $len:expr) => {
		$(#[$attr])*
		#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		pub struct $name(pub [u8; $len]);

		impl $name {
			/// Size of this hash in bytes
			pub const LEN: usize = $len;

			/// Builds a hash out of the provided bytes, zero padded or
			/// truncated to the expected length.
			pub fn from_slice(v: &[u8]) -> $name {
				let mut h = [0; $len];
				let copy_size = std::cmp::min(v.len(), $len);
				h[..copy_size].copy_from_slice(&v[..copy_size]);
				$name(h)
			}

			/// Converts the hash to a byte vector
			pub fn to_vec(&self) -> Vec<u8> {
				self.0.to_vec()
			}

			/// Returns a byte slice of the hash contents
			pub fn as_bytes(&self) -> &[u8] {
				&self.0
			}

			/// Convert hex string back to hash.
			pub fn from_hex(hex: &str) -> Result<$name, Error> {
				let bytes = from_hex(hex).map_err(Error::CorruptedData)?;
				<$name as Digest>::from_bytes(&bytes)
			}

			/// Lowercase hex representation
			pub fn to_hex(&self) -> String {
				to_hex(&self.0)
			}
		}

		impl Default for $name {
			fn default() -> $name {
				$name([0; $len])
			}
		}

		impl fmt::Debug for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				let hash_hex = self.to_hex();
				const NUM_SHOW: usize = 12;
				write!(f, "{}", &hash_hex[..NUM_SHOW])
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.to_hex())
			}
		}

		impl AsRef<[u8]> for $name {
			fn as_ref(&self) -> &[u8] {
				&self.0
			}
		}

		impl Digest for $name {
			const WIDTH: Option<usize> = Some($len);

			fn to_bytes(&self) -> Vec<u8> {
				self.0.to_vec()
			}

			fn from_bytes(bytes: &[u8]) -> Result<$name, Error> {
				check_width($len, bytes)?;
				Ok($name::from_slice(bytes))
			}
		}

		impl Serialize for $name {
			fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				serializer.serialize_str(&self.to_hex())
			}
		}

		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<$name, D::Error> {
				let s = String::deserialize(deserializer)?;
				$name::from_hex(&s).map_err(serde::de::Error::custom)
			}
		}
	};
}

fixed_hash!(
	/// 128 bit digest
	Hash128,
	16
);
fixed_hash!(
	/// 160 bit digest, as produced by RIPEMD-160
	Hash160,
	20
);
fixed_hash!(
	/// 224 bit digest
	Hash224,
	28
);
fixed_hash!(
	/// 256 bit digest, the most common output width
	Hash256,
	32
);
fixed_hash!(
	/// 384 bit digest
	Hash384,
	48
);
fixed_hash!(
	/// 512 bit digest
	Hash512,
	64
);

// Integers are digests too, in big-endian form, which makes for readable
// tests and cheap combinators.
macro_rules! int_digest {
	($t:ty, $len:expr, $read:ident, $write:ident) => {
		impl Digest for $t {
			const WIDTH: Option<usize> = Some($len);

			fn to_bytes(&self) -> Vec<u8> {
				let mut bytes = [0; $len];
				BigEndian::$write(&mut bytes, *self);
				bytes.to_vec()
			}

			fn from_bytes(bytes: &[u8]) -> Result<$t, Error> {
				check_width($len, bytes)?;
				Ok(BigEndian::$read(bytes))
			}
		}
	};
}

int_digest!(u16, 2, read_u16, write_u16);
int_digest!(u32, 4, read_u32, write_u32);
int_digest!(u64, 8, read_u64, write_u64);
int_digest!(i16, 2, read_i16, write_i16);
int_digest!(i32, 4, read_i32, write_i32);
int_digest!(i64, 8, read_i64, write_i64);

impl Digest for String {
	const WIDTH: Option<usize> = None;

	fn to_bytes(&self) -> Vec<u8> {
		self.as_bytes().to_vec()
	}

	fn from_bytes(bytes: &[u8]) -> Result<String, Error> {
		String::from_utf8(bytes.to_vec())
			.map_err(|e| ser::Error::CorruptedData(format!("invalid utf8 digest: {}", e)))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn fixed_width_checked() {
		let h = Hash256::from_slice(&[7; 32]);
		assert_eq!(Hash256::from_bytes(&h.to_bytes()), Ok(h));
		match Hash256::from_bytes(&[7; 31]) {
			Err(Error::TypeMismatch(_)) => {}
			other => panic!("unexpected {:?}", other),
		}
		assert!(Hash160::from_bytes(&[0; 32]).is_err());
	}

	#[test]
	fn hex_display() {
		let mut bytes = [0u8; 16];
		bytes[0] = 0xab;
		bytes[15] = 0x01;
		let h = Hash128(bytes);
		assert_eq!(h.to_string(), "ab000000000000000000000000000001");
		assert_eq!(format!("{:?}", h), "ab0000000000");
		assert_eq!(Hash128::from_hex(&h.to_hex()), Ok(h));
	}

	#[test]
	fn integer_digests_are_big_endian() {
		assert_eq!(0x0102u16.to_bytes(), vec![1, 2]);
		assert_eq!((-2i32).to_bytes(), vec![0xff, 0xff, 0xff, 0xfe]);
		assert_eq!(u64::from_bytes(&[0, 0, 0, 0, 0, 0, 1, 0]), Ok(256));
		assert!(u32::from_bytes(&[1, 2]).is_err());
	}

	#[test]
	fn string_digest() {
		let s = "peak".to_owned();
		assert_eq!(String::from_bytes(&s.to_bytes()), Ok(s));
		assert!(String::from_bytes(&[0xff, 0xfe]).is_err());
	}

	#[test]
	fn hash_serde_as_hex() {
		let h = Hash160::from_slice(&[1; 20]);
		let json = serde_json::to_string(&h).unwrap();
		assert_eq!(json, format!("\"{}\"", "01".repeat(20)));
		let back: Hash160 = serde_json::from_str(&json).unwrap();
		assert_eq!(back, h);
	}
}
