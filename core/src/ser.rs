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

//! Binary helpers shared by the node codec, digests, positions and proofs.
//!
//! Integers are written as Variable Length Quantities, least significant
//! group first (LEB128). Signed integers go through a zig-zag mapping first
//! so small magnitudes of either sign stay short. See:
//! https://en.wikipedia.org/wiki/LEB128

use crate::hash::Digest;

const MASK: u8 = 0b0111_1111;
const HIGH_BIT: u8 = 0b1000_0000;

/// Maximum number of bytes a LEB128 encoded u64 can take
const MAX_U64_BYTES: usize = 10;

/// Errors raised when decoding binary data
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// The buffer ended before the value was complete
	#[error("unexpected end of data")]
	UnexpectedEof,
	/// Data wasn't in a consumable format
	#[error("corrupted data: {0}")]
	CorruptedData(String),
	/// A decoded value doesn't fit the target type
	#[error("overflow while decoding integer")]
	Overflow,
	/// Wrong width for the configured digest or position type
	#[error("type mismatch: {0}")]
	TypeMismatch(String),
}

/// Reads a single byte, advancing the reader.
pub fn read_u8(reader: &mut &[u8]) -> Result<u8, Error> {
	match reader.split_first() {
		Some((b, rest)) => {
			*reader = rest;
			Ok(*b)
		}
		None => Err(Error::UnexpectedEof),
	}
}

/// Reads exactly `len` bytes, advancing the reader.
pub fn read_fixed_bytes<'a>(reader: &mut &'a [u8], len: usize) -> Result<&'a [u8], Error> {
	if reader.len() < len {
		return Err(Error::UnexpectedEof);
	}
	let (bytes, rest) = reader.split_at(len);
	*reader = rest;
	Ok(bytes)
}

/// Appends the LEB128 encoding of `qty`.
pub fn write_uvarint(buf: &mut Vec<u8>, mut qty: u64) {
	loop {
		let mut b = (qty & MASK as u64) as u8;
		qty >>= 7;
		if qty > 0 {
			b |= HIGH_BIT;
		}
		buf.push(b);
		if qty == 0 {
			break;
		}
	}
}

/// Reads one LEB128 encoded u64.
pub fn read_uvarint(reader: &mut &[u8]) -> Result<u64, Error> {
	let mut qty: u64 = 0;
	for n in 0..MAX_U64_BYTES {
		let b = read_u8(reader)?;
		let group = (b & MASK) as u64;
		// the tenth byte only has room for the top bit
		if n == MAX_U64_BYTES - 1 && group > 1 {
			return Err(Error::Overflow);
		}
		qty |= group << (n * 7);
		if b & HIGH_BIT == 0 {
			return Ok(qty);
		}
	}
	Err(Error::Overflow)
}

/// Maps a signed integer onto an unsigned one, interleaving signs.
pub fn zigzag_encode(n: i64) -> u64 {
	((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of `zigzag_encode`.
pub fn zigzag_decode(n: u64) -> i64 {
	((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// Appends the zig-zag LEB128 encoding of `n`.
pub fn write_varint(buf: &mut Vec<u8>, n: i64) {
	write_uvarint(buf, zigzag_encode(n))
}

/// Reads one zig-zag LEB128 encoded i64.
pub fn read_varint(reader: &mut &[u8]) -> Result<i64, Error> {
	read_uvarint(reader).map(zigzag_decode)
}

/// Appends a LEB128 length prefix followed by the bytes.
pub fn write_bytes_with_len(buf: &mut Vec<u8>, bytes: &[u8]) {
	write_uvarint(buf, bytes.len() as u64);
	buf.extend_from_slice(bytes);
}

/// Reads a LEB128 length prefix and that many bytes.
pub fn read_bytes_with_len<'a>(reader: &mut &'a [u8]) -> Result<&'a [u8], Error> {
	let len = read_uvarint(reader)?;
	if len > reader.len() as u64 {
		return Err(Error::UnexpectedEof);
	}
	read_fixed_bytes(reader, len as usize)
}

/// Fails unless the reader has been fully consumed.
pub fn expect_eof(reader: &[u8]) -> Result<(), Error> {
	if reader.is_empty() {
		Ok(())
	} else {
		Err(Error::CorruptedData(format!(
			"{} trailing bytes",
			reader.len()
		)))
	}
}

/// Appends a digest, raw for fixed width types and length prefixed
/// otherwise.
pub fn write_digest<D: Digest>(buf: &mut Vec<u8>, digest: &D) {
	let bytes = digest.to_bytes();
	match D::WIDTH {
		Some(_) => buf.extend_from_slice(&bytes),
		None => write_bytes_with_len(buf, &bytes),
	}
}

/// Reads a digest written by `write_digest`.
pub fn read_digest<D: Digest>(reader: &mut &[u8]) -> Result<D, Error> {
	match D::WIDTH {
		Some(width) => D::from_bytes(read_fixed_bytes(reader, width)?),
		None => D::from_bytes(read_bytes_with_len(reader)?),
	}
}
