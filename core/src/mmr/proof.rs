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

//! Inclusion proofs.

use std::cmp;

use crate::error::Error;
use crate::hash::{Digest, HashCombinator};
use crate::index::{IndexValue, Position};
use crate::node::Node;
use crate::ser;
use crate::util::{from_hex, to_hex};

/// Inclusion proof for one leaf.
///
/// `hashes` starts with the leaf's own digest, followed by the siblings on
/// the way up to the peak of its mountain. `right_peaks` holds the digests
/// of the peaks covering higher leaf positions, `left_peaks` those covering
/// lower ones, both in the order peaks are bagged (most recent first).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof<I, D> {
	/// Leaf position being proven
	pub target: I,
	/// Leaf digest then authentication path
	pub hashes: Vec<D>,
	/// Peaks of the older mountains
	pub left_peaks: Vec<D>,
	/// Peaks of the more recent mountains
	pub right_peaks: Vec<D>,
}

impl<I: IndexValue, D: Digest> Proof<I, D> {
	/// Replays the authentication path, returning the digest of the peak of
	/// the target's mountain. None if the path can't be replayed.
	pub fn peak<H>(&self, hasher: &H) -> Option<D>
	where
		H: HashCombinator<Digest = D> + ?Sized,
	{
		if self.target < I::zero() {
			return None;
		}
		let (first, siblings) = self.hashes.split_first()?;
		let mut position = Some(Position::Leaf(self.target.clone()));
		let mut current = first.clone();
		for sibling in siblings {
			let pos = position?;
			let node = if pos.is_right() {
				Node::new(sibling.clone(), current)
			} else {
				Node::new(current, sibling.clone())
			};
			current = node.hash_with(hasher);
			position = pos.up();
		}
		Some(current)
	}

	/// Verifies the proof against `root`. Malformed proofs are simply
	/// invalid.
	pub fn verify<H>(&self, hasher: &H, root: &D) -> bool
	where
		H: HashCombinator<Digest = D> + ?Sized,
	{
		let peak = match self.peak(hasher) {
			Some(peak) => peak,
			None => return false,
		};
		let mut bag = Vec::with_capacity(self.right_peaks.len() + 1 + self.left_peaks.len());
		bag.extend(self.right_peaks.iter().cloned());
		bag.push(peak);
		bag.extend(self.left_peaks.iter().cloned());
		hasher.combine_digests(&bag) == *root
	}

	/// Compact binary form: the target as a varint, then each of `hashes`,
	/// `left_peaks` and `right_peaks` as a LEB128 count followed by the
	/// digests.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut buf = vec![];
		self.target.write_varint(&mut buf);
		for list in &[&self.hashes, &self.left_peaks, &self.right_peaks] {
			ser::write_uvarint(&mut buf, list.len() as u64);
			for digest in list.iter() {
				ser::write_digest(&mut buf, digest);
			}
		}
		buf
	}

	/// Decodes the binary form, rejecting trailing bytes.
	pub fn from_bytes(bytes: &[u8]) -> Result<Proof<I, D>, Error> {
		let mut reader = bytes;
		let target = I::read_varint(&mut reader)?;
		let hashes = read_digests(&mut reader)?;
		let left_peaks = read_digests(&mut reader)?;
		let right_peaks = read_digests(&mut reader)?;
		ser::expect_eof(reader)?;
		Ok(Proof {
			target,
			hashes,
			left_peaks,
			right_peaks,
		})
	}

	/// Hex of the binary form.
	pub fn to_hex(&self) -> String {
		to_hex(&self.to_bytes())
	}

	/// Decodes the hex of the binary form.
	pub fn from_hex(hex: &str) -> Result<Proof<I, D>, Error> {
		let bytes = from_hex(hex).map_err(ser::Error::CorruptedData)?;
		Proof::from_bytes(&bytes)
	}
}

fn read_digests<D: Digest>(reader: &mut &[u8]) -> Result<Vec<D>, ser::Error> {
	let count = ser::read_uvarint(reader)?;
	// every digest takes at least a byte
	let mut digests = Vec::with_capacity(cmp::min(count, reader.len() as u64) as usize);
	for _ in 0..count {
		digests.push(ser::read_digest(reader)?);
	}
	Ok(digests)
}

/// Checks `proof` against `root`, see `Proof::verify`. Touches no shared
/// state, so any number of proofs can be validated in parallel.
pub fn validate_proof<I, H>(hasher: &H, root: &H::Digest, proof: &Proof<I, H::Digest>) -> bool
where
	I: IndexValue,
	H: HashCombinator + ?Sized,
{
	proof.verify(hasher, root)
}
