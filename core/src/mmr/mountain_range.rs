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

//! Append-only Merkle Mountain Range.

use crate::error::{option_to_not_found, Error};
use crate::hash::HashCombinator;
use crate::index::{peaks_for_size, IndexValue, Position};
use crate::mmr::{HashSource, IndexSource, Proof, ReverseLeafLookup};
use crate::node::{Node, NodeRecord};
use crate::util::RwLock;

/// Merkle Mountain Range over leaves of digest type `H::Digest`, with
/// coordinates of type `I`. Leaves are numbered from 0 in insertion order;
/// internal nodes live in their own coordinate space (see `Position`).
///
/// The size counter is the only mutable state held here, behind a single
/// reader/writer lock: appends take it exclusively for their whole run,
/// lookups, roots and proofs share it. Digests themselves live in the
/// `IndexSource`, and optionally as position tagged blobs in a
/// `HashSource`.
///
/// The root is never cached, it's bagged from the current peaks on every
/// call.
pub struct MountainRange<I, H, S>
where
	H: HashCombinator,
{
	size: RwLock<I>,
	hasher: H,
	indexes: S,
	hashes: Option<Box<dyn HashSource<H::Digest>>>,
}

impl<I, H, S> MountainRange<I, H, S>
where
	I: IndexValue,
	H: HashCombinator,
	S: IndexSource<I, H::Digest>,
{
	/// Build a new empty Merkle Mountain Range over the provided index
	/// source.
	pub fn new(hasher: H, indexes: S) -> MountainRange<I, H, S> {
		MountainRange::at(hasher, indexes, I::zero())
	}

	/// Build a new Merkle Mountain Range pre-initialized until size with
	/// the provided index source, e.g. when reopening persisted state.
	pub fn at(hasher: H, indexes: S, size: I) -> MountainRange<I, H, S> {
		MountainRange {
			size: RwLock::new(size),
			hasher,
			indexes,
			hashes: None,
		}
	}

	/// Also persist every leaf and node as a `NodeRecord` keyed by its
	/// digest.
	pub fn with_hash_source(
		mut self,
		hashes: Box<dyn HashSource<H::Digest>>,
	) -> MountainRange<I, H, S> {
		self.hashes = Some(hashes);
		self
	}

	/// The hash combinator in use.
	pub fn hasher(&self) -> &H {
		&self.hasher
	}

	/// The underlying index source.
	pub fn index_source(&self) -> &S {
		&self.indexes
	}

	/// Number of leaves appended so far.
	pub fn size(&self) -> I {
		self.size.read().clone()
	}

	/// Is the MMR empty?
	pub fn is_empty(&self) -> bool {
		self.size.read().is_zero()
	}

	/// Current peaks, most recent mountain first.
	pub fn peaks(&self) -> Vec<Position<I>> {
		peaks_for_size(&*self.size.read())
	}

	/// Appends one leaf, completing every node it closes.
	pub fn add(&self, value: H::Digest) -> Result<(), Error> {
		let mut size = self.size.write();
		self.append(&mut size, value)
	}

	/// Appends leaves in order under a single exclusive section. Not
	/// atomic: if the k-th append fails, the k-1 previous leaves stay in
	/// and the size reflects them.
	pub fn add_all<T>(&self, values: T) -> Result<(), Error>
	where
		T: IntoIterator<Item = H::Digest>,
	{
		let mut size = self.size.write();
		for value in values {
			self.append(&mut size, value)?;
		}
		Ok(())
	}

	fn append(&self, size: &mut I, value: H::Digest) -> Result<(), Error> {
		let next = size.checked_add(&I::one()).ok_or_else(|| Error::OutOfRange {
			position: format!("{}", size),
			size: format!("{}", size),
		})?;
		let leaf = Position::Leaf(size.clone());
		trace!("append: {} {:?}", leaf, value);

		self.indexes.set_hash(&leaf, &value)?;
		if let Some(ref hashes) = self.hashes {
			let record = NodeRecord::<I, H::Digest>::leaf(size.clone());
			hashes.set(&value, &record.to_bytes())?;
		}
		self.update_node(leaf, value)?;
		self.indexes.set_size(&next)?;

		*size = next;
		Ok(())
	}

	// Climbs from a freshly stored position, hashing every parent it is the
	// right child of. Stops at the first left position, which is a peak
	// until its sibling mountain shows up.
	fn update_node(&self, position: Position<I>, value: H::Digest) -> Result<(), Error> {
		let mut current = position;
		let mut digest = value;
		while let Some(parent) = current.right_up() {
			let sibling = match current.sibling() {
				Some(pos) => self.indexes.get_hash(&pos)?,
				None => None,
			};
			let node = match sibling {
				Some(sibling) if current.is_right() => Node::new(sibling, digest),
				Some(sibling) => Node::new(digest, sibling),
				None => {
					warn!("update_node: missing sibling of {}", current);
					Node::pending(digest)
				}
			};
			digest = node.hash_with(&self.hasher);
			trace!("update_node: {} {:?}", parent, digest);

			self.indexes.set_hash(&parent, &digest)?;
			if let Some(ref hashes) = self.hashes {
				let record = NodeRecord::node(parent.value().clone(), node);
				hashes.set(&digest, &record.to_bytes())?;
			}
			current = parent;
		}
		Ok(())
	}

	/// Digest of the leaf at `index`. NotFound if the leaf is beyond the
	/// current size or was never written.
	pub fn get(&self, index: &I) -> Result<H::Digest, Error> {
		let size = self.size.read();
		if *index < I::zero() || *index >= *size {
			return Err(Error::NotFound(format!(
				"leaf {} in mountain range of size {}",
				index, *size
			)));
		}
		self.lookup(&Position::Leaf(index.clone()))
	}

	fn lookup(&self, position: &Position<I>) -> Result<H::Digest, Error> {
		option_to_not_found(self.indexes.get_hash(position), || {
			format!("hash at {}", position)
		})
	}

	/// Computes the root of the MMR. Finds all the peaks in the current
	/// tree and "bags" them, most recent mountain first, to get a single
	/// digest. An empty range bags an empty list of peaks.
	pub fn root(&self) -> Result<H::Digest, Error> {
		let size = self.size.read();
		let peaks = peaks_for_size(&*size);
		let hashes = try_map_vec!(peaks, |p| self.lookup(p));
		Ok(self.hasher.combine_digests(&hashes))
	}

	/// Build an inclusion proof for the leaf at `target`.
	pub fn proof_by_index(&self, target: &I) -> Result<Proof<I, H::Digest>, Error> {
		let size = self.size.read();
		self.build_proof(target, &size)
	}

	fn build_proof(&self, target: &I, size: &I) -> Result<Proof<I, H::Digest>, Error> {
		if *target < I::zero() || target >= size {
			return Err(Error::OutOfRange {
				position: format!("{}", target),
				size: format!("{}", size),
			});
		}
		debug!("proof_by_index: {}, size {}", target, size);

		let mut hashes = vec![];
		let mut left_peaks = vec![];
		let mut right_peaks = vec![];

		// peaks come most recent first, each one covering the leaves in
		// [start, end) right below the previous one
		let mut end = size.clone();
		for peak in peaks_for_size(size) {
			let start = match peak {
				Position::Leaf(ref v) => v.clone(),
				Position::Node(_) => I::pow2(peak.height() + 1)
					.and_then(|width| end.checked_sub(&width))
					.ok_or_else(|| {
						Error::InvalidTree(format!("{} doesn't fit below {}", peak, end))
					})?,
			};
			if hashes.is_empty() && *target >= start && *target < end {
				hashes = self.authentication_path(target, &end, size)?;
			} else if hashes.is_empty() {
				right_peaks.push(self.lookup(&peak)?);
			} else {
				left_peaks.push(self.lookup(&peak)?);
			}
			end = start;
		}

		if hashes.is_empty() {
			return Err(Error::InvalidTree(format!(
				"no mountain covers leaf {} at size {}",
				target, size
			)));
		}
		Ok(Proof {
			target: target.clone(),
			hashes,
			left_peaks,
			right_peaks,
		})
	}

	// The target's digest followed by its siblings, up to the peak of the
	// mountain ending at `end`.
	fn authentication_path(&self, target: &I, end: &I, size: &I) -> Result<Vec<H::Digest>, Error> {
		let target = Position::Leaf(target.clone());
		let mut path = vec![self.lookup(&target)?];
		if *size == I::one() {
			return Ok(path);
		}
		let mut current = target;
		while let Some(sibling) = current.sibling() {
			if sibling.value() >= end {
				break;
			}
			path.push(self.lookup(&sibling)?);
			current = match current.up() {
				Some(up) => up,
				None => break,
			};
		}
		Ok(path)
	}

	/// Restores the internal node at node position `index` from the hash
	/// source.
	pub fn node(&self, index: &I) -> Result<Node<H::Digest>, Error> {
		let position = Position::Node(index.clone());
		let digest = {
			let _size = self.size.read();
			self.lookup(&position)?
		};
		// records are keyed by digest alone, nodes with equal children share
		// one, so check the children rather than the recorded position
		let node = self
			.record(&digest)?
			.into_node()
			.ok_or_else(|| Error::InvalidTree(format!("{} recorded without children", position)))?;
		if node.hash_with(&self.hasher) != digest {
			return Err(Error::InvalidTree(format!(
				"record for {:?} doesn't hash to {}",
				digest, position
			)));
		}
		Ok(node)
	}

	/// The record stored under `digest` in the hash source.
	pub fn record(&self, digest: &H::Digest) -> Result<NodeRecord<I, H::Digest>, Error> {
		let hashes = self
			.hashes
			.as_ref()
			.ok_or_else(|| Error::NotFound("no hash source configured".to_owned()))?;
		let bytes = option_to_not_found(hashes.get(digest), || format!("record for {:?}", digest))?;
		Ok(NodeRecord::from_bytes(&bytes)?)
	}

	/// Walks all nodes in the MMR and revalidates all parent hashes against
	/// their children.
	pub fn validate(&self) -> Result<(), Error> {
		let size = self.size.read();
		let two = I::one()
			.checked_add(&I::one())
			.ok_or_else(|| Error::TypeMismatch("index type can't hold 2".to_owned()))?;

		// each right leaf closed the chain of nodes above it, so visiting
		// those chains checks every node exactly once
		let mut leaf = I::one();
		while leaf < *size {
			let mut current = Position::Leaf(leaf.clone());
			while let Some(parent) = current.right_up() {
				let (left, right) = parent
					.children()
					.ok_or_else(|| Error::InvalidTree(format!("{} has no children", parent)))?;
				let node = Node::new(self.lookup(&left)?, self.lookup(&right)?);
				if node.hash_with(&self.hasher) != self.lookup(&parent)? {
					return Err(Error::InvalidTree(format!("invalid hash at {}", parent)));
				}
				current = parent;
			}
			leaf = match leaf.checked_add(&two) {
				Some(next) => next,
				None => break,
			};
		}
		Ok(())
	}
}

impl<I, H, S> MountainRange<I, H, S>
where
	I: IndexValue,
	H: HashCombinator,
	S: IndexSource<I, H::Digest> + ReverseLeafLookup<I, H::Digest>,
{
	/// Build an inclusion proof for a leaf given its digest, resolved to a
	/// position through the index source's reverse lookup. Only committed
	/// leaves resolve: the position must be below the current size and still
	/// hold `item`.
	pub fn proof(&self, item: &H::Digest) -> Result<Proof<I, H::Digest>, Error> {
		let size = self.size.read();
		let not_found = || Error::NotFound(format!("leaf with hash {:?}", item));
		let index = self.indexes.leaf_index_of(item)?.ok_or_else(not_found)?;
		if index < I::zero() || index >= *size {
			return Err(not_found());
		}
		if self.indexes.get_hash(&Position::Leaf(index.clone()))?.as_ref() != Some(item) {
			return Err(not_found());
		}
		self.build_proof(&index, &size)
	}
}
