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

//! LMDB implementations of the accumulator's storage collaborators.
//!
//! Both sources can share one `Store`, keys are disjoint thanks to their
//! one-byte prefixes. Every write is its own LMDB transaction.

use std::marker::PhantomData;
use std::sync::Arc;

use mmr_core::ser;
use mmr_core::{Digest, HashSource, IndexSource, IndexValue, Position, ReverseLeafLookup};

use crate::lmdb::Store;
use crate::{to_key, HASH_PREFIX, LEAF_PREFIX, NODE_PREFIX, REVERSE_PREFIX, SIZE_PREFIX};

type CoreResult<T> = Result<T, mmr_core::Error>;

fn position_key<I: IndexValue>(position: &Position<I>) -> Vec<u8> {
	let prefix = if position.is_leaf() {
		LEAF_PREFIX
	} else {
		NODE_PREFIX
	};
	let mut key = vec![prefix];
	position.value().write_varint(&mut key);
	key
}

fn decode_index<I: IndexValue>(bytes: &[u8]) -> Result<I, ser::Error> {
	let mut reader = bytes;
	let index = I::read_varint(&mut reader)?;
	ser::expect_eof(reader)?;
	Ok(index)
}

fn encode_index<I: IndexValue>(index: &I) -> Vec<u8> {
	let mut buf = vec![];
	index.write_varint(&mut buf);
	buf
}

/// Leaf and node digests by position, the reverse leaf index and the leaf
/// count, all in LMDB.
pub struct LmdbIndexSource<I, D> {
	store: Arc<Store>,
	_marker: PhantomData<fn() -> (I, D)>,
}

impl<I: IndexValue, D: Digest> LmdbIndexSource<I, D> {
	/// Index source over `store`.
	pub fn new(store: Arc<Store>) -> LmdbIndexSource<I, D> {
		LmdbIndexSource {
			store,
			_marker: PhantomData,
		}
	}

	/// The underlying store.
	pub fn store(&self) -> &Arc<Store> {
		&self.store
	}

	/// Number of leaves completely appended so far, zero for a fresh store.
	/// Only written once a leaf and all the nodes it closes are stored. A mountain
	/// range reopened with `MountainRange::at` at this size picks up where
	/// the previous one stopped.
	pub fn size(&self) -> CoreResult<I> {
		match self.store.get(&[SIZE_PREFIX])? {
			Some(bytes) => Ok(decode_index(&bytes)?),
			None => Ok(I::zero()),
		}
	}
}

impl<I: IndexValue, D: Digest> IndexSource<I, D> for LmdbIndexSource<I, D> {
	fn get_hash(&self, position: &Position<I>) -> CoreResult<Option<D>> {
		match self.store.get(&position_key(position))? {
			Some(bytes) => Ok(Some(D::from_bytes(&bytes)?)),
			None => Ok(None),
		}
	}

	fn set_hash(&self, position: &Position<I>, hash: &D) -> CoreResult<()> {
		let batch = self.store.batch()?;
		let key = position_key(position);
		let digest = hash.to_bytes();

		if let Position::Leaf(index) = position {
			let encoded = encode_index(index);
			// drop the reverse entry of a leaf that never got committed
			if let Some(old) = batch.get(&key)? {
				let old_reverse = to_key(REVERSE_PREFIX, &old);
				if batch.get(&old_reverse)?.as_ref() == Some(&encoded) {
					batch.delete(&old_reverse)?;
				}
			}
			let reverse = to_key(REVERSE_PREFIX, &digest);
			if !batch.exists(&reverse)? {
				batch.put(&reverse, &encoded)?;
			}
		}
		batch.put(&key, &digest)?;
		batch.commit()?;
		trace!("lmdb: stored {}", position);
		Ok(())
	}

	fn set_size(&self, size: &I) -> CoreResult<()> {
		let batch = self.store.batch()?;
		batch.put(&[SIZE_PREFIX], &encode_index(size))?;
		batch.commit()?;
		Ok(())
	}
}

impl<I: IndexValue, D: Digest> ReverseLeafLookup<I, D> for LmdbIndexSource<I, D> {
	fn leaf_index_of(&self, hash: &D) -> CoreResult<Option<I>> {
		match self.store.get(&to_key(REVERSE_PREFIX, &hash.to_bytes()))? {
			Some(bytes) => Ok(Some(decode_index(&bytes)?)),
			None => Ok(None),
		}
	}
}

/// Node records keyed by digest, in LMDB.
pub struct LmdbHashSource<D> {
	store: Arc<Store>,
	_marker: PhantomData<fn() -> D>,
}

impl<D: Digest> LmdbHashSource<D> {
	/// Hash source over `store`.
	pub fn new(store: Arc<Store>) -> LmdbHashSource<D> {
		LmdbHashSource {
			store,
			_marker: PhantomData,
		}
	}
}

impl<D: Digest> HashSource<D> for LmdbHashSource<D> {
	fn get(&self, hash: &D) -> CoreResult<Option<Vec<u8>>> {
		Ok(self.store.get(&to_key(HASH_PREFIX, &hash.to_bytes()))?)
	}

	fn set(&self, hash: &D, value: &[u8]) -> CoreResult<()> {
		let batch = self.store.batch()?;
		batch.put(&to_key(HASH_PREFIX, &hash.to_bytes()), value)?;
		batch.commit()?;
		Ok(())
	}

	fn delete(&self, hash: &D) -> CoreResult<()> {
		let batch = self.store.batch()?;
		batch.delete(&to_key(HASH_PREFIX, &hash.to_bytes()))?;
		batch.commit()?;
		Ok(())
	}
}
