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

//! Storage contracts consumed by the mountain range.
//!
//! All methods take `&self`: the mountain range serializes writers itself,
//! implementations only need to be safe to share. Lookups return `Ok(None)`
//! on a miss, errors are reserved for storage failures.

use std::sync::Arc;

use crate::error::Error;
use crate::hash::Digest;
use crate::index::{IndexValue, Position};

/// Digests by position. Leaf and node positions are distinct keys, a
/// `Position::Leaf(3)` never aliases a `Position::Node(3)`.
pub trait IndexSource<I: IndexValue, D: Digest>: Send + Sync {
	/// Digest stored at `position`, if any.
	fn get_hash(&self, position: &Position<I>) -> Result<Option<D>, Error>;

	/// Stores `hash` at `position`, replacing any previous value. A leaf
	/// position only gets overwritten when an earlier append failed halfway.
	fn set_hash(&self, position: &Position<I>, hash: &D) -> Result<(), Error>;

	/// Called once an append has stored its leaf and every node above it,
	/// with the new leaf count. Sources that persist the count do it here.
	fn set_size(&self, _size: &I) -> Result<(), Error> {
		Ok(())
	}
}

/// Raw node blobs keyed by their own digest.
pub trait HashSource<D: Digest>: Send + Sync {
	/// Blob stored under `hash`, if any.
	fn get(&self, hash: &D) -> Result<Option<Vec<u8>>, Error>;

	/// Stores `value` under `hash`.
	fn set(&self, hash: &D, value: &[u8]) -> Result<(), Error>;

	/// Removes whatever is stored under `hash`.
	fn delete(&self, hash: &D) -> Result<(), Error>;
}

/// Maps a leaf digest back to the leaf position it was appended at.
pub trait ReverseLeafLookup<I: IndexValue, D: Digest>: Send + Sync {
	/// Leaf position holding `hash`, if any.
	fn leaf_index_of(&self, hash: &D) -> Result<Option<I>, Error>;
}

impl<I: IndexValue, D: Digest, T: IndexSource<I, D> + ?Sized> IndexSource<I, D> for Arc<T> {
	fn get_hash(&self, position: &Position<I>) -> Result<Option<D>, Error> {
		(**self).get_hash(position)
	}

	fn set_hash(&self, position: &Position<I>, hash: &D) -> Result<(), Error> {
		(**self).set_hash(position, hash)
	}

	fn set_size(&self, size: &I) -> Result<(), Error> {
		(**self).set_size(size)
	}
}

impl<D: Digest, T: HashSource<D> + ?Sized> HashSource<D> for Arc<T> {
	fn get(&self, hash: &D) -> Result<Option<Vec<u8>>, Error> {
		(**self).get(hash)
	}

	fn set(&self, hash: &D, value: &[u8]) -> Result<(), Error> {
		(**self).set(hash, value)
	}

	fn delete(&self, hash: &D) -> Result<(), Error> {
		(**self).delete(hash)
	}
}

impl<I: IndexValue, D: Digest, T: ReverseLeafLookup<I, D> + ?Sized> ReverseLeafLookup<I, D>
	for Arc<T>
{
	fn leaf_index_of(&self, hash: &D) -> Result<Option<I>, Error> {
		(**self).leaf_index_of(hash)
	}
}
