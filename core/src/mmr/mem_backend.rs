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

use std::collections::HashMap;

use crate::error::Error;
use crate::hash::Digest;
use crate::index::{IndexValue, Position};
use crate::mmr::{HashSource, IndexSource, ReverseLeafLookup};
use crate::util::RwLock;

/// Simple in-memory index source backed by hash maps, one per position
/// kind. Also keeps a reverse map from leaf digest to leaf position; when
/// the same digest is appended twice the first position wins.
#[derive(Debug)]
pub struct MemIndexSource<I, D> {
	leaves: RwLock<HashMap<I, D>>,
	nodes: RwLock<HashMap<I, D>>,
	reverse: RwLock<HashMap<D, I>>,
}

impl<I: IndexValue, D: Digest> MemIndexSource<I, D> {
	/// Instantiates a new empty source.
	pub fn new() -> MemIndexSource<I, D> {
		MemIndexSource {
			leaves: RwLock::new(HashMap::new()),
			nodes: RwLock::new(HashMap::new()),
			reverse: RwLock::new(HashMap::new()),
		}
	}

	/// Number of leaf digests stored.
	pub fn leaf_count(&self) -> usize {
		self.leaves.read().len()
	}

	/// Number of node digests stored.
	pub fn node_count(&self) -> usize {
		self.nodes.read().len()
	}
}

impl<I: IndexValue, D: Digest> Default for MemIndexSource<I, D> {
	fn default() -> MemIndexSource<I, D> {
		MemIndexSource::new()
	}
}

impl<I: IndexValue, D: Digest> IndexSource<I, D> for MemIndexSource<I, D> {
	fn get_hash(&self, position: &Position<I>) -> Result<Option<D>, Error> {
		let res = match position {
			Position::Leaf(i) => self.leaves.read().get(i).cloned(),
			Position::Node(i) => self.nodes.read().get(i).cloned(),
		};
		Ok(res)
	}

	fn set_hash(&self, position: &Position<I>, hash: &D) -> Result<(), Error> {
		match position {
			Position::Leaf(i) => {
				let replaced = self.leaves.write().insert(i.clone(), hash.clone());
				let mut reverse = self.reverse.write();
				// drop the reverse entry of a leaf that never got committed
				if let Some(old) = replaced {
					if reverse.get(&old) == Some(i) {
						reverse.remove(&old);
					}
				}
				reverse.entry(hash.clone()).or_insert_with(|| i.clone());
			}
			Position::Node(i) => {
				self.nodes.write().insert(i.clone(), hash.clone());
			}
		}
		Ok(())
	}
}

impl<I: IndexValue, D: Digest> ReverseLeafLookup<I, D> for MemIndexSource<I, D> {
	fn leaf_index_of(&self, hash: &D) -> Result<Option<I>, Error> {
		Ok(self.reverse.read().get(hash).cloned())
	}
}

/// In-memory blob store keyed by digest.
#[derive(Debug)]
pub struct MemHashSource<D> {
	blobs: RwLock<HashMap<D, Vec<u8>>>,
}

impl<D: Digest> MemHashSource<D> {
	/// Instantiates a new empty store.
	pub fn new() -> MemHashSource<D> {
		MemHashSource {
			blobs: RwLock::new(HashMap::new()),
		}
	}

	/// Number of blobs stored.
	pub fn len(&self) -> usize {
		self.blobs.read().len()
	}

	/// Whether nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.blobs.read().is_empty()
	}
}

impl<D: Digest> Default for MemHashSource<D> {
	fn default() -> MemHashSource<D> {
		MemHashSource::new()
	}
}

impl<D: Digest> HashSource<D> for MemHashSource<D> {
	fn get(&self, hash: &D) -> Result<Option<Vec<u8>>, Error> {
		Ok(self.blobs.read().get(hash).cloned())
	}

	fn set(&self, hash: &D, value: &[u8]) -> Result<(), Error> {
		self.blobs.write().insert(hash.clone(), value.to_vec());
		Ok(())
	}

	fn delete(&self, hash: &D) -> Result<(), Error> {
		self.blobs.write().remove(hash);
		Ok(())
	}
}
