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

#![allow(dead_code)]

use std::sync::Arc;

use mmr_core::hash::{Hash256, Sha256};
use mmr_core::index::{IndexValue, Position};
use mmr_util::{to_hex, RwLock};
use mmr_core::{
	Error, HashCombinator, IndexSource, MemIndexSource, MountainRange, ReverseLeafLookup,
};

/// Digest of a test string.
pub fn h(s: &str) -> Hash256 {
	Sha256.combine(&[s.as_bytes()])
}

/// Leaf digests "0", "1", ... "n-1".
pub fn leaves(n: u64) -> Vec<Hash256> {
	(0..n).map(|i| h(&i.to_string())).collect()
}

pub type TestMmr<I> = MountainRange<I, Sha256, Arc<MemIndexSource<I, Hash256>>>;

/// Mountain range over a fresh in-memory source holding `n` leaves.
pub fn mmr_with<I: IndexValue>(n: u64) -> TestMmr<I> {
	let mmr = MountainRange::new(Sha256, Arc::new(MemIndexSource::new()));
	mmr.add_all(leaves(n)).unwrap();
	mmr
}

/// Variable width digests: lowercase hex of SHA-256.
#[derive(Clone, Copy, Debug, Default)]
pub struct HexSha256;

impl HashCombinator for HexSha256 {
	type Digest = String;

	fn combine(&self, parts: &[&[u8]]) -> String {
		to_hex(Sha256.combine(parts).as_bytes())
	}
}

/// Index source refusing to store the leaf at `fail_at` or the node at
/// `fail_node_at`.
pub struct FailingIndexSource<I, D> {
	pub inner: MemIndexSource<I, D>,
	pub fail_at: RwLock<Option<I>>,
	pub fail_node_at: RwLock<Option<I>>,
}

impl<I: IndexValue, D: mmr_core::Digest> FailingIndexSource<I, D> {
	pub fn new(fail_at: I) -> FailingIndexSource<I, D> {
		FailingIndexSource {
			inner: MemIndexSource::new(),
			fail_at: RwLock::new(Some(fail_at)),
			fail_node_at: RwLock::new(None),
		}
	}

	pub fn failing_node(fail_node_at: I) -> FailingIndexSource<I, D> {
		FailingIndexSource {
			inner: MemIndexSource::new(),
			fail_at: RwLock::new(None),
			fail_node_at: RwLock::new(Some(fail_node_at)),
		}
	}
}

impl<I: IndexValue, D: mmr_core::Digest> IndexSource<I, D> for FailingIndexSource<I, D> {
	fn get_hash(&self, position: &Position<I>) -> Result<Option<D>, Error> {
		self.inner.get_hash(position)
	}

	fn set_hash(&self, position: &Position<I>, hash: &D) -> Result<(), Error> {
		match position {
			Position::Leaf(ref i) if self.fail_at.read().as_ref() == Some(i) => {
				return Err(Error::Store(format!("refusing leaf {}", i)));
			}
			Position::Node(ref i) if self.fail_node_at.read().as_ref() == Some(i) => {
				return Err(Error::Store(format!("refusing node {}", i)));
			}
			_ => {}
		}
		self.inner.set_hash(position, hash)
	}
}

impl<I: IndexValue, D: mmr_core::Digest> ReverseLeafLookup<I, D> for FailingIndexSource<I, D> {
	fn leaf_index_of(&self, hash: &D) -> Result<Option<I>, Error> {
		self.inner.leaf_index_of(hash)
	}
}
