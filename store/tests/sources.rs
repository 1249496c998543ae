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

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mmr_core::hash::{Hash256, Sha256};
use mmr_core::{
	Digest, Error, HashCombinator, HashSource, IndexSource, MemIndexSource, MountainRange, Node,
	NodeRecord, Position, ReverseLeafLookup,
};
use mmr_store::{LmdbHashSource, LmdbIndexSource};
use num_bigint::BigUint;

use crate::common::{clean_output_dir, open_store, setup};

fn h(s: &str) -> Hash256 {
	Sha256.combine(&[s.as_bytes()])
}

fn leaves(n: u64) -> Vec<Hash256> {
	(0..n).map(|i| h(&i.to_string())).collect()
}

fn mem_root(n: u64) -> Hash256 {
	let mmr = MountainRange::new(Sha256, MemIndexSource::<u64, Hash256>::new());
	mmr.add_all(leaves(n)).unwrap();
	mmr.root().unwrap()
}

#[test]
fn lmdb_matches_memory() -> Result<(), Error> {
	let test_dir = "test_output/sources_matches_memory";
	setup(test_dir);
	{
		let store = open_store(test_dir);
		let mmr = MountainRange::new(Sha256, LmdbIndexSource::<u64, Hash256>::new(store));
		for (i, leaf) in leaves(23).into_iter().enumerate() {
			mmr.add(leaf)?;
			assert_eq!(mmr.root()?, mem_root(i as u64 + 1));
		}
		mmr.validate()?;
		let root = mmr.root()?;
		for i in 0..23 {
			assert!(mmr.proof_by_index(&i)?.verify(&Sha256, &root));
		}
		assert_eq!(mmr.index_source().size()?, 23);
	}
	clean_output_dir(test_dir);
	Ok(())
}

#[test]
fn reopen_at_stored_size() -> Result<(), Error> {
	let test_dir = "test_output/sources_reopen";
	setup(test_dir);
	{
		let store = open_store(test_dir);
		let mmr = MountainRange::new(Sha256, LmdbIndexSource::<u64, Hash256>::new(store));
		mmr.add_all(leaves(10))?;
	}
	{
		let indexes = LmdbIndexSource::<u64, Hash256>::new(open_store(test_dir));
		let size = indexes.size()?;
		assert_eq!(size, 10);
		let mmr = MountainRange::at(Sha256, indexes, size);
		assert_eq!(mmr.root()?, mem_root(10));
		mmr.add_all(leaves(14).into_iter().skip(10))?;
		assert_eq!(mmr.root()?, mem_root(14));
		assert_eq!(mmr.get(&3)?, h("3"));
	}
	clean_output_dir(test_dir);
	Ok(())
}

#[test]
fn proofs_by_item() -> Result<(), Error> {
	let test_dir = "test_output/sources_proofs_by_item";
	setup(test_dir);
	{
		let store = open_store(test_dir);
		let indexes = LmdbIndexSource::<u32, Hash256>::new(store);
		let mmr = MountainRange::new(Sha256, indexes);
		mmr.add_all(leaves(9))?;
		// a repeated digest keeps pointing at its first position
		mmr.add(h("4"))?;
		assert_eq!(mmr.index_source().leaf_index_of(&h("4"))?, Some(4));
		assert_eq!(mmr.index_source().leaf_index_of(&h("nope"))?, None);

		let proof = mmr.proof(&h("6"))?;
		assert_eq!(proof.target, 6);
		assert!(proof.verify(&Sha256, &mmr.root()?));
		match mmr.proof(&h("nope")) {
			Err(Error::NotFound(_)) => {}
			other => panic!("unexpected {:?}", other),
		}
	}
	clean_output_dir(test_dir);
	Ok(())
}

#[test]
fn node_records_in_lmdb() -> Result<(), Error> {
	let test_dir = "test_output/sources_node_records";
	setup(test_dir);
	{
		let store = open_store(test_dir);
		let mmr = MountainRange::new(Sha256, LmdbIndexSource::<i64, Hash256>::new(store.clone()))
			.with_hash_source(Box::new(LmdbHashSource::new(store.clone())));
		mmr.add_all(leaves(4))?;

		let l = leaves(4);
		let n1 = Node::new(l[0], l[1]);
		assert_eq!(mmr.node(&1)?, n1);
		assert_eq!(mmr.record(&l[2])?, NodeRecord::leaf(2));

		let n1_hash = n1.hash_with(&Sha256);
		let blobs = LmdbHashSource::<Hash256>::new(store.clone());
		let bytes = blobs.get(&n1_hash)?.unwrap();
		assert_eq!(NodeRecord::<i64, Hash256>::from_bytes(&bytes)?, NodeRecord::node(1, n1));

		blobs.delete(&n1_hash)?;
		assert_eq!(blobs.get(&n1_hash)?, None);
		match mmr.node(&1) {
			Err(Error::NotFound(_)) => {}
			other => panic!("unexpected {:?}", other),
		}
		// the digest itself is untouched
		let indexes = LmdbIndexSource::<i64, Hash256>::new(store);
		assert_eq!(indexes.get_hash(&Position::Node(1))?, Some(n1_hash));
	}
	clean_output_dir(test_dir);
	Ok(())
}

#[test]
fn big_indexes_and_shared_store() -> Result<(), Error> {
	let test_dir = "test_output/sources_big_indexes";
	setup(test_dir);
	{
		let store = open_store(test_dir);
		let indexes = Arc::new(LmdbIndexSource::<BigUint, Hash256>::new(store));
		let mmr = MountainRange::new(Sha256, indexes.clone());
		mmr.add_all(leaves(7))?;
		assert_eq!(indexes.size()?, BigUint::from(7u32));
		assert_eq!(
			indexes.get_hash(&Position::Leaf(BigUint::from(5u32)))?,
			Some(h("5"))
		);
		assert_eq!(indexes.get_hash(&Position::Node(BigUint::from(5u32)))?, Some(
			Node::new(h("4"), h("5")).hash_with(&Sha256)
		));
		assert_eq!(mmr.root()?, mem_root(7));
	}
	clean_output_dir(test_dir);
	Ok(())
}

#[test]
fn concurrent_readers() -> Result<(), Error> {
	let test_dir = "test_output/sources_concurrent_readers";
	setup(test_dir);
	{
		let store = open_store(test_dir);
		let mmr = Arc::new(MountainRange::new(
			Sha256,
			LmdbIndexSource::<u64, Hash256>::new(store),
		));
		mmr.add_all(leaves(32))?;
		let root = mmr.root()?;
		let handles: Vec<_> = (0..4u64)
			.map(|t| {
				let mmr = mmr.clone();
				let root = root;
				std::thread::spawn(move || {
					(t * 8..t * 8 + 8).all(|i| {
						mmr.proof_by_index(&i)
							.map(|p| p.verify(&Sha256, &root))
							.unwrap_or(false)
					})
				})
			})
			.collect();
		for handle in handles {
			assert!(handle.join().unwrap());
		}
	}
	clean_output_dir(test_dir);
	Ok(())
}

/// LMDB index source that can be told to refuse node writes.
struct NodeFailing<D> {
	inner: LmdbIndexSource<u64, D>,
	fail: AtomicBool,
}

impl<D: Digest> IndexSource<u64, D> for NodeFailing<D> {
	fn get_hash(&self, position: &Position<u64>) -> Result<Option<D>, Error> {
		self.inner.get_hash(position)
	}

	fn set_hash(&self, position: &Position<u64>, hash: &D) -> Result<(), Error> {
		if !position.is_leaf() && self.fail.load(Ordering::SeqCst) {
			return Err(Error::Store(format!("refusing {}", position)));
		}
		self.inner.set_hash(position, hash)
	}

	fn set_size(&self, size: &u64) -> Result<(), Error> {
		self.inner.set_size(size)
	}
}

impl<D: Digest> ReverseLeafLookup<u64, D> for NodeFailing<D> {
	fn leaf_index_of(&self, hash: &D) -> Result<Option<u64>, Error> {
		self.inner.leaf_index_of(hash)
	}
}

#[test]
fn failed_append_leaves_no_trace() -> Result<(), Error> {
	let test_dir = "test_output/sources_failed_append";
	setup(test_dir);
	{
		let store = open_store(test_dir);
		let mmr = MountainRange::new(
			Sha256,
			NodeFailing {
				inner: LmdbIndexSource::new(store.clone()),
				fail: AtomicBool::new(false),
			},
		);
		mmr.add(h("x"))?;
		mmr.index_source().fail.store(true, Ordering::SeqCst);
		assert!(mmr.add(h("y")).is_err());
		assert_eq!(mmr.size(), 1);
		// the stored leaf count only moves on complete appends
		assert_eq!(LmdbIndexSource::<u64, Hash256>::new(store.clone()).size()?, 1);
		match mmr.proof(&h("y")) {
			Err(Error::NotFound(_)) => {}
			other => panic!("unexpected {:?}", other),
		}

		mmr.index_source().fail.store(false, Ordering::SeqCst);
		mmr.add(h("z"))?;
		assert_eq!(mmr.index_source().leaf_index_of(&h("y"))?, None);
		assert_eq!(mmr.proof(&h("z"))?.target, 1);
	}
	{
		let indexes = LmdbIndexSource::<u64, Hash256>::new(open_store(test_dir));
		let size = indexes.size()?;
		assert_eq!(size, 2);
		let mmr = MountainRange::at(Sha256, indexes, size);
		let expected = MountainRange::new(Sha256, MemIndexSource::<u64, Hash256>::new());
		expected.add_all(vec![h("x"), h("z")])?;
		assert_eq!(mmr.root()?, expected.root()?);
	}
	clean_output_dir(test_dir);
	Ok(())
}
