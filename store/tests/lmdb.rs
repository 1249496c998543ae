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

use mmr_store::lmdb::ALLOC_CHUNK_SIZE_DEFAULT_TEST;
use mmr_store::{option_to_not_found, to_key, Error};

use crate::common::{clean_output_dir, open_store, setup};

const CHUNK: usize = 64 * 1024;

#[test]
fn put_get_delete() -> Result<(), Error> {
	let test_dir = "test_output/lmdb_put_get_delete";
	setup(test_dir);
	{
		let store = open_store(test_dir);
		let key = to_key(b'x', b"key");
		assert_eq!(key, b"xkey".to_vec());
		assert_eq!(store.get(&key)?, None);
		assert!(!store.exists(&key)?);

		let batch = store.batch()?;
		batch.put(&key, b"value")?;
		// visible inside the batch only
		assert_eq!(batch.get(&key)?, Some(b"value".to_vec()));
		assert!(store.get(&key)?.is_none());
		batch.commit()?;

		assert_eq!(store.get(&key)?, Some(b"value".to_vec()));
		assert!(store.exists(&key)?);

		let batch = store.batch()?;
		batch.delete(&key)?;
		// deleting twice is fine
		batch.delete(&key)?;
		batch.commit()?;
		assert_eq!(store.get(&key)?, None);

		match option_to_not_found(store.get(&key), || "key".to_owned()) {
			Err(Error::NotFoundErr(what)) => assert_eq!(what, "key"),
			other => panic!("unexpected {:?}", other),
		}
	}
	clean_output_dir(test_dir);
	Ok(())
}

#[test]
fn dropped_batch_is_discarded() -> Result<(), Error> {
	let test_dir = "test_output/lmdb_dropped_batch";
	setup(test_dir);
	{
		let store = open_store(test_dir);
		{
			let batch = store.batch()?;
			batch.put(b"k", b"v")?;
		}
		assert!(!store.exists(b"k")?);
	}
	clean_output_dir(test_dir);
	Ok(())
}

#[test]
fn lmdb_allocate() -> Result<(), Error> {
	let test_dir = "test_output/lmdb_allocate";
	setup(test_dir);
	// Write well past the initial chunk, ensuring the map resizes underneath
	{
		let store = open_store(test_dir);
		let value = vec![7u8; CHUNK];
		for i in 0..64u32 {
			let batch = store.batch()?;
			batch.put(&to_key(b'P', &i.to_be_bytes()), &value)?;
			batch.commit()?;
		}
		assert!(store.mapsize()? > ALLOC_CHUNK_SIZE_DEFAULT_TEST);
		for i in 0..64u32 {
			assert_eq!(store.get(&to_key(b'P', &i.to_be_bytes()))?, Some(value.clone()));
		}
	}
	// data survives reopening
	{
		let store = open_store(test_dir);
		assert!(store.exists(&to_key(b'P', &63u32.to_be_bytes()))?);
	}
	clean_output_dir(test_dir);
	Ok(())
}

#[test]
fn errors_convert_to_core() {
	let core: mmr_core::Error = Error::NotFoundErr("x".to_owned()).into();
	assert_eq!(core, mmr_core::Error::NotFound("x".to_owned()));
	let core: mmr_core::Error = Error::OtherErr("boom".to_owned()).into();
	match core {
		mmr_core::Error::Store(msg) => assert!(msg.contains("boom")),
		other => panic!("unexpected {:?}", other),
	}
}
