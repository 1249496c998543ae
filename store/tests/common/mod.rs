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

use std::fs;
use std::sync::Arc;

use mmr_store::lmdb::ALLOC_CHUNK_SIZE_DEFAULT_TEST;
use mmr_store::Store;

pub fn clean_output_dir(test_dir: &str) {
	let _ = fs::remove_dir_all(test_dir);
}

pub fn setup(test_dir: &str) {
	mmr_util::init_test_logger();
	clean_output_dir(test_dir);
}

pub fn open_store(test_dir: &str) -> Arc<Store> {
	let store = Store::new(test_dir, Some("mmr"), None, None)
		.unwrap()
		.with_alloc_chunk_size(ALLOC_CHUNK_SIZE_DEFAULT_TEST);
	Arc::new(store)
}
