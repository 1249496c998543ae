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

//! Append-only Merkle Mountain Range accumulator.
//!
//! This crate ties the workspace together: `mmr_core` holds the position
//! arithmetic, the accumulator and proofs, `mmr_store` the LMDB storage
//! collaborators and `mmr_config` the TOML configuration.
//! `open_lmdb_mountain_range` builds a persistent mountain range straight
//! from a configuration.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

use std::sync::Arc;

pub use mmr_config as config;
pub use mmr_core as core;
pub use mmr_store as store;
pub use mmr_util as util;

pub use mmr_config::GlobalConfig;
pub use mmr_core::hash::Hash256;
pub use mmr_core::{
	peaks, peaks_for_size, validate_proof, Digest, DynHasher, Error, HashCombinator, HasherKind,
	IndexValue, MountainRange, Node, Position, Proof,
};
pub use mmr_store::{LmdbHashSource, LmdbIndexSource, Store};

/// A mountain range persisted in LMDB, hashing with the configured
/// combinator.
pub type LmdbMountainRange<I> = MountainRange<I, DynHasher, Arc<LmdbIndexSource<I, Hash256>>>;

/// Sets up logging as configured, stdout only at the default level when
/// the config has no logging section.
pub fn init_logging(config: &GlobalConfig) {
	util::init_logger(config.logging().cloned());
}

/// Opens, or creates, the LMDB environment named in `config` and returns
/// a mountain range at the leaf count found there.
pub fn open_lmdb_mountain_range<I: IndexValue>(
	config: &GlobalConfig,
) -> Result<LmdbMountainRange<I>, Error> {
	let mmr_config = config.mmr();
	let store = Arc::new(Store::new(
		&mmr_config.db_root,
		Some(mmr_config.env_name.as_str()),
		None,
		mmr_config.max_readers,
	)?);
	let indexes = Arc::new(LmdbIndexSource::new(store.clone()));
	let size = indexes.size()?;
	info!(
		"opened mountain range at {}/{} with {} leaves, hasher {}",
		mmr_config.db_root, mmr_config.env_name, size, mmr_config.hasher
	);

	let mmr = MountainRange::at(DynHasher::from(mmr_config.hasher), indexes, size);
	if mmr_config.store_nodes {
		Ok(mmr.with_hash_source(Box::new(LmdbHashSource::new(store))))
	} else {
		Ok(mmr)
	}
}
