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

//! Persistent storage for the mmr accumulator on top of LMDB.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

use mmr_util as util;

pub mod lmdb;
pub mod sources;

pub use crate::lmdb::{option_to_not_found, Batch, Error, Store};
pub use crate::sources::{LmdbHashSource, LmdbIndexSource};

/// Leaf digests by leaf position
pub const LEAF_PREFIX: u8 = b'l';
/// Node digests by node position
pub const NODE_PREFIX: u8 = b'n';
/// Leaf positions by leaf digest
pub const REVERSE_PREFIX: u8 = b'r';
/// Node records by digest
pub const HASH_PREFIX: u8 = b'h';
/// Number of leaves appended so far
pub const SIZE_PREFIX: u8 = b's';

/// Build a db key from a prefix and a byte vector identifier.
pub fn to_key(prefix: u8, k: &[u8]) -> Vec<u8> {
	let mut res = Vec::with_capacity(k.len() + 1);
	res.push(prefix);
	res.extend_from_slice(k);
	res
}
