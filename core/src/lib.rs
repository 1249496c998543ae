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

//! Merkle Mountain Range accumulator.
//!
//! Positions are pure coordinates: heights, siblings, parents and peaks are
//! all derived with bit arithmetic over a single integer, for any integer
//! width implementing `IndexValue`. The `MountainRange` appends leaves,
//! bags its peaks into a root on demand and builds inclusion proofs that
//! can be checked without access to the accumulator.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use mmr_util as util;

#[macro_use]
mod macros;

pub mod error;
pub mod hash;
pub mod index;
pub mod mmr;
pub mod node;
pub mod ser;

pub use crate::error::Error;
pub use crate::hash::{Digest, DynHasher, HashCombinator, HasherKind};
pub use crate::index::{peaks, peaks_for_size, IndexValue, Position};
pub use crate::mmr::{
	validate_proof, HashSource, IndexSource, MemHashSource, MemIndexSource, MountainRange, Proof,
	ReverseLeafLookup,
};
pub use crate::node::{Node, NodeRecord};
