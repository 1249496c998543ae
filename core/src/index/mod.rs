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

//! Navigation over Merkle Mountain Range coordinates.
//!
//! A coordinate is a single integer read either as a leaf position (the
//! 0-based insertion order) or as a node position. A node at position `x`
//! with height `h` (the number of trailing zeros of `x`) covers the leaves
//! `[x - 2^h, x + 2^h)`, so the node over leaves 0 and 1 is `node_1`, the
//! node over leaves 0..4 is `node_2` and so on. Every relation between
//! positions reduces to a handful of bit operations on that integer.

mod peaks;
mod position;
mod value;

pub use self::peaks::{peaks, peaks_for_size};
pub use self::position::Position;
pub use self::value::IndexValue;
