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

//! The mountain range accumulator, its storage collaborators and proofs.

mod backend;
mod mem_backend;
mod mountain_range;
mod proof;

pub use self::backend::{HashSource, IndexSource, ReverseLeafLookup};
pub use self::mem_backend::{MemHashSource, MemIndexSource};
pub use self::mountain_range::MountainRange;
pub use self::proof::{validate_proof, Proof};
