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

//! Digest types and the hash combinators producing them.

mod digest;
mod hasher;

pub use self::digest::{Digest, Hash128, Hash160, Hash224, Hash256, Hash384, Hash512};
pub use self::hasher::{
	Argon2, Blake2b256, Blake2b512, Blake3, DynHasher, HashCombinator, HasherKind, Ripemd160,
	Sha224, Sha256, Sha3_256, Sha3_384, Sha3_512, Sha512,
};
