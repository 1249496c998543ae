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

//! Hash combinators: deterministic, order-sensitive functions from an
//! ordered list of byte buffers to a digest. Parts are fed to the
//! underlying hash function in the order given.

use std::fmt;
use std::str::FromStr;

use argon2::{Algorithm, Params, Version};

use super::{Digest, Hash160, Hash224, Hash256, Hash384, Hash512};

/// Turns an ordered list of byte buffers into a digest.
pub trait HashCombinator: Send + Sync {
	/// Digest type produced.
	type Digest: Digest;

	/// Hashes the concatenation of `parts`, in order.
	fn combine(&self, parts: &[&[u8]]) -> Self::Digest;

	/// Hashes the canonical bytes of each digest, in order. This is how
	/// peaks get bagged into a root.
	fn combine_digests(&self, digests: &[Self::Digest]) -> Self::Digest {
		let bytes = map_vec!(digests, |d| d.to_bytes());
		let parts = map_vec!(bytes, |b| b.as_slice());
		self.combine(&parts)
	}
}

impl<H: HashCombinator + ?Sized> HashCombinator for &H {
	type Digest = H::Digest;

	fn combine(&self, parts: &[&[u8]]) -> H::Digest {
		(**self).combine(parts)
	}
}

fn digest_parts<D: digest::Digest>(parts: &[&[u8]]) -> Vec<u8> {
	let mut hasher = D::new();
	for part in parts {
		hasher.update(part);
	}
	hasher.finalize().to_vec()
}

macro_rules! rust_crypto_combinator {
	($(#[$attr:meta])* $name:ident, $inner:ty, $out:ident) => {
		$(#[$attr])*
		#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
		pub struct $name;

		impl HashCombinator for $name {
			type Digest = $out;

			fn combine(&self, parts: &[&[u8]]) -> $out {
				$out::from_slice(&digest_parts::<$inner>(parts))
			}
		}
	};
}

rust_crypto_combinator!(
	/// SHA-224
	Sha224,
	sha2::Sha224,
	Hash224
);
rust_crypto_combinator!(
	/// SHA-256
	Sha256,
	sha2::Sha256,
	Hash256
);
rust_crypto_combinator!(
	/// SHA-512
	Sha512,
	sha2::Sha512,
	Hash512
);
rust_crypto_combinator!(
	/// SHA3-256
	Sha3_256,
	sha3::Sha3_256,
	Hash256
);
rust_crypto_combinator!(
	/// SHA3-384
	Sha3_384,
	sha3::Sha3_384,
	Hash384
);
rust_crypto_combinator!(
	/// SHA3-512
	Sha3_512,
	sha3::Sha3_512,
	Hash512
);
rust_crypto_combinator!(
	/// RIPEMD-160
	Ripemd160,
	ripemd160::Ripemd160,
	Hash160
);

macro_rules! blake2b_combinator {
	($(#[$attr:meta])* $name:ident, $out:ident) => {
		$(#[$attr])*
		#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
		pub struct $name;

		impl HashCombinator for $name {
			type Digest = $out;

			fn combine(&self, parts: &[&[u8]]) -> $out {
				let mut hasher = blake2_rfc::blake2b::Blake2b::new($out::LEN);
				for part in parts {
					hasher.update(part);
				}
				$out::from_slice(hasher.finalize().as_bytes())
			}
		}
	};
}

blake2b_combinator!(
	/// BLAKE2b with a 256 bit output
	Blake2b256,
	Hash256
);
blake2b_combinator!(
	/// BLAKE2b with a 512 bit output
	Blake2b512,
	Hash512
);

/// BLAKE3
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blake3;

impl HashCombinator for Blake3 {
	type Digest = Hash256;

	fn combine(&self, parts: &[&[u8]]) -> Hash256 {
		let mut hasher = blake3::Hasher::new();
		for part in parts {
			hasher.update(part);
		}
		Hash256(*hasher.finalize().as_bytes())
	}
}

/// Salt used for every Argon2 combination. The combinator is a plain
/// deterministic hash, so the salt is fixed.
const ARGON2_SALT: [u8; 16] = [0; 16];

/// Memory cost in KiB of the default Argon2 parameters
pub const ARGON2_MEMORY_KIB: u32 = 64 * 1024;
/// Number of passes of the default Argon2 parameters
pub const ARGON2_ITERATIONS: u32 = 1;
/// Degree of parallelism of the default Argon2 parameters
pub const ARGON2_LANES: u32 = 4;

/// Argon2id over the concatenated parts, with a zero salt. Deliberately
/// expensive; the default parameters allocate 64 MiB per combination.
#[derive(Clone, Debug)]
pub struct Argon2 {
	params: Params,
}

impl Argon2 {
	/// Argon2id with custom memory (KiB), iteration and lane counts.
	pub fn with_params(memory_kib: u32, iterations: u32, lanes: u32) -> Result<Argon2, argon2::Error> {
		let params = Params::new(memory_kib, iterations, lanes, Some(Hash256::LEN))?;
		Ok(Argon2 { params })
	}
}

impl Default for Argon2 {
	// The default constants satisfy every `Params` bound (m >= 8 * p, t >= 1,
	// p below 2^24, output of at least 4 bytes), so the fallback to the
	// crate's own defaults is never taken.
	fn default() -> Argon2 {
		let params = Params::new(
			ARGON2_MEMORY_KIB,
			ARGON2_ITERATIONS,
			ARGON2_LANES,
			Some(Hash256::LEN),
		)
		.unwrap_or_default();
		Argon2 { params }
	}
}

impl HashCombinator for Argon2 {
	type Digest = Hash256;

	fn combine(&self, parts: &[&[u8]]) -> Hash256 {
		let password = parts.concat();
		let mut out = [0; 32];
		let ctx = argon2::Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
		// params are validated on construction, the salt is 16 bytes and the
		// output length is fixed to 32 in every constructor, which leaves a
		// password over 4 GiB as the only failure
		if let Err(e) = ctx.hash_password_into(&password, &ARGON2_SALT, &mut out) {
			error!("argon2 combination failed: {}", e);
		}
		Hash256(out)
	}
}

/// The 256 bit combinators selectable at runtime, e.g. from a config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HasherKind {
	/// SHA-256
	#[serde(rename = "sha256")]
	Sha256,
	/// SHA3-256
	#[serde(rename = "sha3_256")]
	Sha3_256,
	/// BLAKE2b-256
	#[serde(rename = "blake2b_256")]
	Blake2b256,
	/// BLAKE3
	#[serde(rename = "blake3")]
	Blake3,
	/// Argon2id with default parameters
	#[serde(rename = "argon2")]
	Argon2,
}

impl Default for HasherKind {
	fn default() -> HasherKind {
		HasherKind::Sha256
	}
}

impl HasherKind {
	/// Name as used in config files
	pub fn name(&self) -> &'static str {
		match self {
			HasherKind::Sha256 => "sha256",
			HasherKind::Sha3_256 => "sha3_256",
			HasherKind::Blake2b256 => "blake2b_256",
			HasherKind::Blake3 => "blake3",
			HasherKind::Argon2 => "argon2",
		}
	}
}

impl fmt::Display for HasherKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for HasherKind {
	type Err = String;

	fn from_str(s: &str) -> Result<HasherKind, String> {
		match s.to_lowercase().as_str() {
			"sha256" => Ok(HasherKind::Sha256),
			"sha3_256" => Ok(HasherKind::Sha3_256),
			"blake2b_256" => Ok(HasherKind::Blake2b256),
			"blake3" => Ok(HasherKind::Blake3),
			"argon2" => Ok(HasherKind::Argon2),
			other => Err(format!("unknown hasher: {}", other)),
		}
	}
}

/// A 256 bit combinator picked at runtime.
#[derive(Clone, Debug)]
pub enum DynHasher {
	/// SHA-256
	Sha256(Sha256),
	/// SHA3-256
	Sha3_256(Sha3_256),
	/// BLAKE2b-256
	Blake2b256(Blake2b256),
	/// BLAKE3
	Blake3(Blake3),
	/// Argon2id
	Argon2(Argon2),
}

impl From<HasherKind> for DynHasher {
	fn from(kind: HasherKind) -> DynHasher {
		match kind {
			HasherKind::Sha256 => DynHasher::Sha256(Sha256),
			HasherKind::Sha3_256 => DynHasher::Sha3_256(Sha3_256),
			HasherKind::Blake2b256 => DynHasher::Blake2b256(Blake2b256),
			HasherKind::Blake3 => DynHasher::Blake3(Blake3),
			HasherKind::Argon2 => DynHasher::Argon2(Argon2::default()),
		}
	}
}

impl HashCombinator for DynHasher {
	type Digest = Hash256;

	fn combine(&self, parts: &[&[u8]]) -> Hash256 {
		match self {
			DynHasher::Sha256(h) => h.combine(parts),
			DynHasher::Sha3_256(h) => h.combine(parts),
			DynHasher::Blake2b256(h) => h.combine(parts),
			DynHasher::Blake3(h) => h.combine(parts),
			DynHasher::Argon2(h) => h.combine(parts),
		}
	}
}
