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

//! Error types surfaced by the accumulator and its collaborators.

use crate::ser;

/// Errors returned by mountain range operations and storage collaborators.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// A lookup missed, either in storage or in the reverse leaf index
	#[error("Not found: {0}")]
	NotFound(String),
	/// A leaf position at or beyond the current size was requested
	#[error("Position {position} out of range for size {size}")]
	OutOfRange {
		/// requested leaf position
		position: String,
		/// size of the mountain range at the time of the request
		size: String,
	},
	/// Digest or position width inconsistent with the configured types
	#[error("Type mismatch: {0}")]
	TypeMismatch(String),
	/// Malformed binary data
	#[error("Encoding error: {0}")]
	Encoding(ser::Error),
	/// A storage collaborator failed
	#[error("Storage error: {0}")]
	Store(String),
	/// Stored nodes don't hash to their recorded parents
	#[error("Invalid tree: {0}")]
	InvalidTree(String),
}

impl From<ser::Error> for Error {
	fn from(e: ser::Error) -> Error {
		match e {
			ser::Error::TypeMismatch(msg) => Error::TypeMismatch(msg),
			e => Error::Encoding(e),
		}
	}
}

/// Unwraps the inner option by converting the none case to a not found error
pub fn option_to_not_found<T, F>(res: Result<Option<T>, Error>, field_name: F) -> Result<T, Error>
where
	F: Fn() -> String,
{
	match res {
		Ok(None) => Err(Error::NotFound(field_name())),
		Ok(Some(o)) => Ok(o),
		Err(e) => Err(e),
	}
}
