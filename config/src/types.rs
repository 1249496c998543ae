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

//! Public types for config modules

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::core::HasherKind;
use crate::util::LoggingConfig;

/// Error type wrapping config errors.
#[derive(Debug)]
pub enum ConfigError {
	/// Error with parsing of config file
	ParseError(String, String),

	/// Error with fileIO while reading config file
	FileIOError(String, String),

	/// No file found
	FileNotFoundError(String),

	/// Error serializing config values
	SerializationError(String),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			ConfigError::ParseError(ref file_name, ref message) => write!(
				f,
				"Error parsing configuration file at {} - {}",
				file_name, message
			),
			ConfigError::FileIOError(ref file_name, ref message) => {
				write!(f, "{} {}", message, file_name)
			}
			ConfigError::FileNotFoundError(ref file_name) => {
				write!(f, "Configuration file not found: {}", file_name)
			}
			ConfigError::SerializationError(ref message) => {
				write!(f, "Error serializing configuration: {}", message)
			}
		}
	}
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
	fn from(error: io::Error) -> ConfigError {
		ConfigError::FileIOError(
			String::from(""),
			format!("Error loading config file: {}", error),
		)
	}
}

const DB_ROOT: &str = "./mmr_data";
const ENV_NAME: &str = "mmr";

/// Where and how the persistent mountain range lives.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MmrConfig {
	/// Directory holding the LMDB environment
	#[serde(default = "default_db_root")]
	pub db_root: String,
	/// Name of the LMDB environment under `db_root`
	#[serde(default = "default_env_name")]
	pub env_name: String,
	/// Hash combinator used for nodes and the root
	#[serde(default)]
	pub hasher: HasherKind,
	/// Maximum number of concurrent LMDB readers
	#[serde(default)]
	pub max_readers: Option<u32>,
	/// Also persist node records so nodes can be restored by position
	#[serde(default = "default_store_nodes")]
	pub store_nodes: bool,
}

fn default_db_root() -> String {
	DB_ROOT.to_owned()
}

fn default_env_name() -> String {
	ENV_NAME.to_owned()
}

fn default_store_nodes() -> bool {
	true
}

impl Default for MmrConfig {
	fn default() -> MmrConfig {
		MmrConfig {
			db_root: default_db_root(),
			env_name: default_env_name(),
			hasher: HasherKind::default(),
			max_readers: None,
			store_nodes: default_store_nodes(),
		}
	}
}

/// Holds the configuration members together with the file they were
/// read from, which isn't serialized.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalConfig {
	/// Keep track of the file we've read
	pub config_file_path: Option<PathBuf>,
	/// Global member config
	pub members: ConfigMembers,
}

/// The serialized part of the configuration, one TOML table per member.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConfigMembers {
	/// Mountain range config
	#[serde(default)]
	pub mmr: MmrConfig,
	/// Logging config
	pub logging: Option<LoggingConfig>,
}
