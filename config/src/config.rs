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

//! Configuration file management

use std::fs::{self, File};
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use crate::comments::insert_comments;
use crate::types::{ConfigError, ConfigMembers, GlobalConfig, MmrConfig};
use crate::util::LoggingConfig;

/// The default file name to use when trying to derive
/// the config file location
pub const CONFIG_FILE_NAME: &str = "mmr.toml";
const MMR_HOME: &str = ".mmr";

fn path_str(path: &Path) -> Result<&str, ConfigError> {
	path.to_str().ok_or_else(|| {
		ConfigError::FileIOError(
			format!("{}", path.display()),
			"Path is not valid UTF-8:".to_owned(),
		)
	})
}

/// Loads the given config file or, without one, the default file under
/// `~/.mmr`, writing it out with defaults first if it doesn't exist. A
/// fresh default config keeps its data next to the config file.
pub fn initial_setup(config_file_path: Option<&str>) -> Result<GlobalConfig, ConfigError> {
	if let Some(p) = config_file_path {
		return GlobalConfig::new(p);
	}
	let mmr_path = match dirs::home_dir() {
		Some(mut p) => {
			p.push(MMR_HOME);
			p
		}
		None => PathBuf::from(MMR_HOME),
	};
	if !mmr_path.exists() {
		fs::create_dir_all(&mmr_path)?;
	}
	let mut config_path = mmr_path.clone();
	config_path.push(CONFIG_FILE_NAME);

	if !config_path.exists() {
		let mut default_config = GlobalConfig::default();
		let mut db_root = mmr_path.clone();
		db_root.push("mmr_data");
		default_config.members.mmr.db_root = path_str(&db_root)?.to_owned();
		default_config.write_to_file(path_str(&config_path)?)?;
	}
	GlobalConfig::new(path_str(&config_path)?)
}

/// Returns the defaults, as strewn throughout the code
impl Default for ConfigMembers {
	fn default() -> ConfigMembers {
		ConfigMembers {
			mmr: MmrConfig::default(),
			logging: Some(LoggingConfig::default()),
		}
	}
}

impl Default for GlobalConfig {
	fn default() -> GlobalConfig {
		GlobalConfig {
			config_file_path: None,
			members: ConfigMembers::default(),
		}
	}
}

impl GlobalConfig {
	/// Requires the path to a config file
	pub fn new(file_path: &str) -> Result<GlobalConfig, ConfigError> {
		let config_file = PathBuf::from(file_path);
		if !config_file.exists() {
			return Err(ConfigError::FileNotFoundError(file_path.to_owned()));
		}
		let mut contents = String::new();
		File::open(&config_file)?.read_to_string(&mut contents)?;
		let members = GlobalConfig::parse(&contents)
			.map_err(|e| ConfigError::ParseError(file_path.to_owned(), format!("{}", e)))?;
		Ok(GlobalConfig {
			config_file_path: Some(config_file),
			members,
		})
	}

	fn parse(contents: &str) -> Result<ConfigMembers, toml::de::Error> {
		toml::from_str(contents)
	}

	/// Mountain range settings
	pub fn mmr(&self) -> &MmrConfig {
		&self.members.mmr
	}

	/// Logging settings, if any
	pub fn logging(&self) -> Option<&LoggingConfig> {
		self.members.logging.as_ref()
	}

	/// Serialize config
	pub fn ser_config(&self) -> Result<String, ConfigError> {
		toml::to_string(&self.members)
			.map(insert_comments)
			.map_err(|e| ConfigError::SerializationError(format!("{}", e)))
	}

	/// Write configuration to a file
	pub fn write_to_file(&mut self, name: &str) -> Result<(), ConfigError> {
		let conf_out = self.ser_config()?;
		let mut file = File::create(name)?;
		file.write_all(conf_out.as_bytes())?;
		self.config_file_path = Some(PathBuf::from(name));
		Ok(())
	}
}
