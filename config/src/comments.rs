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

//! Comments for configuration + injection into output .toml
use std::collections::HashMap;

/// maps entries to Comments that should precede them
fn comments() -> HashMap<String, String> {
	let mut retval = HashMap::new();
	retval.insert(
		"[mmr]".to_string(),
		"
# Generated configuration file for a persistent Merkle Mountain Range.

#########################################
### MOUNTAIN RANGE CONFIGURATION      ###
#########################################
"
		.to_string(),
	);

	retval.insert(
		"db_root".to_string(),
		"
#the directory, relative to current, in which the LMDB environment
#is stored
"
		.to_string(),
	);

	retval.insert(
		"env_name".to_string(),
		"
#name of the LMDB environment directory under db_root
"
		.to_string(),
	);

	retval.insert(
		"hasher".to_string(),
		"
#hash combinator for nodes and the root, one of:
#sha256, sha3_256, blake2b_256, blake3, argon2
#an existing database must keep the hasher it was built with
"
		.to_string(),
	);

	retval.insert(
		"max_readers".to_string(),
		"
#maximum number of concurrent LMDB read transactions
"
		.to_string(),
	);

	retval.insert(
		"store_nodes".to_string(),
		"
#also store every node keyed by its digest, so nodes can be restored
#by position
"
		.to_string(),
	);

	retval.insert(
		"[logging]".to_string(),
		"
#########################################
### LOGGING CONFIGURATION             ###
#########################################
"
		.to_string(),
	);

	retval.insert(
		"log_to_stdout".to_string(),
		"
#whether to log to stdout
"
		.to_string(),
	);

	retval.insert(
		"stdout_log_level".to_string(),
		"
#log level for stdout: Error, Warning, Info, Debug, Trace
"
		.to_string(),
	);

	retval.insert(
		"log_to_file".to_string(),
		"
#whether to log to a file
"
		.to_string(),
	);

	retval.insert(
		"file_log_level".to_string(),
		"
#log level for file: Error, Warning, Info, Debug, Trace
"
		.to_string(),
	);

	retval.insert(
		"log_file_path".to_string(),
		"
#log file path
"
		.to_string(),
	);

	retval.insert(
		"log_file_append".to_string(),
		"
#whether to append to the log file (true), or replace it on every run (false)
"
		.to_string(),
	);

	retval.insert(
		"log_max_size".to_string(),
		"
#maximum log file size in bytes before performing log rotation
#comment it to disable log rotation
"
		.to_string(),
	);

	retval.insert(
		"log_max_files".to_string(),
		"
#maximum count of the log files to rotate over
"
		.to_string(),
	);

	retval
}

fn get_key(line: &str) -> String {
	if line.contains('[') && line.contains(']') {
		line.to_owned()
	} else if line.contains('=') {
		line.split('=').next().unwrap_or("").trim().to_owned()
	} else {
		"NOT_FOUND".to_owned()
	}
}

pub fn insert_comments(orig: String) -> String {
	let comments = comments();
	let mut ret_val = String::new();
	for l in orig.split('\n') {
		let key = get_key(l);
		if let Some(v) = comments.get(&key) {
			ret_val.push_str(v);
		}
		ret_val.push_str(l);
		ret_val.push('\n');
	}
	ret_val
}
