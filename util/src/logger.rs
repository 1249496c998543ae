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

//! Logging wrapper to be used throughout all crates in the workspace
use crate::types::{LogLevel, LoggingConfig};
use crate::Mutex;

use backtrace::Backtrace;
use std::{panic, thread};

use log::Record;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::append::rolling_file::{
	policy::compound::roll::fixed_window::FixedWindowRoller,
	policy::compound::trigger::size::SizeTrigger, policy::compound::CompoundPolicy,
	RollingFileAppender,
};
use log4rs::append::Append;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::{threshold::ThresholdFilter, Filter, Response};

lazy_static! {
	/// Flag to observe whether logging was explicitly initialised (don't output otherwise)
	static ref WAS_INIT: Mutex<bool> = Mutex::new(false);
	/// Static Logging configuration, should only be set once, before first logging call
	static ref LOGGING_CONFIG: Mutex<LoggingConfig> = Mutex::new(LoggingConfig::default());
}

const LOGGING_PATTERN: &str = "{d(%Y%m%d %H:%M:%S%.3f)} {h({l})} {M} - {m}{n}";

/// This filter is rejecting messages that don't come from an mmr crate
/// so that dependencies don't flood the logs
#[derive(Debug)]
struct MmrFilter;

impl Filter for MmrFilter {
	fn filter(&self, record: &Record<'_>) -> Response {
		if let Some(module_path) = record.module_path() {
			if module_path.starts_with("mmr") {
				return Response::Neutral;
			}
		}

		Response::Reject
	}
}

fn file_appender(c: &LoggingConfig) -> Result<Box<dyn Append>, String> {
	// If maximum log size is specified, use rolling file appender
	// or use basic one otherwise
	let encoder = Box::new(PatternEncoder::new(LOGGING_PATTERN));
	if let Some(size) = c.log_max_size {
		let roller = FixedWindowRoller::builder()
			.build(&format!("{}.{{}}.gz", c.log_file_path), c.log_max_files)
			.map_err(|e| format!("log roller: {}", e))?;
		let trigger = SizeTrigger::new(size);
		let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

		let appender = RollingFileAppender::builder()
			.append(c.log_file_append)
			.encoder(encoder)
			.build(&c.log_file_path, Box::new(policy))
			.map_err(|e| format!("failed to create logfile {}: {}", c.log_file_path, e))?;
		Ok(Box::new(appender))
	} else {
		let appender = FileAppender::builder()
			.append(c.log_file_append)
			.encoder(encoder)
			.build(&c.log_file_path)
			.map_err(|e| format!("failed to create logfile {}: {}", c.log_file_path, e))?;
		Ok(Box::new(appender))
	}
}

fn build_config(c: &LoggingConfig) -> Result<Config, String> {
	let level_stdout = c.stdout_log_level.to_level_filter();
	let level_file = c.file_log_level.to_level_filter();

	// Determine minimum logging level for Root logger
	let level_minimum = match (c.log_to_stdout, c.log_to_file) {
		(true, true) => level_stdout.max(level_file),
		(false, true) => level_file,
		_ => level_stdout,
	};

	let mut root = Root::builder();
	let mut appenders = vec![];

	if c.log_to_stdout {
		let stdout = ConsoleAppender::builder()
			.encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
			.build();
		appenders.push(
			Appender::builder()
				.filter(Box::new(ThresholdFilter::new(level_stdout)))
				.filter(Box::new(MmrFilter))
				.build("stdout", Box::new(stdout)),
		);
		root = root.appender("stdout");
	}

	if c.log_to_file {
		appenders.push(
			Appender::builder()
				.filter(Box::new(ThresholdFilter::new(level_file)))
				.filter(Box::new(MmrFilter))
				.build("file", file_appender(c)?),
		);
		root = root.appender("file");
	}

	Config::builder()
		.appenders(appenders)
		.build(root.build(level_minimum))
		.map_err(|e| format!("invalid logging config: {}", e))
}

/// Initialize the logger with the given configuration.
/// Only the first successful call installs a logger, later calls are no-ops.
pub fn init_logger(config: Option<LoggingConfig>) {
	if let Some(c) = config {
		let mut was_init_ref = WAS_INIT.lock();
		if *was_init_ref {
			return;
		}

		let log4rs_config = match build_config(&c) {
			Ok(lc) => lc,
			Err(e) => {
				eprintln!("Unable to set up logging: {}", e);
				return;
			}
		};
		if let Err(e) = log4rs::init_config(log4rs_config) {
			eprintln!("Unable to set up logging: {}", e);
			return;
		}

		info!(
			"log4rs is initialized, file level: {:?}, stdout level: {:?}",
			c.file_log_level, c.stdout_log_level
		);

		// Save current logging configuration
		*LOGGING_CONFIG.lock() = c;
		*was_init_ref = true;
	}

	send_panic_to_log();
}

/// Initializes the logger for unit and integration tests
pub fn init_test_logger() {
	let mut was_init_ref = WAS_INIT.lock();
	if *was_init_ref {
		return;
	}
	let logger = LoggingConfig {
		log_to_file: false,
		stdout_log_level: LogLevel::Debug,
		..LoggingConfig::default()
	};

	let config = match build_config(&logger) {
		Ok(c) => c,
		Err(_) => return,
	};
	// another harness may have installed a global logger already
	if log4rs::init_config(config).is_err() {
		return;
	}

	info!(
		"log4rs is initialized, stdout level: {:?}",
		logger.stdout_log_level
	);

	*LOGGING_CONFIG.lock() = logger;
	*was_init_ref = true;
}

/// hook to send panics to logs as well as stderr
fn send_panic_to_log() {
	panic::set_hook(Box::new(|info| {
		let backtrace = Backtrace::new();

		let thread = thread::current();
		let thread = thread.name().unwrap_or("unnamed");

		let msg = match info.payload().downcast_ref::<&'static str>() {
			Some(s) => *s,
			None => match info.payload().downcast_ref::<String>() {
				Some(s) => &**s,
				None => "Box<Any>",
			},
		};

		match info.location() {
			Some(location) => {
				error!(
					"\nthread '{}' panicked at '{}': {}:{}{:?}\n\n",
					thread,
					msg,
					location.file(),
					location.line(),
					backtrace
				);
			}
			None => error!("thread '{}' panicked at '{}'{:?}", thread, msg, backtrace),
		}
		//also print to stderr
		let config = LOGGING_CONFIG.lock();
		eprintln!(
			"Thread '{}' panicked with message:\n\"{}\"\nSee {} for further details.",
			thread, msg, config.log_file_path
		);
	}));
}
