//! Subscriber setup for the command-line tool.
//!
//! The library itself only emits events (under the [`SCANNER`] and [`DRIVER`] targets); nothing
//! is recorded unless a binary calls [`init`].

use std::fmt;
use std::io;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{
	filter::Targets, fmt as tracing_fmt, layer::SubscriberExt, util::{SubscriberInitExt, TryInitError},
	Layer, Registry,
};

pub const SCANNER: &str = "hardlight::scanner";
pub const DRIVER: &str = "hardlight::driver";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
	/// Multi-line, with targets and timestamps.
	Pretty,
	/// One line per event.
	#[default]
	Compact,
	Json,
}

impl FromStr for LogFormat {
	type Err = UnknownFormat;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"pretty" => Ok(Self::Pretty),
			"compact" => Ok(Self::Compact),
			"json" => Ok(Self::Json),
			_ => Err(UnknownFormat(s.to_owned())),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log format `{0}` (expected compact, pretty or json)")]
pub struct UnknownFormat(String);

/// Per-target verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
	pub global: Level,
	/// `None` means [`LogConfig::global`].
	pub scanner: Option<Level>,
	pub driver: Option<Level>,
}

impl Default for LogConfig {
	fn default() -> Self {
		Self::new(Level::WARN)
	}
}

impl LogConfig {
	pub const fn new(global: Level) -> Self {
		Self { global, scanner: None, driver: None }
	}

	pub fn level_for(&self, target: &str) -> Level {
		match target {
			SCANNER => self.scanner.unwrap_or(self.global),
			DRIVER => self.driver.unwrap_or(self.global),
			_ => self.global,
		}
	}

	fn targets(&self) -> Targets {
		Targets::new()
			.with_default(self.global)
			.with_target(SCANNER, self.level_for(SCANNER))
			.with_target(DRIVER, self.level_for(DRIVER))
	}
}

impl fmt::Display for LogConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (scanner {}, driver {})",
			self.global, self.level_for(SCANNER), self.level_for(DRIVER))
	}
}

/// Installs the global subscriber, writing to stderr. Fails if one is already installed.
pub fn init(config: &LogConfig, format: LogFormat) -> Result<(), TryInitError> {
	let layer = format_layer(format).with_filter(config.targets());
	tracing_subscriber::registry().with(layer).try_init()
}

fn format_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
	match format {
		LogFormat::Pretty => tracing_fmt::layer()
			.pretty()
			.with_target(true)
			.with_writer(io::stderr)
			.boxed(),
		LogFormat::Compact => tracing_fmt::layer()
			.compact()
			.with_target(false)
			.without_time()
			.with_writer(io::stderr)
			.boxed(),
		LogFormat::Json => tracing_fmt::layer()
			.json()
			.with_target(true)
			.with_writer(io::stderr)
			.boxed(),
	}
}
