//! # JSON tools
//!
//! A configuration and convenience layer on top of [`serde_json`].
//!
//! - [`MapperConfig`] describes how objects are written and read.
//! - [`ModuleRegistry`] collects [`ModuleFactory`]s under a name during
//!   startup; every [`ObjectMapper`] gets its own set of [`Module`]s.
//! - [`JsonTools`] is the read/write facade; a process-wide instance is
//!   installed once with [`install()`] and retrieved with [`get()`].
//! - [`ErrorCode`] and [`JsonError`] describe everything that can go wrong.

#[macro_use(Display, From, Error)]
extern crate derive_more as _;

#[macro_use]
extern crate tracing;

pub use self::{
	config::{DeserializationFeature, Inclusion, MapperConfig, SerializationFeature},
	error::{ConfigError, DuplicateModuleError, ErrorCode, JsonError},
	mapper::ObjectMapper,
	module::{Module, ModuleFactory, ModuleRegistry},
	tools::{Decode, JsonTools},
};
use std::sync::OnceLock;

pub mod config;
mod error;
mod mapper;
pub mod module;
mod tools;

static JSON_TOOLS: OnceLock<JsonTools> = OnceLock::new();

/// Installs the process-wide [`JsonTools`].
///
/// This should happen once during startup, before anything calls [`get()`].
/// If an instance is already installed, `tools` is handed back.
pub fn install(tools: JsonTools) -> Result<(), Box<JsonTools>>
{
	JSON_TOOLS.set(tools).map_err(Box::new)?;
	info!("installed JSON tools");
	Ok(())
}

/// Returns the process-wide [`JsonTools`].
///
/// If none were [installed], a default-configured instance without modules
/// is created on first use.
///
/// [installed]: install
pub fn get() -> &'static JsonTools
{
	JSON_TOOLS.get_or_init(|| {
		debug!("no JSON tools installed; using defaults");
		JsonTools::default()
	})
}
