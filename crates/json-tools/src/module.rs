//! Mapper modules and the registry they are discovered through.
//!
//! A [`Module`] hooks into an [`ObjectMapper`] and may rewrite the JSON tree
//! after an object has been serialized and before a tree is deserialized.
//! Modules are not instantiated directly; instead a [`ModuleFactory`] is
//! registered under a name in a [`ModuleRegistry`] during startup, and every
//! mapper built from that registry gets its own set of modules.
//!
//! [`ObjectMapper`]: crate::ObjectMapper

use std::fmt;

use serde_json::Value;

use crate::DuplicateModuleError;

/// A hook into an [`ObjectMapper`].
///
/// [`ObjectMapper`]: crate::ObjectMapper
pub trait Module: fmt::Debug + Send + Sync
{
	/// Rewrites a tree produced by serialization, before it is written.
	fn transform_output(&self, value: &mut Value)
	{
		let _ = value;
	}

	/// Rewrites a parsed tree, before it is deserialized.
	fn transform_input(&self, value: &mut Value)
	{
		let _ = value;
	}
}

/// Creates [`Module`]s.
pub trait ModuleFactory: Send + Sync
{
	/// Creates a new module instance.
	fn create_module(&self) -> Box<dyn Module>;
}

impl<F> ModuleFactory for F
where
	F: Fn() -> Box<dyn Module> + Send + Sync,
{
	fn create_module(&self) -> Box<dyn Module>
	{
		self()
	}
}

/// Name-keyed table of [`ModuleFactory`]s.
///
/// Factories keep their registration order, which is also the order in which
/// the modules they create are applied.
#[derive(Default)]
pub struct ModuleRegistry
{
	factories: Vec<(Box<str>, Box<dyn ModuleFactory>)>,
}

impl ModuleRegistry
{
	/// Creates an empty registry.
	pub fn new() -> Self
	{
		Self::default()
	}

	/// Registers `factory` under `name`.
	pub fn register(
		&mut self,
		name: impl Into<Box<str>>,
		factory: impl ModuleFactory + 'static,
	) -> Result<&mut Self, DuplicateModuleError>
	{
		let name = name.into();

		if self.contains(&name) {
			return Err(DuplicateModuleError { name });
		}

		trace!(%name, "registered module factory");
		self.factories.push((name, Box::new(factory)));

		Ok(self)
	}

	/// Whether a factory is registered under `name`.
	pub fn contains(&self, name: &str) -> bool
	{
		self.names().any(|registered| registered == name)
	}

	/// The registered names, in registration order.
	pub fn names(&self) -> impl Iterator<Item = &str>
	{
		self.factories.iter().map(|(name, _)| &**name)
	}

	/// The number of registered factories.
	pub fn len(&self) -> usize
	{
		self.factories.len()
	}

	/// Whether no factory is registered.
	pub fn is_empty(&self) -> bool
	{
		self.factories.is_empty()
	}

	/// Instantiates one module per registered factory.
	pub fn create_modules(&self) -> Vec<Box<dyn Module>>
	{
		self.factories
			.iter()
			.map(|(_, factory)| factory.create_module())
			.collect()
	}
}

impl fmt::Debug for ModuleRegistry
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt.debug_list().entries(self.names()).finish()
	}
}
