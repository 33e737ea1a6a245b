//! The [`ObjectMapper`].
//!
//! All actual encoding and decoding is done by [`serde_json`]. The mapper
//! routes every value through an intermediate [`Value`] tree so that the
//! registered [`Module`]s and the [`MapperConfig`] can be applied to it.

use std::io;

use serde::de::{Deserialize, DeserializeOwned};
use serde::ser::Serialize;
use serde_json::Value;

use crate::config::{DeserializationFeature, Inclusion, MapperConfig, SerializationFeature};
use crate::module::{Module, ModuleRegistry};
use crate::{ErrorCode, JsonError};

/// A configured JSON reader and writer.
#[derive(Debug)]
pub struct ObjectMapper
{
	config: MapperConfig,
	modules: Vec<Box<dyn Module>>,
}

impl ObjectMapper
{
	/// Creates a new mapper with one module per factory in `registry`.
	pub fn new(config: MapperConfig, registry: &ModuleRegistry) -> Self
	{
		let modules = registry.create_modules();

		debug!(
			modules = modules.len(),
			inclusion = ?config.property_inclusion,
			"created object mapper",
		);

		Self { config, modules }
	}

	/// The configuration this mapper was built with.
	pub fn config(&self) -> &MapperConfig
	{
		&self.config
	}

	/// Serializes `value` into a tree, applying modules and the inclusion
	/// policy.
	pub fn to_value<T>(&self, value: &T) -> Result<Value, JsonError>
	where
		T: Serialize + ?Sized,
	{
		let mut tree = serde_json::to_value(value).map_err(JsonError::serialization)?;

		for module in &self.modules {
			module.transform_output(&mut tree);
		}

		prune(&mut tree, self.config.property_inclusion);

		if self.config.serialization_enabled(SerializationFeature::OrderMapEntriesByKeys) {
			sort_keys(&mut tree);
		}

		Ok(tree)
	}

	/// Writes an already prepared tree to `writer`.
	pub fn write_tree<W>(&self, writer: W, tree: &Value) -> Result<(), JsonError>
	where
		W: io::Write,
	{
		let result = if self.config.serialization_enabled(SerializationFeature::IndentOutput) {
			serde_json::to_writer_pretty(writer, tree)
		} else {
			serde_json::to_writer(writer, tree)
		};

		result.map_err(JsonError::serialization)
	}

	/// Serializes `value` into `writer`.
	pub fn write<W, T>(&self, writer: W, value: &T) -> Result<(), JsonError>
	where
		W: io::Write,
		T: Serialize + ?Sized,
	{
		let tree = self.to_value(value)?;
		self.write_tree(writer, &tree)
	}

	/// Serializes `value` into a byte buffer.
	pub fn to_vec<T>(&self, value: &T) -> Result<Vec<u8>, JsonError>
	where
		T: Serialize + ?Sized,
	{
		let mut bytes = Vec::with_capacity(128);
		self.write(&mut bytes, value)?;
		Ok(bytes)
	}

	/// Serializes `value` into a string.
	pub fn to_string<T>(&self, value: &T) -> Result<String, JsonError>
	where
		T: Serialize + ?Sized,
	{
		let tree = self.to_value(value)?;

		let result = if self.config.serialization_enabled(SerializationFeature::IndentOutput) {
			serde_json::to_string_pretty(&tree)
		} else {
			serde_json::to_string(&tree)
		};

		result.map_err(JsonError::serialization)
	}

	/// Parses a single JSON value from `reader`.
	pub fn parse_reader<R>(&self, reader: R) -> Result<Value, JsonError>
	where
		R: io::Read,
	{
		self.parse(serde_json::Deserializer::from_reader(reader))
	}

	/// Parses a single JSON value from `bytes`.
	pub fn parse_slice(&self, bytes: &[u8]) -> Result<Value, JsonError>
	{
		self.parse(serde_json::Deserializer::from_slice(bytes))
	}

	/// Parses a single JSON value from `json`.
	pub fn parse_str(&self, json: &str) -> Result<Value, JsonError>
	{
		self.parse(serde_json::Deserializer::from_str(json))
	}

	fn parse<'de, R>(&self, mut deserializer: serde_json::Deserializer<R>) -> Result<Value, JsonError>
	where
		R: serde_json::de::Read<'de>,
	{
		if self.config.deserialization_enabled(DeserializationFeature::FailOnTrailingTokens) {
			let tree = Value::deserialize(&mut deserializer).map_err(JsonError::deserialization)?;
			deserializer.end().map_err(JsonError::deserialization)?;
			return Ok(tree);
		}

		deserializer
			.into_iter::<Value>()
			.next()
			.ok_or_else(JsonError::empty_input)?
			.map_err(JsonError::deserialization)
	}

	/// Deserializes a `T` from a parsed tree, applying modules first.
	pub fn from_value<T>(&self, mut tree: Value) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
	{
		self.apply_input_modules(&mut tree);
		self.convert(&tree)
	}

	/// Deserializes a collection of `T` from a parsed tree, applying modules
	/// first.
	///
	/// The tree has to be an array, unless
	/// [`DeserializationFeature::AcceptSingleValueAsArray`] is enabled, in
	/// which case any other value is read as a single element.
	pub fn collection_from_value<C, T>(&self, mut tree: Value) -> Result<C, JsonError>
	where
		C: FromIterator<T>,
		T: DeserializeOwned,
	{
		self.apply_input_modules(&mut tree);

		match &tree {
			Value::Array(elements) => elements.iter().map(|element| self.convert::<T>(element)).collect(),
			Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Object(_) => {
				if !self
					.config
					.deserialization_enabled(DeserializationFeature::AcceptSingleValueAsArray)
				{
					return Err(JsonError::new(
						ErrorCode::UnexpectedNodeTypeForDeserialization,
						&[&node_type(&tree), &"array"],
					));
				}

				self.convert::<T>(&tree).map(|element| C::from_iter([element]))
			},
		}
	}

	/// Reads a `T` from `reader`.
	pub fn read<T, R>(&self, reader: R) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
		R: io::Read,
	{
		self.parse_reader(reader)
			.and_then(|tree| self.from_value(tree))
	}

	fn apply_input_modules(&self, tree: &mut Value)
	{
		for module in &self.modules {
			module.transform_input(tree);
		}
	}

	fn convert<T>(&self, tree: &Value) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
	{
		let error = match T::deserialize(tree) {
			Ok(value) => return Ok(value),
			Err(error) => error,
		};

		if !self.config.deserialization_enabled(DeserializationFeature::UnwrapSingleValueArrays) {
			return Err(JsonError::deserialization(error));
		}

		match tree.as_array().map(Vec::as_slice) {
			Some([element]) => T::deserialize(element).map_err(JsonError::deserialization),
			_ => Err(JsonError::deserialization(error)),
		}
	}
}

/// Removes object members excluded by `inclusion`, recursively.
///
/// Array elements are never removed, but objects inside arrays are pruned.
fn prune(tree: &mut Value, inclusion: Inclusion)
{
	match tree {
		Value::Object(members) => {
			members.retain(|_, member| inclusion.includes(member));

			for member in members.values_mut() {
				prune(member, inclusion);
			}
		},
		Value::Array(elements) => {
			for element in elements {
				prune(element, inclusion);
			}
		},
		Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {},
	}
}

fn sort_keys(tree: &mut Value)
{
	match tree {
		Value::Object(members) => {
			members.sort_keys();

			for member in members.values_mut() {
				sort_keys(member);
			}
		},
		Value::Array(elements) => {
			for element in elements {
				sort_keys(element);
			}
		},
		Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {},
	}
}

fn node_type(tree: &Value) -> &'static str
{
	match tree {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
