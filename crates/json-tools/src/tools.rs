//! The [`JsonTools`] facade.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write as _};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use serde_json::Value;

use crate::{ConfigError, JsonError, MapperConfig, ModuleRegistry, ObjectMapper};

/// Decodes typed values from a byte stream.
pub trait Decode
{
	/// Reads a single `T` from `reader`.
	fn decode<T, R>(&self, reader: R) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
		R: io::Read;
}

impl<D: Decode + ?Sized> Decode for &D
{
	fn decode<T, R>(&self, reader: R) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
		R: io::Read,
	{
		(**self).decode(reader)
	}
}

impl Decode for ObjectMapper
{
	fn decode<T, R>(&self, reader: R) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
		R: io::Read,
	{
		self.read(reader)
	}
}

impl Decode for JsonTools
{
	fn decode<T, R>(&self, reader: R) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
		R: io::Read,
	{
		self.read_reader(reader)
	}
}

/// Convenience layer for reading and writing JSON.
///
/// Every operation goes through the [default object mapper].
///
/// [default object mapper]: JsonTools::default_object_mapper
#[derive(Debug)]
pub struct JsonTools
{
	mapper: ObjectMapper,
}

impl Default for JsonTools
{
	fn default() -> Self
	{
		Self::new(MapperConfig::default(), &ModuleRegistry::new())
	}
}

impl From<ObjectMapper> for JsonTools
{
	fn from(mapper: ObjectMapper) -> Self
	{
		Self { mapper }
	}
}

impl JsonTools
{
	/// Creates a new [`JsonTools`] with the given configuration and modules.
	pub fn new(config: MapperConfig, registry: &ModuleRegistry) -> Self
	{
		ObjectMapper::new(config, registry).into()
	}

	/// Creates a new [`JsonTools`] from a TOML configuration file.
	pub fn from_config_file(
		path: impl AsRef<Path>,
		registry: &ModuleRegistry,
	) -> Result<Self, ConfigError>
	{
		MapperConfig::load(path).map(|config| Self::new(config, registry))
	}

	/// The mapper used for all operations.
	pub fn default_object_mapper(&self) -> &ObjectMapper
	{
		&self.mapper
	}

	/// Writes `object` to `writer`.
	pub fn write_object<T, W>(&self, object: &T, writer: W) -> Result<(), JsonError>
	where
		T: Serialize + ?Sized,
		W: io::Write,
	{
		self.mapper.write(writer, object)
	}

	/// Writes `object` to the file at `path`, replacing its contents.
	pub fn write_object_to_file<T>(&self, object: &T, path: impl AsRef<Path>) -> Result<(), JsonError>
	where
		T: Serialize + ?Sized,
	{
		let tree = self.mapper.to_value(object)?;
		self.write_tree_to_file(&tree, path.as_ref())
	}

	/// Writes `object` to a string.
	pub fn write_object_to_string<T>(&self, object: &T) -> Result<String, JsonError>
	where
		T: Serialize + ?Sized,
	{
		self.mapper.to_string(object)
	}

	/// Writes `object` to a byte buffer.
	pub fn write_object_to_bytes<T>(&self, object: &T) -> Result<Vec<u8>, JsonError>
	where
		T: Serialize + ?Sized,
	{
		self.mapper.to_vec(object)
	}

	/// Writes `objects` to `writer` as a JSON array.
	///
	/// Each element is passed through the mapper on its own, so modules see
	/// single objects rather than the whole array.
	pub fn write_objects<I, W>(&self, objects: I, writer: W) -> Result<(), JsonError>
	where
		I: IntoIterator,
		I::Item: Serialize,
		W: io::Write,
	{
		let tree = self.collection_tree(objects)?;
		self.mapper.write_tree(writer, &tree)
	}

	/// Writes `objects` to the file at `path` as a JSON array.
	pub fn write_objects_to_file<I>(&self, objects: I, path: impl AsRef<Path>) -> Result<(), JsonError>
	where
		I: IntoIterator,
		I::Item: Serialize,
	{
		let tree = self.collection_tree(objects)?;
		self.write_tree_to_file(&tree, path.as_ref())
	}

	/// Writes `objects` to a string as a JSON array.
	pub fn write_objects_to_string<I>(&self, objects: I) -> Result<String, JsonError>
	where
		I: IntoIterator,
		I::Item: Serialize,
	{
		let bytes = self.write_objects_to_bytes(objects)?;

		// `serde_json` only ever produces UTF-8
		String::from_utf8(bytes).map_err(JsonError::serialization)
	}

	/// Writes `objects` to a byte buffer as a JSON array.
	pub fn write_objects_to_bytes<I>(&self, objects: I) -> Result<Vec<u8>, JsonError>
	where
		I: IntoIterator,
		I::Item: Serialize,
	{
		let mut bytes = Vec::with_capacity(256);
		self.write_objects(objects, &mut bytes)?;
		Ok(bytes)
	}

	/// Reads a `T` from `json`.
	pub fn read_str<T>(&self, json: &str) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
	{
		self.mapper
			.parse_str(json)
			.and_then(|tree| self.mapper.from_value(tree))
	}

	/// Reads a `T` from `bytes`.
	pub fn read_bytes<T>(&self, bytes: &[u8]) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
	{
		self.mapper
			.parse_slice(bytes)
			.and_then(|tree| self.mapper.from_value(tree))
	}

	/// Reads a `T` from `reader`.
	pub fn read_reader<T, R>(&self, reader: R) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
		R: io::Read,
	{
		self.mapper.read(reader)
	}

	/// Reads a `T` from the file at `path`.
	pub fn read_file<T>(&self, path: impl AsRef<Path>) -> Result<T, JsonError>
	where
		T: DeserializeOwned,
	{
		let tree = self.parse_file(path.as_ref())?;
		self.mapper.from_value(tree)
	}

	/// Reads a collection of `T` from `json`.
	pub fn read_collection_str<C, T>(&self, json: &str) -> Result<C, JsonError>
	where
		C: FromIterator<T>,
		T: DeserializeOwned,
	{
		self.mapper
			.parse_str(json)
			.and_then(|tree| self.mapper.collection_from_value(tree))
	}

	/// Reads a collection of `T` from `bytes`.
	pub fn read_collection_bytes<C, T>(&self, bytes: &[u8]) -> Result<C, JsonError>
	where
		C: FromIterator<T>,
		T: DeserializeOwned,
	{
		self.mapper
			.parse_slice(bytes)
			.and_then(|tree| self.mapper.collection_from_value(tree))
	}

	/// Reads a collection of `T` from `reader`.
	pub fn read_collection_reader<C, T, R>(&self, reader: R) -> Result<C, JsonError>
	where
		C: FromIterator<T>,
		T: DeserializeOwned,
		R: io::Read,
	{
		self.mapper
			.parse_reader(reader)
			.and_then(|tree| self.mapper.collection_from_value(tree))
	}

	/// Reads a collection of `T` from the file at `path`.
	pub fn read_collection_file<C, T>(&self, path: impl AsRef<Path>) -> Result<C, JsonError>
	where
		C: FromIterator<T>,
		T: DeserializeOwned,
	{
		let tree = self.parse_file(path.as_ref())?;
		self.mapper.collection_from_value(tree)
	}

	fn collection_tree<I>(&self, objects: I) -> Result<Value, JsonError>
	where
		I: IntoIterator,
		I::Item: Serialize,
	{
		objects
			.into_iter()
			.map(|object| self.mapper.to_value(&object))
			.collect::<Result<Vec<_>, _>>()
			.map(Value::Array)
	}

	fn write_tree_to_file(&self, tree: &Value, path: &Path) -> Result<(), JsonError>
	{
		debug!(path = %path.display(), "writing JSON file");

		let file = File::create(path).map_err(JsonError::serialization)?;
		let mut writer = BufWriter::new(file);

		self.mapper.write_tree(&mut writer, tree)?;
		writer.flush().map_err(JsonError::serialization)
	}

	fn parse_file(&self, path: &Path) -> Result<Value, JsonError>
	{
		debug!(path = %path.display(), "reading JSON file");

		let file = File::open(path).map_err(JsonError::deserialization)?;
		self.mapper.parse_reader(BufReader::new(file))
	}
}
