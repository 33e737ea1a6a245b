//! Object mapper configuration.
//!
//! The configuration is usually loaded from a TOML file on startup, but can
//! also be constructed in code with [`MapperConfig::builder()`]:
//!
//! ```toml
//! property-inclusion = "non-null"
//! enabled-serialization-features = ["indent-output"]
//! disabled-deserialization-features = ["fail-on-trailing-tokens"]
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Configuration for an [`ObjectMapper`].
///
/// [`ObjectMapper`]: crate::ObjectMapper
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, bon::Builder)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct MapperConfig
{
	/// Which object members are written during serialization.
	#[builder(default)]
	pub property_inclusion: Inclusion,

	/// Serialization features to turn on in addition to the defaults.
	#[builder(default)]
	pub enabled_serialization_features: BTreeSet<SerializationFeature>,

	/// Serialization features to turn off.
	///
	/// These take precedence over [`enabled_serialization_features`].
	///
	/// [`enabled_serialization_features`]: MapperConfig::enabled_serialization_features
	#[builder(default)]
	pub disabled_serialization_features: BTreeSet<SerializationFeature>,

	/// Deserialization features to turn on in addition to the defaults.
	#[builder(default)]
	pub enabled_deserialization_features: BTreeSet<DeserializationFeature>,

	/// Deserialization features to turn off.
	///
	/// These take precedence over [`enabled_deserialization_features`].
	///
	/// [`enabled_deserialization_features`]: MapperConfig::enabled_deserialization_features
	#[builder(default)]
	pub disabled_deserialization_features: BTreeSet<DeserializationFeature>,
}

/// Policy deciding which object members are written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Inclusion
{
	/// Every member is written.
	Always,

	/// `null` members are skipped.
	NonNull,

	/// `null` members, empty strings, empty arrays and empty objects are
	/// skipped.
	///
	/// This keeps payloads down to what is actually needed.
	#[default]
	NonEmpty,
}

/// Optional behavior applied when writing JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SerializationFeature
{
	/// Pretty-print the output.
	IndentOutput,

	/// Sort object members by key, recursively.
	OrderMapEntriesByKeys,
}

/// Optional behavior applied when reading JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeserializationFeature
{
	/// Reject input that has anything but whitespace after the first value.
	FailOnTrailingTokens,

	/// Read a non-array value as a collection with one element.
	AcceptSingleValueAsArray,

	/// Read a one-element array as its element if the target is not a
	/// sequence.
	UnwrapSingleValueArrays,
}

impl Inclusion
{
	/// Whether a member with the given value is written under this policy.
	pub fn includes(self, value: &serde_json::Value) -> bool
	{
		use serde_json::Value;

		match (self, value) {
			(Self::NonNull | Self::NonEmpty, Value::Null) => false,
			(Self::NonEmpty, Value::String(string)) => !string.is_empty(),
			(Self::NonEmpty, Value::Array(elements)) => !elements.is_empty(),
			(Self::NonEmpty, Value::Object(members)) => !members.is_empty(),
			(Self::Always, _)
			| (
				Self::NonNull,
				Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) | Value::Object(_),
			)
			| (Self::NonEmpty, Value::Bool(_) | Value::Number(_)) => true,
		}
	}
}

impl SerializationFeature
{
	/// Whether this feature is on if not configured otherwise.
	pub const fn enabled_by_default(self) -> bool
	{
		match self {
			Self::IndentOutput | Self::OrderMapEntriesByKeys => false,
		}
	}
}

impl DeserializationFeature
{
	/// Whether this feature is on if not configured otherwise.
	pub const fn enabled_by_default(self) -> bool
	{
		match self {
			Self::FailOnTrailingTokens => true,
			Self::AcceptSingleValueAsArray | Self::UnwrapSingleValueArrays => false,
		}
	}
}

impl MapperConfig
{
	/// Parses a configuration from a TOML string.
	pub fn from_toml(toml: &str) -> Result<Self, ConfigError>
	{
		toml::from_str(toml).map_err(ConfigError::from)
	}

	/// Loads the configuration from the TOML file at `path`.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError>
	{
		let path = path.as_ref();
		let toml = fs::read_to_string(path)?;
		let config = Self::from_toml(&toml)?;

		debug!(path = %path.display(), ?config, "loaded mapper config");

		Ok(config)
	}

	/// Whether `feature` is on.
	pub fn serialization_enabled(&self, feature: SerializationFeature) -> bool
	{
		!self.disabled_serialization_features.contains(&feature)
			&& (feature.enabled_by_default() || self.enabled_serialization_features.contains(&feature))
	}

	/// Whether `feature` is on.
	pub fn deserialization_enabled(&self, feature: DeserializationFeature) -> bool
	{
		!self.disabled_deserialization_features.contains(&feature)
			&& (feature.enabled_by_default()
				|| self.enabled_deserialization_features.contains(&feature))
	}
}

#[cfg(test)]
mod tests
{
	use serde_json::json;

	use super::*;

	#[test]
	fn defaults()
	{
		let config = MapperConfig::default();

		assert_eq!(config.property_inclusion, Inclusion::NonEmpty);
		assert!(!config.serialization_enabled(SerializationFeature::IndentOutput));
		assert!(config.deserialization_enabled(DeserializationFeature::FailOnTrailingTokens));
		assert!(!config.deserialization_enabled(DeserializationFeature::AcceptSingleValueAsArray));
	}

	#[test]
	fn disable_wins_over_enable()
	{
		let config = MapperConfig::builder()
			.enabled_serialization_features(BTreeSet::from([SerializationFeature::IndentOutput]))
			.disabled_serialization_features(BTreeSet::from([SerializationFeature::IndentOutput]))
			.build();

		assert!(!config.serialization_enabled(SerializationFeature::IndentOutput));
	}

	#[test]
	fn parse_toml()
	{
		let config = MapperConfig::from_toml(
			r#"
			property-inclusion = "non-null"
			enabled-serialization-features = ["indent-output", "order-map-entries-by-keys"]
			disabled-deserialization-features = ["fail-on-trailing-tokens"]
			"#,
		)
		.unwrap();

		assert_eq!(config.property_inclusion, Inclusion::NonNull);
		assert!(config.serialization_enabled(SerializationFeature::IndentOutput));
		assert!(config.serialization_enabled(SerializationFeature::OrderMapEntriesByKeys));
		assert!(!config.deserialization_enabled(DeserializationFeature::FailOnTrailingTokens));
	}

	#[test]
	fn empty_toml_is_default()
	{
		assert_eq!(MapperConfig::from_toml("").unwrap(), MapperConfig::default());
	}

	#[test]
	fn unknown_keys_are_rejected()
	{
		assert!(matches!(
			MapperConfig::from_toml("default-field-visibility = \"any\""),
			Err(ConfigError::Parse(_)),
		));
	}

	#[test]
	fn inclusion_policies()
	{
		let values = [json!(null), json!(""), json!([]), json!({}), json!(0), json!(false), json!("x")];

		let included = |inclusion: Inclusion| {
			values.iter().filter(|value| inclusion.includes(value)).count()
		};

		assert_eq!(included(Inclusion::Always), 7);
		assert_eq!(included(Inclusion::NonNull), 6);
		assert_eq!(included(Inclusion::NonEmpty), 3);
	}
}
