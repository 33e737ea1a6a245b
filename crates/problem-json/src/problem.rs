//! The [`Problem`] type.

use std::fmt;

use serde::Deserialize;
use serde::de::{self, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::ProblemBuilder;

/// The `type` used when no other is given.
///
/// See: <https://www.rfc-editor.org/rfc/rfc9457.html#name-about-blank>
pub const ABOUT_BLANK: &str = "about:blank";

/// The `title` derived for status codes without a standard reason phrase.
pub const UNKNOWN_STATUS_TITLE: &str = "Unknown HTTP Status";

/// [RFC 7807][rfc] - Problem Details
///
/// A machine- and human-readable description of a failed request. Problems
/// are immutable; use [`Problem::builder()`] to create one, or
/// [`Problem::to_builder()`] to derive a new one from an existing one.
///
/// [rfc]: https://www.rfc-editor.org/rfc/rfc7807.html
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Problem
{
	/// The response's [`type`] member.
	///
	/// [`type`]: https://www.rfc-editor.org/rfc/rfc9457.html#section-3.1.1
	#[serde(rename = "type", default = "about_blank", deserialize_with = "deserialize_type")]
	pub(crate) type_uri: String,

	/// The response's [`title`] member.
	///
	/// [`title`]: https://www.rfc-editor.org/rfc/rfc9457.html#section-3.1.3
	#[serde(default)]
	pub(crate) title: Option<String>,

	/// The response's [`status`] member; `0` if unset.
	///
	/// [`status`]: https://www.rfc-editor.org/rfc/rfc9457.html#section-3.1.2
	#[serde(default, deserialize_with = "deserialize_status")]
	pub(crate) status: u16,

	/// The response's [`detail`] member.
	///
	/// [`detail`]: https://www.rfc-editor.org/rfc/rfc9457.html#section-3.1.4
	#[serde(default)]
	pub(crate) detail: Option<String>,

	/// The response's [`instance`] member.
	///
	/// [`instance`]: https://www.rfc-editor.org/rfc/rfc9457.html#section-3.1.5
	#[serde(default)]
	pub(crate) instance: Option<String>,
}

fn about_blank() -> String
{
	String::from(ABOUT_BLANK)
}

/// `null` is treated like a missing `type`.
fn deserialize_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	<Option<String> as Deserialize<'de>>::deserialize(deserializer)
		.map(|maybe_type| maybe_type.unwrap_or_else(about_blank))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr
{
	Number(u16),
	Text(String),
}

/// Accepts the status as a number, a numeric string, or `null` (unset).
fn deserialize_status<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
	D: Deserializer<'de>,
{
	match <Option<StatusRepr> as Deserialize<'de>>::deserialize(deserializer)? {
		None => Ok(0),
		Some(StatusRepr::Number(status)) => Ok(status),
		Some(StatusRepr::Text(status)) => status
			.trim()
			.parse::<u16>()
			.map_err(|_| de::Error::custom(format_args!("invalid status code `{status}`"))),
	}
}

/// Returns the standard reason phrase for `status`.
///
/// Codes without one (including `0`) map to [`UNKNOWN_STATUS_TITLE`].
pub fn reason_phrase(status: u16) -> &'static str
{
	http::StatusCode::from_u16(status)
		.ok()
		.and_then(|status| status.canonical_reason())
		.unwrap_or(UNKNOWN_STATUS_TITLE)
}

impl Default for Problem
{
	/// An empty problem.
	///
	/// The `type` is [`ABOUT_BLANK`]; every other member is unset. In
	/// particular, no `title` is derived.
	fn default() -> Self
	{
		Self { type_uri: about_blank(), title: None, status: 0, detail: None, instance: None }
	}
}

impl Problem
{
	/// Creates a new, empty [`ProblemBuilder`].
	pub fn builder() -> ProblemBuilder
	{
		ProblemBuilder::default()
	}

	/// Creates a [`ProblemBuilder`] holding a copy of every member of
	/// `existing`.
	pub fn builder_from(existing: &Self) -> ProblemBuilder
	{
		ProblemBuilder::from(existing.clone())
	}

	/// Creates a [`ProblemBuilder`] holding a copy of every member of `self`.
	pub fn to_builder(&self) -> ProblemBuilder
	{
		Self::builder_from(self)
	}

	/// Creates a problem for a bare HTTP status code.
	///
	/// The `title` is the status code's [reason phrase]; `detail` and
	/// `instance` stay unset.
	///
	/// [reason phrase]: reason_phrase
	pub fn for_status(status: u16) -> Self
	{
		Self::builder()
			.status(status)
			.title(reason_phrase(status))
			.build()
	}

	/// The `type` member.
	pub fn problem_type(&self) -> &str
	{
		&self.type_uri
	}

	/// The `title` member, if any.
	pub fn title(&self) -> Option<&str>
	{
		self.title.as_deref()
	}

	/// The `status` member; `0` if unset.
	pub fn status(&self) -> u16
	{
		self.status
	}

	/// The `status` member as an [`http::StatusCode`], if it is a valid one.
	pub fn status_code(&self) -> Option<http::StatusCode>
	{
		http::StatusCode::from_u16(self.status).ok()
	}

	/// The `detail` member, if any.
	pub fn detail(&self) -> Option<&str>
	{
		self.detail.as_deref()
	}

	/// The `instance` member, if any.
	pub fn instance(&self) -> Option<&str>
	{
		self.instance.as_deref()
	}
}

impl Serialize for Problem
{
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let field_count = 1 // type
			+ usize::from(self.title.is_some())
			+ usize::from(self.status != 0)
			+ usize::from(self.detail.is_some())
			+ usize::from(self.instance.is_some());

		let mut serializer = serializer.serialize_map(Some(field_count))?;

		serializer.serialize_entry("type", &self.type_uri)?;

		if let Some(title) = self.title() {
			serializer.serialize_entry("title", title)?;
		}

		if self.status != 0 {
			serializer.serialize_entry("status", &self.status)?;
		}

		if let Some(detail) = self.detail() {
			serializer.serialize_entry("detail", detail)?;
		}

		if let Some(instance) = self.instance() {
			serializer.serialize_entry("instance", instance)?;
		}

		serializer.end()
	}
}

/// Renders the problem as indented JSON with a fixed member order.
///
/// Unset members and a `status` of `0` are left out.
impl fmt::Display for Problem
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt.write_str("{\n")?;
		write_string_member(fmt, "type", &self.type_uri)?;

		if let Some(title) = self.title() {
			fmt.write_str(",\n")?;
			write_string_member(fmt, "title", title)?;
		}

		if self.status != 0 {
			write!(fmt, ",\n  \"status\": {}", self.status)?;
		}

		if let Some(detail) = self.detail() {
			fmt.write_str(",\n")?;
			write_string_member(fmt, "detail", detail)?;
		}

		if let Some(instance) = self.instance() {
			fmt.write_str(",\n")?;
			write_string_member(fmt, "instance", instance)?;
		}

		fmt.write_str("\n}")
	}
}

fn write_string_member(fmt: &mut fmt::Formatter<'_>, name: &str, value: &str) -> fmt::Result
{
	let value = serde_json::to_string(value).map_err(|_| fmt::Error)?;
	write!(fmt, "  \"{name}\": {value}")
}
