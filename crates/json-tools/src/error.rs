//! Error codes and error types.
//!
//! Every failure reported by this crate carries an [`ErrorCode`]. The code
//! knows a message template with positional `{0}`, `{1}`, ... placeholders,
//! which [`ErrorCode::format()`] fills in.

use std::fmt::{self, Write as _};
use std::{error::Error as StdError, io};

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The different kinds of failures known to the JSON layer.
///
/// This is the complete catalog shared with REST clients built on top of this
/// crate. Only the JSON codes (1800-1804) are raised here; the REST and
/// circuit breaker codes (1805-1808) exist so that those clients report
/// their failures with the same codes and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode
{
	/// An object could not be serialized.
	JsonSerializationFailed,

	/// Input could not be deserialized into the requested type.
	JsonDeserializationFailed,

	/// An object ID was serialized as something other than text.
	UnexpectedNodeTypeForObjectIdDeserial,

	/// The input contained a node of a type the target cannot be built from.
	UnexpectedNodeTypeForDeserialization,

	/// A REST call returned a problem JSON instead of a regular response.
	ReceivedRestProblemJson,

	/// A REST response could not be processed on the client side.
	RestResponseProcessingError,

	/// An HTTP response could not be closed properly.
	UnableToCloseHttpResponse,

	/// The circuit breaker protecting an external REST service is open.
	CircuitBreakerOpen,

	/// A circuit breaker is not protecting the system due to its state.
	CircuitBreakerNotActive,
}

impl ErrorCode
{
	/// All known error codes, ordered by their numeric value.
	pub const ALL: &[Self] = &[
		Self::JsonSerializationFailed,
		Self::JsonDeserializationFailed,
		Self::UnexpectedNodeTypeForObjectIdDeserial,
		Self::UnexpectedNodeTypeForDeserialization,
		Self::ReceivedRestProblemJson,
		Self::RestResponseProcessingError,
		Self::UnableToCloseHttpResponse,
		Self::CircuitBreakerOpen,
		Self::CircuitBreakerNotActive,
	];

	/// The numeric value of this code.
	pub const fn code(self) -> u16
	{
		match self {
			Self::JsonSerializationFailed => 1800,
			Self::JsonDeserializationFailed => 1801,
			Self::UnexpectedNodeTypeForObjectIdDeserial => 1802,
			Self::UnexpectedNodeTypeForDeserialization => 1803,
			Self::ReceivedRestProblemJson => 1804,
			Self::RestResponseProcessingError => 1805,
			Self::UnableToCloseHttpResponse => 1806,
			Self::CircuitBreakerOpen => 1807,
			Self::CircuitBreakerNotActive => 1808,
		}
	}

	/// Looks up an error code by its numeric value.
	pub fn from_code(code: u16) -> Option<Self>
	{
		Self::ALL.iter().copied().find(|candidate| candidate.code() == code)
	}

	/// The message template of this code.
	pub const fn template(self) -> &'static str
	{
		match self {
			Self::JsonSerializationFailed => "Exception during JSON serialization. {0}",
			Self::JsonDeserializationFailed => "Exception during JSON deserialization. {0}",
			Self::UnexpectedNodeTypeForObjectIdDeserial => {
				"Object IDs have to be serialized as text but found a node of type {0}."
			},
			Self::UnexpectedNodeTypeForDeserialization => {
				"Unexpected node type {0} found during deserialization. Expected {1}."
			},
			Self::ReceivedRestProblemJson => "REST call returned problem JSON (http status code: {0})",
			Self::RestResponseProcessingError => "Unable to process response of REST call. {0}",
			Self::UnableToCloseHttpResponse => "Unable to close HTTP response. {0}",
			Self::CircuitBreakerOpen => {
				"Circuit breaker for REST service {0} is open. Request was not sent."
			},
			Self::CircuitBreakerNotActive => {
				"Circuit breaker for REST service {0} is not active due to its current state {1}."
			},
		}
	}

	/// Renders the message template, substituting `{n}` with `args[n]`.
	///
	/// Placeholders without a matching argument are kept verbatim.
	pub fn format(self, args: &[&dyn fmt::Display]) -> String
	{
		let template = self.template();
		let mut message = String::with_capacity(template.len());
		let mut rest = template;

		while let Some(start) = rest.find('{') {
			message.push_str(&rest[..start]);

			let tail = &rest[start..];
			let placeholder = tail.find('}').and_then(|end| {
				let index = tail[1..end].parse::<usize>().ok()?;
				args.get(index).map(|arg| (end, arg))
			});

			if let Some((end, arg)) = placeholder {
				// writing into a `String` cannot fail
				let _ = write!(message, "{arg}");
				rest = &tail[end + 1..];
			} else {
				message.push('{');
				rest = &tail[1..];
			}
		}

		message.push_str(rest);
		message
	}
}

impl fmt::Display for ErrorCode
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(fmt, "JSON-{}", self.code())
	}
}

/// The error type returned by all reading and writing operations.
#[derive(Debug, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct JsonError
{
	code: ErrorCode,
	message: String,
	#[source]
	source: Option<BoxError>,
}

impl JsonError
{
	/// Creates a new [`JsonError`] whose message is `code` formatted with
	/// `args`.
	pub fn new(code: ErrorCode, args: &[&dyn fmt::Display]) -> Self
	{
		Self { code, message: code.format(args), source: None }
	}

	/// Attaches the error that caused this one.
	#[must_use]
	pub fn with_source(mut self, source: impl Into<BoxError>) -> Self
	{
		self.source = Some(source.into());
		self
	}

	/// An object could not be serialized.
	pub fn serialization<E>(error: E) -> Self
	where
		E: StdError + Send + Sync + 'static,
	{
		let code = ErrorCode::JsonSerializationFailed;
		let message = code.format(&[&error]);

		Self { code, message, source: Some(Box::new(error)) }
	}

	/// Input could not be deserialized.
	pub fn deserialization<E>(error: E) -> Self
	where
		E: StdError + Send + Sync + 'static,
	{
		let code = ErrorCode::JsonDeserializationFailed;
		let message = code.format(&[&error]);

		Self { code, message, source: Some(Box::new(error)) }
	}

	/// The input did not contain a single JSON value.
	pub(crate) fn empty_input() -> Self
	{
		Self::new(ErrorCode::JsonDeserializationFailed, &[&"input does not contain a JSON value"])
	}

	/// The error code.
	pub fn code(&self) -> ErrorCode
	{
		self.code
	}

	/// The formatted message, without the code prefix.
	pub fn message(&self) -> &str
	{
		&self.message
	}
}

/// Returned when a module name is registered twice.
#[derive(Debug, Display, Error)]
#[display("module `{name}` is already registered")]
pub struct DuplicateModuleError
{
	/// The name that was already taken.
	pub name: Box<str>,
}

/// Error type for loading a [`MapperConfig`] from TOML.
///
/// [`MapperConfig`]: crate::MapperConfig
#[derive(Debug, Display, Error, From)]
pub enum ConfigError
{
	/// The configuration file could not be read.
	#[display("failed to read mapper config: {_0}")]
	Io(#[error(source)] io::Error),

	/// The configuration is not valid TOML or has unknown keys.
	#[display("failed to parse mapper config: {_0}")]
	Parse(#[error(source)] toml::de::Error),
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn serialization_message()
	{
		assert_eq!(
			ErrorCode::JsonSerializationFailed.format(&[&"Additional Message"]),
			"Exception during JSON serialization. Additional Message",
		);
	}

	#[test]
	fn deserialization_message()
	{
		assert_eq!(
			ErrorCode::JsonDeserializationFailed.format(&[&"Additional Message"]),
			"Exception during JSON deserialization. Additional Message",
		);
	}

	#[test]
	fn multiple_arguments_are_positional()
	{
		assert_eq!(
			ErrorCode::UnexpectedNodeTypeForDeserialization.format(&[&"string", &"array"]),
			"Unexpected node type string found during deserialization. Expected array.",
		);
	}

	#[test]
	fn missing_arguments_keep_placeholder()
	{
		assert_eq!(
			ErrorCode::CircuitBreakerNotActive.format(&[&"users"]),
			"Circuit breaker for REST service users is not active due to its current state {1}.",
		);
	}

	#[test]
	fn codes_are_unique_and_ordered()
	{
		let codes = ErrorCode::ALL.iter().map(|code| code.code()).collect::<Vec<_>>();

		assert_eq!(codes, (1800..=1808).collect::<Vec<u16>>());
		assert_eq!(ErrorCode::from_code(1804), Some(ErrorCode::ReceivedRestProblemJson));
		assert_eq!(ErrorCode::from_code(42), None);
	}

	#[test]
	fn error_display_includes_code()
	{
		let error = JsonError::new(ErrorCode::ReceivedRestProblemJson, &[&404]);

		assert_eq!(error.to_string(), "[JSON-1804] REST call returned problem JSON (http status code: 404)");
		assert_eq!(error.code(), ErrorCode::ReceivedRestProblemJson);
		assert!(std::error::Error::source(&error).is_none());
	}
}
