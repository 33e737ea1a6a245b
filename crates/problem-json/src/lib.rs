//! # [RFC 7807][rfc] - Problem Details for HTTP APIs
//!
//! This crate provides the [`Problem`] value object received from (and sent
//! by) REST services, a [`ProblemBuilder`] for creating them, and the
//! [`ProblemError`] raised when a remote call fails with a problem.
//!
//! Problems can be turned into [`http::Response`]s directly.
//!
//! [rfc]: https://www.rfc-editor.org/rfc/rfc7807.html

#[macro_use]
extern crate tracing;

pub use self::{
	builder::ProblemBuilder,
	error::ProblemError,
	problem::{ABOUT_BLANK, Problem, UNKNOWN_STATUS_TITLE, reason_phrase},
};
use {mime::Mime, std::any::type_name};

mod builder;
mod error;
mod problem;

/// Returns the [`Content-Type`] value used in responses.
///
/// [`Content-Type`]: https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Content-Type
pub fn content_type() -> Mime
{
	"application/problem+json"
		.parse::<Mime>()
		.unwrap_or_else(|err| panic!("hard-coded string should always be valid: {err}"))
}

impl<B> From<Problem> for http::Response<B>
where
	Vec<u8>: Into<B>,
{
	fn from(problem: Problem) -> Self
	{
		(&problem).into()
	}
}

/// The response status is the problem's status, or `500 Internal Server
/// Error` if that is not a valid status code.
impl<B> From<&Problem> for http::Response<B>
where
	Vec<u8>: Into<B>,
{
	fn from(problem: &Problem) -> Self
	{
		let body = serde_json::to_vec(problem).unwrap_or_else(|err| {
			panic!("failed to serialize `{}` into JSON: {err}", type_name::<Problem>());
		});

		let status = problem
			.status_code()
			.unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

		http::Response::builder()
			.status(status)
			.header(http::header::CONTENT_TYPE, content_type().as_ref())
			.body(body.into())
			.unwrap_or_else(|err| panic!("hard-coded response should be correct: {err}"))
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn response()
	{
		let problem = Problem::builder()
			.problem_type("https://example.org/out-of-credit")
			.title("You do not have enough credit.")
			.status(403)
			.detail("Your current balance is 30, but that costs 50.")
			.build();

		let response = http::Response::<Vec<u8>>::from(&problem);

		assert_eq!(response.status(), http::StatusCode::FORBIDDEN);
		assert_eq!(response.headers()[http::header::CONTENT_TYPE], "application/problem+json");
		assert_eq!(serde_json::from_slice::<Problem>(response.body()).unwrap(), problem);
	}

	#[test]
	fn response_without_status()
	{
		let response = http::Response::<Vec<u8>>::from(Problem::default());

		assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(response.body().as_slice(), br#"{"type":"about:blank"}"#);
	}

	#[test]
	fn content_type_is_problem_json()
	{
		let mime = content_type();

		assert_eq!(mime.type_(), mime::APPLICATION);
		assert_eq!(mime.subtype(), "problem");
		assert_eq!(mime.suffix(), Some(mime::JSON));
	}
}
