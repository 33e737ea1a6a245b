//! The [`ProblemError`] type.

use std::error::Error as StdError;
use std::io;

use json_tools::{Decode, ErrorCode};

use crate::Problem;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A remote call failed and answered with (or should have answered with) a
/// [`Problem`].
///
/// No matter how it was constructed, a [`ProblemError`] always carries a
/// problem that has at least an HTTP status code.
#[derive(Debug, thiserror::Error)]
#[error("[{}] {message}", ErrorCode::ReceivedRestProblemJson)]
pub struct ProblemError
{
	problem: Problem,

	/// Reports the status code the error was raised for, even if a decoded
	/// problem says otherwise.
	message: String,

	#[source]
	source: Option<BoxError>,
}

impl ProblemError
{
	/// Wraps a problem that was received from a remote call.
	pub fn new(problem: Problem) -> Self
	{
		Self::with_status(problem.status(), problem, None)
	}

	/// Wraps a problem that was received from a remote call, together with
	/// the error that caused it.
	pub fn with_source(problem: Problem, source: impl Into<BoxError>) -> Self
	{
		Self::with_status(problem.status(), problem, Some(source.into()))
	}

	/// Creates an error for a remote call that only gave us a status code.
	///
	/// See [`Problem::for_status()`].
	pub fn from_status(status: u16) -> Self
	{
		Self::with_status(status, Problem::for_status(status), None)
	}

	/// Creates an error from a response `body`, using the process-wide
	/// [`JsonTools`] to decode it.
	///
	/// See [`ProblemError::from_response_with()`].
	///
	/// [`JsonTools`]: json_tools::JsonTools
	pub fn from_response<R>(status: u16, body: R) -> Self
	where
		R: io::Read,
	{
		Self::from_response_with(json_tools::get(), status, body)
	}

	/// Creates an error from a response `body`.
	///
	/// If the body decodes into a [`Problem`], that problem is used as-is,
	/// even if its status disagrees with `status`. Otherwise, the decoding
	/// error is logged and the error falls back to
	/// [`ProblemError::from_status()`].
	pub fn from_response_with<D, R>(decoder: &D, status: u16, body: R) -> Self
	where
		D: Decode + ?Sized,
		R: io::Read,
	{
		let problem = match decoder.decode::<Problem, R>(body) {
			Ok(problem) => problem,
			Err(error) => {
				warn!(%error, status, "response did not contain a problem JSON");
				Problem::for_status(status)
			},
		};

		Self::with_status(status, problem, None)
	}

	fn with_status(status: u16, problem: Problem, source: Option<BoxError>) -> Self
	{
		let message = ErrorCode::ReceivedRestProblemJson.format(&[&status]);

		Self { problem, message, source }
	}

	/// The problem describing what went wrong.
	pub fn problem(&self) -> &Problem
	{
		&self.problem
	}

	/// Returns the inner [`Problem`].
	pub fn into_problem(self) -> Problem
	{
		self.problem
	}
}

impl From<Problem> for ProblemError
{
	fn from(problem: Problem) -> Self
	{
		Self::new(problem)
	}
}

#[cfg(test)]
mod tests
{
	use json_tools::JsonTools;

	use super::*;

	#[test]
	fn from_status()
	{
		let error = ProblemError::from_status(400);
		let problem = error.problem();

		assert_eq!(problem.problem_type(), "about:blank");
		assert_eq!(problem.title(), Some("Bad Request"));
		assert_eq!(problem.status(), 400);
		assert_eq!(problem.detail(), None);
		assert_eq!(problem.instance(), None);
		assert!(error.to_string().ends_with("REST call returned problem JSON (http status code: 400)"));
	}

	#[test]
	fn wraps_given_problem()
	{
		let problem = Problem::builder()
			.problem_type("PROBLEM-123456789")
			.detail("Some detail")
			.status(400)
			.title("Yet another Problem!")
			.instance("Instance Information")
			.build();

		let error = ProblemError::new(problem.clone());

		assert_eq!(error.problem(), &problem);
		assert_eq!(error.to_string(), "[JSON-1804] REST call returned problem JSON (http status code: 400)");
		assert!(StdError::source(&error).is_none());
		assert_eq!(error.into_problem(), problem);
	}

	#[test]
	fn keeps_source()
	{
		let cause = io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer");
		let error = ProblemError::with_source(Problem::for_status(502), cause);

		let source = StdError::source(&error).unwrap();

		assert_eq!(source.to_string(), "connection reset by peer");
		assert_eq!(error.problem().title(), Some("Bad Gateway"));
	}

	#[test]
	fn decoded_problem_wins()
	{
		let body = br#"{"type":"https://example.org/not-found","title":"Not Found","status":404}"#;
		let error = ProblemError::from_response_with(&JsonTools::default(), 400, body.as_slice());
		let problem = error.problem();

		assert_eq!(problem.status(), 404);
		assert_eq!(problem.problem_type(), "https://example.org/not-found");
		assert_eq!(problem.title(), Some("Not Found"));
		assert!(error.to_string().ends_with("(http status code: 400)"));
	}

	#[test]
	fn undecodable_body_falls_back_to_status()
	{
		let bodies: [&[u8]; 4] = [b"<html>Bad Request</html>", b"", b"[1, 2, 3]", br#"{"status": -1}"#];

		for body in bodies {
			let error = ProblemError::from_response_with(&JsonTools::default(), 400, body);

			assert_eq!(error.problem(), &Problem::for_status(400));
		}
	}

	#[test]
	fn every_construction_has_a_problem()
	{
		let errors = [
			ProblemError::new(Problem::default()),
			ProblemError::from(Problem::builder().status(418).build()),
			ProblemError::from_status(0),
			ProblemError::from_response(500, b"{}".as_slice()),
			ProblemError::from_response(500, b"not json".as_slice()),
		];

		for error in &errors {
			assert_eq!(error.problem().problem_type(), "about:blank");
		}

		assert_eq!(errors[2].problem().title(), Some("Unknown HTTP Status"));
		assert_eq!(errors[3].problem().status(), 0);
		assert_eq!(errors[4].problem().status(), 500);
	}
}
