use crate::Problem;
use crate::problem::ABOUT_BLANK;

/// Builder for [`Problem`]s.
///
/// Setters take their value as-is; nothing is validated. A `type` that was
/// never set becomes [`ABOUT_BLANK`] on [`build()`].
///
/// [`build()`]: ProblemBuilder::build
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[must_use = "builders don't do anything unless you call `.build()`"]
pub struct ProblemBuilder
{
	type_uri: Option<String>,
	title: Option<String>,
	status: u16,
	detail: Option<String>,
	instance: Option<String>,
}

impl ProblemBuilder
{
	/// Sets the `type` member.
	pub fn problem_type(mut self, problem_type: impl Into<String>) -> Self
	{
		self.type_uri = Some(problem_type.into());
		self
	}

	/// Sets the `title` member.
	pub fn title(mut self, title: impl Into<String>) -> Self
	{
		self.title = Some(title.into());
		self
	}

	/// Sets the `status` member.
	pub fn status(mut self, status: u16) -> Self
	{
		self.status = status;
		self
	}

	/// Sets the `detail` member.
	pub fn detail(mut self, detail: impl Into<String>) -> Self
	{
		self.detail = Some(detail.into());
		self
	}

	/// Sets the `instance` member.
	pub fn instance(mut self, instance: impl Into<String>) -> Self
	{
		self.instance = Some(instance.into());
		self
	}

	/// Creates the [`Problem`].
	pub fn build(self) -> Problem
	{
		Problem {
			type_uri: self.type_uri.unwrap_or_else(|| String::from(ABOUT_BLANK)),
			title: self.title,
			status: self.status,
			detail: self.detail,
			instance: self.instance,
		}
	}
}

impl From<Problem> for ProblemBuilder
{
	fn from(problem: Problem) -> Self
	{
		Self {
			type_uri: Some(problem.type_uri),
			title: problem.title,
			status: problem.status,
			detail: problem.detail,
			instance: problem.instance,
		}
	}
}
