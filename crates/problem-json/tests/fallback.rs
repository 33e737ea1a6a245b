use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use json_tools::{JsonTools, MapperConfig, ModuleRegistry};
use problem_json::{Problem, ProblemError};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Records every event at WARN level or above.
#[derive(Debug, Default, Clone)]
struct Warnings
{
	events: Arc<Mutex<Vec<String>>>,
}

impl Warnings
{
	fn take(&self) -> Vec<String>
	{
		std::mem::take(&mut *self.events.lock().unwrap())
	}
}

struct Fields(String);

impl Visit for Fields
{
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug)
	{
		let _ = write!(self.0, "{}={value:?} ", field.name());
	}
}

impl<S: Subscriber> Layer<S> for Warnings
{
	fn on_event(&self, event: &Event<'_>, _: Context<'_, S>)
	{
		if *event.metadata().level() > Level::WARN {
			return;
		}

		let mut fields = Fields(String::new());
		event.record(&mut fields);
		self.events.lock().unwrap().push(fields.0);
	}
}

fn with_warnings<T>(action: impl FnOnce() -> T) -> (T, Vec<String>)
{
	let warnings = Warnings::default();
	let subscriber = tracing_subscriber::registry().with(warnings.clone());
	let value = tracing::subscriber::with_default(subscriber, action);

	(value, warnings.take())
}

#[test]
fn undecodable_body_warns_once()
{
	let tools = JsonTools::default();
	let (error, warnings) = with_warnings(|| {
		ProblemError::from_response_with(&tools, 400, b"<html>Bad Request</html>".as_slice())
	});

	let problem = error.problem();
	assert_eq!(problem.status(), 400);
	assert_eq!(problem.title(), Some("Bad Request"));
	assert_eq!(problem.problem_type(), "about:blank");
	assert_eq!(problem.detail(), None);
	assert_eq!(problem.instance(), None);

	assert_eq!(warnings.len(), 1, "{warnings:?}");
	assert!(warnings[0].contains("[JSON-1801] Exception during JSON deserialization."), "{warnings:?}");
	assert!(warnings[0].contains("status=400"), "{warnings:?}");
}

#[test]
fn decodable_body_does_not_warn()
{
	let body = br#"{"type":"https://example.org/gone","title":"Gone","status":410,"detail":"deleted"}"#;
	let (error, warnings) = with_warnings(|| ProblemError::from_response(410, body.as_slice()));

	assert_eq!(
		error.problem(),
		&Problem::builder()
			.problem_type("https://example.org/gone")
			.title("Gone")
			.status(410)
			.detail("deleted")
			.build(),
	);

	assert!(warnings.is_empty(), "{warnings:?}");
}

#[test]
fn decoded_status_wins()
{
	let body = br#"{"title":"Not Found","status":404}"#;
	let (error, warnings) = with_warnings(|| {
		ProblemError::from_response_with(&JsonTools::default(), 400, body.as_slice())
	});

	assert_eq!(error.problem().status(), 404);
	assert_eq!(error.problem().title(), Some("Not Found"));
	assert_eq!(error.to_string(), "[JSON-1804] REST call returned problem JSON (http status code: 400)");
	assert!(warnings.is_empty(), "{warnings:?}");
}

#[test]
fn trailing_garbage_falls_back()
{
	let tools = JsonTools::new(MapperConfig::default(), &ModuleRegistry::new());
	let body = br#"{"status":404} trailing"#;
	let (error, warnings) =
		with_warnings(|| ProblemError::from_response_with(&tools, 502, body.as_slice()));

	assert_eq!(error.problem(), &Problem::for_status(502));
	assert_eq!(warnings.len(), 1, "{warnings:?}");
}

#[test]
fn direct_constructions_do_not_warn()
{
	let (errors, warnings) = with_warnings(|| {
		[ProblemError::from_status(503), ProblemError::new(Problem::for_status(409))]
	});

	assert_eq!(errors[0].problem().title(), Some("Service Unavailable"));
	assert_eq!(errors[1].problem().title(), Some("Conflict"));
	assert!(warnings.is_empty(), "{warnings:?}");
}

#[test]
fn null_type_and_textual_status_still_decode()
{
	let tools = JsonTools::default();
	let bodies: [&[u8]; 2] = [
		br#"{"type":null,"title":"Not Found","status":404}"#,
		br#"{"title":"Not Found","status":"404"}"#,
	];

	for body in bodies {
		let (error, warnings) = with_warnings(|| ProblemError::from_response_with(&tools, 400, body));

		assert_eq!(error.problem().status(), 404);
		assert_eq!(error.problem().title(), Some("Not Found"));
		assert_eq!(error.problem().problem_type(), "about:blank");
		assert!(warnings.is_empty(), "{warnings:?}");
	}
}
