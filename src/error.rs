use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection::JsonRejection,
	http::{Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message, optionally attached to an input field.
///
/// Everything in here is serialized to the client, so it must not contain
/// sensitive information.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'e> {
	pub content: Cow<'e, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'e, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'e, Map>>,
}

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'e> {
	pub success: bool,
	pub errors: Vec<Message<'e>>,
}

/// Maps an error onto a status code and the messages shown to the client.
pub trait ErrorShape {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;
}

fn into_response<E: ErrorShape>(error: &E) -> Response<Body> {
	(
		error.status(),
		axum::Json(ErrorResponse {
			success: false,
			errors: error.errors(),
		}),
	)
		.into_response()
}

/// An error that can occur on any route.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("rate limit error: {0}")]
	RateLimit(#[from] tower_governor::GovernorError),
}

impl ErrorShape for AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) => StatusCode::BAD_REQUEST,
			Self::Database(sqlx::Error::PoolTimedOut) => StatusCode::SERVICE_UNAVAILABLE,
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::RateLimit(tower_governor::GovernorError::TooManyRequests { .. }) => {
				StatusCode::TOO_MANY_REQUESTS
			}
			Self::RateLimit(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| Message {
						content: Cow::Owned(error.to_string()),
						field: Some(Cow::Borrowed(field)),
						details: None,
					})
				})
				.collect(),
			Self::Json(error) => vec![Message {
				content: Cow::Owned(error.to_string()),
				field: None,
				details: None,
			}],
			Self::Database(sqlx::Error::PoolTimedOut) => vec![Message {
				content: Cow::Borrowed("the service is under heavy load, try again shortly"),
				field: None,
				details: None,
			}],
			// Database internals never reach the client
			Self::Database(..) => Vec::new(),
			Self::RateLimit(error) => vec![Message {
				content: Cow::Owned(error.to_string()),
				field: None,
				details: None,
			}],
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		into_response(&self)
	}
}

/// Either a route-specific error or an [`AppError`].
///
/// Route modules alias this with their own error type and convert into the
/// [`RouteError::Route`] variant, so handlers can use `?` on both their own
/// failures and shared ones.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<E> {
	#[error("route error: {0}")]
	Route(E),
	#[error(transparent)]
	App(AppError),
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<sqlx::Error> for RouteError<E> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(AppError::Database(error))
	}
}

impl<E: ErrorShape> ErrorShape for RouteError<E> {
	fn status(&self) -> StatusCode {
		match self {
			Self::Route(error) => error.status(),
			Self::App(error) => error.status(),
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Route(error) => error.errors(),
			Self::App(error) => error.errors(),
		}
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		into_response(&self)
	}
}

/// Error responses are documented explicitly by each route, so nothing
/// is inferred here.
impl<E> OperationOutput for RouteError<E> {
	type Inner = Self;
}
