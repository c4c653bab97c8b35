use std::str::FromStr;

use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{
	error::RouteError, openapi::SECURITY_SCHEME_SESSION, route::auth, session, Database,
};

/// Extracts the session and its user from the request's session cookie.
///
/// The user row is fetched on every request, so deleting a session or
/// changing a privilege flag takes effect immediately.
///
/// If the cookie is missing, a [`auth::Error::NoSessionCookie`] is returned.
/// If it does not name a live session, a [`auth::Error::InvalidSessionCookie`]
/// is returned.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("acting as {}", session.user.username);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: auth::model::User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Send + Sync,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let cookies = parts
			.headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok());

		let session_cookie = cookies
			.flat_map(cookie::Cookie::split_parse)
			.filter_map(Result::ok)
			.find(|cookie| cookie.name() == session::COOKIE_NAME)
			.ok_or(auth::Error::NoSessionCookie)?;

		let session_id = Uuid::from_str(session_cookie.value())
			.map_err(|_| auth::Error::InvalidSessionCookie)?;

		let database = Database::from_ref(state);
		let user = sqlx::query_as::<_, auth::model::User>(
			r#"
				SELECT * FROM "user" WHERE id = (
					SELECT user_id FROM session WHERE id = $1
				)
			"#,
		)
		.bind(session_id)
		.fetch_optional(&database)
		.await?
		.ok_or(auth::Error::InvalidSessionCookie)?;

		Ok(Self {
			id: session_id,
			user,
		})
	}
}

impl OperationInput for Session {
	fn operation_input(
		_ctx: &mut aide::gen::GenContext,
		operation: &mut aide::openapi::Operation,
	) {
		operation.security.push(
			[(SECURITY_SCHEME_SESSION.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}
