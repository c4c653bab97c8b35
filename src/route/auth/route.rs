use aide::axum::IntoApiResponse;
use argon2::{
	password_hash::{rand_core::OsRng, Error as HashError, PasswordHash, SaltString},
	Argon2, PasswordHasher, PasswordVerifier,
};
use axum::{
	extract::State,
	http::{header, StatusCode},
};
use macros::route;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	session, AppState, Database,
};

use super::{model, Error, RouteError};

/// Hashes a password with a freshly generated salt, producing a PHC string
/// that carries the salt and parameters alongside the digest.
pub(crate) fn hash_password(hasher: &Argon2, password: &str) -> Result<String, HashError> {
	let salt = SaltString::generate(&mut OsRng);

	Ok(hasher.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Register account
/// Registers a new account. Registering does not log in; call the login endpoint afterwards.
#[route(tag = tag::AUTH, response(status = 200, description = "The newly created account.", shape = "Json<model::User>"))]
pub async fn register(
	State(state): State<AppState>,
	Json(auth): Json<model::RegisterInput>,
) -> Result<Json<model::User>, RouteError> {
	let password = hash_password(&state.hasher, &auth.password).map_err(Error::Hash)?;

	let user = sqlx::query_as::<_, model::User>(
		r#"
			INSERT INTO "user" (email, username, password, description, birthday)
			VALUES ($1, $2, $3, $4, $5)
			RETURNING *
		"#,
	)
	.bind(&auth.email)
	.bind(&auth.username)
	.bind(&password)
	.bind(&auth.description)
	.bind(&auth.birthday)
	.fetch_one(&state.database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("user_email_key") => Error::EmailTaken.into(),
			Some("user_username_key") => Error::UsernameTaken.into(),
			_ => RouteError::from(e),
		},
		e => RouteError::from(e),
	})?;

	Ok(Json(user))
}

/// Log in
/// Logs in to an account, returning the new session and an associated session cookie.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged in successfully.", shape = "Json<model::Session>"))]
pub async fn login(
	State(state): State<AppState>,
	Json(auth): Json<model::LoginInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user = sqlx::query_as::<_, model::User>(r#"SELECT * FROM "user" WHERE email = $1"#)
		.bind(&auth.email)
		.fetch_optional(&state.database)
		.await?
		.ok_or(Error::UnknownEmail)?;

	let hash = PasswordHash::new(&user.password).map_err(Error::Hash)?;

	if let Err(error) = state.hasher.verify_password(auth.password.as_bytes(), &hash) {
		return Err(match error {
			HashError::Password => Error::WrongPassword.into(),
			error => Error::Hash(error).into(),
		});
	}

	let session = sqlx::query_as::<_, model::Session>(
		"INSERT INTO session (user_id) VALUES ($1) RETURNING *",
	)
	.bind(user.id)
	.fetch_one(&state.database)
	.await?;

	let cookie = session::create_cookie(session.id);

	Ok(([(header::SET_COOKIE, cookie.to_string())], Json(session)))
}

/// Log out
/// Ends the current session, if there is one. Safe to call while logged out.
#[route(tag = tag::AUTH, response(status = 204, description = "Logged out; the session cookie is cleared."))]
pub async fn logout(
	State(database): State<Database>,
	session: Option<Session>,
) -> Result<impl IntoApiResponse, RouteError> {
	if let Some(session) = session {
		sqlx::query("DELETE FROM session WHERE id = $1")
			.bind(session.id)
			.execute(&database)
			.await?;
	}

	// Clear the session cookie
	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		StatusCode::NO_CONTENT,
	))
}

/// Get user
/// Returns the authenticated user.
#[route(tag = tag::AUTH)]
pub async fn get_me(session: Session) -> Json<model::User> {
	Json(session.user)
}
