use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not
/// contain sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no account with that email")]
	UnknownEmail,
	#[error("wrong password")]
	WrongPassword,
	#[error("email already taken")]
	EmailTaken,
	#[error("username already taken")]
	UsernameTaken,
	#[error("no session cookie")]
	NoSessionCookie,
	#[error("invalid session cookie")]
	InvalidSessionCookie,
	#[error("could not hash password")]
	Hash(#[from] argon2::password_hash::Error),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/register", post_with(register, register_docs))
		.api_route("/login", post_with(login, login_docs))
		.api_route("/logout", get_with(logout, logout_docs))
		.api_route("/me", get_with(get_me, get_me_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownEmail => StatusCode::NOT_FOUND,
			Self::WrongPassword | Self::NoSessionCookie | Self::InvalidSessionCookie => {
				StatusCode::UNAUTHORIZED
			}
			Self::EmailTaken | Self::UsernameTaken => StatusCode::CONFLICT,
			Self::Hash(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		vec![error::Message {
			content: self.to_string().into(),
			field: None,
			details: None,
		}]
	}
}
