use std::borrow::Cow;

use aide::axum::{routing::put_with, ApiRouter};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur while managing accounts.
///
/// Note that the messages are presented to the client, so they should not
/// contain sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown user {0}")]
	UnknownUser(Uuid),
	#[error("you may only manage your own account")]
	NotYourAccount,
	#[error("email already taken")]
	EmailTaken,
	#[error("username already taken")]
	UsernameTaken,
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

	ApiRouter::new().api_route(
		"/:id",
		put_with(update_user, update_user_docs).delete_with(delete_user, delete_user_docs),
	)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownUser(..) => StatusCode::NOT_FOUND,
			Self::NotYourAccount => StatusCode::FORBIDDEN,
			Self::EmailTaken | Self::UsernameTaken => StatusCode::CONFLICT,
			Self::Hash(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownUser(user) => vec![error::Message {
				content: self.to_string().into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("user".into(), json!(user));
					map
				})),
			}],
			_ => vec![error::Message {
				content: self.to_string().into(),
				field: None,
				details: None,
			}],
		}
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use crate::test::*;

	#[sqlx::test]
	async fn test_update_own_account(pool: Database) {
		let app = app(pool);
		let user = register_and_login(&app, "john").await;

		let response = app
			.put(&format!("/users/{user}"))
			.json(&json!({ "description": "hello there" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<serde_json::Value>();

		assert_eq!(body["description"], "hello there");
		// Untouched fields keep their values
		assert_eq!(body["username"], "john");
	}

	#[sqlx::test]
	async fn test_update_ignores_privilege_escalation(pool: Database) {
		let app = app(pool.clone());
		let user = register_and_login(&app, "john").await;

		let response = app
			.put(&format!("/users/{user}"))
			.json(&json!({ "username": "john2", "is_admin": true }))
			.await;

		assert_eq!(response.status_code(), 200);

		let is_admin: bool = sqlx::query_scalar(r#"SELECT is_admin FROM "user" WHERE id = $1"#)
			.bind(user)
			.fetch_one(&pool)
			.await
			.unwrap();

		assert!(!is_admin);
	}

	#[sqlx::test]
	async fn test_update_other_account_is_forbidden(pool: Database) {
		let app = app(pool);
		let john = register_and_login(&app, "john").await;

		register_and_login(&app, "jane").await;

		let response = app
			.put(&format!("/users/{john}"))
			.json(&json!({ "description": "defaced" }))
			.await;

		assert_eq!(response.status_code(), 403);
	}

	#[sqlx::test]
	async fn test_admin_updates_any_account(pool: Database) {
		let app = app(pool.clone());
		let john = register_and_login(&app, "john").await;
		let admin = register_and_login(&app, "root").await;

		sqlx::query(r#"UPDATE "user" SET is_admin = TRUE WHERE id = $1"#)
			.bind(admin)
			.execute(&pool)
			.await
			.unwrap();

		let response = app
			.put(&format!("/users/{john}"))
			.json(&json!({ "username": "renamed" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["username"], "renamed");
	}

	#[sqlx::test]
	async fn test_update_unknown_account(pool: Database) {
		let app = app(pool.clone());
		let admin = register_and_login(&app, "root").await;

		sqlx::query(r#"UPDATE "user" SET is_admin = TRUE WHERE id = $1"#)
			.bind(admin)
			.execute(&pool)
			.await
			.unwrap();

		let response = app
			.put(&format!("/users/{}", Uuid::new_v4()))
			.json(&json!({ "description": "nobody home" }))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_update_taken_email_conflicts(pool: Database) {
		let app = app(pool);

		register_and_login(&app, "john").await;

		let jane = register_and_login(&app, "jane").await;

		let response = app
			.put(&format!("/users/{jane}"))
			.json(&json!({ "email": "john@x.com" }))
			.await;

		assert_eq!(response.status_code(), 409);
	}

	#[sqlx::test]
	async fn test_password_update_rehashes(pool: Database) {
		let app = app(pool);
		let user = register_and_login(&app, "john").await;

		let response = app
			.put(&format!("/users/{user}"))
			.json(&json!({ "password": "betterpassword" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app.get("/auth/logout").await;

		assert_eq!(response.status_code(), 204);

		// The old password no longer works
		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@x.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 401);

		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@x.com",
				"password": "betterpassword",
			}))
			.await;

		assert_eq!(response.status_code(), 200);
	}

	#[sqlx::test]
	async fn test_deleting_account_keeps_posts(pool: Database) {
		let app = app(pool.clone());
		let user = register_and_login(&app, "john").await;

		let response = app.post("/posts").json(&json!({ "body": "still here" })).await;

		assert_eq!(response.status_code(), 200);

		let response = app.delete(&format!("/users/{user}")).await;

		assert_eq!(response.status_code(), 204);
		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("Max-Age=0"));

		// The account and its sessions are gone
		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@x.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 404);

		let sessions: i64 = sqlx::query_scalar("SELECT count(*) FROM session")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(sessions, 0);

		// Their posts are not
		let posts: i64 = sqlx::query_scalar("SELECT count(*) FROM post WHERE user_id = $1")
			.bind(user)
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(posts, 1);
	}

	#[sqlx::test]
	async fn test_delete_other_account_is_forbidden(pool: Database) {
		let app = app(pool.clone());
		let john = register_and_login(&app, "john").await;

		register_and_login(&app, "jane").await;

		let response = app.delete(&format!("/users/{john}")).await;

		assert_eq!(response.status_code(), 403);

		let admin = register_and_login(&app, "root").await;

		sqlx::query(r#"UPDATE "user" SET is_admin = TRUE WHERE id = $1"#)
			.bind(admin)
			.execute(&pool)
			.await
			.unwrap();

		let response = app.delete(&format!("/users/{john}")).await;

		assert_eq!(response.status_code(), 204);
	}
}
