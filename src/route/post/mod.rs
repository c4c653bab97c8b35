use std::borrow::Cow;

use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("post {0} belongs to another user")]
	NotYourPost(Uuid),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

/// Allows a mutation of `post` only when it belongs to the acting user.
///
/// Admin status deliberately does not bypass this check; posts are only
/// ever changed by the account that created them.
pub fn authorize_mutation(post: &model::Post, user_id: Uuid) -> Result<(), Error> {
	if post.user_id == user_id {
		Ok(())
	} else {
		Err(Error::NotYourPost(post.id))
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", post_with(create_post, create_post_docs))
		.api_route("/me", get_with(get_user_posts, get_user_posts_docs))
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::NotYourPost(..) => StatusCode::FORBIDDEN,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownPost(post) | Self::NotYourPost(post) => vec![error::Message {
				content: self.to_string().into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("post".into(), json!(post));
					map
				})),
			}],
		}
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use crate::test::*;

	#[test]
	fn test_authorize_mutation() {
		let owner = Uuid::new_v4();
		let post = super::model::Post {
			id: Uuid::new_v4(),
			user_id: owner,
			body: "hello".into(),
			created_at: chrono::Utc::now(),
		};

		assert!(super::authorize_mutation(&post, owner).is_ok());
		assert!(matches!(
			super::authorize_mutation(&post, Uuid::new_v4()),
			Err(super::Error::NotYourPost(id)) if id == post.id
		));
	}

	#[sqlx::test]
	async fn test_posting_requires_login(pool: Database) {
		let app = app(pool);

		let response = app.post("/posts").json(&json!({ "body": "hello" })).await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_owner_comes_from_session(pool: Database) {
		let app = app(pool);
		let user = register_and_login(&app, "john").await;

		// A smuggled user_id is ignored; ownership comes from the session
		let response = app
			.post("/posts")
			.json(&json!({
				"body": "first post",
				"user_id": Uuid::new_v4(),
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let post = response.json::<serde_json::Value>();

		assert_eq!(post["body"], "first post");
		assert_eq!(post["user_id"], json!(user));
	}

	#[sqlx::test]
	async fn test_get_post_is_public(pool: Database) {
		let app = app(pool);

		register_and_login(&app, "john").await;

		let response = app.post("/posts").json(&json!({ "body": "hello" })).await;

		assert_eq!(response.status_code(), 200);

		let id = response.json::<serde_json::Value>()["id"].clone();

		let response = app.get("/auth/logout").await;

		assert_eq!(response.status_code(), 204);

		let response = app.get(&format!("/posts/{}", id.as_str().unwrap())).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["body"], "hello");

		let response = app.get(&format!("/posts/{}", Uuid::new_v4())).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_update_and_delete_respect_ownership(pool: Database) {
		let app = app(pool);

		register_and_login(&app, "john").await;

		let response = app.post("/posts").json(&json!({ "body": "mine" })).await;

		assert_eq!(response.status_code(), 200);

		let id: Uuid = response.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.parse()
			.unwrap();

		register_and_login(&app, "jane").await;

		let response = app
			.put(&format!("/posts/{id}"))
			.json(&json!({ "body": "defaced" }))
			.await;

		assert_eq!(response.status_code(), 403);

		let response = app.delete(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 403);

		// The post is untouched
		let response = app.get(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["body"], "mine");

		// Back as the owner, both mutations succeed
		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@x.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app
			.put(&format!("/posts/{id}"))
			.json(&json!({ "body": "edited" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["body"], "edited");

		let response = app.delete(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 200);

		let response = app.get(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_mutating_unknown_post_is_not_found(pool: Database) {
		let app = app(pool);

		register_and_login(&app, "john").await;

		let response = app
			.put(&format!("/posts/{}", Uuid::new_v4()))
			.json(&json!({ "body": "nobody home" }))
			.await;

		assert_eq!(response.status_code(), 404);

		let response = app.delete(&format!("/posts/{}", Uuid::new_v4())).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_own_posts_in_creation_order(pool: Database) {
		let app = app(pool);

		register_and_login(&app, "john").await;

		for body in ["one", "two", "three"] {
			let response = app.post("/posts").json(&json!({ "body": body })).await;

			assert_eq!(response.status_code(), 200);
		}

		register_and_login(&app, "jane").await;

		let response = app.post("/posts").json(&json!({ "body": "other" })).await;

		assert_eq!(response.status_code(), 200);

		// Only jane's posts, oldest first
		let response = app.get("/posts/me").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Vec<String>>(), vec!["other"]);

		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@x.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app.get("/posts/me").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<Vec<String>>(),
			vec!["one", "two", "three"]
		);
	}

	#[sqlx::test]
	async fn test_post_body_length_limit(pool: Database) {
		let app = app(pool);

		register_and_login(&app, "john").await;

		let response = app
			.post("/posts")
			.json(&json!({ "body": "x".repeat(501) }))
			.await;

		assert_eq!(response.status_code(), 400);

		let response = app
			.post("/posts")
			.json(&json!({ "body": "x".repeat(500) }))
			.await;

		assert_eq!(response.status_code(), 200);
	}
}
