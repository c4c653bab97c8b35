use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single post, created by a user.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user that created the post. Posts are never transferred, so
	/// this may outlive the account itself.
	#[serde(skip_deserializing)]
	pub user_id: Uuid,
	/// The text of the post.
	#[validate(length(max = 500))]
	pub body: String,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}
