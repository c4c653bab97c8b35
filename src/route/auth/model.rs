use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
	if username.chars().any(|c| !c.is_alphanumeric()) {
		return Err(ValidationError::new("username must be alphanumeric"));
	}

	Ok(())
}

/// A single user account.
///
/// The email and password hash are stored here but never serialized to
/// the client.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The email address used for logging in.
	#[serde(skip_serializing)]
	#[allow(dead_code)]
	pub email: String,
	/// The argon2 hash of the password, in PHC string format.
	#[serde(skip_serializing)]
	pub password: String,
	/// The public name of the user.
	pub username: String,
	/// Whether the user may manage accounts other than their own.
	pub is_admin: bool,
	/// A short self-description.
	pub description: Option<String>,
	/// The user's birthday, as provided at registration.
	pub birthday: Option<String>,
	/// The creation time of the account.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
	/// Whether this user may manage the account with the given id: their
	/// own account, or any account at all for admins.
	pub fn can_manage(&self, account: Uuid) -> bool {
		self.is_admin || self.id == account
	}
}

/// A single login session.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Session {
	/// The session id, also presented to the client as the session cookie.
	#[serde(rename = "session_id")]
	pub id: Uuid,
	/// The user the session belongs to.
	#[serde(skip_serializing)]
	#[allow(dead_code)]
	pub user_id: Uuid,
	/// The creation time of the session.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	#[validate(email)]
	pub email: String,
	/// The public name of the new account, letters and digits only.
	#[validate(length(min = 3, max = 20), custom(function = "validate_username"))]
	pub username: String,
	#[validate(length(min = 6, max = 128))]
	pub password: String,
	/// A short self-description.
	#[validate(length(max = 50))]
	pub description: Option<String>,
	/// A birthday such as `1990-04-21`.
	#[validate(length(max = 10))]
	pub birthday: Option<String>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 6, max = 128))]
	pub password: String,
}
