use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

pub use crate::route::auth::model::User;

use crate::route::auth::model::validate_username;

/// The account fields a caller is allowed to change after registration.
/// Absent fields are left untouched. Note that `is_admin` is deliberately
/// not part of this set.
#[derive(Deserialize, Validate, JsonSchema)]
pub struct UpdateUserInput {
	#[validate(email)]
	pub email: Option<String>,
	#[validate(length(min = 3, max = 20), custom(function = "validate_username"))]
	pub username: Option<String>,
	/// A new password, hashed exactly like at registration.
	#[validate(length(min = 6, max = 128))]
	pub password: Option<String>,
	#[validate(length(max = 50))]
	pub description: Option<String>,
	#[validate(length(max = 10))]
	pub birthday: Option<String>,
}
