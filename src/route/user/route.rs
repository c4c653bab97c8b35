use aide::axum::IntoApiResponse;
use axum::{
	extract::{Path, State},
	http::{header, StatusCode},
	response::IntoResponse,
};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	route::auth::route::hash_password,
	session, AppState, Database,
};

use super::{model, Error, RouteError};

/// Update account
/// Updates an account by its unique id. Callers may update their own account; admins may update any.
#[route(tag = tag::USER, response(status = 200, description = "The updated account.", shape = "Json<model::User>"))]
pub async fn update_user(
	State(state): State<AppState>,
	session: Session,
	Path(user_id): Path<Uuid>,
	Json(input): Json<model::UpdateUserInput>,
) -> Result<Json<model::User>, RouteError> {
	if !session.user.can_manage(user_id) {
		return Err(Error::NotYourAccount.into());
	}

	let password = input
		.password
		.as_deref()
		.map(|password| hash_password(&state.hasher, password))
		.transpose()
		.map_err(Error::Hash)?;

	let user = sqlx::query_as::<_, model::User>(
		r#"
			UPDATE "user"
			SET email = COALESCE($1, email),
				username = COALESCE($2, username),
				password = COALESCE($3, password),
				description = COALESCE($4, description),
				birthday = COALESCE($5, birthday)
			WHERE id = $6
			RETURNING *
		"#,
	)
	.bind(&input.email)
	.bind(&input.username)
	.bind(&password)
	.bind(&input.description)
	.bind(&input.birthday)
	.bind(user_id)
	.fetch_optional(&state.database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("user_email_key") => Error::EmailTaken.into(),
			Some("user_username_key") => Error::UsernameTaken.into(),
			_ => RouteError::from(e),
		},
		e => RouteError::from(e),
	})?;

	Ok(Json(user.ok_or(Error::UnknownUser(user_id))?))
}

/// Delete account
/// Deletes an account and its sessions. The account's posts are left in place. Callers may delete their own account; admins may delete any. This action is irreversible.
#[route(tag = tag::USER, response(status = 204, description = "Account deleted."))]
pub async fn delete_user(
	State(database): State<Database>,
	session: Session,
	Path(user_id): Path<Uuid>,
) -> Result<impl IntoApiResponse, RouteError> {
	if !session.user.can_manage(user_id) {
		return Err(Error::NotYourAccount.into());
	}

	let result = sqlx::query(r#"DELETE FROM "user" WHERE id = $1"#)
		.bind(user_id)
		.execute(&database)
		.await?;

	if result.rows_affected() == 0 {
		return Err(Error::UnknownUser(user_id).into());
	}

	// Clear the session cookie when the caller deleted their own account
	Ok(if session.user.id == user_id {
		(
			[(header::SET_COOKIE, session::clear_cookie().to_string())],
			StatusCode::NO_CONTENT,
		)
			.into_response()
	} else {
		StatusCode::NO_CONTENT.into_response()
	})
}
