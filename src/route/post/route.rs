use axum::extract::{Path, State};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	Database,
};

use super::{authorize_mutation, model, Error, RouteError};

/// Create post
/// Creates a new post, owned by the authenticated user.
#[route(tag = tag::POST)]
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			INSERT INTO post (user_id, body)
			VALUES ($1, $2)
			RETURNING *
		"#,
	)
	.bind(session.user.id)
	.bind(&input.body)
	.fetch_one(&database)
	.await?;

	Ok(Json(post))
}

/// Get own posts
/// Returns the text of every post by the authenticated user, oldest first.
#[route(tag = tag::POST)]
pub async fn get_user_posts(
	State(database): State<Database>,
	session: Session,
) -> Result<Json<Vec<String>>, RouteError> {
	let bodies = sqlx::query_scalar::<_, String>(
		r#"
			SELECT body FROM post
			WHERE user_id = $1
			ORDER BY created_at
		"#,
	)
	.bind(session.user.id)
	.fetch_all(&database)
	.await?;

	Ok(Json(bodies))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	Path(post_id): Path<Uuid>,
) -> Result<Json<model::Post>, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			SELECT * FROM post
			WHERE id = $1
		"#,
	)
	.bind(post_id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(post.ok_or(Error::UnknownPost(post_id))?))
}

/// Update post
/// Updates an existing post by its unique id. Only the post's owner may do this.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<Uuid>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			SELECT * FROM post
			WHERE id = $1
		"#,
	)
	.bind(post_id)
	.fetch_optional(&database)
	.await?
	.ok_or(Error::UnknownPost(post_id))?;

	authorize_mutation(&post, session.user.id)?;

	let post = sqlx::query_as::<_, model::Post>(
		r#"
			UPDATE post
			SET body = COALESCE($1, body)
			WHERE id = $2
			RETURNING *
		"#,
	)
	.bind(&input.body)
	.bind(post_id)
	.fetch_one(&database)
	.await?;

	Ok(Json(post))
}

/// Delete post
/// Deletes an existing post by its unique id. Only the post's owner may do this.
#[route(tag = tag::POST)]
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(post_id): Path<Uuid>,
) -> Result<(), RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			SELECT * FROM post
			WHERE id = $1
		"#,
	)
	.bind(post_id)
	.fetch_optional(&database)
	.await?
	.ok_or(Error::UnknownPost(post_id))?;

	authorize_mutation(&post, session.user.id)?;

	sqlx::query("DELETE FROM post WHERE id = $1")
		.bind(post_id)
		.execute(&database)
		.await?;

	Ok(())
}
