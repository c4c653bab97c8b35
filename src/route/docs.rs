use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter, IntoApiResponse,
	},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, Extension};

use crate::{extract::Json, openapi::SECURITY_SCHEME_SESSION};

pub fn routes() -> ApiRouter {
	ApiRouter::new()
		.api_route_with(
			"/",
			get_with(
				Scalar::new("/docs/private/api.json")
					.with_title("Chirp API")
					.axum_handler(),
				|op| op.description("This documentation page."),
			),
			|p| p.security_requirement(SECURITY_SCHEME_SESSION),
		)
		.route("/private/api.json", get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api).into_response()
}
