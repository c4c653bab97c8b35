#![warn(clippy::pedantic)]

mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod session;
mod trace;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::Extension;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as a database connection pool, a hash configuration (if it's expensive
/// to create), or a cache client.
///
/// For dependencies only used by a single handler, you can combine states instead.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
}

fn router() -> ApiRouter<State> {
	ApiRouter::new()
		.nest("/auth", route::auth::routes())
		.nest("/users", route::user::routes())
		.nest("/posts", route::post::routes())
		.nest_api_service("/docs", route::docs::routes())
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let _guard = trace::init_tracing_subscriber();

	let state = State {
		database: PgPoolOptions::new()
			.acquire_timeout(std::time::Duration::from_secs(5))
			.connect(&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"))
			.await
			.expect("failed to connect to database"),
		hasher: Argon2::default(),
	};

	let governor = ratelimit::default();

	ratelimit::cleanup_old_limits(&[&governor]);

	let mut api = OpenApi::default();

	let app = router()
		.finish_api_with(&mut api, openapi::docs)
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive())
				.layer(GovernorLayer { config: governor }),
		)
		.layer(Extension(Arc::new(api)))
		.with_state(state);

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
	)
	.await
	.unwrap();
}
