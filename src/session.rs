use uuid::Uuid;

pub const COOKIE_NAME: &str = "session";

/// Creates a session cookie for the given session id.
///
/// The cookie is marked `HttpOnly` so scripts can never read it, and
/// `Secure` outside of development builds.
pub fn create_cookie(session_id: Uuid) -> cookie::Cookie<'static> {
	cookie::Cookie::build((COOKIE_NAME, session_id.to_string()))
		.http_only(true)
		.secure(!cfg!(debug_assertions))
		.path("/")
		.into()
}

/// Creates an empty session cookie that expires immediately, replacing
/// the one held by the client.
pub fn clear_cookie() -> cookie::Cookie<'static> {
	cookie::Cookie::build(COOKIE_NAME)
		.http_only(true)
		.secure(!cfg!(debug_assertions))
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into()
}
