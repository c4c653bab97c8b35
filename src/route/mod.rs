pub mod auth;
pub mod docs;
pub mod post;
pub mod user;
