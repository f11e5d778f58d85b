use axum::{Router, routing::get};

pub mod ajax;
pub mod system;

/// Router for the AJAX endpoint (GET and POST share one handler).
pub fn router() -> Router {
    Router::new().route("/", get(ajax::handle).post(ajax::handle))
}
