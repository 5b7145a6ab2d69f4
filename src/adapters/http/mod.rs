//! HTTP adapter: axum routes, handlers, and DTOs for the public API.

mod dto;
mod handlers;
mod routes;

pub use handlers::ApiHandlers;
pub use routes::api_routes;
