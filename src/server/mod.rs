mod api_error;
mod auth_routes;
pub mod config;
mod data_routes;
mod http_layers;
pub mod server;
mod session;
mod spots_routes;
pub mod state;

pub use api_error::{ApiError, Envelope};
pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use session::{AuthenticatedUser, COOKIE_SESSION_TOKEN_KEY, HEADER_SESSION_TOKEN_KEY};
