//! API endpoint modules.

pub mod accounts;
pub mod downloads;
pub mod extract;
pub mod health;
pub mod openapi;
pub mod submissions;

pub use accounts::configure_routes as configure_account_routes;
pub use downloads::configure_routes as configure_download_routes;
pub use extract::configure_routes as configure_extract_routes;
pub use health::configure_routes as configure_health_routes;
pub use openapi::{configure_routes as configure_openapi_routes, ApiDoc};
pub use submissions::configure_routes as configure_submission_routes;
