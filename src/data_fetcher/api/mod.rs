pub mod auth;
mod fetch_utils;
pub mod http_client;
pub mod sources;
pub mod urls;

pub use auth::DeviceAuthProvider;
pub use http_client::create_http_client_with_timeout;
pub use sources::EpicSourceFetcher;
// Re-export URL utilities
pub use urls::*;
