pub mod auth;
pub mod cms;
pub mod events;
pub mod outcome;

pub use auth::{Credential, TokenResponse};
pub use cms::CmsPage;
pub use events::{Event, EventCollection, EventEnvironment};
pub use outcome::FetchOutcome;
