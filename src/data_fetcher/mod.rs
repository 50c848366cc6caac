pub mod api;
pub mod models;
pub mod traits;

pub use api::{DeviceAuthProvider, EpicSourceFetcher};
pub use models::{CmsPage, Credential, Event, EventCollection, EventEnvironment, FetchOutcome};
pub use traits::{CredentialProvider, SourceFetcher};
