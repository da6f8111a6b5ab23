pub mod api;
pub mod session;

pub use api::ApiClient;
pub use session::{CredentialProvider, SessionFile, StaticCredentials, StoredSession};
