pub mod ai_client;
pub mod credentials;
pub mod metrics;

pub use ai_client::{AiClientError, AiServiceClient, DownstreamResponse};
pub use credentials::{
    AccessCredential, CredentialError, CredentialResolver, PlaceholderCredentialResolver,
};
