mod credentials;
mod store;

pub use credentials::Credentials;
pub use store::CredentialStore;
