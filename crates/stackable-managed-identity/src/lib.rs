//! SASL/OAUTHBEARER token provider for Kafka clients running with a cloud
//! managed identity.
//!
//! The [`ManagedIdentityTokenProvider`] derives the token scope from the single
//! configured bootstrap server and fetches a fresh token from the host's
//! instance metadata service whenever the Kafka client asks for one.
//!
//! ```no_run
//! use stackable_managed_identity::{
//!     ManagedIdentityTokenProvider,
//!     callback::{Callback, OAuthBearerTokenCallback},
//!     config::{ConnectionConfig, ManagedIdentityOptions},
//! };
//!
//! # fn main() -> Result<(), stackable_managed_identity::provider::Error> {
//! let mut provider = ManagedIdentityTokenProvider::new(&ManagedIdentityOptions::default())?;
//! provider.configure(&ConnectionConfig::new(["my-namespace.servicebus.windows.net:9093"]))?;
//!
//! let mut callbacks = [Callback::OAuthBearerToken(OAuthBearerTokenCallback::new())];
//! provider.handle(&mut callbacks)?;
//! # Ok(())
//! # }
//! ```
pub mod callback;
pub mod config;
pub mod credential;
pub mod provider;
pub mod token;

pub use provider::ManagedIdentityTokenProvider;
