//! Resolution of Kafka client authentication for managed components.
//!
//! A [`ClientAuthentication`] describes how a Kafka client based component
//! (MirrorMaker, Connect, Bridge, ...) authenticates against a Kafka cluster.
//! This crate turns such a descriptor into the concrete artifacts a workload
//! needs:
//!
//! - [`validation::validate_client_authentication`] checks the descriptor
//!   before anything else is done with it.
//! - [`volumes::client_authentication_volumes`] and
//!   [`mounts::client_authentication_volume_mounts`] produce the secret
//!   [`Volume`](k8s_openapi::api::core::v1::Volume)s and matching
//!   [`VolumeMount`](k8s_openapi::api::core::v1::VolumeMount)s.
//! - [`properties::client_authentication_properties`] and
//!   [`properties::client_authentication_env_vars`] encode the SASL mechanism
//!   and credentials as properties or environment variables.
//!
//! All functions are pure. Callers that collect artifacts from several
//! descriptors into one list use [`volumes::merge_volumes`] and
//! [`mounts::merge_volume_mounts`] to keep names unique.
//!
//! ```
//! use stackable_kafka_client_auth::{
//!     ClientAuthentication,
//!     authentication::scram_sha512::ScramSha512Authentication,
//!     secret::PasswordSecretSource,
//!     properties::client_authentication_properties,
//!     validation::validate_client_authentication,
//! };
//!
//! let authentication = ClientAuthentication::ScramSha512(ScramSha512Authentication {
//!     username: Some("my-user".to_string()),
//!     password_secret: Some(PasswordSecretSource::new("my-user", "password")),
//! });
//!
//! let warning = validate_client_authentication(Some(&authentication), true).unwrap();
//! assert!(warning.is_none());
//!
//! let properties = client_authentication_properties(Some(&authentication));
//! assert_eq!(properties["SASL_MECHANISM"], "SCRAM-SHA-512");
//! assert_eq!(properties["SASL_PASSWORD_FILE"], "my-user/password");
//! ```

pub mod authentication;
pub mod builder;
pub mod constants;
pub mod mounts;
pub mod properties;
pub mod secret;
pub mod validation;
pub mod volumes;

pub use authentication::{AuthenticationType, ClientAuthentication};

// External re-exports
pub use k8s_openapi;
