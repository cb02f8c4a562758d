//! The client authentication descriptor.
//!
//! Exactly one mechanism is active at a time. The absence of a descriptor
//! (`Option::None` in every public function of this crate) means the client
//! does not authenticate at all.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::mechanism;

pub mod custom;
pub mod oauth;
pub mod plain;
pub mod scram_sha512;
pub mod tls;

use custom::CustomAuthentication;
use oauth::OAuthAuthentication;
use plain::PlainAuthentication;
use scram_sha512::ScramSha512Authentication;
use tls::TlsAuthentication;

/// Authentication configuration of a Kafka client, as it is embedded in the
/// spec of MirrorMaker, Connect and Bridge resources.
///
/// ### Example
///
/// ```
/// use stackable_kafka_client_auth::{AuthenticationType, ClientAuthentication};
///
/// let authentication: ClientAuthentication = serde_json::from_str(
///     r#"{"type": "tls", "certificateAndKey": {"secretName": "my-user", "certificate": "user.crt", "key": "user.key"}}"#,
/// )
/// .unwrap();
///
/// assert_eq!(authentication.authentication_type(), AuthenticationType::Tls);
/// ```
#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ClientAuthentication {
    /// Mutual TLS using a client certificate and key.
    #[serde(rename = "tls")]
    Tls(TlsAuthentication),

    /// SASL SCRAM-SHA-512 with a username and a password stored in a Secret.
    #[serde(rename = "scram-sha-512")]
    ScramSha512(ScramSha512Authentication),

    /// SASL PLAIN with a username and a password stored in a Secret.
    #[serde(rename = "plain")]
    Plain(PlainAuthentication),

    /// SASL OAUTHBEARER, either with a static access token or with
    /// credentials used against a token endpoint.
    #[serde(rename = "oauth")]
    OAuth(OAuthAuthentication),

    /// An arbitrary SASL mechanism, with the JAAS config and login callback
    /// handler passed through verbatim.
    #[serde(rename = "custom")]
    Custom(CustomAuthentication),
}

/// The kind of a [`ClientAuthentication`], without any of its configuration.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display, strum::AsRefStr)]
pub enum AuthenticationType {
    #[strum(serialize = "TLS")]
    Tls,

    #[strum(serialize = "SCRAM-SHA-512")]
    ScramSha512,

    #[strum(serialize = "PLAIN")]
    Plain,

    #[strum(serialize = "OAUTH")]
    OAuth,

    #[strum(serialize = "Custom")]
    Custom,
}

impl ClientAuthentication {
    pub fn authentication_type(&self) -> AuthenticationType {
        match self {
            Self::Tls(_) => AuthenticationType::Tls,
            Self::ScramSha512(_) => AuthenticationType::ScramSha512,
            Self::Plain(_) => AuthenticationType::Plain,
            Self::OAuth(_) => AuthenticationType::OAuth,
            Self::Custom(_) => AuthenticationType::Custom,
        }
    }

    /// The value written to `SASL_MECHANISM`. TLS client authentication does
    /// not use SASL, so there is none.
    pub fn sasl_mechanism(&self) -> Option<&'static str> {
        match self {
            Self::Tls(_) => None,
            Self::ScramSha512(_) => Some(mechanism::SCRAM_SHA_512),
            Self::Plain(_) => Some(mechanism::PLAIN),
            Self::OAuth(_) => Some(mechanism::OAUTHBEARER),
            Self::Custom(_) => Some(mechanism::CUSTOM),
        }
    }
}
