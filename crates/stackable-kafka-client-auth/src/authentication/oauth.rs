use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::secret::{CertSecretSource, GenericSecretSource};

/// SASL OAUTHBEARER authentication.
///
/// Valid configurations use either a static `accessToken`, or a
/// `tokenEndpointUri` and `clientId` together with a `refreshToken` or a
/// `clientSecret`. See [`Self::has_valid_credentials`].
#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthAuthentication {
    /// OAuth Client ID which the Kafka client can use to authenticate against
    /// the OAuth server and use the token endpoint URI.
    pub client_id: Option<String>,

    /// Authorization server token endpoint URI.
    pub token_endpoint_uri: Option<String>,

    /// Link to the Secret containing the OAuth client secret.
    pub client_secret: Option<GenericSecretSource>,

    /// Link to the Secret containing the access token obtained from the
    /// authorization server.
    pub access_token: Option<GenericSecretSource>,

    /// Link to the Secret containing the refresh token which can be used to
    /// obtain access token from the authorization server.
    pub refresh_token: Option<GenericSecretSource>,

    /// OAuth scope to use when authenticating against the authorization server.
    pub scope: Option<String>,

    /// OAuth audience to use when authenticating against the authorization server.
    pub audience: Option<String>,

    /// Enable or disable TLS hostname verification. Defaults to `false`.
    #[serde(default)]
    pub disable_tls_hostname_verification: bool,

    /// Configure whether the access token should be treated as JWT. Defaults
    /// to `true`.
    #[serde(default = "OAuthAuthentication::default_access_token_is_jwt")]
    pub access_token_is_jwt: bool,

    /// Set or limit time-to-live of the access tokens to the specified number
    /// of seconds. Only used when larger than `0`.
    #[serde(default)]
    pub max_token_expiry_seconds: i32,

    /// Trusted certificates for TLS connection to the OAuth server.
    #[serde(default)]
    pub tls_trusted_certificates: Vec<CertSecretSource>,
}

impl OAuthAuthentication {
    pub(crate) fn default_access_token_is_jwt() -> bool {
        true
    }

    /// Whether one of the accepted credential combinations is configured:
    ///
    /// * `accessToken`
    /// * `tokenEndpointUri`, `clientId` and `refreshToken`
    /// * `tokenEndpointUri`, `clientId` and `clientSecret`
    pub fn has_valid_credentials(&self) -> bool {
        let has_endpoint_and_client =
            self.token_endpoint_uri.is_some() && self.client_id.is_some();

        self.access_token.is_some()
            || (has_endpoint_and_client && self.refresh_token.is_some())
            || (has_endpoint_and_client && self.client_secret.is_some())
    }

    /// Secret backed credentials in the order they are turned into volumes,
    /// mounts and environment variables: client secret, access token,
    /// refresh token.
    pub fn secret_credentials(&self) -> impl Iterator<Item = &GenericSecretSource> {
        [&self.client_secret, &self.access_token, &self.refresh_token]
            .into_iter()
            .flatten()
    }
}

impl Default for OAuthAuthentication {
    fn default() -> Self {
        Self {
            client_id: None,
            token_endpoint_uri: None,
            client_secret: None,
            access_token: None,
            refresh_token: None,
            scope: None,
            audience: None,
            disable_tls_hostname_verification: false,
            access_token_is_jwt: Self::default_access_token_is_jwt(),
            max_token_expiry_seconds: 0,
            tls_trusted_certificates: Vec::new(),
        }
    }
}
