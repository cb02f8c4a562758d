//! Names shared between the resolvers and the scripts inside the workload
//! images which read them.

/// Property and environment variable names produced by
/// [`client_authentication_properties`](crate::properties::client_authentication_properties).
pub mod property {
    pub const TLS_AUTH_CERT: &str = "TLS_AUTH_CERT";
    pub const TLS_AUTH_KEY: &str = "TLS_AUTH_KEY";
    pub const SASL_USERNAME: &str = "SASL_USERNAME";
    pub const SASL_PASSWORD_FILE: &str = "SASL_PASSWORD_FILE";
    pub const SASL_MECHANISM: &str = "SASL_MECHANISM";
    pub const OAUTH_CONFIG: &str = "OAUTH_CONFIG";
    pub const CUSTOM_SASL_MECHANISM: &str = "CUSTOM_SASL_MECHANISM";
    pub const SASL_JAAS_CONFIG: &str = "SASL_JAAS_CONFIG";
    pub const SASL_LOGIN_CALLBACK_HANDLER_CLASS: &str = "SASL_LOGIN_CALLBACK_HANDLER_CLASS";

    // These are only ever emitted as environment variables sourced from a Secret.
    pub const OAUTH_CLIENT_SECRET: &str = "OAUTH_CLIENT_SECRET";
    pub const OAUTH_ACCESS_TOKEN: &str = "OAUTH_ACCESS_TOKEN";
    pub const OAUTH_REFRESH_TOKEN: &str = "OAUTH_REFRESH_TOKEN";
}

/// Canonical SASL mechanism names.
pub mod mechanism {
    pub const PLAIN: &str = "PLAIN";
    pub const SCRAM_SHA_512: &str = "SCRAM-SHA-512";
    pub const OAUTHBEARER: &str = "OAUTHBEARER";

    /// Marker telling the image that the real mechanism is in
    /// `CUSTOM_SASL_MECHANISM`.
    pub const CUSTOM: &str = "custom";
}

/// Option keys understood by the Strimzi OAuth client library. The order in
/// which they are written into `OAUTH_CONFIG` is fixed, see
/// [`oauth_config`](crate::properties::oauth_config).
pub mod oauth {
    pub const CLIENT_ID: &str = "oauth.client.id";
    pub const TOKEN_ENDPOINT_URI: &str = "oauth.token.endpoint.uri";
    pub const SCOPE: &str = "oauth.scope";
    pub const AUDIENCE: &str = "oauth.audience";
    pub const SSL_ENDPOINT_IDENTIFICATION_ALGORITHM: &str =
        "oauth.ssl.endpoint.identification.algorithm";
    pub const ACCESS_TOKEN_IS_JWT: &str = "oauth.access.token.is.jwt";
    pub const MAX_TOKEN_EXPIRY_SECONDS: &str = "oauth.max.token.expiry.seconds";
}

/// File name trusted OAuth certificates are projected to inside their volume.
pub const OAUTH_TRUSTED_CERTIFICATE_FILE_NAME: &str = "tls.crt";

pub const DEFAULT_TLS_VOLUME_MOUNT: &str = "/opt/kafka/client-auth-certs/";
pub const DEFAULT_PASSWORD_VOLUME_MOUNT: &str = "/opt/kafka/client-auth-passwords/";
pub const DEFAULT_OAUTH_CERTS_VOLUME_MOUNT: &str = "/opt/kafka/oauth-certs";
pub const DEFAULT_OAUTH_SECRETS_VOLUME_MOUNT: &str = "/opt/kafka/oauth-secrets/";
pub const DEFAULT_OAUTH_VOLUME_NAME_PREFIX: &str = "oauth-certs";

/// Secret volumes are read-only for everyone by default.
pub const SECRET_VOLUME_DEFAULT_MODE: i32 = 0o444;

/// On OpenShift the random UID is part of the root group, so group access is enough.
pub const SECRET_VOLUME_DEFAULT_MODE_OPENSHIFT: i32 = 0o440;

/// Maximum length of a Kubernetes volume name (RFC 1123 label).
pub const MAX_VOLUME_NAME_LENGTH: usize = 63;
