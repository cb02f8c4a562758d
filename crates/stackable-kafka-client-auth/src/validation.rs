//! Completeness checks for a [`ClientAuthentication`] before any artifacts are
//! derived from it.

use snafu::Snafu;

use crate::{
    AuthenticationType, ClientAuthentication,
    authentication::{
        custom::CustomAuthentication, oauth::OAuthAuthentication, plain::PlainAuthentication,
        scram_sha512::ScramSha512Authentication, tls::TlsAuthentication,
    },
};

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum ValidationError {
    #[snafu(display("{variant} client authentication selected, but {reason}"))]
    MissingField {
        variant: AuthenticationType,
        reason: String,
    },
}

impl ValidationError {
    /// The authentication variant which failed validation.
    pub fn variant(&self) -> AuthenticationType {
        match self {
            Self::MissingField { variant, .. } => *variant,
        }
    }
}

/// Problems which do not prevent the authentication from being configured, but
/// which will most likely break it at runtime.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
pub enum ValidationWarning {
    #[strum(
        to_string = "TLS configuration missing: related TLS client authentication will not work properly"
    )]
    TlsTransportMissing,
}

/// Validates the client authentication of a Kafka client based component.
///
/// `transport_is_secure` tells whether the connection to the Kafka cluster
/// uses TLS. TLS client authentication without TLS transport is reported as
/// a [`ValidationWarning`], not rejected.
pub fn validate_client_authentication(
    authentication: Option<&ClientAuthentication>,
    transport_is_secure: bool,
) -> Result<Option<ValidationWarning>> {
    let Some(authentication) = authentication else {
        return Ok(None);
    };

    match authentication {
        ClientAuthentication::Tls(tls) => validate_tls(tls, transport_is_secure),
        ClientAuthentication::ScramSha512(ScramSha512Authentication {
            username,
            password_secret,
        })
        | ClientAuthentication::Plain(PlainAuthentication {
            username,
            password_secret,
        }) => {
            let missing = missing_fields([
                ("username", username.is_none()),
                ("passwordSecret", password_secret.is_none()),
            ]);
            ensure_complete(authentication.authentication_type(), &missing).map(|()| None)
        }
        ClientAuthentication::OAuth(oauth) => validate_oauth(oauth).map(|()| None),
        ClientAuthentication::Custom(custom) => validate_custom(custom).map(|()| None),
    }
}

fn validate_tls(
    tls: &TlsAuthentication,
    transport_is_secure: bool,
) -> Result<Option<ValidationWarning>> {
    if tls.certificate_and_key.is_none() {
        return MissingFieldSnafu {
            variant: AuthenticationType::Tls,
            reason: "no certificate and key configured",
        }
        .fail();
    }

    if transport_is_secure {
        Ok(None)
    } else {
        let warning = ValidationWarning::TlsTransportMissing;
        tracing::warn!(%warning, "TLS client authentication configured without TLS transport");
        Ok(Some(warning))
    }
}

fn validate_oauth(oauth: &OAuthAuthentication) -> Result<()> {
    if oauth.has_valid_credentials() {
        return Ok(());
    }

    MissingFieldSnafu {
        variant: AuthenticationType::OAuth,
        reason: "some options are missing. You have to specify one of the following combinations: \
                 [accessToken], [tokenEndpointUri, clientId, refreshToken], \
                 [tokenEndpointUri, clientId, clientSecret]",
    }
    .fail()
}

fn validate_custom(custom: &CustomAuthentication) -> Result<()> {
    let missing = missing_fields([
        ("saslMechanism", custom.sasl_mechanism.is_none()),
        (
            "saslLoginCallbackHandlerClass",
            custom.sasl_login_callback_handler_class.is_none(),
        ),
        ("saslJaasConfig", custom.sasl_jaas_config.is_none()),
    ]);

    ensure_complete(AuthenticationType::Custom, &missing)
}

fn missing_fields<const N: usize>(fields: [(&'static str, bool); N]) -> Vec<&'static str> {
    fields
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
}

fn ensure_complete(variant: AuthenticationType, missing: &[&str]) -> Result<()> {
    if missing.is_empty() {
        return Ok(());
    }

    MissingFieldSnafu {
        variant,
        reason: format!("the following fields are missing: {}", missing.join(", ")),
    }
    .fail()
}
