//! Authentication properties and environment variables for Kafka clients.
//!
//! The properties are read by the startup scripts of the workload images,
//! which turn them into the `sasl.*` and `ssl.*` client settings. Secret
//! values never appear in a property, only paths to mounted files or
//! references to Secret keys.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::EnvVar;

use crate::{
    ClientAuthentication,
    authentication::{custom::CustomAuthentication, oauth::OAuthAuthentication},
    builder::env::{env_var, env_var_from_secret_key},
    constants::{oauth as oauth_option, property},
    secret::SecretReference,
};

/// Returns the authentication properties for `authentication`, keyed by
/// property name.
///
/// | Variant | Properties |
/// | --- | --- |
/// | TLS | `TLS_AUTH_CERT`, `TLS_AUTH_KEY` as `<secret>/<key>` |
/// | SCRAM-SHA-512, PLAIN | `SASL_USERNAME`, `SASL_PASSWORD_FILE` as `<secret>/<key>`, `SASL_MECHANISM` |
/// | OAuth | `SASL_MECHANISM`, `OAUTH_CONFIG` (see [`oauth_config`]) |
/// | Custom | `SASL_MECHANISM` (`custom`), `CUSTOM_SASL_MECHANISM`, `SASL_JAAS_CONFIG`, `SASL_LOGIN_CALLBACK_HANDLER_CLASS` |
pub fn client_authentication_properties(
    authentication: Option<&ClientAuthentication>,
) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();

    let Some(authentication) = authentication else {
        return properties;
    };

    let mut insert = |name: &str, value: String| {
        properties.insert(name.to_owned(), value);
    };

    if let Some(mechanism) = authentication.sasl_mechanism() {
        insert(property::SASL_MECHANISM, mechanism.to_owned());
    }

    match authentication {
        ClientAuthentication::Tls(tls) => {
            if let Some(certificate_and_key) = &tls.certificate_and_key {
                let secret_name = &certificate_and_key.secret_name;
                insert(
                    property::TLS_AUTH_CERT,
                    format!("{secret_name}/{}", certificate_and_key.certificate),
                );
                insert(
                    property::TLS_AUTH_KEY,
                    format!("{secret_name}/{}", certificate_and_key.key),
                );
            }
        }
        ClientAuthentication::ScramSha512(scram) => {
            insert_password_properties(
                &mut insert,
                scram.username.as_deref(),
                scram.password_secret.as_ref(),
            );
        }
        ClientAuthentication::Plain(plain) => {
            insert_password_properties(
                &mut insert,
                plain.username.as_deref(),
                plain.password_secret.as_ref(),
            );
        }
        ClientAuthentication::OAuth(oauth) => {
            insert(property::OAUTH_CONFIG, oauth_config(oauth));
        }
        ClientAuthentication::Custom(CustomAuthentication {
            sasl_mechanism,
            sasl_jaas_config,
            sasl_login_callback_handler_class,
        }) => {
            for (name, value) in [
                (property::CUSTOM_SASL_MECHANISM, sasl_mechanism),
                (property::SASL_JAAS_CONFIG, sasl_jaas_config),
                (
                    property::SASL_LOGIN_CALLBACK_HANDLER_CLASS,
                    sasl_login_callback_handler_class,
                ),
            ] {
                if let Some(value) = value {
                    insert(name, value.clone());
                }
            }
        }
    }

    properties
}

fn insert_password_properties(
    insert: &mut impl FnMut(&str, String),
    username: Option<&str>,
    password_secret: Option<&impl SecretReference>,
) {
    if let Some(username) = username {
        insert(property::SASL_USERNAME, username.to_owned());
    }

    if let Some(password_secret) = password_secret {
        insert(
            property::SASL_PASSWORD_FILE,
            format!(
                "{}/{}",
                password_secret.secret_name(),
                password_secret.secret_key().unwrap_or_default()
            ),
        );
    }
}

/// Builds the space separated `OAUTH_CONFIG` value.
///
/// Options are only written if they are set, always in this order: client
/// id, token endpoint URI, scope, audience, disabled hostname verification,
/// non-JWT access token, maximum token expiry. The order must not change, as
/// the resulting string ends up in Pod templates and any difference causes a
/// rolling restart.
pub fn oauth_config(oauth: &OAuthAuthentication) -> String {
    let disabled_hostname_verification =
        oauth.disable_tls_hostname_verification.then(String::new);
    let access_token_is_not_jwt = (!oauth.access_token_is_jwt).then(|| false.to_string());
    let max_token_expiry_seconds = (oauth.max_token_expiry_seconds > 0)
        .then(|| oauth.max_token_expiry_seconds.to_string());

    [
        (oauth_option::CLIENT_ID, oauth.client_id.clone()),
        (
            oauth_option::TOKEN_ENDPOINT_URI,
            oauth.token_endpoint_uri.clone(),
        ),
        (oauth_option::SCOPE, oauth.scope.clone()),
        (oauth_option::AUDIENCE, oauth.audience.clone()),
        (
            oauth_option::SSL_ENDPOINT_IDENTIFICATION_ALGORITHM,
            disabled_hostname_verification,
        ),
        (oauth_option::ACCESS_TOKEN_IS_JWT, access_token_is_not_jwt),
        (
            oauth_option::MAX_TOKEN_EXPIRY_SECONDS,
            max_token_expiry_seconds,
        ),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|value| format!("{key}=\"{value}\"")))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Returns the authentication environment variables for `authentication`.
///
/// Every property of [`client_authentication_properties`] becomes a literal
/// environment variable, named by `namer` (components prefix them
/// differently). For OAuth, the client secret, access token and refresh token
/// are added afterwards as `OAUTH_CLIENT_SECRET`, `OAUTH_ACCESS_TOKEN` and
/// `OAUTH_REFRESH_TOKEN`, read from their Secrets by Kubernetes.
pub fn client_authentication_env_vars(
    authentication: Option<&ClientAuthentication>,
    namer: impl Fn(&str) -> String,
) -> Vec<EnvVar> {
    let mut env_vars = client_authentication_properties(authentication)
        .into_iter()
        .map(|(name, value)| env_var(namer(&name), value))
        .collect::<Vec<_>>();

    if let Some(ClientAuthentication::OAuth(oauth)) = authentication {
        let secret_env_vars = [
            (property::OAUTH_CLIENT_SECRET, &oauth.client_secret),
            (property::OAUTH_ACCESS_TOKEN, &oauth.access_token),
            (property::OAUTH_REFRESH_TOKEN, &oauth.refresh_token),
        ];

        for (name, secret) in secret_env_vars {
            if let Some(secret) = secret {
                env_vars.push(env_var_from_secret_key(
                    namer(name),
                    &secret.secret_name,
                    &secret.key,
                ));
            }
        }
    }

    env_vars
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use k8s_openapi::api::core::v1::SecretKeySelector;
    use rstest::rstest;

    use super::*;
    use crate::{
        authentication::{
            plain::PlainAuthentication, scram_sha512::ScramSha512Authentication,
            tls::TlsAuthentication,
        },
        secret::{CertAndKeySecretSource, GenericSecretSource, PasswordSecretSource},
    };

    fn properties(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn absent_authentication_has_no_properties() {
        assert!(client_authentication_properties(None).is_empty());
        assert!(client_authentication_env_vars(None, ToString::to_string).is_empty());
    }

    #[test]
    fn tls_properties() {
        let authentication = ClientAuthentication::Tls(TlsAuthentication {
            certificate_and_key: Some(CertAndKeySecretSource::new(
                "my-user", "user.crt", "user.key",
            )),
        });

        assert_eq!(
            client_authentication_properties(Some(&authentication)),
            properties(&[
                ("TLS_AUTH_CERT", "my-user/user.crt"),
                ("TLS_AUTH_KEY", "my-user/user.key"),
            ])
        );
    }

    #[test]
    fn password_properties() {
        let scram = ClientAuthentication::ScramSha512(ScramSha512Authentication {
            username: Some("my-user".to_string()),
            password_secret: Some(PasswordSecretSource::new("my-secret", "password")),
        });
        let plain = ClientAuthentication::Plain(PlainAuthentication {
            username: Some("my-user".to_string()),
            password_secret: Some(PasswordSecretSource::new("my-secret", "password")),
        });

        assert_eq!(
            client_authentication_properties(Some(&scram)),
            properties(&[
                ("SASL_MECHANISM", "SCRAM-SHA-512"),
                ("SASL_PASSWORD_FILE", "my-secret/password"),
                ("SASL_USERNAME", "my-user"),
            ])
        );
        assert_eq!(
            client_authentication_properties(Some(&plain)),
            properties(&[
                ("SASL_MECHANISM", "PLAIN"),
                ("SASL_PASSWORD_FILE", "my-secret/password"),
                ("SASL_USERNAME", "my-user"),
            ])
        );
    }

    #[test]
    fn custom_properties() {
        let authentication = serde_yaml::from_str::<ClientAuthentication>(indoc! {"
            type: custom
            saslMechanism: OAUTHBEARER
            saslJaasConfig: org.apache.kafka.common.security.oauthbearer.OAuthBearerLoginModule required;
            saslLoginCallbackHandlerClass: com.example.ManagedIdentityHandler
        "})
        .unwrap();

        assert_eq!(
            client_authentication_properties(Some(&authentication)),
            properties(&[
                ("CUSTOM_SASL_MECHANISM", "OAUTHBEARER"),
                (
                    "SASL_JAAS_CONFIG",
                    "org.apache.kafka.common.security.oauthbearer.OAuthBearerLoginModule required;"
                ),
                (
                    "SASL_LOGIN_CALLBACK_HANDLER_CLASS",
                    "com.example.ManagedIdentityHandler"
                ),
                ("SASL_MECHANISM", "custom"),
            ])
        );
    }

    #[test]
    fn oauth_config_option_order() {
        let oauth = OAuthAuthentication {
            client_id: Some("abc".to_string()),
            token_endpoint_uri: Some("https://idp/token".to_string()),
            access_token_is_jwt: false,
            ..Default::default()
        };

        assert_eq!(
            oauth_config(&oauth),
            r#"oauth.client.id="abc" oauth.token.endpoint.uri="https://idp/token" oauth.access.token.is.jwt="false""#
        );
    }

    #[test]
    fn oauth_config_with_all_options() {
        let oauth = OAuthAuthentication {
            client_id: Some("my-client".to_string()),
            token_endpoint_uri: Some("https://sso/token".to_string()),
            scope: Some("kafka".to_string()),
            audience: Some("kafka-broker".to_string()),
            disable_tls_hostname_verification: true,
            access_token_is_jwt: false,
            max_token_expiry_seconds: 600,
            ..Default::default()
        };

        assert_eq!(
            oauth_config(&oauth),
            concat!(
                r#"oauth.client.id="my-client" "#,
                r#"oauth.token.endpoint.uri="https://sso/token" "#,
                r#"oauth.scope="kafka" "#,
                r#"oauth.audience="kafka-broker" "#,
                r#"oauth.ssl.endpoint.identification.algorithm="" "#,
                r#"oauth.access.token.is.jwt="false" "#,
                r#"oauth.max.token.expiry.seconds="600""#,
            )
        );
    }

    #[rstest]
    #[case(0, "")]
    #[case(-1, "")]
    #[case(1, r#"oauth.max.token.expiry.seconds="1""#)]
    fn oauth_config_token_expiry(#[case] seconds: i32, #[case] expected: &str) {
        let oauth = OAuthAuthentication {
            max_token_expiry_seconds: seconds,
            ..Default::default()
        };

        assert_eq!(oauth_config(&oauth), expected);
    }

    #[test]
    fn oauth_properties_keep_secrets_out() {
        let authentication = ClientAuthentication::OAuth(OAuthAuthentication {
            client_id: Some("my-client".to_string()),
            token_endpoint_uri: Some("https://sso/token".to_string()),
            client_secret: Some(GenericSecretSource::new("my-client-secret", "secret")),
            ..Default::default()
        });

        assert_eq!(
            client_authentication_properties(Some(&authentication)),
            properties(&[
                (
                    "OAUTH_CONFIG",
                    r#"oauth.client.id="my-client" oauth.token.endpoint.uri="https://sso/token""#
                ),
                ("SASL_MECHANISM", "OAUTHBEARER"),
            ])
        );
    }

    #[test]
    fn oauth_env_vars() {
        let authentication = ClientAuthentication::OAuth(OAuthAuthentication {
            client_id: Some("my-client".to_string()),
            token_endpoint_uri: Some("https://sso/token".to_string()),
            client_secret: Some(GenericSecretSource::new("my-client-secret", "secret")),
            access_token: Some(GenericSecretSource::new("my-access-token", "token")),
            refresh_token: Some(GenericSecretSource::new("my-refresh-token", "refresh")),
            ..Default::default()
        });

        let env_vars = client_authentication_env_vars(Some(&authentication), |name| {
            format!("KAFKA_MIRRORMAKER_{name}")
        });

        let names = env_vars
            .iter()
            .map(|env_var| env_var.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec![
            "KAFKA_MIRRORMAKER_OAUTH_CONFIG",
            "KAFKA_MIRRORMAKER_SASL_MECHANISM",
            "KAFKA_MIRRORMAKER_OAUTH_CLIENT_SECRET",
            "KAFKA_MIRRORMAKER_OAUTH_ACCESS_TOKEN",
            "KAFKA_MIRRORMAKER_OAUTH_REFRESH_TOKEN",
        ]);

        assert_eq!(env_vars[1].value.as_deref(), Some("OAUTHBEARER"));
        assert_eq!(
            env_vars[3]
                .value_from
                .as_ref()
                .and_then(|source| source.secret_key_ref.clone()),
            Some(SecretKeySelector {
                name: "my-access-token".to_string(),
                key: "token".to_string(),
                optional: None,
            })
        );
        assert!(env_vars[2..].iter().all(|env_var| env_var.value.is_none()));
    }
}
