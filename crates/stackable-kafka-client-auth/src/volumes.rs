//! Volumes needed by a Kafka client to read its authentication Secrets.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Volume;

use crate::{
    ClientAuthentication,
    builder::volume::{SecretVolumeFactory, volume_name},
    constants::{DEFAULT_OAUTH_VOLUME_NAME_PREFIX, OAUTH_TRUSTED_CERTIFICATE_FILE_NAME},
    secret::{CertSecretSource, SecretReference},
};

/// Controls how authentication volumes are named and which ones are created.
///
/// The same options must be passed to
/// [`client_authentication_volume_mounts`](crate::mounts::client_authentication_volume_mounts),
/// otherwise mounts will not find their volumes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeOptions {
    /// Prepended to the Secret name to form the volume name.
    pub volume_name_prefix: String,

    /// Prefix of the volumes holding trusted OAuth server certificates. The
    /// volumes are called `<prefix>-<index>`.
    pub oauth_volume_name_prefix: String,

    /// Whether the workload runs on OpenShift, which changes the file mode of
    /// Secret volumes.
    pub is_openshift: bool,

    /// Whether the OAuth client secret, access token and refresh token are
    /// made available as volumes, in addition to environment variables.
    pub create_oauth_secret_volumes: bool,
}

impl Default for VolumeOptions {
    fn default() -> Self {
        Self {
            volume_name_prefix: String::new(),
            oauth_volume_name_prefix: DEFAULT_OAUTH_VOLUME_NAME_PREFIX.to_owned(),
            is_openshift: false,
            create_oauth_secret_volumes: false,
        }
    }
}

impl VolumeOptions {
    pub fn new(oauth_volume_name_prefix: impl Into<String>) -> Self {
        Self {
            oauth_volume_name_prefix: oauth_volume_name_prefix.into(),
            ..Self::default()
        }
    }

    pub fn with_volume_name_prefix(mut self, volume_name_prefix: impl Into<String>) -> Self {
        self.volume_name_prefix = volume_name_prefix.into();
        self
    }

    pub fn with_openshift(mut self, is_openshift: bool) -> Self {
        self.is_openshift = is_openshift;
        self
    }

    pub fn with_oauth_secret_volumes(mut self, create_oauth_secret_volumes: bool) -> Self {
        self.create_oauth_secret_volumes = create_oauth_secret_volumes;
        self
    }

    /// Name of the volume holding the Secret `secret_name`.
    pub fn secret_volume_name(&self, secret_name: &str) -> String {
        volume_name(&format!("{}{secret_name}", self.volume_name_prefix))
    }

    /// Name of the volume holding the `index`th trusted OAuth certificate.
    pub fn oauth_certificate_volume_name(&self, index: usize) -> String {
        volume_name(&format!("{}-{index}", self.oauth_volume_name_prefix))
    }
}

/// Returns the volumes required by `authentication`, in declaration order and
/// without duplicate names.
///
/// * TLS, SCRAM-SHA-512 and PLAIN need the Secret holding the certificate or
///   password.
/// * OAuth needs one volume per trusted certificate and, if requested via
///   [`VolumeOptions::create_oauth_secret_volumes`], the Secrets of the
///   client secret, access token and refresh token.
/// * Custom authentication passes everything through environment variables
///   and needs no volumes.
pub fn client_authentication_volumes(
    authentication: Option<&ClientAuthentication>,
    options: &VolumeOptions,
    factory: &impl SecretVolumeFactory,
) -> Vec<Volume> {
    let mut volumes = Vec::new();

    let Some(authentication) = authentication else {
        return volumes;
    };

    match authentication {
        ClientAuthentication::Tls(tls) => {
            if let Some(certificate_and_key) = &tls.certificate_and_key {
                add_secret_volume(&mut volumes, certificate_and_key, options, factory);
            }
        }
        ClientAuthentication::ScramSha512(scram) => {
            if let Some(password_secret) = &scram.password_secret {
                add_secret_volume(&mut volumes, password_secret, options, factory);
            }
        }
        ClientAuthentication::Plain(plain) => {
            if let Some(password_secret) = &plain.password_secret {
                add_secret_volume(&mut volumes, password_secret, options, factory);
            }
        }
        ClientAuthentication::OAuth(oauth) => {
            merge_volumes(
                &mut volumes,
                oauth_certificate_volumes(&oauth.tls_trusted_certificates, options, factory),
            );

            if options.create_oauth_secret_volumes {
                for secret in oauth.secret_credentials() {
                    add_secret_volume(&mut volumes, secret, options, factory);
                }
            }
        }
        ClientAuthentication::Custom(_) => {}
    }

    volumes
}

fn add_secret_volume(
    volumes: &mut Vec<Volume>,
    secret: &impl SecretReference,
    options: &VolumeOptions,
    factory: &impl SecretVolumeFactory,
) {
    let name = options.secret_volume_name(secret.secret_name());
    let volume = factory.secret_volume(
        &name,
        secret.secret_name(),
        &BTreeMap::new(),
        options.is_openshift,
    );
    merge_volumes(volumes, [volume]);
}

/// Volumes for the certificates used to verify the OAuth server. Each
/// certificate is projected as `tls.crt`, regardless of its key in the Secret.
///
/// This is shared between OAuth clients and servers.
pub fn oauth_certificate_volumes(
    trusted_certificates: &[CertSecretSource],
    options: &VolumeOptions,
    factory: &impl SecretVolumeFactory,
) -> Vec<Volume> {
    trusted_certificates
        .iter()
        .enumerate()
        .map(|(index, certificate)| {
            let items = BTreeMap::from([(
                certificate.certificate.clone(),
                OAUTH_TRUSTED_CERTIFICATE_FILE_NAME.to_owned(),
            )]);

            factory.secret_volume(
                &options.oauth_certificate_volume_name(index),
                &certificate.secret_name,
                &items,
                options.is_openshift,
            )
        })
        .collect()
}

/// Appends every volume of `new` whose name is not yet part of `volumes`.
/// Returns how many volumes were added.
///
/// A volume is never replaced. If a skipped volume differs from the one
/// already present, e.g. because two Secret names only differ in `.` and `-`
/// (see [`volume_name`]), a warning is logged.
pub fn merge_volumes(volumes: &mut Vec<Volume>, new: impl IntoIterator<Item = Volume>) -> usize {
    merge_by_name(volumes, new, |volume| volume.name.as_str())
}

pub(crate) fn merge_by_name<T: PartialEq>(
    existing: &mut Vec<T>,
    new: impl IntoIterator<Item = T>,
    name: impl Fn(&T) -> &str,
) -> usize {
    let mut added = 0;

    for item in new {
        if let Some(present) = existing.iter().find(|present| name(present) == name(&item)) {
            if *present == item {
                tracing::debug!(name = name(&item), "skipping duplicate name");
            } else {
                tracing::warn!(
                    name = name(&item),
                    "skipping entry whose name is already taken by a different one"
                );
            }
            continue;
        }

        existing.push(item);
        added += 1;
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        authentication::{
            custom::CustomAuthentication, oauth::OAuthAuthentication, plain::PlainAuthentication,
            scram_sha512::ScramSha512Authentication, tls::TlsAuthentication,
        },
        builder::volume::KubernetesSecretVolumeFactory,
        secret::{CertAndKeySecretSource, GenericSecretSource, PasswordSecretSource},
    };

    fn names(volumes: &[Volume]) -> Vec<&str> {
        volumes.iter().map(|volume| volume.name.as_str()).collect()
    }

    fn secret_names(volumes: &[Volume]) -> Vec<&str> {
        volumes
            .iter()
            .filter_map(|volume| volume.secret.as_ref()?.secret_name.as_deref())
            .collect()
    }

    fn oauth_with_everything() -> ClientAuthentication {
        ClientAuthentication::OAuth(OAuthAuthentication {
            client_id: Some("my-client".to_string()),
            token_endpoint_uri: Some("https://sso/token".to_string()),
            client_secret: Some(GenericSecretSource::new("my-client-secret", "secret")),
            access_token: Some(GenericSecretSource::new("my-access-token", "token")),
            refresh_token: Some(GenericSecretSource::new("my-refresh-token", "token")),
            tls_trusted_certificates: vec![
                CertSecretSource::new("first-ca", "ca.crt"),
                CertSecretSource::new("second-ca", "other.crt"),
            ],
            ..Default::default()
        })
    }

    #[test]
    fn absent_authentication_has_no_volumes() {
        let volumes = client_authentication_volumes(
            None,
            &VolumeOptions::default(),
            &KubernetesSecretVolumeFactory,
        );
        assert!(volumes.is_empty());
    }

    #[test]
    fn tls_volume() {
        let authentication = ClientAuthentication::Tls(TlsAuthentication {
            certificate_and_key: Some(CertAndKeySecretSource::new(
                "my-user", "user.crt", "user.key",
            )),
        });

        let volumes = client_authentication_volumes(
            Some(&authentication),
            &VolumeOptions::default().with_volume_name_prefix("tls-"),
            &KubernetesSecretVolumeFactory,
        );

        assert_eq!(names(&volumes), vec!["tls-my-user"]);
        assert_eq!(secret_names(&volumes), vec!["my-user"]);
    }

    #[test]
    fn password_volumes() {
        let scram = ClientAuthentication::ScramSha512(ScramSha512Authentication {
            username: Some("my-user".to_string()),
            password_secret: Some(PasswordSecretSource::new("my-password", "password")),
        });
        let plain = ClientAuthentication::Plain(PlainAuthentication {
            username: Some("my-user".to_string()),
            password_secret: Some(PasswordSecretSource::new("my-password", "password")),
        });

        for authentication in [scram, plain] {
            let volumes = client_authentication_volumes(
                Some(&authentication),
                &VolumeOptions::default(),
                &KubernetesSecretVolumeFactory,
            );
            assert_eq!(names(&volumes), vec!["my-password"]);
        }
    }

    #[test]
    fn oauth_certificate_volumes_only_by_default() {
        let volumes = client_authentication_volumes(
            Some(&oauth_with_everything()),
            &VolumeOptions::default(),
            &KubernetesSecretVolumeFactory,
        );

        assert_eq!(names(&volumes), vec!["oauth-certs-0", "oauth-certs-1"]);
        assert_eq!(secret_names(&volumes), vec!["first-ca", "second-ca"]);

        let items = volumes[1].secret.as_ref().unwrap().items.clone().unwrap();
        assert_eq!(items[0].key, "other.crt");
        assert_eq!(items[0].path, "tls.crt");
    }

    #[test]
    fn oauth_secret_volumes_when_requested() {
        let volumes = client_authentication_volumes(
            Some(&oauth_with_everything()),
            &VolumeOptions::new("mm2-oauth-certs")
                .with_volume_name_prefix("oauth-")
                .with_oauth_secret_volumes(true),
            &KubernetesSecretVolumeFactory,
        );

        assert_eq!(names(&volumes), vec![
            "mm2-oauth-certs-0",
            "mm2-oauth-certs-1",
            "oauth-my-client-secret",
            "oauth-my-access-token",
            "oauth-my-refresh-token",
        ]);
    }

    #[test]
    fn shared_secret_names_are_deduplicated() {
        let authentication = ClientAuthentication::OAuth(OAuthAuthentication {
            access_token: Some(GenericSecretSource::new("my-oauth", "access-token")),
            refresh_token: Some(GenericSecretSource::new("my-oauth", "refresh-token")),
            client_secret: Some(GenericSecretSource::new("my-oauth", "client-secret")),
            ..Default::default()
        });

        let volumes = client_authentication_volumes(
            Some(&authentication),
            &VolumeOptions::default().with_oauth_secret_volumes(true),
            &KubernetesSecretVolumeFactory,
        );

        assert_eq!(names(&volumes), vec!["my-oauth"]);
    }

    #[test]
    fn custom_has_no_volumes() {
        let authentication = ClientAuthentication::Custom(CustomAuthentication {
            sasl_mechanism: Some("OAUTHBEARER".to_string()),
            sasl_jaas_config: Some("jaas".to_string()),
            sasl_login_callback_handler_class: Some("com.example.Handler".to_string()),
        });

        let volumes = client_authentication_volumes(
            Some(&authentication),
            &VolumeOptions::default(),
            &KubernetesSecretVolumeFactory,
        );
        assert!(volumes.is_empty());
    }

    #[test]
    fn merge_keeps_first_of_colliding_names() {
        let factory = KubernetesSecretVolumeFactory;
        let options = VolumeOptions::default();
        let first = factory.secret_volume(
            &options.secret_volume_name("my.user"),
            "my.user",
            &BTreeMap::new(),
            false,
        );
        let second = factory.secret_volume(
            &options.secret_volume_name("my-user"),
            "my-user",
            &BTreeMap::new(),
            false,
        );

        let mut volumes = vec![first];
        assert_eq!(merge_volumes(&mut volumes, [second]), 0);
        assert_eq!(secret_names(&volumes), vec!["my.user"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let options = VolumeOptions::default().with_oauth_secret_volumes(true);
        let new = client_authentication_volumes(
            Some(&oauth_with_everything()),
            &options,
            &KubernetesSecretVolumeFactory,
        );

        let mut volumes = Vec::new();
        assert_eq!(merge_volumes(&mut volumes, new.clone()), 5);
        assert_eq!(merge_volumes(&mut volumes, new), 0);
        assert_eq!(volumes.len(), 5);
    }
}
