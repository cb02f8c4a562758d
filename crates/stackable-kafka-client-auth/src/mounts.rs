//! Volume mounts matching the volumes from [`crate::volumes`].

use k8s_openapi::api::core::v1::VolumeMount;

use crate::{
    ClientAuthentication,
    builder::volume::secret_volume_mount,
    constants::{
        DEFAULT_OAUTH_CERTS_VOLUME_MOUNT, DEFAULT_OAUTH_SECRETS_VOLUME_MOUNT,
        DEFAULT_PASSWORD_VOLUME_MOUNT, DEFAULT_TLS_VOLUME_MOUNT,
    },
    secret::{CertSecretSource, SecretReference},
    volumes::{VolumeOptions, merge_by_name},
};

/// Base paths the authentication Secrets are mounted under.
///
/// Apart from the OAuth certificates, the Secret name is appended to the base
/// path as is, so the paths usually end with a `/`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MountPaths {
    /// TLS client certificates and keys.
    pub tls: String,

    /// SCRAM-SHA-512 and PLAIN passwords.
    pub password: String,

    /// Trusted OAuth server certificates, mounted at `<base>/<secret>-<index>`.
    pub oauth_certs: String,

    /// OAuth client secrets, access tokens and refresh tokens.
    pub oauth_secrets: String,
}

impl Default for MountPaths {
    fn default() -> Self {
        Self {
            tls: DEFAULT_TLS_VOLUME_MOUNT.to_owned(),
            password: DEFAULT_PASSWORD_VOLUME_MOUNT.to_owned(),
            oauth_certs: DEFAULT_OAUTH_CERTS_VOLUME_MOUNT.to_owned(),
            oauth_secrets: DEFAULT_OAUTH_SECRETS_VOLUME_MOUNT.to_owned(),
        }
    }
}

/// Returns the mounts for every volume
/// [`client_authentication_volumes`](crate::volumes::client_authentication_volumes)
/// returns for the same `authentication` and `options`.
///
/// OAuth secret volumes are mounted only if
/// [`VolumeOptions::create_oauth_secret_volumes`] is set.
pub fn client_authentication_volume_mounts(
    authentication: Option<&ClientAuthentication>,
    options: &VolumeOptions,
    paths: &MountPaths,
) -> Vec<VolumeMount> {
    let mut mounts = Vec::new();

    let Some(authentication) = authentication else {
        return mounts;
    };

    match authentication {
        ClientAuthentication::Tls(tls) => {
            if let Some(certificate_and_key) = &tls.certificate_and_key {
                add_secret_mount(&mut mounts, certificate_and_key, options, &paths.tls);
            }
        }
        ClientAuthentication::ScramSha512(scram) => {
            if let Some(password_secret) = &scram.password_secret {
                add_secret_mount(&mut mounts, password_secret, options, &paths.password);
            }
        }
        ClientAuthentication::Plain(plain) => {
            if let Some(password_secret) = &plain.password_secret {
                add_secret_mount(&mut mounts, password_secret, options, &paths.password);
            }
        }
        ClientAuthentication::OAuth(oauth) => {
            merge_volume_mounts(
                &mut mounts,
                oauth_certificate_volume_mounts(
                    &oauth.tls_trusted_certificates,
                    options,
                    &paths.oauth_certs,
                ),
            );

            if options.create_oauth_secret_volumes {
                for secret in oauth.secret_credentials() {
                    add_secret_mount(&mut mounts, secret, options, &paths.oauth_secrets);
                }
            }
        }
        ClientAuthentication::Custom(_) => {}
    }

    mounts
}

fn add_secret_mount(
    mounts: &mut Vec<VolumeMount>,
    secret: &impl SecretReference,
    options: &VolumeOptions,
    base_path: &str,
) {
    let secret_name = secret.secret_name();
    let mount = secret_volume_mount(
        options.secret_volume_name(secret_name),
        format!("{base_path}{secret_name}"),
    );
    merge_volume_mounts(mounts, [mount]);
}

/// Mounts for [`oauth_certificate_volumes`](crate::volumes::oauth_certificate_volumes).
pub fn oauth_certificate_volume_mounts(
    trusted_certificates: &[CertSecretSource],
    options: &VolumeOptions,
    base_path: &str,
) -> Vec<VolumeMount> {
    trusted_certificates
        .iter()
        .enumerate()
        .map(|(index, certificate)| {
            secret_volume_mount(
                options.oauth_certificate_volume_name(index),
                format!("{base_path}/{}-{index}", certificate.secret_name),
            )
        })
        .collect()
}

/// Appends every mount of `new` whose volume name is not yet mounted.
/// Returns how many mounts were added.
pub fn merge_volume_mounts(
    mounts: &mut Vec<VolumeMount>,
    new: impl IntoIterator<Item = VolumeMount>,
) -> usize {
    merge_by_name(mounts, new, |mount| mount.name.as_str())
}
