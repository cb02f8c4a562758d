use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{KeyToPath, SecretVolumeSource, Volume, VolumeMount};
use sha2::{Digest as _, Sha256};

use crate::constants::{
    MAX_VOLUME_NAME_LENGTH, SECRET_VOLUME_DEFAULT_MODE, SECRET_VOLUME_DEFAULT_MODE_OPENSHIFT,
};

/// Length of the name part kept when a volume name has to be shortened. The
/// rest is used for `-` and the hash suffix.
const TRUNCATED_VOLUME_NAME_LENGTH: usize = 57;
const VOLUME_NAME_HASH_LENGTH: usize = 5;

/// Turns a Secret into a platform volume.
///
/// The resolvers only decide *which* Secrets are needed and how the volumes
/// are named. How a Secret is exposed as a volume is up to the deployment
/// model, which provides an implementation of this trait.
pub trait SecretVolumeFactory {
    /// Creates a volume called `name` exposing the Secret `secret_name`.
    ///
    /// `items` maps Secret keys to file names. If it is empty, every key of
    /// the Secret is projected under its own name.
    fn secret_volume(
        &self,
        name: &str,
        secret_name: &str,
        items: &BTreeMap<String, String>,
        is_openshift: bool,
    ) -> Volume;
}

/// Exposes Secrets as plain Kubernetes Secret volumes.
#[derive(Clone, Copy, Debug, Default)]
pub struct KubernetesSecretVolumeFactory;

impl SecretVolumeFactory for KubernetesSecretVolumeFactory {
    fn secret_volume(
        &self,
        name: &str,
        secret_name: &str,
        items: &BTreeMap<String, String>,
        is_openshift: bool,
    ) -> Volume {
        let default_mode = if is_openshift {
            SECRET_VOLUME_DEFAULT_MODE_OPENSHIFT
        } else {
            SECRET_VOLUME_DEFAULT_MODE
        };

        let items = (!items.is_empty()).then(|| {
            items
                .iter()
                .map(|(key, path)| KeyToPath {
                    key: key.clone(),
                    path: path.clone(),
                    mode: None,
                })
                .collect()
        });

        Volume {
            name: name.to_owned(),
            secret: Some(SecretVolumeSource {
                secret_name: Some(secret_name.to_owned()),
                default_mode: Some(default_mode),
                items,
                optional: None,
            }),
            ..Volume::default()
        }
    }
}

/// Returns a valid Kubernetes volume name for `name`.
///
/// Dots are replaced by dashes. Names longer than 63 characters are cut and
/// suffixed with a short hash of the original name, so that two long names
/// sharing a prefix still end up different.
///
/// The mapping is not injective: `a.b` and `a-b` both become `a-b`. Merging
/// volumes keeps the first of two such Secrets and warns about the second.
pub fn volume_name(name: &str) -> String {
    let name = name.replace('.', "-");

    if name.len() <= MAX_VOLUME_NAME_LENGTH {
        return name;
    }

    let mut hash = Sha256::digest(name.as_bytes())
        .iter()
        .take(VOLUME_NAME_HASH_LENGTH.div_ceil(2))
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    hash.truncate(VOLUME_NAME_HASH_LENGTH);

    let truncated = name
        .chars()
        .take(TRUNCATED_VOLUME_NAME_LENGTH)
        .collect::<String>();

    format!("{}-{hash}", truncated.trim_end_matches('-'))
}

/// A read-only mount of the volume `name` at `mount_path`.
pub fn secret_volume_mount(name: impl Into<String>, mount_path: impl Into<String>) -> VolumeMount {
    VolumeMount {
        name: name.into(),
        mount_path: mount_path.into(),
        read_only: Some(true),
        ..VolumeMount::default()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn secret_volume_without_items() {
        let volume = KubernetesSecretVolumeFactory.secret_volume(
            "my-volume",
            "my-secret",
            &BTreeMap::new(),
            false,
        );

        assert_eq!(volume.name, "my-volume");
        let secret = volume.secret.unwrap();
        assert_eq!(secret.secret_name.as_deref(), Some("my-secret"));
        assert_eq!(secret.default_mode, Some(0o444));
        assert!(secret.items.is_none());
    }

    #[test]
    fn secret_volume_with_items_on_openshift() {
        let items = BTreeMap::from([("ca.crt".to_string(), "tls.crt".to_string())]);
        let volume =
            KubernetesSecretVolumeFactory.secret_volume("my-volume", "my-secret", &items, true);

        let secret = volume.secret.unwrap();
        assert_eq!(secret.default_mode, Some(0o440));
        assert_eq!(
            secret.items,
            Some(vec![KeyToPath {
                key: "ca.crt".to_string(),
                path: "tls.crt".to_string(),
                mode: None,
            }])
        );
    }

    #[rstest]
    #[case("my-user", "my-user")]
    #[case("my.user.secret", "my-user-secret")]
    #[case(
        "exactly-sixty-three-characters-long-volume-name-xxxxxxxxxxxxxxx",
        "exactly-sixty-three-characters-long-volume-name-xxxxxxxxxxxxxxx"
    )]
    fn short_volume_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(volume_name(input), expected);
    }

    #[test]
    fn dots_and_dashes_collide() {
        assert_eq!(volume_name("my.user"), volume_name("my-user"));
    }

    #[test]
    fn long_volume_names_are_shortened() {
        let long = "a-very-long-prefix-for-a-volume-name-which-exceeds-the-kubernetes-limit";
        let other = "a-very-long-prefix-for-a-volume-name-which-exceeds-the-kubernetes-limits";

        let name = volume_name(long);
        assert!(name.len() <= MAX_VOLUME_NAME_LENGTH);
        assert!(name.starts_with("a-very-long-prefix-for-a-volume-name-which-exceeds-the-ku"));
        assert_eq!(name, volume_name(long));
        assert_ne!(name, volume_name(other));
    }

    #[test]
    fn mounts_are_read_only() {
        let mount = secret_volume_mount("my-volume", "/opt/kafka/my-volume");
        assert_eq!(mount.read_only, Some(true));
        assert_eq!(mount.mount_path, "/opt/kafka/my-volume");
    }
}
