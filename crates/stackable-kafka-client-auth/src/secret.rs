//! References to entries in Kubernetes Secrets. None of these types ever hold
//! the credential itself.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Anything that points at exactly one Secret.
pub trait SecretReference {
    /// Name of the referenced Secret.
    fn secret_name(&self) -> &str;

    /// Key inside the Secret, if the reference selects a single entry.
    fn secret_key(&self) -> Option<&str>;
}

/// A certificate and its private key, stored in the same Secret.
#[derive(
    Clone, Debug, Deserialize, Eq, Hash, JsonSchema, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub struct CertAndKeySecretSource {
    /// The name of the Secret containing the certificate.
    pub secret_name: String,

    /// The name of the file certificate in the Secret.
    pub certificate: String,

    /// The name of the private key in the Secret.
    pub key: String,
}

impl CertAndKeySecretSource {
    pub fn new(
        secret_name: impl Into<String>,
        certificate: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            secret_name: secret_name.into(),
            certificate: certificate.into(),
            key: key.into(),
        }
    }
}

impl SecretReference for CertAndKeySecretSource {
    fn secret_name(&self) -> &str {
        &self.secret_name
    }

    fn secret_key(&self) -> Option<&str> {
        Some(&self.certificate)
    }
}

/// A password stored under a key of a Secret.
#[derive(
    Clone, Debug, Deserialize, Eq, Hash, JsonSchema, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub struct PasswordSecretSource {
    /// The name of the Secret containing the password.
    pub secret_name: String,

    /// The name of the key in the Secret under which the password is stored.
    pub password: String,
}

impl PasswordSecretSource {
    pub fn new(secret_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            password: password.into(),
        }
    }
}

impl SecretReference for PasswordSecretSource {
    fn secret_name(&self) -> &str {
        &self.secret_name
    }

    fn secret_key(&self) -> Option<&str> {
        Some(&self.password)
    }
}

/// Any single value stored under a key of a Secret, e.g. an OAuth client secret.
#[derive(
    Clone, Debug, Deserialize, Eq, Hash, JsonSchema, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub struct GenericSecretSource {
    /// The name of the Secret containing the value.
    pub secret_name: String,

    /// The key under which the value is stored in the Secret.
    pub key: String,
}

impl GenericSecretSource {
    pub fn new(secret_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            key: key.into(),
        }
    }
}

impl SecretReference for GenericSecretSource {
    fn secret_name(&self) -> &str {
        &self.secret_name
    }

    fn secret_key(&self) -> Option<&str> {
        Some(&self.key)
    }
}

/// A trusted (CA) certificate stored in a Secret.
#[derive(
    Clone, Debug, Deserialize, Eq, Hash, JsonSchema, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub struct CertSecretSource {
    /// The name of the Secret containing the certificate.
    pub secret_name: String,

    /// The name of the file certificate in the Secret.
    pub certificate: String,
}

impl CertSecretSource {
    pub fn new(secret_name: impl Into<String>, certificate: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            certificate: certificate.into(),
        }
    }
}

impl SecretReference for CertSecretSource {
    fn secret_name(&self) -> &str {
        &self.secret_name
    }

    fn secret_key(&self) -> Option<&str> {
        Some(&self.certificate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_cert_and_key() {
        let source = serde_yaml::from_str::<CertAndKeySecretSource>(
            "
            secretName: my-user
            certificate: user.crt
            key: user.key
            ",
        )
        .unwrap();

        assert_eq!(
            source,
            CertAndKeySecretSource::new("my-user", "user.crt", "user.key")
        );
        assert_eq!(source.secret_name(), "my-user");
        assert_eq!(source.secret_key(), Some("user.crt"));
    }

    #[test]
    fn missing_key_is_rejected() {
        let result = serde_yaml::from_str::<PasswordSecretSource>("secretName: my-user");
        assert!(result.is_err());
    }
}
