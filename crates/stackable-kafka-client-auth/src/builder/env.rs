use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, SecretKeySelector};

/// An environment variable with a literal value.
pub fn env_var(name: impl Into<String>, value: impl Into<String>) -> EnvVar {
    EnvVar {
        name: name.into(),
        value: Some(value.into()),
        ..EnvVar::default()
    }
}

/// An environment variable whose value is read from `key` of the Secret
/// `secret_name` when the container starts.
pub fn env_var_from_secret_key(
    name: impl Into<String>,
    secret_name: impl Into<String>,
    key: impl Into<String>,
) -> EnvVar {
    EnvVar {
        name: name.into(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret_name.into(),
                key: key.into(),
                optional: None,
            }),
            ..EnvVarSource::default()
        }),
        ..EnvVar::default()
    }
}
