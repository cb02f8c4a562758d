use std::collections::BTreeMap;

/// Client property listing the brokers to connect to.
pub const BOOTSTRAP_SERVERS_CONFIG: &str = "bootstrap.servers";

/// Token endpoint of the Azure Instance Metadata Service.
pub const DEFAULT_IMDS_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

/// Available options to configure the [`ImdsCredential`](crate::credential::ImdsCredential).
///
/// Additionally, this struct can be used as CLI arguments. This functionality is only
/// available if the feature `clap` is enabled.
#[cfg_attr(
    feature = "clap",
    derive(clap::Args),
    command(next_help_heading = "Managed Identity Options")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagedIdentityOptions {
    /// Token endpoint of the instance metadata service.
    #[cfg_attr(feature = "clap", arg(long, env, default_value = DEFAULT_IMDS_ENDPOINT))]
    pub imds_endpoint: String,

    /// Client ID of a user-assigned managed identity.
    ///
    /// If not set, the system-assigned identity of the host is used.
    #[cfg_attr(feature = "clap", arg(long, env))]
    pub managed_identity_client_id: Option<String>,
}

impl Default for ManagedIdentityOptions {
    fn default() -> Self {
        Self {
            imds_endpoint: DEFAULT_IMDS_ENDPOINT.to_owned(),
            managed_identity_client_id: None,
        }
    }
}

/// The part of the Kafka client configuration the token provider looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// `None` if the configuration does not mention the bootstrap servers at all.
    pub bootstrap_servers: Option<Vec<String>>,
}

impl ConnectionConfig {
    pub fn new(bootstrap_servers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            bootstrap_servers: Some(bootstrap_servers.into_iter().map(Into::into).collect()),
        }
    }

    /// Reads the comma separated `bootstrap.servers` property. Entries are
    /// trimmed and empty entries dropped.
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Self {
        let bootstrap_servers = properties.get(BOOTSTRAP_SERVERS_CONFIG).map(|servers| {
            servers
                .split(',')
                .map(str::trim)
                .filter(|server| !server.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        });

        Self { bootstrap_servers }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("broker1:9093", &["broker1:9093"])]
    #[case("[broker1:9093]", &["[broker1:9093]"])]
    #[case(" broker1:9093 , broker2:9093", &["broker1:9093", "broker2:9093"])]
    #[case("broker1:9093,,", &["broker1:9093"])]
    #[case("", &[])]
    fn bootstrap_servers_from_properties(#[case] servers: &str, #[case] expected: &[&str]) {
        let properties = BTreeMap::from([(BOOTSTRAP_SERVERS_CONFIG.to_owned(), servers.to_owned())]);

        assert_eq!(
            ConnectionConfig::from_properties(&properties),
            ConnectionConfig::new(expected.iter().copied())
        );
    }

    #[test]
    fn missing_bootstrap_servers() {
        let config = ConnectionConfig::from_properties(&BTreeMap::new());
        assert_eq!(config.bootstrap_servers, None);
    }

    #[cfg(feature = "clap")]
    #[test]
    fn options_from_args() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cli {
            #[command(flatten)]
            options: ManagedIdentityOptions,
        }

        let cli = Cli::try_parse_from(["test"]).unwrap();
        assert_eq!(cli.options, ManagedIdentityOptions::default());

        let cli = Cli::try_parse_from([
            "test",
            "--imds-endpoint",
            "http://localhost:8080/token",
            "--managed-identity-client-id",
            "my-identity",
        ])
        .unwrap();
        assert_eq!(cli.options, ManagedIdentityOptions {
            imds_endpoint: "http://localhost:8080/token".to_owned(),
            managed_identity_client_id: Some("my-identity".to_owned()),
        });
    }
}
