use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Authentication through a SASL mechanism this crate does not know about.
/// All three values are handed to the Kafka client unchanged.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAuthentication {
    /// The SASL mechanism, for example `OAUTHBEARER` or `PLAIN`.
    pub sasl_mechanism: Option<String>,

    /// The JAAS configuration, for example
    /// `org.apache.kafka.common.security.oauthbearer.OAuthBearerLoginModule required;`.
    pub sasl_jaas_config: Option<String>,

    /// Fully qualified class name of the login callback handler the image was
    /// extended with.
    pub sasl_login_callback_handler_class: Option<String>,
}
