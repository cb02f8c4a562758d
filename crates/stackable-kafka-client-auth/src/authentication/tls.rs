use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::secret::CertAndKeySecretSource;

/// Mutual TLS authentication. The certificate is only presented when the
/// connection to the cluster itself uses TLS.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsAuthentication {
    /// Reference to the Secret which holds the certificate and private key pair.
    pub certificate_and_key: Option<CertAndKeySecretSource>,
}
