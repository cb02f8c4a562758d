use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::secret::PasswordSecretSource;

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScramSha512Authentication {
    /// Username used for the authentication.
    pub username: Option<String>,

    /// Reference to the Secret which holds the password.
    pub password_secret: Option<PasswordSecretSource>,
}
