//! Requests the Kafka client runtime passes to a login callback handler.

use std::collections::BTreeMap;

use crate::token::TokenHandle;

/// A single request of the login module. Handlers fill in what they can and
/// reject the rest.
#[derive(Debug, strum::IntoStaticStr)]
pub enum Callback {
    /// Asks for a bearer token for SASL/OAUTHBEARER.
    OAuthBearerToken(OAuthBearerTokenCallback),

    /// Asks for SASL extensions to send along with the token.
    SaslExtensions(SaslExtensionsCallback),
}

impl Callback {
    /// Name of the callback kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Default)]
pub struct OAuthBearerTokenCallback {
    token: Option<TokenHandle>,
}

impl OAuthBearerTokenCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&mut self, token: TokenHandle) {
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<&TokenHandle> {
        self.token.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct SaslExtensionsCallback {
    pub extensions: BTreeMap<String, String>,
}
