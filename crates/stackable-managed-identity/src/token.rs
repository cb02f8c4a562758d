use std::{collections::BTreeSet, fmt};

use jiff::Timestamp;

/// Scopes to request a token for.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenRequestContext {
    scopes: Vec<String>,
}

impl TokenRequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

/// A token as returned by a [`TokenCredential`](crate::credential::TokenCredential).
#[derive(Clone, Eq, PartialEq)]
pub struct AccessToken {
    token: String,
    expires_at: Timestamp,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_at: Timestamp) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Bearer token handed to the Kafka client for a single SASL/OAUTHBEARER
/// authentication.
///
/// The scope set is always empty. The principal name and start time are not
/// known for managed identity tokens and stay unset, the OAUTHBEARER login
/// does not need them.
#[derive(Clone, Eq, PartialEq)]
pub struct TokenHandle {
    value: String,
    lifetime_ms: i64,
    scope: BTreeSet<String>,
    principal_name: Option<String>,
    start_time_ms: Option<i64>,
}

impl TokenHandle {
    pub fn new(value: impl Into<String>, lifetime_ms: i64) -> Self {
        Self {
            value: value.into(),
            lifetime_ms,
            scope: BTreeSet::new(),
            principal_name: None,
            start_time_ms: None,
        }
    }

    /// The bearer token.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Absolute expiry, in milliseconds since the Unix epoch.
    pub fn lifetime_ms(&self) -> i64 {
        self.lifetime_ms
    }

    pub fn scope(&self) -> &BTreeSet<String> {
        &self.scope
    }

    pub fn principal_name(&self) -> Option<&str> {
        self.principal_name.as_deref()
    }

    pub fn start_time_ms(&self) -> Option<i64> {
        self.start_time_ms
    }
}

impl From<AccessToken> for TokenHandle {
    fn from(token: AccessToken) -> Self {
        Self::new(token.token, token.expires_at.as_millisecond())
    }
}

impl fmt::Debug for TokenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenHandle")
            .field("value", &"<redacted>")
            .field("lifetime_ms", &self.lifetime_ms)
            .field("scope", &self.scope)
            .field("principal_name", &self.principal_name)
            .field("start_time_ms", &self.start_time_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_from_access_token() {
        let expires_at = Timestamp::from_second(1_700_000_000).unwrap();
        let handle = TokenHandle::from(AccessToken::new("secret-token", expires_at));

        assert_eq!(handle.value(), "secret-token");
        assert_eq!(handle.lifetime_ms(), 1_700_000_000_000);
        assert!(handle.scope().is_empty());
        assert_eq!(handle.principal_name(), None);
        assert_eq!(handle.start_time_ms(), None);
    }

    #[test]
    fn debug_redacts_token() {
        let expires_at = Timestamp::from_second(1_700_000_000).unwrap();
        let token = AccessToken::new("secret-token", expires_at);

        assert!(!format!("{token:?}").contains("secret-token"));
        assert!(!format!("{:?}", TokenHandle::from(token)).contains("secret-token"));
    }

    #[test]
    fn expiry() {
        let past = AccessToken::new("token", Timestamp::UNIX_EPOCH);
        assert!(past.is_expired());

        let future = AccessToken::new("token", Timestamp::MAX);
        assert!(!future.is_expired());
    }
}
