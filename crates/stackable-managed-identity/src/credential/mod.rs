//! Sources of access tokens.

use async_trait::async_trait;
use snafu::Snafu;

use crate::token::{AccessToken, TokenRequestContext};

mod imds;

pub use imds::ImdsCredential;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse IMDS endpoint {endpoint:?}"))]
    ParseImdsEndpoint {
        source: url::ParseError,
        endpoint: String,
    },

    #[snafu(display("token request context does not contain a scope"))]
    MissingScope,

    #[snafu(display("failed to build IMDS token request"))]
    BuildRequest { source: http::Error },

    #[snafu(display("failed to send IMDS token request"))]
    RequestImds {
        source: hyper_util::client::legacy::Error,
    },

    #[snafu(display("failed to read IMDS response body"))]
    ReadImdsBody { source: hyper::Error },

    #[snafu(display("IMDS returned {status}: {body}"))]
    ImdsStatus {
        status: http::StatusCode,
        body: String,
    },

    #[snafu(display("failed to deserialize IMDS token response"))]
    DeserializeImdsResponse { source: serde_json::Error },

    #[snafu(display("failed to parse token expiry {value:?}"))]
    ParseExpiry {
        source: std::num::ParseIntError,
        value: String,
    },

    #[snafu(display("token expiry {seconds} is out of range"))]
    ExpiryOutOfRange { source: jiff::Error, seconds: i64 },
}

/// Something that can hand out access tokens for a scope.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn get_token(&self, context: &TokenRequestContext) -> Result<AccessToken, Error>;
}
