use async_trait::async_trait;
use http::{Request, header::ACCEPT};
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use jiff::Timestamp;
use serde::Deserialize;
use snafu::{OptionExt, ResultExt, ensure};
use tracing::instrument;
use url::Url;

use crate::{
    config::ManagedIdentityOptions,
    credential::{
        BuildRequestSnafu, DeserializeImdsResponseSnafu, Error, ExpiryOutOfRangeSnafu,
        ImdsStatusSnafu, MissingScopeSnafu, ParseExpirySnafu, ParseImdsEndpointSnafu,
        ReadImdsBodySnafu, RequestImdsSnafu, TokenCredential,
    },
    token::{AccessToken, TokenRequestContext},
};

const IMDS_API_VERSION: &str = "2018-02-01";
const DEFAULT_SCOPE_SUFFIX: &str = "/.default";

/// Fetches tokens for the managed identity of the host from the Azure
/// Instance Metadata Service.
///
/// Connections are not pooled. Every token request opens a new connection,
/// so a credential can be shared between runtimes.
#[derive(Debug, Clone)]
pub struct ImdsCredential {
    endpoint: Url,
    client_id: Option<String>,
    client: Client<HttpConnector, Empty<Bytes>>,
}

#[derive(Deserialize)]
struct ImdsTokenResponse {
    access_token: String,
    expires_on: ExpiresOn,
}

/// IMDS documents `expires_on` as a string, but some compatible endpoints
/// send a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExpiresOn {
    Seconds(i64),
    Text(String),
}

impl ExpiresOn {
    fn to_timestamp(&self) -> Result<Timestamp, Error> {
        let seconds = match self {
            Self::Seconds(seconds) => *seconds,
            Self::Text(text) => text
                .trim()
                .parse()
                .with_context(|_| ParseExpirySnafu { value: text.clone() })?,
        };
        Timestamp::from_second(seconds).context(ExpiryOutOfRangeSnafu { seconds })
    }
}

impl ImdsCredential {
    pub fn new(options: &ManagedIdentityOptions) -> Result<Self, Error> {
        let endpoint =
            Url::parse(&options.imds_endpoint).with_context(|_| ParseImdsEndpointSnafu {
                endpoint: options.imds_endpoint.clone(),
            })?;
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build_http();

        Ok(Self {
            endpoint,
            client_id: options.managed_identity_client_id.clone(),
            client,
        })
    }

    fn token_url(&self, resource: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-version", IMDS_API_VERSION);
            query.append_pair("resource", resource);
            if let Some(client_id) = &self.client_id {
                query.append_pair("client_id", client_id);
            }
        }
        url
    }
}

#[async_trait]
impl TokenCredential for ImdsCredential {
    #[instrument(skip(self))]
    async fn get_token(&self, context: &TokenRequestContext) -> Result<AccessToken, Error> {
        let scope = context.scopes().first().context(MissingScopeSnafu)?;
        let resource = scope.strip_suffix(DEFAULT_SCOPE_SUFFIX).unwrap_or(scope);

        let request = Request::get(self.token_url(resource).as_str())
            .header("Metadata", "true")
            .header(ACCEPT, "application/json")
            .body(Empty::new())
            .context(BuildRequestSnafu)?;

        let response = self.client.request(request).await.context(RequestImdsSnafu)?;
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .context(ReadImdsBodySnafu)?
            .to_bytes();

        ensure!(status.is_success(), ImdsStatusSnafu {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        let response: ImdsTokenResponse =
            serde_json::from_slice(&body).context(DeserializeImdsResponseSnafu)?;
        let expires_at = response.expires_on.to_timestamp()?;

        tracing::debug!(%expires_at, "received managed identity token from IMDS");
        Ok(AccessToken::new(response.access_token, expires_at))
    }
}
