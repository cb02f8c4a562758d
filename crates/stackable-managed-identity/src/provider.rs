//! SASL/OAUTHBEARER login callback handler backed by a managed identity.

use std::{future::Future, time::Duration};

use snafu::{OptionExt, ResultExt, Snafu, ensure};
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use tracing::instrument;
use url::Url;

use crate::{
    callback::Callback,
    config::{ConnectionConfig, ManagedIdentityOptions},
    credential::{self, ImdsCredential, TokenCredential},
    token::{TokenHandle, TokenRequestContext},
};

/// Upper bound for a single token request.
pub const TOKEN_ACQUISITION_TIMEOUT: Duration = Duration::from_secs(2);

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("unsupported callback type {kind:?}"))]
    UnsupportedCallback { kind: &'static str },

    #[snafu(display("configured bootstrap servers must contain exactly one entry, found {count}"))]
    MisconfiguredEndpoint { count: usize },

    #[snafu(display("no bootstrap servers configured"))]
    MissingBootstrapServers,

    #[snafu(display("token provider has already been configured"))]
    AlreadyConfigured,

    #[snafu(display("token provider has not been configured"))]
    NotConfigured,

    #[snafu(display("failed to parse a token scope from {bootstrap_server:?}"))]
    ParseScope {
        source: url::ParseError,
        bootstrap_server: String,
    },

    #[snafu(display("bootstrap server {bootstrap_server:?} does not contain a host"))]
    MissingHost { bootstrap_server: String },

    #[snafu(display("failed to create managed identity credential"))]
    CreateCredential { source: credential::Error },

    #[snafu(display("token acquisition did not complete within {timeout:?}"))]
    TokenAcquisitionTimeout { timeout: Duration },

    #[snafu(display("failed to acquire token"))]
    TokenAcquisitionFailure { source: credential::Error },

    #[snafu(display("failed to build runtime for token acquisition"))]
    BuildRuntime { source: std::io::Error },

    #[snafu(display(
        "cannot block on token acquisition inside a {flavor:?} runtime, use acquire_token instead"
    ))]
    BlockingInsideRuntime { flavor: RuntimeFlavor },
}

/// Derives the token scope from a bootstrap server entry.
///
/// All brackets are removed and the remaining `host[:port]` is turned into an
/// `https` origin, so both `[broker1:9093]` and `[broker1]:9093` become
/// `https://broker1:9093`.
pub fn parse_scope(bootstrap_server: &str) -> Result<String> {
    let server = bootstrap_server.trim().replace(['[', ']'], "");

    let url = Url::parse(&format!("https://{server}")).with_context(|_| ParseScopeSnafu {
        bootstrap_server: bootstrap_server.to_owned(),
    })?;
    let host = url.host_str().with_context(|| MissingHostSnafu {
        bootstrap_server: bootstrap_server.to_owned(),
    })?;

    Ok(match url.port() {
        Some(port) => format!("https://{host}:{port}"),
        None => format!("https://{host}"),
    })
}

/// Supplies bearer tokens for SASL/OAUTHBEARER from a [`TokenCredential`].
///
/// The provider is unconfigured until [`configure`](Self::configure) derived
/// the token scope from the single bootstrap server. Tokens are fetched fresh
/// for every callback, caching is left to the credential.
#[derive(Debug)]
pub struct ManagedIdentityTokenProvider<C = ImdsCredential> {
    credential: C,
    scope: Option<String>,
}

impl ManagedIdentityTokenProvider<ImdsCredential> {
    /// Creates a provider fetching tokens from the instance metadata service.
    pub fn new(options: &ManagedIdentityOptions) -> Result<Self> {
        let credential = ImdsCredential::new(options).context(CreateCredentialSnafu)?;
        Ok(Self::with_credential(credential))
    }
}

impl<C: TokenCredential> ManagedIdentityTokenProvider<C> {
    pub fn with_credential(credential: C) -> Self {
        Self {
            credential,
            scope: None,
        }
    }

    /// Derives the token scope from the connection configuration.
    ///
    /// Exactly one bootstrap server must be configured. A provider can only be
    /// configured once.
    pub fn configure(&mut self, config: &ConnectionConfig) -> Result<()> {
        ensure!(self.scope.is_none(), AlreadyConfiguredSnafu);

        let servers = config
            .bootstrap_servers
            .as_deref()
            .context(MissingBootstrapServersSnafu)?;
        let [server] = servers else {
            return MisconfiguredEndpointSnafu {
                count: servers.len(),
            }
            .fail();
        };

        let scope = parse_scope(server)?;
        tracing::info!(%scope, "configured managed identity token provider");
        self.scope = Some(scope);

        Ok(())
    }

    /// The scope tokens are requested for, once configured.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Fetches a token for the configured scope, giving up after
    /// [`TOKEN_ACQUISITION_TIMEOUT`].
    #[instrument(skip(self), fields(scope = ?self.scope))]
    pub async fn acquire_token(&self) -> Result<TokenHandle> {
        let scope = self.scope.as_deref().context(NotConfiguredSnafu)?;
        let context = TokenRequestContext::new().with_scope(scope);

        let token = tokio::time::timeout(
            TOKEN_ACQUISITION_TIMEOUT,
            self.credential.get_token(&context),
        )
        .await
        .map_err(|_| Error::TokenAcquisitionTimeout {
            timeout: TOKEN_ACQUISITION_TIMEOUT,
        })?
        .context(TokenAcquisitionFailureSnafu)?;

        tracing::info!(
            expires_at = %token.expires_at(),
            expired = token.is_expired(),
            "acquired managed identity token"
        );

        Ok(token.into())
    }

    /// Answers the callbacks of a login attempt.
    ///
    /// Every [`Callback::OAuthBearerToken`] receives a freshly acquired token.
    /// Any other callback fails the whole call.
    ///
    /// This blocks the calling thread. Outside of a runtime a private
    /// current-thread runtime drives the acquisition. On a worker of a
    /// multi-thread runtime the worker is handed off with
    /// [`tokio::task::block_in_place`]. Inside a current-thread runtime
    /// blocking is impossible and [`Error::BlockingInsideRuntime`] is returned.
    pub fn handle(&self, callbacks: &mut [Callback]) -> Result<()> {
        ensure!(self.scope.is_some(), NotConfiguredSnafu);

        let runtime = BlockingRuntime::for_current_thread()?;

        for callback in callbacks {
            match callback {
                Callback::OAuthBearerToken(token_callback) => {
                    let token = runtime.block_on(self.acquire_token())?;
                    token_callback.set_token(token);
                }
                other => {
                    return UnsupportedCallbackSnafu { kind: other.kind() }.fail();
                }
            }
        }

        Ok(())
    }

    /// Releases the provider. There is nothing to release.
    pub fn close(&mut self) {}
}

/// Drives futures to completion from synchronous code.
enum BlockingRuntime {
    Owned(Runtime),
    InPlace(Handle),
}

impl BlockingRuntime {
    fn for_current_thread() -> Result<Self> {
        match Handle::try_current() {
            Ok(handle) => {
                let flavor = handle.runtime_flavor();
                ensure!(
                    flavor == RuntimeFlavor::MultiThread,
                    BlockingInsideRuntimeSnafu { flavor }
                );
                Ok(Self::InPlace(handle))
            }
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map(Self::Owned)
                .context(BuildRuntimeSnafu),
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match self {
            Self::Owned(runtime) => runtime.block_on(future),
            Self::InPlace(handle) => tokio::task::block_in_place(|| handle.block_on(future)),
        }
    }
}
