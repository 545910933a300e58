//! HTTP client for the values API

use crate::config::HttpConfig;
use crate::errors::{CallError, HarnessError};
use crate::types::Transport;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use tracing::debug;
use url::Url;

/// A source of string lists addressed by a relative path.
///
/// Batches run against this trait so they can be exercised without a network.
#[async_trait::async_trait]
pub trait ValuesApi: Send + Sync {
    async fn call_values(&self, relative_path: &str) -> Result<Vec<String>, CallError>;
}

/// One reqwest client bound to one base URL
#[derive(Debug)]
pub struct ValuesClient {
    transport: Transport,
    base_url: Url,
    client: RwLock<Option<Client>>,
}

impl ValuesClient {
    /// Build a client for `transport` rooted at `base_url`
    pub fn new(
        transport: Transport,
        base_url: &str,
        config: &HttpConfig,
    ) -> Result<Self, HarnessError> {
        let base_url = parse_base_url(base_url)?;
        let client = config.build_client(transport)?;
        Ok(Self::with_client(transport, base_url, client))
    }

    /// Wrap an already built reqwest client
    pub fn with_client(transport: Transport, base_url: Url, client: Client) -> Self {
        debug!("Creating {} values client for {}", transport, base_url);
        Self {
            transport,
            base_url,
            client: RwLock::new(Some(client)),
        }
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative path against the base URL
    pub fn url_for(&self, relative_path: &str) -> Result<Url, CallError> {
        self.base_url
            .join(relative_path)
            .map_err(|e| CallError::InvalidUrl(format!("{}{}: {}", self.base_url, relative_path, e)))
    }

    /// GET `relative_path` and deserialize the JSON body.
    ///
    /// Any non-2xx status is an error.
    pub async fn call_json<T: DeserializeOwned>(&self, relative_path: &str) -> Result<T, CallError> {
        let client = self.current_client()?;
        let url = self.url_for(relative_path)?;

        debug!("GET {}", url);
        let response = client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Release the underlying client. Later calls fail with [`CallError::Closed`].
    pub fn close(&self) {
        let mut guard = match self.client.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.take().is_some() {
            debug!("Closed {} values client", self.transport);
        }
    }

    pub fn is_closed(&self) -> bool {
        match self.client.read() {
            Ok(guard) => guard.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }

    // reqwest::Client is a handle onto a shared pool, so in-flight calls keep
    // their clone while close() drops ours.
    fn current_client(&self) -> Result<Client, CallError> {
        let guard = match self.client.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.as_ref().cloned().ok_or(CallError::Closed)
    }
}

#[async_trait::async_trait]
impl ValuesApi for ValuesClient {
    async fn call_values(&self, relative_path: &str) -> Result<Vec<String>, CallError> {
        self.call_json(relative_path).await
    }
}

/// Parse a base URL, making sure relative paths are appended to it rather
/// than replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, HarnessError> {
    let mut url = Url::parse(base_url).map_err(|source| HarnessError::InvalidUrl {
        url: base_url.to_string(),
        source,
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
