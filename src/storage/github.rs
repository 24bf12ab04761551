//! Visitor document stored as a JSON file in a GitHub repository.
//!
//! Reads go through `GET /repos/{owner}/{name}/contents/{path}`, writes
//! through `PUT` on the same URL. Updates must carry the current blob `sha`,
//! so every save fetches it first. The document itself is not re-read, which
//! leaves a window where a concurrent writer can slip in; the API then
//! rejects the stale `sha` and the save reports failure.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Local;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::VisitorStore;
use crate::config::GitHubConfig;
use crate::error::{Result, StorageError};
use crate::models::{VisitorDocument, format_timestamp};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = concat!("visitor-tracker/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

impl ContentsResponse {
    // Objects over 1 MB come back with empty content and encoding "none".
    fn is_oversized(&self) -> bool {
        self.encoding.as_deref() == Some("none")
            && self.content.as_deref().is_none_or(|c| c.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
struct UpdateContentsRequest<'a> {
    message: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

pub struct GitHubContentStore {
    config: GitHubConfig,
    client: Client,
}

impl GitHubContentStore {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.config.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_USER_AGENT)
    }

    /// Current remote object, `None` when it does not exist yet.
    async fn fetch(&self) -> Result<Option<ContentsResponse>> {
        let url = self.config.contents_url();
        let mut request = self.authorized(self.client.get(&url));
        if let Some(branch) = &self.config.branch {
            request = request.query(&[("ref", branch)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StorageError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(Some(response.json().await?))
    }

    async fn read(&self) -> Result<Option<VisitorDocument>> {
        let Some(object) = self.fetch().await? else {
            return Ok(None);
        };
        if object.is_oversized() {
            return Err(self.too_large());
        }
        let content = object
            .content
            .ok_or_else(|| StorageError::MissingContent(self.config.path.clone()))?;
        Ok(Some(decode_document(&content)?))
    }

    fn too_large(&self) -> StorageError {
        StorageError::TooLarge {
            path: self.config.path.clone(),
        }
    }

    async fn write(&self, doc: &VisitorDocument) -> Result<()> {
        if !self.config.has_credentials() {
            return Err(StorageError::MissingCredentials);
        }

        // Refuse to replace history that could not be read back.
        let sha = match self.fetch().await {
            Ok(Some(object)) if object.is_oversized() => return Err(self.too_large()),
            Ok(object) => object.map(|o| o.sha),
            Err(err) => {
                debug!(error = %err, "could not fetch current sha, writing without it");
                None
            }
        };

        let body = UpdateContentsRequest {
            message: format!("Update visitor data - {}", format_timestamp(&Local::now())),
            content: encode_document(doc)?,
            sha,
            branch: self.config.branch.as_deref(),
        };

        let url = self.config.contents_url();
        let response = self
            .authorized(self.client.put(&url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VisitorStore for GitHubContentStore {
    async fn load(&self) -> VisitorDocument {
        if !self.config.has_credentials() {
            debug!("no GitHub token configured, starting empty");
            return VisitorDocument::empty();
        }

        match self.read().await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                debug!(
                    repo = %self.config.repo,
                    path = %self.config.path,
                    "no remote visitor data yet, starting empty"
                );
                VisitorDocument::empty()
            }
            Err(err @ StorageError::TooLarge { .. }) => {
                warn!(
                    repo = %self.config.repo,
                    error = %err,
                    "remote visitor data exceeds the contents API limit, saves are disabled"
                );
                VisitorDocument::empty()
            }
            Err(err) => {
                warn!(
                    repo = %self.config.repo,
                    error = %err,
                    "unreadable remote visitor data, starting empty"
                );
                VisitorDocument::empty()
            }
        }
    }

    async fn save(&self, doc: &VisitorDocument) -> bool {
        match self.write(doc).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    repo = %self.config.repo,
                    error = %err,
                    "failed to save remote visitor data"
                );
                false
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "github"
    }
}

fn encode_document(doc: &VisitorDocument) -> Result<String> {
    Ok(STANDARD.encode(serde_json::to_vec_pretty(doc)?))
}

// The API wraps base64 content at 60 columns.
fn decode_document(content: &str) -> Result<VisitorDocument> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(serde_json::from_slice(&bytes)?)
}
