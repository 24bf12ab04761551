use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_FILE: &str = "visitor_data.json";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendKind {
    LocalFile,
    GitHub,
}

impl StorageBackendKind {
    fn from_env(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "local" | "file" | "local_file" => Ok(Self::LocalFile),
            "github" | "remote" | "gh" => Ok(Self::GitHub),
            _ => Err(anyhow::anyhow!("STORAGE_BACKEND must be one of: local, github")),
        }
    }
}

/// Settings for the GitHub contents API store.
///
/// An empty `token` disables remote persistence: loads yield the empty
/// document and saves report failure, both without touching the network.
#[derive(Clone)]
pub struct GitHubConfig {
    pub token: String,
    /// Repository in `owner/name` form.
    pub repo: String,
    /// Path of the data object inside the repository.
    pub path: String,
    pub branch: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

impl GitHubConfig {
    pub fn new(token: &str, repo: &str) -> Self {
        Self {
            token: token.to_string(),
            repo: repo.to_string(),
            path: DEFAULT_DATA_FILE.to_string(),
            branch: None,
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the object path inside the repository
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Set the branch used for reads and writes
    pub fn branch(mut self, branch: &str) -> Self {
        self.branch = Some(branch.to_string());
        self
    }

    /// Set the API base URL
    pub fn api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_credentials(&self) -> bool {
        !self.token.is_empty()
    }

    /// Full contents URL of the data object.
    pub fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_url,
            self.repo,
            self.path.trim_start_matches('/')
        )
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.token.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("GitHubConfig")
            .field("token", &token)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("branch", &self.branch)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackendKind,
    pub data_file: PathBuf,
    pub github: GitHubConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("APP_HOST", "0.0.0.0");

        let port = var("APP_PORT", "8000")
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let storage_backend = StorageBackendKind::from_env(&var("STORAGE_BACKEND", "local"))?;

        let data_file = PathBuf::from(var("DATA_FILE", DEFAULT_DATA_FILE));

        let timeout_secs = var("REMOTE_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .context("REMOTE_TIMEOUT_SECS must be a valid u64")?;

        let mut github = GitHubConfig::new(&var("GITHUB_TOKEN", ""), &var("GITHUB_REPO", ""))
            .path(&var("GITHUB_DATA_PATH", DEFAULT_DATA_FILE))
            .api_url(&var("GITHUB_API_URL", DEFAULT_GITHUB_API_URL))
            .timeout(Duration::from_secs(timeout_secs));
        if let Some(branch) = lookup("GITHUB_BRANCH").filter(|b| !b.is_empty()) {
            github = github.branch(&branch);
        }

        Ok(Self {
            host,
            port,
            storage_backend,
            data_file,
            github,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
