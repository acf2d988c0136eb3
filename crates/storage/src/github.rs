//! GitHub REST API content store.
//!
//! Reads the repository README through `GET /repos/{owner}/{repo}/readme` and
//! commits changes through `PUT /repos/{owner}/{repo}/contents/{path}`.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use timebar_core::{ActionConfig, RemoteDocument, RepositoryId};
use tracing::{debug, info};

use super::{ContentStore, Result, StorageError};

const USER_AGENT: &str = concat!("timebar/", env!("CARGO_PKG_VERSION"));

/// Payload of the README endpoint (fields we use).
#[derive(Debug, Deserialize)]
struct ReadmeResponse {
    content: String,
    path: String,
    sha: String,
}

/// GitHub-backed content store for one repository.
#[derive(Clone)]
pub struct GitHubContentStore {
    /// HTTP client
    client: Client,

    /// API base URL, without trailing slash
    api_url: String,

    /// Access token
    token: String,

    /// Target repository
    repository: RepositoryId,
}

impl GitHubContentStore {
    /// Request timeout for every API call.
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a store talking to `api_url` on behalf of `token`.
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        repository: RepositoryId,
    ) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Self::TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            repository,
        })
    }

    /// Create a store from the action configuration.
    pub fn from_config(config: &ActionConfig) -> Result<Self> {
        Self::new(&config.api_url, &config.token, config.repository.clone())
    }

    /// Repository this store writes to.
    pub fn repository(&self) -> &RepositoryId {
        &self.repository
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    fn readme_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/readme",
            self.api_url,
            self.repository.owner(),
            self.repository.name()
        )
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            self.repository.owner(),
            self.repository.name(),
            path.trim_start_matches('/')
        )
    }
}

/// Decode the base64 body GitHub returns; it is wrapped with newlines.
pub fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64.decode(compact.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}

/// Encode text for the contents API.
pub fn encode_content(content: &str) -> String {
    BASE64.encode(content.as_bytes())
}

async fn error_body(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

#[async_trait]
impl ContentStore for GitHubContentStore {
    async fn fetch_document(&self) -> Result<RemoteDocument> {
        let url = self.readme_url();
        debug!("Fetching README from {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                return Err(StorageError::Authentication {
                    status: status.as_u16(),
                    message: error_body(response).await,
                });
            }
            s if !s.is_success() => {
                return Err(StorageError::Api {
                    status: s.as_u16(),
                    body: error_body(response).await,
                });
            }
            _ => {}
        }

        let readme: ReadmeResponse = response.json().await?;
        let content = decode_content(&readme.content)?;

        info!(
            "Fetched {} from {} ({} bytes)",
            readme.path,
            self.repository,
            content.len()
        );

        Ok(RemoteDocument {
            content,
            path: readme.path,
            revision: readme.sha,
        })
    }

    async fn update_document(
        &self,
        path: &str,
        content: &str,
        revision: &str,
        message: &str,
    ) -> Result<()> {
        let url = self.contents_url(path);
        let payload = json!({
            "message": message,
            "content": encode_content(content),
            "sha": revision,
        });

        debug!("Updating {} at revision {}", url, revision);

        let response = self
            .authorized(self.client.put(&url))
            .json(&payload)
            .send()
            .await?;
        let status = response.status();

        match status {
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => Err(StorageError::Conflict(
                format!("{} changed since revision {}: {}", path, revision, error_body(response).await),
            )),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Err(StorageError::Authentication {
                    status: status.as_u16(),
                    message: error_body(response).await,
                })
            }
            s if !s.is_success() => Err(StorageError::Api {
                status: s.as_u16(),
                body: error_body(response).await,
            }),
            _ => {
                info!("Committed {} to {}", path, self.repository);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GitHubContentStore {
        let repo = RepositoryId::new("octocat/profile").unwrap();
        GitHubContentStore::new("https://api.example.com/", "token", repo).unwrap()
    }

    #[test]
    fn test_urls() {
        let store = store();
        assert_eq!(
            store.readme_url(),
            "https://api.example.com/repos/octocat/profile/readme"
        );
        assert_eq!(
            store.contents_url("/docs/README.md"),
            "https://api.example.com/repos/octocat/profile/contents/docs/README.md"
        );
    }

    #[test]
    fn test_decode_content_with_line_breaks() {
        // GitHub wraps base64 at 60 columns.
        let encoded = "SGVsbG8s\nIHdvcmxk\nIQ==\n";
        assert_eq!(decode_content(encoded).unwrap(), "Hello, world!");
    }

    #[test]
    fn test_encode_decode_unicode() {
        let text = "Year progress { ███▒░░ }";
        assert_eq!(decode_content(&encode_content(text)).unwrap(), text);
    }

    #[test]
    fn test_decode_content_rejects_garbage() {
        assert!(matches!(decode_content("***"), Err(StorageError::Decode(_))));
    }
}
