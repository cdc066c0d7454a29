// API client module: a small blocking HTTP client for the hosting
// platform's REST API. Every call is attempted once; the caller decides
// what a non-success status means.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Versioned JSON media type sent as `Accept` on every request.
pub const ACCEPT_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

const USER_AGENT: &str = concat!("repo-uploader/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("access token contains characters that cannot be sent in a header")]
    InvalidToken,
    #[error("request to {url} failed")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response {status} without an error message: {body}")]
    MissingMessage { status: StatusCode, body: String },
}

/// Status and body of a completed request. `message` is the `message`
/// field of a JSON body, when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct MessageBody {
    message: Option<String>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<MessageBody>(&body)
            .ok()
            .and_then(|b| b.message);
        ApiResponse {
            status,
            body,
            message,
        }
    }

    /// The server's error message, or `MissingMessage` when the body does
    /// not carry one.
    pub fn error_message(&self) -> Result<&str, ApiError> {
        self.message.as_deref().ok_or_else(|| ApiError::MissingMessage {
            status: self.status,
            body: self.body.clone(),
        })
    }

    /// Human readable failure detail: the server's message, falling back to
    /// the `MissingMessage` description.
    pub fn detail(&self) -> String {
        match self.error_message() {
            Ok(msg) => msg.to_string(),
            Err(err) => {
                tracing::warn!(status = %self.status, "error response carried no message");
                err.to_string()
            }
        }
    }
}

/// Body of `POST /user/repos`.
#[derive(Serialize, Debug)]
pub struct CreateRepoRequest<'a> {
    pub name: &'a str,
    pub private: bool,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Serialize, Debug)]
pub struct PutFileRequest<'a> {
    pub message: String,
    pub content: &'a str,
}

/// Blocking client holding the base URL and the authenticated default
/// headers.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client that sends `Authorization: token <token>` and the
    /// pinned `Accept` header on every request.
    pub fn new(base_url: Url, token: &str) -> Result<Self, ApiError> {
        let mut auth = HeaderValue::from_str(&format!("token {}", token))
            .map_err(|_| ApiError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_MEDIA_TYPE));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(ApiError::Client)?;
        Ok(ApiClient { client, base_url })
    }

    /// Append percent-encoded path segments to the base URL.
    pub fn endpoint<'a, I>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        // Config rejects cannot-be-a-base URLs, so segments are available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `POST /user/repos` with `{"name": name, "private": false}`.
    pub fn create_repo(&self, name: &str) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(["user", "repos"]);
        let body = CreateRepoRequest {
            name,
            private: false,
        };
        self.send(url.clone(), self.client.post(url).json(&body))
    }

    /// `PUT /repos/{owner}/{repo}/contents/{path}`. `path` may contain `/`
    /// separators; each component is encoded as its own segment.
    pub fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        encoded_content: &str,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(
            ["repos", owner, repo, "contents"]
                .into_iter()
                .chain(path.split('/').filter(|s| !s.is_empty())),
        );
        let body = PutFileRequest {
            message: format!("add {}", path),
            content: encoded_content,
        };
        self.send(url.clone(), self.client.put(url).json(&body))
    }

    /// `DELETE /repos/{owner}/{repo}`.
    pub fn delete_repo(&self, owner: &str, repo: &str) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(["repos", owner, repo]);
        self.send(url.clone(), self.client.delete(url))
    }

    fn send(&self, url: Url, req: RequestBuilder) -> Result<ApiResponse, ApiError> {
        debug!(%url, "sending request");
        let res = req.send().map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
        let status = res.status();
        let body = res
            .text()
            .map_err(|source| ApiError::Transport { url, source })?;
        debug!(%status, "received response");
        Ok(ApiResponse::new(status, body))
    }
}
