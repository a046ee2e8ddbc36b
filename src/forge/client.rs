//! Gitea API client.
//!
//! Blocking HTTP client using `reqwest` with `token` authentication.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;

use super::{assets_path, release_by_tag_path, releases_path, CreateRelease, Forge, ReleaseRecord};
use crate::config::ForgeCredentials;
use crate::error::{ReleaseError, Result};

/// Gitea API client.
///
/// JSON calls are bounded by `timeout`. Asset uploads use their own,
/// optional, bound since their duration grows with the archive size.
pub struct GiteaClient {
    http: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
    upload_timeout: Option<Duration>,
}

impl GiteaClient {
    /// Creates a client for the forge at `credentials.url`.
    ///
    /// Uploads are unbounded until [GiteaClient::with_upload_timeout] says
    /// otherwise.
    pub fn new(credentials: &ForgeCredentials, timeout: Duration) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("token {}", credentials.token))
            .map_err(|_| ReleaseError::config("forge token is not a valid header value"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        // Timeouts are set per request
        let http = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(None)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: credentials.url.trim_end_matches('/').to_string(),
            timeout,
            upload_timeout: None,
        })
    }

    /// Bounds asset uploads by `timeout`; `None` leaves them unbounded.
    pub fn with_upload_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.upload_timeout = timeout;
        self
    }

    /// Starts an authenticated GET request.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path)).timeout(self.timeout)
    }

    /// Starts an authenticated POST request.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path)).timeout(self.timeout)
    }

    fn upload(&self, path: &str) -> RequestBuilder {
        let request = self.http.post(self.url(path));
        match self.upload_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Sends the request and turns any non-2xx status into [ReleaseError::Forge].
fn send(request: RequestBuilder) -> Result<Response> {
    check_status(request.send()?)
}

fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(ReleaseError::Forge {
            status: status.as_u16(),
            body,
        });
    }

    Ok(resp)
}

impl Forge for GiteaClient {
    fn find_release(&self, owner: &str, repo: &str, tag_name: &str) -> Result<Option<u64>> {
        let resp = self
            .get(&release_by_tag_path(owner, repo, tag_name))
            .send()?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let record: ReleaseRecord = check_status(resp)?.json()?;
        Ok(Some(record.id))
    }

    fn create_release(
        &self,
        owner: &str,
        repo: &str,
        tag_name: &str,
        title: &str,
    ) -> Result<u64> {
        let request = CreateRelease::new(tag_name, title);
        let resp = send(self.post(&releases_path(owner, repo)).json(&request))?;

        let record: ReleaseRecord = resp.json()?;
        tracing::debug!(id = record.id, tag_name, "release created");
        Ok(record.id)
    }

    fn upload_asset(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
        file_path: &Path,
    ) -> Result<()> {
        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ReleaseError::package(format!("{} has no file name", file_path.display()))
            })?
            .to_string();
        let data = fs::read(file_path)?;
        let size = data.len();

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/zip")?;
        let form = Form::new().part("attachment", part);

        send(
            self.upload(&assets_path(owner, repo, release_id))
                .multipart(form),
        )?;

        tracing::debug!(release_id, size, "asset uploaded");
        Ok(())
    }
}
