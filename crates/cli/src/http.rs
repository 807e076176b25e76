use std::path::{Path, PathBuf};
use std::time::Duration;

use agrochat::{Attachment, ChatBackend, Endpoints, ReplyBody, RequestError, RequestResult};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use reqwest::multipart::{Form, Part};
use serde::Serialize;

/// A file on disk selected with `/attach`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
}

impl LocalFile {
    /// Checks that `path` is a readable regular file; contents are read at send time.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path: path.to_path_buf(),
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type for the document kinds the analysis endpoint understands.
    pub fn content_type(&self) -> &'static str {
        let extension = self
            .path
            .extension()
            .map(|extension| extension.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => "application/pdf",
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("txt") => "text/plain",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            _ => "application/octet-stream",
        }
    }
}

/// Expands a leading `~` to the home directory, as a shell would.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with(['/', std::path::MAIN_SEPARATOR]) => &rest[1..],
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

impl Attachment for LocalFile {
    fn file_name(&self) -> String {
        self.name.clone()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Backend calls over `reqwest`.
pub struct ReqwestBackend {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl ReqwestBackend {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoints: endpoints.normalized(),
        })
    }

    async fn read_reply(url: &str, response: reqwest::Response) -> RequestResult<ReplyBody> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                endpoint = %url,
                status = status.as_u16(),
                "backend answered with error status"
            );
        }

        let body = response
            .text()
            .await
            .map_err(|error| transport("read-body", url, error))?;
        ReplyBody::decode(url, &body)
    }

    async fn send_chat(&self, message: &str) -> RequestResult<ReplyBody> {
        let url = self.endpoints.chat_url();
        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|error| transport("send-chat", &url, error))?;
        Self::read_reply(&url, response).await
    }

    async fn send_file(&self, file: &LocalFile) -> RequestResult<ReplyBody> {
        let url = self.endpoints.analyze_url();
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|error| RequestError::ReadAttachment {
                stage: "read-attachment",
                name: file.name.clone(),
                details: error.to_string(),
            })?;

        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(file.content_type())
            .map_err(|error| transport("build-form", &url, error))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|error| transport("send-file", &url, error))?;
        Self::read_reply(&url, response).await
    }
}

impl ChatBackend for ReqwestBackend {
    type Attachment = LocalFile;

    fn chat<'a>(&'a self, message: &'a str) -> LocalBoxFuture<'a, RequestResult<ReplyBody>> {
        self.send_chat(message).boxed_local()
    }

    fn analyze_file<'a>(
        &'a self,
        attachment: &'a LocalFile,
    ) -> LocalBoxFuture<'a, RequestResult<ReplyBody>> {
        self.send_file(attachment).boxed_local()
    }
}

fn transport(stage: &'static str, endpoint: &str, error: reqwest::Error) -> RequestError {
    RequestError::Transport {
        stage,
        endpoint: endpoint.to_string(),
        details: error.to_string(),
    }
}
