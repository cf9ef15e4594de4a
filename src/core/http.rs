use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::config::ResolverConfig;
use crate::core::error::{ArtifactError, ArtifactResult};

const APP_USER_AGENT: &str = concat!("artifact-resolver/", env!("CARGO_PKG_VERSION"));

/// Client with connect and per-read idle limits. There is no total
/// deadline on the client; a body that keeps arriving is never cut off.
pub fn build_http_client(config: &ResolverConfig) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .connect_timeout(config.request_timeout())
        .read_timeout(config.request_timeout())
        .build()
}

/// Plain GET access to upstream hosts. No retry, no auth.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET `url` and decode the body as UTF-8 text.
    async fn get_text(&self, url: &str) -> ArtifactResult<String>;

    /// GET `url` and stream the body into `dest`, returning the bytes written.
    async fn download_to(&self, url: &str, dest: &Path) -> ArtifactResult<u64>;
}

/// `HttpFetch` backed by a shared reqwest client.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    /// Total deadline for small text bodies only.
    text_timeout: Option<Duration>,
}

impl ReqwestFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            text_timeout: None,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> ArtifactResult<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            text_timeout: Some(config.request_timeout()),
        })
    }

    async fn send(&self, url: &str, timeout: Option<Duration>) -> ArtifactResult<reqwest::Response> {
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ArtifactError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get_text(&self, url: &str) -> ArtifactResult<String> {
        debug!(url, "GET");
        Ok(self.send(url, self.text_timeout).await?.text().await?)
    }

    async fn download_to(&self, url: &str, dest: &Path) -> ArtifactResult<u64> {
        debug!(url, dest = %dest.display(), "Downloading");
        let response = self.send(url, None).await?;

        let mut written = 0u64;
        // Scoped so the handle is closed before callers inspect the file
        {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|e| ArtifactError::io(dest, e))?;
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk)
                    .await
                    .map_err(|e| ArtifactError::io(dest, e))?;
                written += chunk.len() as u64;
            }
            file.flush().await.map_err(|e| ArtifactError::io(dest, e))?;
        }

        debug!(url, bytes = written, "Downloaded");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve one HTTP/1.1 response on a loopback port, writing the body one
    /// byte at a time with `gap` between bytes.
    async fn serve_once(status: &'static str, body: &'static [u8], gap: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            for byte in body {
                tokio::time::sleep(gap).await;
                socket.write_all(std::slice::from_ref(byte)).await.unwrap();
                socket.flush().await.unwrap();
            }
        });
        format!("http://{}/artifact", addr)
    }

    fn one_second_fetcher() -> ReqwestFetcher {
        let config = ResolverConfig {
            request_timeout_secs: 1,
            ..ResolverConfig::default()
        };
        ReqwestFetcher::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn slow_but_steady_body_outlives_request_timeout() {
        let url = serve_once("200 OK", b"abc", Duration::from_millis(600)).await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("artifact.bin");

        let written = one_second_fetcher().download_to(&url, &dest).await.unwrap();
        assert_eq!(written, 3);
        assert_eq!(std::fs::read(&dest).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn error_status_is_download_failed() {
        let url = serve_once("404 Not Found", b"", Duration::ZERO).await;
        let dir = tempfile::tempdir().unwrap();

        let err = one_second_fetcher()
            .download_to(&url, &dir.path().join("artifact.bin"))
            .await
            .unwrap_err();
        assert!(matches!(err, ArtifactError::DownloadFailed { status: 404, .. }));
    }
}
