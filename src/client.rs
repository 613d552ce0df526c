//! Analysis Backend Client
//!
//! HTTP client that submits a query, and optionally a spreadsheet, to the
//! analysis backend as multipart form data.
//!
//! One attempt per call: no retry, no timeout. Every failure (network,
//! non-2xx status, undecodable body) is returned as a [`ClientError`] for the
//! caller to turn into a chat reply.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use thiserror::Error;

use crate::config::query_endpoint;
use crate::result::QueryResult;

/// A spreadsheet attached to a query
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk. No size or type checks are made.
    pub async fn from_path(path: &Path) -> Result<Self, std::io::Error> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// Client for the backend's query endpoint
#[derive(Debug, Clone)]
pub struct QueryClient {
    client: Client,
    endpoint: String,
}

impl QueryClient {
    /// Create a client posting to `{base_url}/query/`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().build().map_err(ClientError::Network)?;
        Ok(Self {
            client,
            endpoint: query_endpoint(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a query and decode the backend's answer
    pub async fn send_query(
        &self,
        query: &str,
        file: Option<Attachment>,
    ) -> Result<QueryResult, ClientError> {
        let mut form = Form::new().text("query", query.to_string());
        if let Some(file) = file {
            tracing::debug!("Attaching {} ({} bytes)", file.file_name, file.bytes.len());
            form = form.part("file", Part::bytes(file.bytes).file_name(file.file_name));
        }

        tracing::debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(ClientError::Network)?;
        QueryResult::from_json(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Errors that can occur when querying the backend
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and hand back the raw request
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (base, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let body = &text[header_end + 4..];
                if body.ends_with("--\r\n") || body.ends_with("0\r\n\r\n") {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    #[tokio::test]
    async fn test_posts_multipart_query() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"type": "area_analysis", "area": "Wakad", "summary": "ok"}"#,
        )
        .await;

        let client = QueryClient::new(&base).unwrap();
        let result = client
            .send_query("Give me analysis of Wakad", None)
            .await
            .unwrap();
        assert_eq!(result.summary_line(), "Here's the analysis for Wakad:");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/query/ HTTP/1.1"));
        assert!(request.to_lowercase().contains("content-type: multipart/form-data"));
        assert!(request.contains("name=\"query\""));
        assert!(request.contains("Give me analysis of Wakad"));
        assert!(!request.contains("name=\"file\""));
    }

    #[tokio::test]
    async fn test_attaches_file() {
        let (base, server) = serve_once("200 OK", r#"{"error": "no data"}"#).await;

        let client = QueryClient::new(&base).unwrap();
        let file = Attachment::new("prices.csv", b"year,price\n2020,1\n".to_vec());
        let result = client.send_query("Analyze Wakad", Some(file)).await.unwrap();
        assert_eq!(result, QueryResult::Error("no data".to_string()));

        let request = server.await.unwrap();
        assert!(request.contains("name=\"file\"; filename=\"prices.csv\""));
        assert!(request.contains("2020,1"));
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let (base, server) = serve_once(
            "400 Bad Request",
            r#"{"error": "No data available. Please upload a file."}"#,
        )
        .await;

        let client = QueryClient::new(&base).unwrap();
        let err = client.send_query("Analyze Wakad", None).await.unwrap_err();
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("No data available"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_body_fails() {
        let (base, server) = serve_once("200 OK", "<html>oops</html>").await;

        let client = QueryClient::new(&base).unwrap();
        let err = client.send_query("Analyze Wakad", None).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api", listener.local_addr().unwrap());
        drop(listener);

        let client = QueryClient::new(&base).unwrap();
        let err = client.send_query("Analyze Wakad", None).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[tokio::test]
    async fn test_attachment_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Sample_data.xlsx");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();
        assert_eq!(attachment.file_name, "Sample_data.xlsx");
        assert_eq!(attachment.bytes, vec![1, 2, 3]);
    }
}
