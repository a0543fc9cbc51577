#[cfg(feature = "api")]
use crate::error::{EcosError, Result};
#[cfg(feature = "api")]
use log::{debug, info, warn};
#[cfg(feature = "api")]
use reqwest::Client;

/// Public ECOS endpoint, scheme included.
pub const DEFAULT_BASE_URL: &str = "https://ecos.bok.or.kr";

/// First and last record requested; the endpoint is never paged further.
pub const FIRST_RECORD: u32 = 1;
pub const LAST_RECORD: u32 = 100;

/// Placeholder shown instead of the API key when a URL is logged.
pub const REDACTED_KEY: &str = "<api-key>";

/// Build the `KeyStatisticList` URL for the given base URL and API key,
/// requesting the first 100 records as Korean-language XML.
pub fn key_statistic_url(base_url: &str, api_key: &str) -> String {
    format!(
        "{}/api/KeyStatisticList/{}/xml/kr/{}/{}",
        base_url.trim_end_matches('/'),
        api_key,
        FIRST_RECORD,
        LAST_RECORD
    )
}

/// Client for the ECOS key statistics endpoint.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct KeyStatClient {
    client: Client,
    base_url: String,
}

#[cfg(feature = "api")]
impl Default for KeyStatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "api")]
impl KeyStatClient {
    /// Client for the public ECOS endpoint with transport defaults.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client for another endpoint, e.g. `http://127.0.0.1:8080`.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Reuse a configured `reqwest::Client` (proxy, TLS, timeouts).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the key statistics list and return the decoded body.
    ///
    /// A non-2xx status is logged and the body is returned unchanged; only
    /// transport failures are errors. There is no retry.
    pub async fn fetch_xml(&self, api_key: &str) -> Result<String> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(EcosError::MissingApiKey);
        }
        let url = key_statistic_url(&self.base_url, api_key);
        info!(
            "Requesting {}",
            key_statistic_url(&self.base_url, REDACTED_KEY)
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status from {}: {}", self.base_url, status);
        }
        let body = response.text().await?;
        debug!("Received {} bytes from {}", body.len(), self.base_url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_statistic_url() {
        let url = key_statistic_url(DEFAULT_BASE_URL, "SAMPLEKEY");
        assert_eq!(
            url,
            "https://ecos.bok.or.kr/api/KeyStatisticList/SAMPLEKEY/xml/kr/1/100"
        );
    }

    #[test]
    fn test_url_for_plain_http_base() {
        let url = key_statistic_url("http://localhost:8080/", REDACTED_KEY);
        assert_eq!(
            url,
            "http://localhost:8080/api/KeyStatisticList/<api-key>/xml/kr/1/100"
        );
    }

    #[cfg(feature = "api")]
    mod fetch {
        use super::*;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;
        use tokio::sync::oneshot;

        /// Serve one canned HTTP response on a local port. Yields the base
        /// URL and the request head the client sent.
        async fn serve_once(
            status_line: &'static str,
            body: &'static str,
        ) -> (String, oneshot::Receiver<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let (tx, rx) = oneshot::channel();
            tokio::spawn(async move {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
                let _ = tx.send(String::from_utf8_lossy(&head).into_owned());
            });
            (format!("http://{}", addr), rx)
        }

        fn local_client(base_url: &str) -> KeyStatClient {
            let client = Client::builder().no_proxy().build().unwrap();
            KeyStatClient::with_client(client, base_url)
        }

        #[tokio::test]
        async fn test_fetch_without_key_is_rejected() {
            let client = KeyStatClient::new();
            assert_eq!(client.base_url(), DEFAULT_BASE_URL);
            let result = client.fetch_xml("   ").await;
            assert!(matches!(result, Err(EcosError::MissingApiKey)));
        }

        #[tokio::test]
        async fn test_fetch_returns_body() {
            let body = "<KeyStatisticList><row><A>1</A></row></KeyStatisticList>";
            let (base_url, head) = serve_once("200 OK", body).await;
            let client = local_client(&base_url);
            assert_eq!(client.fetch_xml(" KEY ").await.unwrap(), body);

            let head = head.await.unwrap();
            assert!(head.starts_with("GET /api/KeyStatisticList/KEY/xml/kr/1/100 HTTP/1.1"));
        }

        #[tokio::test]
        async fn test_error_status_body_is_passed_through() {
            let body = "<RESULT><CODE>ERROR-500</CODE><MESSAGE>Server error.</MESSAGE></RESULT>";
            let (base_url, _head) = serve_once("500 Internal Server Error", body).await;
            let client = local_client(&base_url);
            assert_eq!(client.fetch_xml("KEY").await.unwrap(), body);
        }

        #[tokio::test]
        async fn test_connection_failure_is_http_error() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let client = local_client(&format!("http://{}", addr));
            let result = client.fetch_xml("KEY").await;
            assert!(matches!(result, Err(EcosError::HttpRequest(_))));
        }
    }
}
