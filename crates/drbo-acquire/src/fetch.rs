use std::time::Duration;

use drbo_model::{DrboError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::decode;

const USER_AGENT: &str = "drbo/0.1 (parallel text typesetter)";

/// Timeout and retry policy for a single page fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Upper bound on the whole request, connect through body.
    pub timeout: Duration,
    /// Extra attempts after the first one, for transport errors and 5xx/429.
    pub retries: u32,
    /// Delay before the first retry; doubled on each further attempt.
    pub backoff: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

struct Failure {
    message: String,
    retryable: bool,
}

/// Fetch a page and return its decoded body.
///
/// The body is decoded by [`decode::decode_html`], so pages served or
/// declared as windows-1252 keep their accented characters.
///
/// Non-success statuses, timeouts and transport failures all surface as
/// `DrboError::Fetch`. Timeouts and 4xx responses (other than 429) are not
/// retried.
pub async fn fetch_page(url: &str, options: &FetchOptions) -> Result<String> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(options.timeout)
        .build()
        .map_err(|e| DrboError::fetch(url, format!("failed to build HTTP client: {e}")))?;

    let mut attempt: u32 = 0;
    loop {
        match fetch_once(&client, url, options.timeout).await {
            Ok(body) => {
                tracing::debug!(url = %url, attempts = attempt + 1, "Fetched page");
                return Ok(body);
            }
            Err(failure) if failure.retryable && attempt < options.retries => {
                let backoff = backoff_delay(options.backoff, attempt);
                tracing::warn!(
                    url = %url,
                    attempt = attempt + 1,
                    retries = options.retries,
                    backoff_ms = backoff.as_millis() as u64,
                    "{}; retrying",
                    failure.message
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(failure) => return Err(DrboError::fetch(url, failure.message)),
        }
    }
}

async fn fetch_once(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> std::result::Result<String, Failure> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| transport_failure(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Failure {
            message: format!("HTTP {status}"),
            retryable: status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS,
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_failure(e, timeout))?;

    Ok(decode::decode_html(&bytes, content_type.as_deref()))
}

/// Delay before retry number `attempt + 1`: `base * 2^attempt`, saturating.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

fn transport_failure(e: reqwest::Error, timeout: Duration) -> Failure {
    if e.is_timeout() {
        Failure {
            message: format!("timed out after {:.1}s", timeout.as_secs_f64()),
            retryable: false,
        }
    } else {
        Failure {
            message: e.to_string(),
            retryable: !e.is_builder(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `response` verbatim to every connection; returns the URL and a hit counter.
    async fn serve(response: &'static [u8]) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response).await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{addr}/drl/chapter/47001.htm"), hits)
    }

    fn quick() -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(5),
            retries: 2,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let (url, hits) = serve(
            b"HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\
             Content-Length: 13\r\nConnection: close\r\n\r\n<p>Salve</p>\n",
        )
        .await;
        let body = fetch_page(&url, &quick()).await.unwrap();
        assert_eq!(body, "<p>Salve</p>\n");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let (url, hits) = serve(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let err = fetch_page(&url, &quick()).await.unwrap_err();
        match err {
            DrboError::Fetch { url: failed, message } => {
                assert_eq!(failed, url);
                assert!(message.contains("404"), "unexpected message: {message}");
            }
            other => panic!("expected Fetch error, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_fails() {
        let (url, hits) = serve(
            b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let err = fetch_page(&url, &quick()).await.unwrap_err();
        assert!(matches!(err, DrboError::Fetch { .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout_is_fatal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let options = FetchOptions {
            timeout: Duration::from_millis(200),
            ..quick()
        };
        let err = fetch_page(&format!("http://{addr}/"), &options).await.unwrap_err();
        match err {
            DrboError::Fetch { message, .. } => {
                assert!(message.contains("timed out"), "unexpected message: {message}");
            }
            other => panic!("expected Fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_windows_1252_body_is_decoded() {
        let (url, _) = serve(
            b"HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=windows-1252\r\n\
              Content-Length: 5\r\nConnection: close\r\n\r\n<p>\xC6a",
        )
        .await;
        let body = fetch_page(&url, &quick()).await.unwrap();
        assert_eq!(body, "<p>\u{C6}a");
    }

    #[tokio::test]
    async fn test_too_many_requests_is_retried() {
        let (url, hits) = serve(
            b"HTTP/1.1 429 Too Many Requests\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let err = fetch_page(&url, &quick()).await.unwrap_err();
        match err {
            DrboError::Fetch { message, .. } => {
                assert!(message.contains("429"), "unexpected message: {message}");
            }
            other => panic!("expected Fetch error, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_connection_refused_is_retried_then_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let options = FetchOptions {
            backoff: Duration::from_millis(20),
            ..quick()
        };
        let started = std::time::Instant::now();
        let err = fetch_page(&format!("http://{addr}/"), &options).await.unwrap_err();
        assert!(matches!(err, DrboError::Fetch { .. }));
        // Two retries sleep 20ms then 40ms before giving up
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_backoff_doubles_and_saturates() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(4000));
        assert_eq!(backoff_delay(base, 40), base * u32::MAX);
        assert_eq!(backoff_delay(Duration::from_secs(u64::MAX), 1), Duration::MAX);
    }
}
