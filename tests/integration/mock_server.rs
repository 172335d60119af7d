//! Mock HTTP server setup for integration tests

use gamepath_ml_client::advisory::InMemoryAdvisorySink;
use gamepath_ml_client::config::{BackoffKind, RetryConfig};
use gamepath_ml_client::token::{NoTokenStore, StaticTokenStore, TokenStore};
use gamepath_ml_client::{MlClient, MlClientBuilder, MlConfig};
use mockito::{Mock, Server, ServerGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
    pub advisories: Arc<InMemoryAdvisorySink>,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
            advisories: Arc::new(InMemoryAdvisorySink::new(16)),
        }
    }

    /// Retries 1 ms apart so retry tests stay fast.
    pub fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            delay_ms: 1,
            backoff: BackoffKind::Fixed,
            max_delay_ms: 1,
        }
    }

    pub fn client(&self, dev_mode: bool, token: Option<&str>, max_retries: u32) -> MlClient {
        let tokens: Arc<dyn TokenStore> = match token {
            Some(t) => Arc::new(StaticTokenStore::new(t)),
            None => Arc::new(NoTokenStore),
        };
        self.client_with_store(dev_mode, tokens, max_retries)
    }

    pub fn client_with_store(&self, dev_mode: bool, tokens: Arc<dyn TokenStore>, max_retries: u32) -> MlClient {
        let mut config = MlConfig::new(self.base_url.clone());
        config.client_id = "itest".to_string();
        MlClientBuilder::new()
            .config(config)
            .dev_mode(dev_mode)
            .retry(Self::fast_retry(max_retries))
            .token_store(tokens)
            .advisory_sink(self.advisories.clone())
            .build()
            .expect("client should build")
    }

    /// Production-mode client without token or retries.
    pub fn create_test_client(&self) -> MlClient {
        self.client(false, None, 0)
    }

    pub async fn mock_json_response(&self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    pub async fn mock_error_response(&self, method: &str, path: &str, status: usize, body: &str, hits: usize) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    pub async fn mock_html_response(&self, method: &str, path: &str, status: usize) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><body>Internal Server Error</body></html>")
            .create_async()
            .await
    }

    pub async fn mock_redirect(&self, method: &str, path: &str, location: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .with_status(302)
            .with_header("location", location)
            .create_async()
            .await
    }
}

/// TCP server that accepts connections and never answers.
pub async fn hanging_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind hanging server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

/// Minimal HTTP/1.1 server answering each connection with the next scripted
/// `(status, body)` pair, then closing it. The last entry repeats.
///
/// Returns the base URL and a counter of requests served.
pub async fn scripted_server(script: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind scripted server");
    let addr = listener.local_addr().expect("local addr");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let (status, body) = script[n.min(script.len() - 1)];
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(read) => {
                        buf.extend_from_slice(&chunk[..read]);
                        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {} Scripted\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    (format!("http://{}", addr), hits)
}
