//! Shared utilities for integration tests.

use std::net::SocketAddr;

use eventbrite_gateway::config::validation::validate_config;
use eventbrite_gateway::config::GatewayConfig;
use eventbrite_gateway::http::HttpServer;
use eventbrite_gateway::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_ORG: &str = "org-1";

/// A gateway running on an ephemeral port. Stops when dropped.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config pointing at `base_url` with test credentials.
pub fn test_config(base_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = base_url.into();
    config.upstream.bearer_token = TEST_TOKEN.into();
    config.upstream.org_id = TEST_ORG.into();
    config.upstream.request_timeout_secs = 5;
    config.timeouts.request_secs = 10;
    config
}

/// Start the gateway. The listener is bound before returning, so requests
/// can be sent immediately. Only configurations the binary would accept run.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    if let Err(errors) = validate_config(&config) {
        panic!("test config is invalid: {:?}", errors);
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let stopped = shutdown.notified();
    tokio::spawn(async move {
        let _ = server.run(listener, stopped).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    TestGateway {
        addr,
        client,
        shutdown,
    }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start a backend that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                while let Ok(n) = socket.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    addr
}

/// Send `GET <path>` byte for byte, bypassing client-side URL normalization.
/// Returns the status code and body.
#[allow(dead_code)]
pub async fn raw_get(addr: SocketAddr, path: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw).into_owned();

    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    (status, body.to_string())
}
