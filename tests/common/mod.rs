//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

use giftperch_gateway::affiliate::AffiliateLinkRewriter;
use giftperch_gateway::config::{GatewayConfig, RuntimeMode};
use giftperch_gateway::http::{AppState, HttpServer};
use giftperch_gateway::search::{Product, ProductSearch, SearchError, SearchQuery};
use giftperch_gateway::supabase::{
    IdentityError, IdentityProvider, Principal, ProfileChanges, ProfileStore, StoreError,
};

pub const TEST_TAG: &str = "testtag-20";

/// An HTTP request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request line and headers, lowercased.
    pub head: String,
    pub body: String,
}

impl CapturedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).into_owned();
    Some(CapturedRequest { head, body })
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// The handler returns a status code and a JSON body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(CapturedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                let (status, body) = f(request).await;
                let status_text = match status {
                    200 => "200 OK",
                    201 => "201 Created",
                    204 => "204 No Content",
                    400 => "400 Bad Request",
                    401 => "401 Unauthorized",
                    403 => "403 Forbidden",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

pub fn product(title: &str, url: &str) -> Product {
    Product {
        title: title.to_string(),
        url: url.to_string(),
        asin: None,
        image_url: None,
        price: Some(19.99),
        currency: Some("USD".to_string()),
        rating: None,
    }
}

/// Search backend returning a canned result.
pub struct MockSearch {
    pub result: Result<Vec<Product>, u16>,
    pub calls: AtomicUsize,
    pub last_query: Mutex<Option<SearchQuery>>,
}

impl MockSearch {
    pub fn returning(products: Vec<Product>) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(products),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            result: Err(status),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductSearch for MockSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        match &self.result {
            Ok(products) => Ok(products.clone()),
            Err(status) => Err(SearchError::Status {
                status: *status,
                body: "provider exploded".to_string(),
            }),
        }
    }
}

/// Identity provider accepting exactly one token.
pub struct MockIdentity {
    pub valid_token: &'static str,
    pub user_id: &'static str,
    pub calls: AtomicUsize,
}

impl MockIdentity {
    pub fn accepting(valid_token: &'static str, user_id: &'static str) -> Arc<Self> {
        Arc::new(Self {
            valid_token,
            user_id,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn verify(&self, token: &str) -> Result<Principal, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if token == self.valid_token {
            Ok(Principal {
                id: self.user_id.to_string(),
                email: None,
                access_token: token.to_string(),
            })
        } else {
            Err(IdentityError::Rejected(401))
        }
    }
}

/// Profile store recording every upsert.
#[derive(Default)]
pub struct MockProfiles {
    pub fail: bool,
    pub upserts: Mutex<Vec<(String, ProfileChanges)>>,
}

impl MockProfiles {
    pub fn recording() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn upserts(&self) -> Vec<(String, ProfileChanges)> {
        self.upserts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileStore for MockProfiles {
    async fn upsert(&self, principal: &Principal, changes: &ProfileChanges) -> Result<(), StoreError> {
        self.upserts
            .lock()
            .unwrap()
            .push((principal.id.clone(), changes.clone()));
        if self.fail {
            Err(StoreError::Rejected {
                status: 500,
                message: "relation \"profiles\" is locked".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.affiliate.partner_tag = Some(TEST_TAG.to_string());
    config.runtime.mode = RuntimeMode::Production;
    config
}

pub fn app(
    search: Arc<MockSearch>,
    identity: Arc<MockIdentity>,
    profiles: Arc<MockProfiles>,
) -> Router {
    let config = test_config();
    let affiliate = Arc::new(AffiliateLinkRewriter::from_config(
        &config.affiliate,
        config.runtime.mode,
    ));
    let state = AppState::builder(config)
        .affiliate(affiliate)
        .search(search)
        .identity(identity)
        .profiles(profiles)
        .build()
        .unwrap();
    HttpServer::new(state).into_router()
}

pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send a request through the router and decode the JSON body.
pub async fn send_json(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
