//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    Router,
};
use tokio::net::TcpListener;

use wedsite::config::SiteConfig;
use wedsite::http::HttpServer;
use wedsite::lifecycle::Shutdown;
use wedsite::sites::{CreateWebsiteInput, PublishRecord, SiteStore, Website};
use wedsite_sdk::WeddingClient;

/// One request seen by a [`MockProvider`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

type RequestHook = Arc<dyn Fn(&RecordedRequest) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    status: Arc<AtomicU16>,
    body: &'static str,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    hook: Option<RequestHook>,
}

/// A recording stand-in for the KV cache and deployments API. Every request
/// gets the same canned response.
pub struct MockProvider {
    pub base_url: String,
    status: Arc<AtomicU16>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockProvider {
    pub async fn start(status: u16, body: &'static str) -> Self {
        Self::launch(status, body, None).await
    }

    /// Like [`start`](Self::start), running `hook` on each request before
    /// it is answered.
    pub async fn start_with_hook<F>(status: u16, body: &'static str, hook: F) -> Self
    where
        F: Fn(&RecordedRequest) + Send + Sync + 'static,
    {
        Self::launch(status, body, Some(Arc::new(hook))).await
    }

    async fn launch(status: u16, body: &'static str, hook: Option<RequestHook>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let status = Arc::new(AtomicU16::new(status));
        let state = MockState {
            status: status.clone(),
            body,
            requests: requests.clone(),
            hook,
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            status,
            requests,
        }
    }

    /// Change the status returned from now on.
    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Poll until at least `count` requests arrived or `timeout` elapsed.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<RecordedRequest> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let seen = self.requests();
            if seen.len() >= count || tokio::time::Instant::now() >= deadline {
                return seen;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, &'static str) {
    let request = RecordedRequest {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    };
    if let Some(hook) = &state.hook {
        hook(&request);
    }
    state.requests.lock().unwrap().push(request);
    let status = StatusCode::from_u16(state.status.load(Ordering::SeqCst)).unwrap();
    (status, state.body)
}

/// Defaults for tests: tenant domain `example.com`, no cache credentials.
pub fn test_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.domain.primary_domain = "example.com".to_string();
    config.timeouts.render_fetch_secs = 5;
    config.timeouts.cache_upload_secs = 5;
    config.timeouts.rebuild_secs = 5;
    config
}

/// Point the cache and rebuild API at `mock` with a full credential set.
pub fn with_cache(mut config: SiteConfig, mock: &MockProvider) -> SiteConfig {
    config.cache.api_base = mock.base_url.clone();
    config.cache.account_id = Some("acct".to_string());
    config.cache.namespace_id = Some("ns".to_string());
    config.cache.api_token = Some("tok".to_string());
    config
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub base_url: String,
    pub client: WeddingClient,
    pub store: SiteStore,
    shutdown: Shutdown,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Run the full server on an ephemeral port. Unless the config names one,
/// the base URL is the server itself so the publish pipeline fetches its
/// own render route.
pub async fn spawn_app(config: SiteConfig) -> TestApp {
    spawn_app_with_store(config, SiteStore::default()).await
}

pub async fn spawn_app_with_store(mut config: SiteConfig, store: SiteStore) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);
    config.app.base_url.get_or_insert_with(|| base_url.clone());

    let server = HttpServer::new(Arc::new(config), store.clone()).unwrap();
    let shutdown = Shutdown::new();
    let signal = shutdown.wait();
    tokio::spawn(async move {
        server.run(listener, signal).await.unwrap();
    });

    TestApp {
        addr,
        client: WeddingClient::new(&base_url),
        base_url,
        store,
        shutdown,
    }
}

/// A site created straight in the store.
pub fn seed_site(store: &SiteStore, bride: &str, groom: &str, published: bool) -> Website {
    let input = CreateWebsiteInput {
        template_id: "classic-elegance".to_string(),
        bride_name: bride.to_string(),
        groom_name: groom.to_string(),
        wedding_date: "2030-08-15".to_string(),
        subdomain: None,
    };
    let site = store.create(input.validate().unwrap()).unwrap();
    if published {
        store
            .mark_published(
                site.id,
                PublishRecord {
                    deployment_url: format!("https://{}.example.com", site.subdomain),
                    deployment_id: None,
                },
            )
            .unwrap()
    } else {
        site
    }
}

pub fn get_with_host(host: &str, path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .header("host", host)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(res: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
