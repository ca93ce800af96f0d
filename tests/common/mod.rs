#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tower::Layer;

use golinks::api::middleware::rate_limit::RateLimitSettings;
use golinks::domain::click_event::ClickEvent;
use golinks::domain::entities::{JumpType, NewShortLink, ShortLink};
use golinks::domain::repositories::{LinkRepository, LinkSummary};
use golinks::error::AppError;
use golinks::routes::app_router;
use golinks::state::AppState;

/// `LinkRepository` backed by a vector, with the same filtering rules as the
/// PostgreSQL implementation.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<ShortLink>>,
    next_id: Mutex<i64>,
    pub fail_pings: bool,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_pings: true,
            ..Self::default()
        }
    }

    /// Inserts a link without validation and returns its id.
    pub fn insert(&self, slug: &str, destination: &str, jump_type: JumpType) -> i64 {
        let id = self.allocate_id();
        self.links
            .lock()
            .unwrap()
            .push(ShortLink::new(id, slug, destination, jump_type));
        id
    }

    pub fn insert_inactive(&self, slug: &str, destination: &str, jump_type: JumpType) -> i64 {
        let id = self.insert(slug, destination, jump_type);
        self.with_link(id, |link| link.is_active = false);
        id
    }

    pub fn clicks(&self, id: i64) -> i64 {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.click_count)
            .unwrap_or(0)
    }

    fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }

    fn with_link(&self, id: i64, f: impl FnOnce(&mut ShortLink)) -> bool {
        let mut links = self.links.lock().unwrap();
        match links.iter_mut().find(|l| l.id == id) {
            Some(link) => {
                f(link);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_exact_active(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.is_active && l.jump_type.is_exact() && l.slug == slug)
            .cloned())
    }

    async fn list_active_prefix_links(&self) -> Result<Vec<ShortLink>, AppError> {
        let mut links: Vec<ShortLink> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.is_active && l.jump_type.is_prefix())
            .cloned()
            .collect();
        links.sort_by(|a, b| b.slug.cmp(&a.slug));
        Ok(links)
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        self.with_link(id, |link| {
            link.click_count += 1;
            link.updated_at = Utc::now();
        });
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.lock().unwrap().iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.slug == slug)
            .cloned())
    }

    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        if self.find_by_slug(&new_link.slug).await?.is_some() {
            return Err(AppError::conflict("Slug already exists", json!({})));
        }
        let mut link = ShortLink::new(
            self.allocate_id(),
            new_link.slug,
            new_link.destination,
            new_link.jump_type,
        );
        link.description = new_link.description;
        link.is_active = new_link.is_active;
        self.links.lock().unwrap().push(link.clone());
        Ok(link)
    }

    async fn update(&self, id: i64, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut updated = None;
        self.with_link(id, |link| {
            link.slug = new_link.slug;
            link.destination = new_link.destination;
            link.jump_type = new_link.jump_type;
            link.description = new_link.description;
            link.is_active = new_link.is_active;
            link.updated_at = Utc::now();
            updated = Some(link.clone());
        });
        updated.ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<bool, AppError> {
        Ok(self.with_link(id, |link| link.is_active = is_active))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|l| l.id != id);
        Ok(links.len() < before)
    }

    async fn list(&self, search: Option<String>) -> Result<Vec<ShortLink>, AppError> {
        let needle = search.map(|s| s.to_lowercase());
        let mut links: Vec<ShortLink> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| match &needle {
                Some(n) => [&l.slug, &l.destination, &l.description]
                    .iter()
                    .any(|field| field.to_lowercase().contains(n)),
                None => true,
            })
            .cloned()
            .collect();
        links.reverse();
        Ok(links)
    }

    async fn summary(&self) -> Result<LinkSummary, AppError> {
        let links = self.links.lock().unwrap();
        Ok(LinkSummary {
            total_links: links.len() as i64,
            active_links: links.iter().filter(|l| l.is_active).count() as i64,
            total_clicks: links.iter().map(|l| l.click_count).sum(),
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_pings {
            Err(AppError::internal("Database error", json!({})))
        } else {
            Ok(())
        }
    }
}

pub fn create_test_state(
    repo: Arc<InMemoryLinkRepository>,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(100);
    (AppState::new(repo, tx), rx)
}

/// Full application router behind a fake peer address.
pub fn test_server_with_limits(state: AppState, rate_limit: RateLimitSettings) -> TestServer {
    let app = app_router(state, rate_limit).unwrap().layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

pub fn test_server(state: AppState) -> TestServer {
    test_server_with_limits(state, RateLimitSettings::default())
}

/// Inserts `ConnectInfo` so the peer-IP rate limiter has a key.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
