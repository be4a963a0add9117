//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use users_api::config::ServiceConfig;
use users_api::http::{build_router, AppState};
use users_api::observability::MetricsRegistry;
use users_api::store::{StoreError, StoreResult, User, UserStore};

/// In-memory store assigning increasing ids.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    close_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn create_user(&self, name: &str, email: &str) -> StoreResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.len() as i64 + 1,
            name: name.to_string(),
            email: email.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Store whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl UserStore for BrokenStore {
    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::Connection(sqlx::Error::PoolClosed))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Err(StoreError::Query(sqlx::Error::Protocol("relation \"users\" does not exist".into())))
    }

    async fn create_user(&self, _name: &str, _email: &str) -> StoreResult<User> {
        Err(StoreError::Query(sqlx::Error::PoolClosed))
    }

    async fn close(&self) {}
}

/// Store that answers after `delay`.
pub struct SlowStore {
    pub delay: Duration,
}

#[async_trait]
impl UserStore for SlowStore {
    async fn ping(&self) -> StoreResult<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn create_user(&self, name: &str, email: &str) -> StoreResult<User> {
        tokio::time::sleep(self.delay).await;
        Ok(User {
            id: 1,
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    async fn close(&self) {}
}

/// Store whose queries outlive any drain and whose release never finishes.
pub struct StuckStore;

#[async_trait]
impl UserStore for StuckStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(Vec::new())
    }

    async fn create_user(&self, _name: &str, _email: &str) -> StoreResult<User> {
        std::future::pending().await
    }

    async fn close(&self) {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
}

/// Application router over `store` with a fresh metrics registry.
pub fn app(store: Option<Arc<dyn UserStore>>) -> (Router, Arc<MetricsRegistry>) {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let config = ServiceConfig::default();
    let state = AppState {
        store,
        metrics: metrics.clone(),
        health_timeout: config.timeouts.health_check(),
    };
    (build_router(&config, state), metrics)
}

/// Send one request through `router` in-process.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Value of the `http_requests_total` series whose labels contain every
/// fragment, e.g. `&["path=\"/health\"", "status=\"200\""]`.
pub fn request_count(exposition: &str, fragments: &[&str]) -> Option<u64> {
    series_value(exposition, "http_requests_total{", fragments).map(|v| v as u64)
}

/// Value of the `http_request_duration_seconds_count` series matching `fragments`.
pub fn latency_count(exposition: &str, fragments: &[&str]) -> Option<u64> {
    series_value(exposition, "http_request_duration_seconds_count{", fragments).map(|v| v as u64)
}

fn series_value(exposition: &str, prefix: &str, fragments: &[&str]) -> Option<f64> {
    exposition
        .lines()
        .filter(|l| l.starts_with(prefix))
        .find(|l| fragments.iter().all(|f| l.contains(f)))
        .and_then(|l| l.rsplit(' ').next())
        .and_then(|v| v.parse().ok())
}
