// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use portal::{
    config::Config,
    models::lesson::{AccessTier, Lesson, NewLesson},
    routes,
    state::AppState,
    store::{CatalogStore, memory::MemoryStore},
    utils::jwt::sign_jwt,
};

pub const JWT_SECRET: &str = "test_secret_for_integration_tests";
pub const LESSON_TOKEN: &str = "s3cret-link";

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
    pub category_id: i64,
}

/// Spawns the app on a random port, backed by a fresh in-memory store.
pub async fn spawn_app() -> TestApp {
    let config = Config {
        database_url: None,
        jwt_secret: JWT_SECRET.to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_dir: "logs".to_string(),
        seed_demo: false,
        demo_lesson_token: "preview".to_string(),
    };

    let store = Arc::new(MemoryStore::new());
    let category_id = store.create_category("Testing").await.unwrap();
    let state = AppState::with_store(store.clone(), config);
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        store,
        client: reqwest::Client::new(),
        category_id,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn lesson(&self, tier: AccessTier, owner_id: i64) -> Lesson {
        self.store
            .create_lesson(NewLesson {
                title: format!("{} lesson", tier),
                description: "Integration test lesson".to_string(),
                owner_id: Some(owner_id),
                category_id: self.category_id,
                access_tier: tier,
                token: (tier == AccessTier::Token).then(|| LESSON_TOKEN.to_string()),
            })
            .await
            .unwrap()
    }
}

pub fn bearer(user_id: i64, role: &str) -> String {
    format!("Bearer {}", sign_jwt(user_id, role, JWT_SECRET, 600).unwrap())
}
