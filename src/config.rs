// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;

use crate::error::AppError;

/// Roles whose holders bypass token checks on `token`-tier lessons.
pub const PRIVILEGED_ROLES: [&str; 2] = ["staff", "admin"];

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. When absent the service runs on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub log_dir: String,
    /// Seed a demo category, lessons and quiz into an empty store at startup.
    pub seed_demo: bool,
    /// Access token given to the seeded `token`-tier lesson.
    pub demo_lesson_token: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::InternalServerError("JWT_SECRET must be set".to_string()))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::InternalServerError(format!("Invalid BIND_ADDR: {}", e)))?;

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let seed_demo = env::var("SEED_DEMO")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let demo_lesson_token =
            env::var("DEMO_LESSON_TOKEN").unwrap_or_else(|_| "preview".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            rust_log,
            bind_addr,
            log_dir,
            seed_demo,
            demo_lesson_token,
        })
    }
}
