//! Shared integration-test harness
//!
//! Postgres and Redis containers start lazily on first use and are shared
//! by every test in the binary. Each test gets its own pool, router, upload
//! directory and client address.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tempfile::TempDir;
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::{postgres::Postgres, redis::Redis};
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

use fleetops::{
    Config, create_router,
    config::{DatabaseConfig, JwtConfig, MailConfig, RedisConfig, ServerConfig, StorageConfig},
    db,
    services::{SettingService, mail_service::LogMailer},
    state::AppState,
};

// The URL is resolved once, while the runtime that started the container is alive
static POSTGRES: OnceCell<(ContainerAsync<Postgres>, String)> = OnceCell::const_new();
static REDIS: OnceCell<(ContainerAsync<Redis>, String)> = OnceCell::const_new();

async fn postgres_url() -> String {
    let (_, url) = POSTGRES
        .get_or_init(|| async {
            let container = Postgres::default()
                .with_user("fleetops")
                .with_password("fleetops_test")
                .with_db_name("fleetops_test")
                .with_tag("16-alpine")
                .start()
                .await
                .expect("Failed to start PostgreSQL container");
            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();
            let url = format!("postgres://fleetops:fleetops_test@{}:{}/fleetops_test", host, port);
            (container, url)
        })
        .await;
    url.clone()
}

async fn redis_url() -> String {
    let (_, url) = REDIS
        .get_or_init(|| async {
            let container = Redis::default()
                .start()
                .await
                .expect("Failed to start Redis container");
            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(6379).await.unwrap();
            (container, format!("redis://{}:{}", host, port))
        })
        .await;
    url.clone()
}

fn test_config(database_url: String, redis_url: String, uploads: &TempDir) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "warn".to_string(),
            json_logs: false,
            environment: "test".to_string(),
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
        },
        redis: RedisConfig { url: redis_url },
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_hours: 1,
            refresh_token_expiry_days: 1,
        },
        storage: StorageConfig {
            uploads_path: uploads.path().to_path_buf(),
        },
        mail: MailConfig {
            enabled: false,
            api_url: None,
            api_key: None,
            from: "no-reply@fleetops.test".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    _uploads: TempDir,
}

/// A logged-in account
pub struct Session {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let database_url = postgres_url().await;
        let redis_url = redis_url().await;
        let uploads = TempDir::new().unwrap();

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");
        db::run_migrations(&pool).await.expect("Failed to run migrations");
        SettingService::ensure_defaults(&pool).await.unwrap();

        let redis_client = redis::Client::open(redis_url.as_str()).unwrap();
        let redis = redis::aio::ConnectionManager::new(redis_client).await.unwrap();

        let config = test_config(database_url, redis_url, &uploads);
        let state = AppState::new(pool.clone(), redis, Arc::new(LogMailer), config);

        // Separate address per app so rate-limit windows do not collide
        let octets = Uuid::new_v4().into_bytes();
        let addr = SocketAddr::from(([10, octets[0], octets[1], octets[2]], 40000));
        let router = create_router(state).layer(MockConnectInfo(addr));

        Self {
            router,
            pool,
            _uploads: uploads,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    /// Sign up a fresh account, give it `role`, and log in
    pub async fn session(&self, role: &str) -> Session {
        let email = format!("{}-{}@fleetops.test", role, Uuid::new_v4().simple());
        let password = "correct-horse-42";

        let signup = self
            .request(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(signup_body(&email, password)),
            )
            .await;
        assert_eq!(signup.status, StatusCode::CREATED, "{}", signup.body);

        sqlx::query("UPDATE users SET role = $1 WHERE email = $2")
            .bind(role)
            .bind(&email)
            .execute(&self.pool)
            .await
            .unwrap();

        let login = self
            .request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);

        Session {
            id: login.body["user"]["id"].as_str().unwrap().parse().unwrap(),
            email,
            token: login.body["access_token"].as_str().unwrap().to_string(),
        }
    }
}

pub fn signup_body(email: &str, password: &str) -> Value {
    json!({
        "email": email,
        "password": password,
        "first_name": "Test",
        "last_name": "Driver",
        "city": "Poznan",
        "street": "Main Street",
        "house_number": "12",
        "phone_number": "+48 600 000 000"
    })
}

/// A license plate nobody else uses
pub fn unique_plate() -> String {
    format!("T{}", &Uuid::new_v4().simple().to_string()[..8]).to_uppercase()
}
