#![allow(dead_code)]

use erp_service::config::ErpConfig;
use erp_service::services::MongoDb;
use erp_service::startup::Application;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use uuid::Uuid;

pub const TEST_USER_ID: &str = "test_user_123";

const DEFAULT_TEST_MONGODB_URI: &str = "mongodb://localhost:27017/?serverSelectionTimeoutMS=1500";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
    pub client: Client,
}

impl TestApp {
    /// Start the service on a random port against a throwaway database.
    pub async fn spawn() -> Self {
        if std::env::var("MONGODB_URI").is_err() {
            std::env::set_var("MONGODB_URI", DEFAULT_TEST_MONGODB_URI);
        }

        let db_name = format!("erp_test_{}", Uuid::new_v4().simple());

        let mut config = ErpConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.mongodb.database = db_name.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str, body: &Value) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .header("X-User-ID", TEST_USER_ID)
            .json(body)
    }

    pub fn put(&self, path: &str, body: &Value) -> RequestBuilder {
        self.client
            .put(self.url(path))
            .header("X-User-ID", TEST_USER_ID)
            .json(body)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("X-User-ID", TEST_USER_ID)
    }

    /// POST and return `data` from the envelope, asserting 201.
    pub async fn create(&self, path: &str, body: &Value) -> Value {
        let response = self.post(path, body).send().await.expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201, "create {} failed", path);
        data(response).await
    }

    /// Drop the test database.
    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}

/// `data` of a success envelope.
pub async fn data(response: Response) -> Value {
    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["data"].clone()
}

pub async fn body(response: Response) -> Value {
    response.json().await.expect("Failed to parse JSON")
}
