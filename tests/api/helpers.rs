//! Spawns the real server against a fresh postgres database for every test.
use std::{net::SocketAddr, sync::OnceLock};

use anyhow::Result;
use reqwest::Response;
use serde_json::Value;
use uuid::Uuid;
use waitlist_api::{
    config::{AppConfig, Environment},
    database::DbManager,
    init_dbg_tracing,
    waitlist::WaitlistEntry,
    App,
};

pub struct TestApp {
    pub addr: SocketAddr,
    pub http_client: reqwest::Client,
    pub dm: DbManager,
}

/// Set `TEST_LOG` to see the server logs while running tests.
fn init_test_subscriber() {
    static SUBSCRIBER: OnceLock<()> = OnceLock::new();
    SUBSCRIBER.get_or_init(|| {
        if std::env::var("TEST_LOG").is_ok() {
            init_dbg_tracing();
        }
    });
}

impl TestApp {
    /// A helper function that builds the app from the local config, creates a database just for
    /// this test and serves the app on a random port in a separate task.
    pub async fn spawn() -> Result<Self> {
        init_test_subscriber();

        let mut config = AppConfig::load_environment(Environment::Local)?;
        config.db_config.db_name = Uuid::new_v4().to_string();
        // Trying to bind port 0 will trigger an OS scan for an available port.
        config.net_config.host = [127, 0, 0, 1];
        config.net_config.app_port = 0;
        DbManager::create_database(&config.db_config).await?;

        let app = App::build_from_config(config).await?;
        let addr = app.local_addr()?;
        let dm = app.app_state.database_mgr.clone();

        tokio::spawn(waitlist_api::serve(app));

        Ok(TestApp {
            addr,
            http_client: reqwest::Client::new(),
            dm,
        })
    }

    pub async fn post_waitlist(&self, body: &Value) -> Result<Response> {
        let res = self
            .http_client
            .post(format!("http://{}/api/waitlist", self.addr))
            .json(body)
            .send()
            .await?;
        Ok(res)
    }

    /// Sends `body` verbatim as `application/json`.
    pub async fn post_waitlist_raw(&self, body: &'static str) -> Result<Response> {
        let res = self
            .http_client
            .post(format!("http://{}/api/waitlist", self.addr))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        Ok(res)
    }

    pub async fn get_health(&self) -> Result<Response> {
        let res = self
            .http_client
            .get(format!("http://{}/api/health", self.addr))
            .send()
            .await?;
        Ok(res)
    }

    pub async fn entries(&self) -> Result<Vec<WaitlistEntry>> {
        let entries = sqlx::query_as::<_, WaitlistEntry>(
            "SELECT * FROM waitlist_entries ORDER BY id",
        )
        .fetch_all(self.dm.db())
        .await?;
        Ok(entries)
    }
}
