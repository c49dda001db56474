use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::AppConfig,
    database::DbManager,
    waitlist::{PgWaitlistStore, Registrar},
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
    pub allowed_origins: Vec<String>,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener, allowed_origins: Vec<String>) -> Self {
        App {
            app_state,
            listener,
            allowed_origins,
        }
    }

    /// Connects to the database, makes sure the waitlist table exists and binds the listener.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let dm = DbManager::init(&config).await?;
        dm.init_schema().await?;

        let registrar = Registrar::new(Arc::new(PgWaitlistStore::new(dm.clone())));
        let app_state = AppState::new(dm, registrar);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener, config.net_config.allowed_origins);
        Ok(app)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

pub struct InternalState {
    pub database_mgr: DbManager,
    pub registrar: Registrar,
}

/// Application state shared by all the handlers.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(database_mgr: DbManager, registrar: Registrar) -> Self {
        AppState(Arc::new(InternalState {
            database_mgr,
            registrar,
        }))
    }
}
