mod handlers;
mod router;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::core::dispatcher::Dispatcher;
use crate::core::interpreter::Interpreter;
use crate::core::store::TodoStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) interpreter: Arc<Interpreter>,
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) store: Arc<dyn TodoStore>,
}

pub struct ApiServer {
    host: String,
    port: u16,
    state: AppState,
}

impl ApiServer {
    pub fn new(
        host: String,
        port: u16,
        interpreter: Arc<Interpreter>,
        dispatcher: Arc<Dispatcher>,
        store: Arc<dyn TodoStore>,
    ) -> Self {
        Self {
            host,
            port,
            state: AppState {
                interpreter,
                dispatcher,
                store,
            },
        }
    }

    pub async fn serve(self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let app = router::build_api_router(self.state);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("API Server running at http://{addr}");
        axum::serve(listener, app).await?;
        Ok(())
    }
}
