use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{entries, invoices, statement};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/customers/{customer_id}/ledger", get(statement::get_ledger))
        .route("/customers/{customer_id}/entries", post(entries::create))
        .route(
            "/customers/{customer_id}/entries/bulk",
            post(entries::create_bulk),
        )
        .route(
            "/entries/{id}",
            axum::routing::patch(entries::update).delete(entries::delete),
        )
        .route(
            "/customers/{customer_id}/invoices",
            post(invoices::create).get(invoices::list),
        )
        .with_state(state)
}

/// Builds the application router around an engine.
///
/// Exposed for in-process integration tests; production callers use
/// [`run_with_listener`].
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
