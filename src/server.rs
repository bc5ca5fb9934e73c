use axum::{
    routing::{get, post},
    Router,
};
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use crate::handlers::http::{
    claim_slot, create_session, delete_session, enter_battle, enter_scavenge, get_battle,
    get_catalog, get_scavenge, get_session, navigate, purchase, return_to_lobby,
    select_character, select_weapon, AppState,
};
use crate::playback::sequencer::MatchSequencer;
use crate::playback::source::EventSource;
use crate::state::server_state::ServerState;
use crate::utils::catalog::Catalog;
use crate::utils::config::Config;

/// Wire shared state, catalog, config and the match sequencer together
pub fn build_app_state(
    state: Arc<ServerState>,
    catalog: Arc<Catalog>,
    config: Arc<Config>,
    source: Arc<dyn EventSource>,
) -> AppState {
    let sequencer = Arc::new(MatchSequencer::new(source, config.reveal_cadence()));
    AppState {
        state,
        catalog,
        config,
        sequencer,
    }
}

/// HTTP routes for the lobby
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/navigate", post(navigate))
        .route("/sessions/:id/character", post(select_character))
        .route("/sessions/:id/weapons", post(select_weapon))
        .route("/sessions/:id/scavenge", post(enter_scavenge).get(get_scavenge))
        .route("/sessions/:id/scavenge/slots/:slot", post(claim_slot))
        .route("/sessions/:id/battle", post(enter_battle).get(get_battle))
        .route("/sessions/:id/lobby", post(return_to_lobby))
        .route("/sessions/:id/store/purchase", post(purchase))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(app_state)
}

/// Start the HTTP server and the idle-session sweeper
pub async fn start_servers(app_state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let sweeper = init_session_sweeper(app_state.state.clone(), app_state.config.clone());
    let http_server = init_http_server(app_state).await?;

    tokio::try_join!(http_server, sweeper)?;
    Ok(())
}

/// Initialize HTTP server
async fn init_http_server(app_state: AppState) -> Result<JoinHandle<()>, Box<dyn std::error::Error>> {
    let http_addr = format!("0.0.0.0:{}", app_state.config.http_port);
    info!("Starting HTTP server on {}", http_addr);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server successfully bound to {}", http_addr);

    let app = build_router(app_state);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("HTTP server error: {}", e);
        }
    }))
}

/// Periodically drop sessions that have gone idle
fn init_session_sweeper(state: Arc<ServerState>, config: Arc<Config>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = interval(config.cleanup_interval());

        loop {
            timer.tick().await;
            let removed = state.cleanup_idle(config.session_idle_timeout_secs).await;
            if !removed.is_empty() {
                info!("Expired {} idle sessions ({} active)", removed.len(), state.session_count());
            }
        }
    })
}
