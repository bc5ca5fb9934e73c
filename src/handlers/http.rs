use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::domain::session::{apply, CommandOutcome};
use crate::domain::scavenge;
use crate::handlers::models::{
    ClaimView, NavigateRequest, PlaybackView, PurchaseRequest, PurchaseView, ScavengeView,
    SelectCharacterRequest, SelectWeaponRequest, SessionView,
};
use crate::playback::sequencer::MatchSequencer;
use crate::state::commands::SessionCommand;
use crate::state::server_state::ServerState;
use crate::state::session::{SessionId, SessionState};
use crate::utils::catalog::Catalog;
use crate::utils::config::Config;

/// App state for HTTP handlers (includes server state and dependencies)
#[derive(Clone)]
pub struct AppState {
    pub state: Arc<ServerState>,
    pub catalog: Arc<Catalog>,
    pub config: Arc<Config>,
    pub sequencer: Arc<MatchSequencer>,
}

fn status_for(reason: &str) -> StatusCode {
    match reason {
        "Unknown character" | "Unknown weapon" => StatusCode::NOT_FOUND,
        _ => StatusCode::CONFLICT,
    }
}

fn session_or_404(app_state: &AppState, id: &SessionId) -> Result<Arc<RwLock<SessionState>>, StatusCode> {
    app_state.state.get_session(id).ok_or(StatusCode::NOT_FOUND)
}

/// Apply a command under the session lock. Playback spawn/cancel also happen
/// under the lock so a concurrent command always sees the registered handle.
async fn run_command<T>(
    app_state: &AppState,
    id: SessionId,
    command: SessionCommand,
    view: impl FnOnce(&SessionState, &CommandOutcome) -> T,
) -> Result<T, StatusCode> {
    let session_arc = session_or_404(app_state, &id)?;
    let name = command.name();

    let mut session = session_arc.write().await;
    session.touch();
    let outcome = match apply(&mut session, &app_state.catalog, command) {
        Ok(outcome) => outcome,
        Err(reason) => {
            log::debug!("Session {} rejected {}: {}", id, name, reason);
            return Err(status_for(reason));
        }
    };
    let response = view(&session, &outcome);
    log::debug!("Session {} applied {}", id, name);

    match outcome {
        CommandOutcome::BattleStarted { match_id, loadout } => {
            log::info!("Session {} deploying match {} as {}", id, match_id, loadout.character.name);
            let handle = app_state.sequencer.spawn(session_arc.clone(), match_id, loadout);
            app_state.state.set_playback(&id, handle);
        }
        CommandOutcome::LeftBattle { match_id } if app_state.config.cancel_on_navigate => {
            if app_state.state.cancel_playback(&id, match_id) {
                log::info!("Session {} left battle, cancelling match {}", id, match_id);
            }
        }
        _ => {}
    }
    drop(session);

    Ok(response)
}

fn mismatched_outcome(id: SessionId, expected: &str) -> StatusCode {
    log::error!("Session {} produced no {} outcome", id, expected);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Thin HTTP handler: Catalog listing
pub async fn get_catalog(State(app_state): State<AppState>) -> Json<Catalog> {
    Json(app_state.catalog.as_ref().clone())
}

/// Thin HTTP handler: Create session
pub async fn create_session(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let (id, session) = app_state.state.create_session(app_state.config.starting_credits);
    log::info!("Created session {}", id);

    let session = session.read().await;
    (StatusCode::CREATED, Json(SessionView::from_session(&session)))
}

/// Thin HTTP handler: Get session
pub async fn get_session(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, StatusCode> {
    let session_arc = session_or_404(&app_state, &id)?;
    let mut session = session_arc.write().await;
    session.touch();
    Ok(Json(SessionView::from_session(&session)))
}

/// Thin HTTP handler: End session
pub async fn delete_session(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
) -> StatusCode {
    match app_state.state.remove_session(&id) {
        Some(_) => {
            log::info!("Ended session {}", id);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Thin HTTP handler: Switch tab
pub async fn navigate(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<SessionView>, StatusCode> {
    let command = SessionCommand::Navigate { mode: request.mode };
    run_command(&app_state, id, command, |s, _| Json(SessionView::from_session(s))).await
}

/// Thin HTTP handler: Select character
pub async fn select_character(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<SelectCharacterRequest>,
) -> Result<Json<SessionView>, StatusCode> {
    let command = SessionCommand::SelectCharacter { character_id: request.character_id };
    run_command(&app_state, id, command, |s, _| Json(SessionView::from_session(s))).await
}

/// Thin HTTP handler: Select primary/secondary weapon
pub async fn select_weapon(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<SelectWeaponRequest>,
) -> Result<Json<SessionView>, StatusCode> {
    let command = SessionCommand::SelectWeapon {
        slot: request.slot,
        weapon_id: request.weapon_id,
    };
    run_command(&app_state, id, command, |s, _| Json(SessionView::from_session(s))).await
}

/// Thin HTTP handler: Enter scavenge phase
pub async fn enter_scavenge(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<ScavengeView>, StatusCode> {
    let catalog = app_state.catalog.clone();
    run_command(&app_state, id, SessionCommand::EnterScavenge, |s, _| {
        Json(ScavengeView::from_session(s, &catalog))
    }).await
}

/// Thin HTTP handler: Scavenge grid
pub async fn get_scavenge(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<ScavengeView>, StatusCode> {
    let session_arc = session_or_404(&app_state, &id)?;
    let session = session_arc.read().await;
    Ok(Json(ScavengeView::from_session(&session, &app_state.catalog)))
}

/// Thin HTTP handler: Claim a supply drop
pub async fn claim_slot(
    State(app_state): State<AppState>,
    Path((id, slot)): Path<(SessionId, usize)>,
) -> Result<Json<ClaimView>, StatusCode> {
    let view = run_command(&app_state, id, SessionCommand::ClaimSlot { slot }, |s, outcome| {
        match outcome {
            CommandOutcome::Claim(claim) => Some(ClaimView {
                outcome: claim.clone(),
                scavenged_count: s.scavenged_count,
                battle_ready: scavenge::battle_ready(s),
            }),
            _ => None,
        }
    }).await?;

    view.map(Json).ok_or_else(|| mismatched_outcome(id, "claim"))
}

/// Thin HTTP handler: Enter battle and start playback
pub async fn enter_battle(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<(StatusCode, Json<PlaybackView>), StatusCode> {
    let cadence_ms = app_state.config.reveal_cadence_ms;
    run_command(&app_state, id, SessionCommand::EnterBattle, |s, _| {
        (StatusCode::ACCEPTED, Json(PlaybackView::from_session(s, cadence_ms)))
    }).await
}

/// Thin HTTP handler: Match log so far
pub async fn get_battle(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<PlaybackView>, StatusCode> {
    let session_arc = session_or_404(&app_state, &id)?;
    let session = session_arc.read().await;
    Ok(Json(PlaybackView::from_session(&session, app_state.config.reveal_cadence_ms)))
}

/// Thin HTTP handler: Return to lobby
pub async fn return_to_lobby(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, StatusCode> {
    run_command(&app_state, id, SessionCommand::ReturnToLobby, |s, _| {
        Json(SessionView::from_session(s))
    }).await
}

/// Thin HTTP handler: Buy a store offer
pub async fn purchase(
    State(app_state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<PurchaseView>, StatusCode> {
    let offer = app_state.catalog.offer(&request.offer_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let offer_id = offer.id.clone();
    let command = SessionCommand::Purchase { price: offer.price };

    let view = run_command(&app_state, id, command, |s, outcome| match outcome {
        CommandOutcome::Purchase(result) => {
            let success = result.succeeded();
            let message = if success {
                "Crate opened! You received a new weapon skin."
            } else {
                "Insufficient credits!"
            };
            Some(PurchaseView {
                offer_id,
                success,
                credits: s.credits,
                message: message.to_string(),
            })
        }
        _ => None,
    }).await?;

    view.map(Json).ok_or_else(|| mismatched_outcome(id, "purchase"))
}
