use crate::config::Config;
use crate::landmarks::LandmarkSet;
use crate::mesh::{load_mesh_from_file, ActionMesh, MeshLibrary};
use crate::scorer::{ScoreDetails, Scorer};
use crate::session::{lock_session, shared, SessionController, SharedSession, TickOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{info, warn};

/// The state an embedding application keeps to run the scoring engine.
pub struct PoseMatchState {
    pub config: Mutex<Config>,
    pub session: Mutex<Option<SharedSession>>,
}

impl Default for PoseMatchState {
    fn default() -> Self {
        Self {
            config: Mutex::new(Config::default()),
            session: Mutex::new(None),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSummary {
    pub checkpoints: usize,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

impl From<&ActionMesh> for ReferenceSummary {
    fn from(mesh: &ActionMesh) -> Self {
        Self {
            checkpoints: mesh.len(),
            start_time: mesh.first_time(),
            end_time: mesh.last_time(),
        }
    }
}

pub fn configure(state: &PoseMatchState, config: Config) -> Result<(), String> {
    config.validate().map_err(|e| e.to_string())?;

    // A running session picks up the new settings too
    if let Some(existing) = state.session.lock().map_err(|e| e.to_string())?.as_ref() {
        lock_session(existing)
            .map_err(|e| e.to_string())?
            .reconfigure(&config)
            .map_err(|e| e.to_string())?;
    }

    let mut guard = state.config.lock().map_err(|e| e.to_string())?;
    *guard = config;
    info!("API: Configuration updated");
    Ok(())
}

fn install_mesh(state: &PoseMatchState, mesh: ActionMesh) -> Result<ReferenceSummary, String> {
    let summary = ReferenceSummary::from(&mesh);
    let config = state.config.lock().map_err(|e| e.to_string())?.clone();

    let mut slot = state.session.lock().map_err(|e| e.to_string())?;
    // Reuse the running session so callers holding it keep working
    if let Some(existing) = slot.as_ref() {
        lock_session(existing).map_err(|e| e.to_string())?.load_mesh(mesh);
        return Ok(summary);
    }
    let controller = SessionController::from_config(&config, mesh).map_err(|e| e.to_string())?;
    *slot = Some(shared(controller));
    Ok(summary)
}

/// Service: load a reference performance from a mesh file.
pub fn load_reference(state: &PoseMatchState, path: &str) -> Result<ReferenceSummary, String> {
    let joint_count = state.config.lock().map_err(|e| e.to_string())?.session.joint_count;
    let mesh = load_mesh_from_file(path, joint_count).map_err(|e| e.to_string())?;
    info!("API: Loaded reference '{}' ({} checkpoints)", path, mesh.len());
    install_mesh(state, mesh)
}

/// Service: load a reference by id from a mesh library. A missing or broken
/// file installs an empty mesh.
pub fn load_reference_by_id(
    state: &PoseMatchState,
    library: &MeshLibrary,
    id: &str,
) -> Result<ReferenceSummary, String> {
    let mesh = library.load(id);
    if mesh.is_empty() {
        warn!("API: Reference '{}' has no checkpoints", id);
    }
    install_mesh(state, mesh)
}

pub fn session(state: &PoseMatchState) -> Result<SharedSession, String> {
    state
        .session
        .lock()
        .map_err(|e| e.to_string())?
        .clone()
        .ok_or_else(|| "No reference loaded. Load a reference first.".to_string())
}

pub fn start_session(state: &PoseMatchState) -> Result<(), String> {
    let s = session(state)?;
    lock_session(&s).map_err(|e| e.to_string())?.start();
    Ok(())
}

pub fn stop_session(state: &PoseMatchState) -> Result<(), String> {
    let s = session(state)?;
    lock_session(&s).map_err(|e| e.to_string())?.stop();
    Ok(())
}

/// Service: compare two poses with the current scoring weights.
pub fn compare_poses(
    state: &PoseMatchState,
    user: &LandmarkSet,
    target: &LandmarkSet,
) -> Result<ScoreDetails, String> {
    let weights = state.config.lock().map_err(|e| e.to_string())?.scoring.clone();
    Ok(Scorer::new(weights).score_details(user, target))
}

/// Service: feed one detected pose into the running session.
pub fn evaluate_frame(
    state: &PoseMatchState,
    user: &LandmarkSet,
    playback_time: f64,
) -> Result<TickOutcome, String> {
    let s = session(state)?;
    let mut guard = lock_session(&s).map_err(|e| e.to_string())?;
    Ok(guard.tick(user, playback_time))
}
