use crate::backend::{Frame, PoseAdapter};
use crate::config::{Config, SessionParams};
use crate::error::{BackendError, PoseMatchError, PoseMatchResult};
use crate::feedback::{Feedback, FeedbackClassifier, FeedbackLabel};
use crate::landmarks::LandmarkSet;
use crate::mesh::ActionMesh;
use crate::scorer::Scorer;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub tolerance: f64,
    pub min_interval: f64,
    pub joint_count: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&SessionParams::default())
    }
}

impl From<&SessionParams> for SessionConfig {
    fn from(p: &SessionParams) -> Self {
        Self {
            tolerance: p.checkpoint_tolerance,
            min_interval: p.min_score_interval,
            joint_count: p.joint_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    Active,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEvent {
    pub points: u32,
    pub label: FeedbackLabel,
    pub score: f32,
    pub checkpoint_time: f64,
    pub playback_time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Inactive,
    Suppressed,
    NoCheckpoint,
    // No body in the frame, or a set with the wrong joint count
    NoPose,
    // Compared, but the score earned no points
    Missed { score: f32, feedback: Feedback, checkpoint_time: f64 },
    Scored(ScoreEvent),
    // Request started before the last stop/restart
    Stale,
    BackendFailed(BackendError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub scored: u64,
    pub missed: u64,
    pub suppressed: u64,
    pub no_checkpoint: u64,
    pub no_pose: u64,
    pub stale: u64,
    pub backend_failures: u64,
    pub total_points: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
}

/// Decides when a user pose is compared against the reference and emits
/// the resulting points. Not thread-safe on its own; see [`SharedSession`].
pub struct SessionController {
    mesh: ActionMesh,
    scorer: Scorer,
    classifier: FeedbackClassifier,
    config: SessionConfig,

    state: SessionState,
    last_scored_time: f64,
    // Bumped on every start/stop/restart/reload to void in-flight results
    generation: u64,
    stats: SessionStats,
}

impl SessionController {
    pub fn new(
        mesh: ActionMesh,
        scorer: Scorer,
        classifier: FeedbackClassifier,
        config: SessionConfig,
    ) -> Self {
        Self {
            mesh,
            scorer,
            classifier,
            config,
            state: SessionState::Idle,
            last_scored_time: f64::NEG_INFINITY,
            generation: 0,
            stats: SessionStats::default(),
        }
    }

    pub fn from_config(config: &Config, mesh: ActionMesh) -> PoseMatchResult<Self> {
        config.validate()?;
        let classifier = FeedbackClassifier::new(config.feedback.get_tiers()?)?;
        Ok(Self::new(
            mesh,
            Scorer::new(config.scoring.clone()),
            classifier,
            SessionConfig::from(&config.session),
        ))
    }

    // Keeps the mesh and the Idle/Active state; in-flight requests go stale
    pub fn reconfigure(&mut self, config: &Config) -> PoseMatchResult<()> {
        config.validate()?;
        let classifier = FeedbackClassifier::new(config.feedback.get_tiers()?)?;
        self.scorer = Scorer::new(config.scoring.clone());
        self.classifier = classifier;
        self.config = SessionConfig::from(&config.session);
        self.reset();
        info!("Scoring session reconfigured");
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn last_scored_time(&self) -> f64 {
        self.last_scored_time
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn mesh(&self) -> &ActionMesh {
        &self.mesh
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn reset(&mut self) {
        self.last_scored_time = f64::NEG_INFINITY;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn start(&mut self) {
        self.reset();
        self.state = SessionState::Active;
        info!("Scoring session started ({} checkpoints)", self.mesh.len());
    }

    pub fn stop(&mut self) {
        self.reset();
        self.state = SessionState::Idle;
        info!("Scoring session stopped");
    }

    // Reference video restarted from the beginning
    pub fn restart(&mut self) {
        self.reset();
        debug!("Scoring session restarted");
    }

    pub fn load_mesh(&mut self, mesh: ActionMesh) {
        self.mesh = mesh;
        self.reset();
        info!("Loaded new action mesh ({} checkpoints)", self.mesh.len());
    }

    pub fn tick(&mut self, user: &LandmarkSet, current_time: f64) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Inactive;
        }

        if user.len() != self.config.joint_count {
            debug!(
                "Ignoring pose with {} landmarks (expected {})",
                user.len(),
                self.config.joint_count
            );
            self.stats.no_pose += 1;
            return TickOutcome::NoPose;
        }

        if current_time - self.last_scored_time < self.config.min_interval {
            self.stats.suppressed += 1;
            return TickOutcome::Suppressed;
        }

        let Some(checkpoint) = self.mesh.locate(current_time, self.config.tolerance) else {
            self.stats.no_checkpoint += 1;
            return TickOutcome::NoCheckpoint;
        };

        let score = self.scorer.score(user, &checkpoint.landmarks);
        let feedback = self.classifier.classify(score);
        let checkpoint_time = checkpoint.time;

        if feedback.points == 0 {
            self.stats.missed += 1;
            return TickOutcome::Missed {
                score,
                feedback,
                checkpoint_time,
            };
        }

        self.last_scored_time = current_time;
        self.stats.scored += 1;
        self.stats.total_points += u64::from(feedback.points);
        debug!(
            "{} (+{}) score {:.1} at {:.2}s (checkpoint {:.2}s)",
            feedback.label, feedback.points, score, current_time, checkpoint_time
        );

        TickOutcome::Scored(ScoreEvent {
            points: feedback.points,
            label: feedback.label,
            score,
            checkpoint_time,
            playback_time: current_time,
        })
    }

    // None while idle
    pub fn begin_request(&self) -> Option<RequestToken> {
        self.is_active().then_some(RequestToken {
            generation: self.generation,
        })
    }

    // Inactive or Stale when the request no longer belongs to this run
    fn check_token(&mut self, token: RequestToken) -> Option<TickOutcome> {
        if !self.is_active() {
            return Some(TickOutcome::Inactive);
        }
        if token.generation != self.generation {
            self.stats.stale += 1;
            return Some(TickOutcome::Stale);
        }
        None
    }

    /// Finish a request started with [`begin_request`](Self::begin_request).
    /// Results from an earlier generation are discarded without scoring.
    pub fn complete(
        &mut self,
        token: RequestToken,
        user: Option<&LandmarkSet>,
        current_time: f64,
    ) -> TickOutcome {
        if let Some(outcome) = self.check_token(token) {
            return outcome;
        }
        match user {
            Some(set) => self.tick(set, current_time),
            None => {
                self.stats.no_pose += 1;
                TickOutcome::NoPose
            }
        }
    }

    pub fn fail(&mut self, token: RequestToken, error: BackendError) -> TickOutcome {
        if let Some(outcome) = self.check_token(token) {
            return outcome;
        }
        self.stats.backend_failures += 1;
        TickOutcome::BackendFailed(error)
    }
}

// Every read-decide-update sequence runs under one lock acquisition
pub type SharedSession = Arc<Mutex<SessionController>>;

pub fn shared(controller: SessionController) -> SharedSession {
    Arc::new(Mutex::new(controller))
}

pub fn lock_session(session: &SharedSession) -> PoseMatchResult<MutexGuard<'_, SessionController>> {
    session
        .lock()
        .map_err(|e| PoseMatchError::Session(e.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Scored(ScoreEvent),
    BackendFailed { backend: String, error: BackendError },
}

/// Feeds frames through a pose backend into a shared session, one request
/// in flight at a time. The lock is never held across the backend await.
pub struct ScoringDriver {
    session: SharedSession,
    adapter: PoseAdapter,
    events: UnboundedSender<SessionEvent>,
}

impl ScoringDriver {
    pub fn new(
        session: SharedSession,
        adapter: PoseAdapter,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            session,
            adapter,
            events,
        }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn adapter_mut(&mut self) -> &mut PoseAdapter {
        &mut self.adapter
    }

    pub async fn process_frame(&mut self, frame: &Frame) -> PoseMatchResult<TickOutcome> {
        let token = match lock_session(&self.session)?.begin_request() {
            Some(t) => t,
            None => return Ok(TickOutcome::Inactive),
        };

        let result = self.adapter.submit(frame).await;

        let mut guard = lock_session(&self.session)?;
        let outcome = match result {
            Ok(pose) => guard.complete(token, pose.as_ref(), frame.timestamp),
            Err(error) => guard.fail(token, error),
        };
        drop(guard);

        match &outcome {
            TickOutcome::Scored(event) => self.emit(SessionEvent::Scored(event.clone())),
            TickOutcome::BackendFailed(error) => {
                warn!(
                    "Pose backend '{}' failed on frame {}: {}",
                    self.adapter.backend_name(),
                    frame.sequence,
                    error
                );
                self.emit(SessionEvent::BackendFailed {
                    backend: self.adapter.backend_name().to_string(),
                    error: error.clone(),
                });
            }
            _ => {}
        }
        Ok(outcome)
    }

    fn emit(&self, event: SessionEvent) {
        // Receiver may be gone
        let _ = self.events.send(event);
    }

    pub async fn shutdown(mut self) -> PoseMatchResult<SessionStats> {
        self.adapter.release().await?;
        let stats = lock_session(&self.session)?.stats();
        Ok(stats)
    }
}
