//! Pose backend adapters.
//!
//! A backend turns an opaque camera frame into at most one [`LandmarkSet`].
//! The engine only talks to [`PoseAdapter`], which normalizes whatever the
//! concrete backend returns to the configured joint layout.

pub mod replay;
pub mod stub;

pub use self::replay::ReplayBackend;
pub use self::stub::StubBackend;

use crate::config::{BackendKind, BackendParams};
use crate::error::{BackendError, BackendResult, PoseMatchError, PoseMatchResult};
use crate::landmarks::LandmarkSet;
use crate::mesh::ActionMesh;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Opaque image handle. The engine never looks at `data`.
#[derive(Debug, Clone)]
pub struct Frame {
    pub sequence: u64,
    // Seconds on the reference playback clock
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
}

impl Frame {
    pub fn new(sequence: u64, timestamp: f64, width: u32, height: u32, data: Arc<[u8]>) -> Self {
        Self {
            sequence,
            timestamp,
            width,
            height,
            data,
        }
    }

    pub fn placeholder(sequence: u64, timestamp: f64) -> Self {
        Self::new(sequence, timestamp, 0, 0, Arc::from(Vec::<u8>::new()))
    }
}

#[async_trait]
pub trait PoseBackend: Send {
    fn name(&self) -> &'static str;

    fn joint_count(&self) -> usize;

    /// Detect a body in `frame`. `Ok(None)` means nobody was found.
    async fn submit(&mut self, frame: &Frame) -> BackendResult<Option<LandmarkSet>>;

    async fn release(&mut self) -> BackendResult<()>;
}

pub type ResultHandler = Box<dyn FnMut(&Frame, Option<&LandmarkSet>) + Send>;

pub struct PoseAdapter {
    backend: Box<dyn PoseBackend>,
    handlers: Vec<ResultHandler>,
    joint_count: usize,
    released: bool,
}

impl PoseAdapter {
    pub fn new(backend: Box<dyn PoseBackend>) -> Self {
        let joint_count = backend.joint_count();
        Self {
            backend,
            handlers: Vec::new(),
            joint_count,
            released: false,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn on_result<F>(&mut self, handler: F)
    where
        F: FnMut(&Frame, Option<&LandmarkSet>) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub async fn submit(&mut self, frame: &Frame) -> BackendResult<Option<LandmarkSet>> {
        if self.released {
            return Err(BackendError::Released(self.backend.name().to_string()));
        }

        let result = self.backend.submit(frame).await?;
        let result = match result {
            Some(set) if set.len() != self.joint_count => {
                warn!(
                    "Backend '{}' returned {} landmarks, expected {}. Discarding.",
                    self.backend.name(),
                    set.len(),
                    self.joint_count
                );
                None
            }
            other => other,
        };

        for handler in &mut self.handlers {
            handler(frame, result.as_ref());
        }
        Ok(result)
    }

    // Idempotent
    pub async fn release(&mut self) -> BackendResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.handlers.clear();
        debug!("Releasing pose backend '{}'", self.backend.name());
        self.backend.release().await
    }
}

/// The replay backend needs a recorded performance to play back.
pub fn create_backend(
    params: &BackendParams,
    joint_count: usize,
    tolerance: f64,
    performance: Option<ActionMesh>,
) -> PoseMatchResult<Box<dyn PoseBackend>> {
    match params.backend {
        BackendKind::Stub => Ok(Box::new(StubBackend::new(joint_count))),
        BackendKind::Replay => {
            let recording = performance.ok_or_else(|| {
                PoseMatchError::Config("the replay backend requires a recorded performance".to_string())
            })?;
            if recording.is_empty() {
                warn!("Replay backend has no recorded poses; it will never detect a body.");
            }
            let backend = ReplayBackend::new(recording, joint_count, tolerance)
                .with_jitter(params.replay_jitter, params.replay_seed);
            Ok(Box::new(backend))
        }
    }
}
