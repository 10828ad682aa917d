use super::{Frame, PoseBackend};
use crate::error::{BackendError, BackendResult};
use crate::landmarks::{Landmark, LandmarkSet};
use crate::mesh::ActionMesh;
use async_trait::async_trait;
use std::time::Duration;

/// Plays back a recorded performance as if it were live detection.
///
/// For a frame at playback time `t` it yields the recorded pose closest to
/// `t` (within `tolerance`), optionally with uniform x/y noise.
pub struct ReplayBackend {
    recording: ActionMesh,
    joint_count: usize,
    tolerance: f64,
    jitter: f32,
    rng: fastrand::Rng,
    latency: Option<Duration>,
    released: bool,
}

impl ReplayBackend {
    pub fn new(recording: ActionMesh, joint_count: usize, tolerance: f64) -> Self {
        Self {
            recording,
            joint_count,
            tolerance,
            jitter: 0.0,
            rng: fastrand::Rng::new(),
            latency: None,
            released: false,
        }
    }

    pub fn with_jitter(mut self, jitter: f32, seed: Option<u64>) -> Self {
        self.jitter = jitter.max(0.0);
        self.rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        self
    }

    /// Simulated inference time per frame.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn recording_len(&self) -> usize {
        self.recording.len()
    }

    fn perturb(&mut self, set: &LandmarkSet) -> LandmarkSet {
        if self.jitter == 0.0 {
            return set.clone();
        }
        let j = self.jitter;
        let rng = &mut self.rng;
        set.map(|_, l| {
            let dx = (rng.f32() * 2.0 - 1.0) * j;
            let dy = (rng.f32() * 2.0 - 1.0) * j;
            Landmark::new(l.x + dx, l.y + dy, l.z, l.visibility)
        })
    }
}

#[async_trait]
impl PoseBackend for ReplayBackend {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn joint_count(&self) -> usize {
        self.joint_count
    }

    async fn submit(&mut self, frame: &Frame) -> BackendResult<Option<LandmarkSet>> {
        if self.released {
            return Err(BackendError::Released(self.name().to_string()));
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let recorded = self
            .recording
            .locate(frame.timestamp, self.tolerance)
            .map(|c| c.landmarks.clone());

        Ok(recorded.map(|set| self.perturb(&set)))
    }

    async fn release(&mut self) -> BackendResult<()> {
        self.released = true;
        Ok(())
    }
}
