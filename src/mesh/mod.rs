pub mod loader;
pub mod locator;

pub use self::loader::{
    load_mesh_from_file, load_mesh_from_reader, load_mesh_from_str, load_mesh_or_empty, MeshLibrary,
};
pub use self::locator::{locate, locate_linear};

use crate::landmarks::LandmarkSet;
use serde::{Deserialize, Serialize};

/// The reference pose expected at one playback instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub time: f64,
    pub landmarks: LandmarkSet,
}

/// A reference performance: checkpoints sorted by ascending time.
///
/// Spacing is not assumed to be uniform. Once built the mesh is read-only.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ActionMesh {
    checkpoints: Vec<Checkpoint>,
}

impl ActionMesh {
    /// Drops checkpoints with a non-finite time, then sorts (stable).
    pub fn new(mut checkpoints: Vec<Checkpoint>) -> Self {
        checkpoints.retain(|c| c.time.is_finite());
        checkpoints.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { checkpoints }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn first_time(&self) -> Option<f64> {
        self.checkpoints.first().map(|c| c.time)
    }

    pub fn last_time(&self) -> Option<f64> {
        self.checkpoints.last().map(|c| c.time)
    }

    /// Joint count of the first checkpoint, if any.
    pub fn joint_count(&self) -> Option<usize> {
        self.checkpoints.first().map(|c| c.landmarks.len())
    }

    pub fn locate(&self, time: f64, tolerance: f64) -> Option<&Checkpoint> {
        locator::locate(self, time, tolerance)
    }
}

impl<'de> Deserialize<'de> for ActionMesh {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let checkpoints = Vec::<Checkpoint>::deserialize(deserializer)?;
        Ok(Self::new(checkpoints))
    }
}
