use super::{ActionMesh, Checkpoint};
use crate::error::{PoseMatchError, PoseMatchResult};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Parses a `[{time, landmarks: [{x, y, z, visibility}]}]` payload.
///
/// Checkpoints whose landmark count differs from `joint_count` are dropped.
pub fn load_mesh_from_reader<R: Read>(reader: R, joint_count: usize) -> PoseMatchResult<ActionMesh> {
    let raw: Vec<Checkpoint> = serde_json::from_reader(reader)?;
    let total = raw.len();

    let kept: Vec<Checkpoint> = raw
        .into_iter()
        .filter(|c| c.landmarks.len() == joint_count)
        .collect();

    let dropped = total - kept.len();
    if dropped > 0 {
        warn!(
            "Dropped {} of {} checkpoints with a joint count other than {}",
            dropped, total, joint_count
        );
    }

    let mesh = ActionMesh::new(kept);
    debug!("Loaded action mesh with {} checkpoints", mesh.len());
    Ok(mesh)
}

pub fn load_mesh_from_file<P: AsRef<Path>>(path: P, joint_count: usize) -> PoseMatchResult<ActionMesh> {
    let file = File::open(path.as_ref())?;
    load_mesh_from_reader(BufReader::new(file), joint_count)
}

pub fn load_mesh_from_str(s: &str, joint_count: usize) -> PoseMatchResult<ActionMesh> {
    load_mesh_from_reader(s.as_bytes(), joint_count)
}

/// A missing or malformed mesh is treated as empty, so the locator simply
/// never matches.
pub fn load_mesh_or_empty<P: AsRef<Path>>(path: P, joint_count: usize) -> ActionMesh {
    match load_mesh_from_file(path.as_ref(), joint_count) {
        Ok(mesh) => mesh,
        Err(e) => {
            warn!(
                "Action mesh '{}' unavailable ({}). Using an empty mesh.",
                path.as_ref().display(),
                e
            );
            ActionMesh::empty()
        }
    }
}

/// Resolves reference ids to `<root>/<id>.json`.
#[derive(Debug, Clone)]
pub struct MeshLibrary {
    root: PathBuf,
    joint_count: usize,
}

impl MeshLibrary {
    pub fn new<P: Into<PathBuf>>(root: P, joint_count: usize) -> Self {
        Self {
            root: root.into(),
            joint_count,
        }
    }

    pub fn path_for(&self, id: &str) -> PoseMatchResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PoseMatchError::Validation(format!(
                "invalid reference id '{}'",
                id
            )));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    pub fn load(&self, id: &str) -> ActionMesh {
        match self.path_for(id) {
            Ok(path) => load_mesh_or_empty(path, self.joint_count),
            Err(e) => {
                warn!("{}", e);
                ActionMesh::empty()
            }
        }
    }
}
