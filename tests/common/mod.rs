#![allow(dead_code)] // Not every test binary uses every helper

use posematch::landmarks::{Joint, Landmark, LandmarkSet, POSE_JOINT_COUNT};
use posematch::mesh::{ActionMesh, Checkpoint};

/// Builder for a 33-joint pose, starting from a neutral standing figure.
pub struct PoseBuilder {
    landmarks: Vec<Landmark>,
}

impl PoseBuilder {
    pub fn standing() -> Self {
        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0, 1.0); POSE_JOINT_COUNT];
        let mut put = |j: Joint, x: f32, y: f32| {
            landmarks[j.index()] = Landmark::new(x, y, 0.0, 1.0);
        };
        put(Joint::Nose, 0.50, 0.10);
        put(Joint::LeftShoulder, 0.60, 0.25);
        put(Joint::RightShoulder, 0.40, 0.25);
        put(Joint::LeftElbow, 0.65, 0.40);
        put(Joint::RightElbow, 0.35, 0.40);
        put(Joint::LeftWrist, 0.67, 0.55);
        put(Joint::RightWrist, 0.33, 0.55);
        put(Joint::LeftHip, 0.57, 0.55);
        put(Joint::RightHip, 0.43, 0.55);
        put(Joint::LeftKnee, 0.58, 0.72);
        put(Joint::RightKnee, 0.42, 0.72);
        put(Joint::LeftAnkle, 0.58, 0.90);
        put(Joint::RightAnkle, 0.42, 0.90);
        Self { landmarks }
    }

    /// Every joint hidden; use `joint` to reveal the ones a test needs.
    pub fn hidden() -> Self {
        Self {
            landmarks: vec![Landmark::new(0.5, 0.5, 0.0, 0.0); POSE_JOINT_COUNT],
        }
    }

    pub fn joint(mut self, j: Joint, x: f32, y: f32) -> Self {
        self.landmarks[j.index()] = Landmark::new(x, y, 0.0, 1.0);
        self
    }

    pub fn visibility(mut self, j: Joint, v: f32) -> Self {
        self.landmarks[j.index()].visibility = v;
        self
    }

    pub fn all_visibility(mut self, v: f32) -> Self {
        for l in &mut self.landmarks {
            l.visibility = v;
        }
        self
    }

    /// Shift every joint by (dx, dy).
    pub fn shift(mut self, dx: f32, dy: f32) -> Self {
        for l in &mut self.landmarks {
            l.x += dx;
            l.y += dy;
        }
        self
    }

    pub fn build(self) -> LandmarkSet {
        LandmarkSet::new(self.landmarks)
    }
}

pub fn standing() -> LandmarkSet {
    PoseBuilder::standing().build()
}

/// Standing figure with the left forearm raised horizontally (90° elbow).
pub fn left_arm_raised() -> LandmarkSet {
    PoseBuilder::standing()
        .joint(Joint::LeftElbow, 0.60, 0.40)
        .joint(Joint::LeftWrist, 0.75, 0.40)
        .build()
}

pub fn mesh_at(times: &[f64]) -> ActionMesh {
    ActionMesh::new(
        times
            .iter()
            .map(|&time| Checkpoint {
                time,
                landmarks: standing(),
            })
            .collect(),
    )
}

pub fn mesh_json(times: &[f64]) -> String {
    serde_json::to_string(&mesh_at(times)).unwrap()
}
