use crate::landmarks::Joint;
use serde::{Deserialize, Serialize};

/// An angle measured at `joint` between the segments to two neighbouring joints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleDefinition {
    pub joint: usize,
    pub parent_a: usize,
    pub parent_b: usize,
    pub weight: f32,
}

impl AngleDefinition {
    pub fn new(joint: Joint, parent_a: Joint, parent_b: Joint, weight: f32) -> Self {
        Self {
            joint: joint.index(),
            parent_a: parent_a.index(),
            parent_b: parent_b.index(),
            weight,
        }
    }

    #[inline(always)]
    pub fn indices(&self) -> [usize; 3] {
        [self.joint, self.parent_a, self.parent_b]
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    // Top-line
    pub final_score: f32,
    pub positional_similarity: f32,
    pub angular_similarity: f32,

    // Raw averages (0.0 when the term had no input)
    pub avg_distance: f32,
    pub avg_angle_diff: f32,

    // Coverage
    pub visible_joints: usize,
    pub compared_angles: usize,

    pub shape_mismatch: bool,
}

impl ScoreDetails {
    pub fn mismatch() -> Self {
        Self {
            shape_mismatch: true,
            ..Default::default()
        }
    }
}
