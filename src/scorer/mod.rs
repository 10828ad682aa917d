pub mod angular;
pub mod positional;
pub mod types;

pub use self::types::{AngleDefinition, ScoreDetails};
use crate::config::ScoringWeights;
use crate::landmarks::{Joint, LandmarkSet};

/// Compares a user pose against a reference pose.
///
/// Scoring is a pure function of the two sets and the weights this scorer was
/// built with. Bad input never panics; it scores 0.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub weights: ScoringWeights,
    pub angles: Vec<AngleDefinition>,

    // Share of the angular term, weight_angle / (weight_angle + weight_position)
    blend_angle: f32,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        let angles = default_angles(&weights);
        Self::with_angles(weights, angles)
    }

    pub fn with_angles(weights: ScoringWeights, angles: Vec<AngleDefinition>) -> Self {
        let sum = weights.weight_angle + weights.weight_position;
        let blend_angle = if sum > 0.0 && sum.is_finite() {
            weights.weight_angle / sum
        } else {
            0.6
        };
        Self {
            weights,
            angles,
            blend_angle,
        }
    }

    pub fn score(&self, user: &LandmarkSet, target: &LandmarkSet) -> f32 {
        self.score_details(user, target).final_score
    }

    pub fn score_details(&self, user: &LandmarkSet, target: &LandmarkSet) -> ScoreDetails {
        if !user.is_compatible(target) {
            return ScoreDetails::mismatch();
        }

        let w = &self.weights;
        let pos = positional::positional_similarity(
            user,
            target,
            w.visibility_threshold,
            w.position_distance_max,
        );
        let Some(ang) = angular::angular_similarity(
            user,
            target,
            &self.angles,
            w.visibility_threshold,
            w.angle_diff_max,
        ) else {
            return ScoreDetails::mismatch();
        };

        // Interpolated form, so equal terms blend to exactly that value
        let blended = pos.similarity + (ang.similarity - pos.similarity) * self.blend_angle;

        ScoreDetails {
            final_score: blended.clamp(0.0, 100.0),
            positional_similarity: pos.similarity,
            angular_similarity: ang.similarity,
            avg_distance: pos.avg_distance,
            avg_angle_diff: ang.avg_angle_diff,
            visible_joints: pos.visible_joints,
            compared_angles: ang.compared_angles,
            shape_mismatch: false,
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

/// Elbows, knees, shoulders and hips: the joints that say most about gross pose.
pub fn default_angles(w: &ScoringWeights) -> Vec<AngleDefinition> {
    use Joint::*;
    vec![
        AngleDefinition::new(LeftElbow, LeftShoulder, LeftWrist, w.weight_elbow),
        AngleDefinition::new(RightElbow, RightShoulder, RightWrist, w.weight_elbow),
        AngleDefinition::new(LeftKnee, LeftHip, LeftAnkle, w.weight_knee),
        AngleDefinition::new(RightKnee, RightHip, RightAnkle, w.weight_knee),
        AngleDefinition::new(LeftShoulder, LeftElbow, LeftHip, w.weight_shoulder),
        AngleDefinition::new(RightShoulder, RightElbow, RightHip, w.weight_shoulder),
        AngleDefinition::new(LeftHip, LeftShoulder, LeftKnee, w.weight_hip),
        AngleDefinition::new(RightHip, RightShoulder, RightKnee, w.weight_hip),
    ]
}
