use super::positional::linear_similarity;
use super::types::AngleDefinition;
use crate::geometry::joint_angle;
use crate::landmarks::LandmarkSet;

pub struct AngularTerm {
    pub similarity: f32,
    pub avg_angle_diff: f32,
    pub compared_angles: usize,
}

/// Weighted mean of |user angle - target angle| over the angle set.
///
/// An angle is skipped when any of its three joints is below the visibility
/// threshold in either set. Returns None if a definition indexes past the end
/// of the sets.
pub fn angular_similarity(
    user: &LandmarkSet,
    target: &LandmarkSet,
    angles: &[AngleDefinition],
    visibility_threshold: f32,
    angle_max: f32,
) -> Option<AngularTerm> {
    let mut weighted_diff = 0.0;
    let mut total_weight = 0.0;
    let mut compared = 0usize;

    for def in angles {
        let mut usable = true;
        for idx in def.indices() {
            let u = user.at(idx)?;
            let t = target.at(idx)?;
            if !u.is_visible(visibility_threshold) || !t.is_visible(visibility_threshold) {
                usable = false;
            }
        }
        if !usable || def.weight <= 0.0 {
            continue;
        }

        let ua = joint_angle(user, def.joint, def.parent_a, def.parent_b)?;
        let ta = joint_angle(target, def.joint, def.parent_a, def.parent_b)?;

        weighted_diff += (ua - ta).abs() * def.weight;
        total_weight += def.weight;
        compared += 1;
    }

    if compared == 0 {
        return Some(AngularTerm {
            similarity: 0.0,
            avg_angle_diff: 0.0,
            compared_angles: 0,
        });
    }

    let avg = weighted_diff / total_weight;
    Some(AngularTerm {
        similarity: linear_similarity(avg, angle_max),
        avg_angle_diff: avg,
        compared_angles: compared,
    })
}
