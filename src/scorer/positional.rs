use crate::geometry::euclidean_distance;
use crate::landmarks::LandmarkSet;

pub struct PositionalTerm {
    pub similarity: f32,
    pub avg_distance: f32,
    pub visible_joints: usize,
}

/// Average 3D distance over joints visible in both sets, mapped linearly so
/// that 0 distance is 100 and `distance_max` or more is 0.
///
/// Callers guarantee equal lengths.
pub fn positional_similarity(
    user: &LandmarkSet,
    target: &LandmarkSet,
    visibility_threshold: f32,
    distance_max: f32,
) -> PositionalTerm {
    let mut total = 0.0;
    let mut count = 0usize;

    for (u, t) in user.iter().zip(target.iter()) {
        if u.is_visible(visibility_threshold) && t.is_visible(visibility_threshold) {
            total += euclidean_distance(u, t);
            count += 1;
        }
    }

    if count == 0 {
        return PositionalTerm {
            similarity: 0.0,
            avg_distance: 0.0,
            visible_joints: 0,
        };
    }

    let avg = total / count as f32;
    PositionalTerm {
        similarity: linear_similarity(avg, distance_max),
        avg_distance: avg,
        visible_joints: count,
    }
}

/// `clamp(0, 100, (1 - value / max) * 100)`; NaN input maps to 0.
#[inline(always)]
pub fn linear_similarity(value: f32, max: f32) -> f32 {
    let s = (1.0 - value / max) * 100.0;
    if s.is_nan() {
        return 0.0;
    }
    s.clamp(0.0, 100.0)
}
