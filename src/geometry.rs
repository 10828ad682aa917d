use crate::landmarks::{Landmark, LandmarkSet};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline(always)]
    pub fn dot(&self, other: &Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline(always)]
    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl From<&Landmark> for Vec3 {
    fn from(l: &Landmark) -> Self {
        Self::new(l.x, l.y, l.z)
    }
}

/// Displacement from `a` to `b`.
#[inline(always)]
pub fn vector_between(a: &Landmark, b: &Landmark) -> Vec3 {
    Vec3::new(b.x - a.x, b.y - a.y, b.z - a.z)
}

/// Angle in degrees between two vectors.
///
/// Returns 0.0 when either vector has zero length: a degenerate vector carries
/// no angular information.
pub fn angle_between_vectors(v1: &Vec3, v2: &Vec3) -> f32 {
    let m1 = v1.magnitude();
    let m2 = v2.magnitude();
    if m1 == 0.0 || m2 == 0.0 {
        return 0.0;
    }
    let cos = (v1.dot(v2) / (m1 * m2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

#[inline(always)]
pub fn euclidean_distance(a: &Landmark, b: &Landmark) -> f32 {
    vector_between(a, b).magnitude()
}

/// Angle at `joint` formed by the vectors towards `parent_a` and `parent_b`.
/// None if any index is out of range.
pub fn joint_angle(
    set: &LandmarkSet,
    joint: usize,
    parent_a: usize,
    parent_b: usize,
) -> Option<f32> {
    let j = set.at(joint)?;
    let a = set.at(parent_a)?;
    let b = set.at(parent_b)?;
    Some(angle_between_vectors(
        &vector_between(j, a),
        &vector_between(j, b),
    ))
}
