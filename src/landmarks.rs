use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Number of joints produced by a full-body pose backend (MediaPipe layout).
pub const POSE_JOINT_COUNT: usize = 33;

/// Stable anatomical joint indices shared by backends and action meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[repr(usize)]
pub enum Joint {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Joint {
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

fn default_visibility() -> f32 {
    1.0
}

/// A single detected keypoint. x/y are normalized to 0..1, z is backend-scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default = "default_visibility")]
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    #[inline(always)]
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility >= threshold
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            visibility: 0.0,
        }
    }
}

/// Full-body pose for one frame, addressed by joint index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet(Vec<Landmark>);

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self(landmarks)
    }

    /// `count` copies of the same landmark. Mostly useful for fixtures.
    pub fn filled(count: usize, landmark: Landmark) -> Self {
        Self(vec![landmark; count])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, joint: Joint) -> Option<&Landmark> {
        self.0.get(joint.index())
    }

    pub fn at(&self, index: usize) -> Option<&Landmark> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.0
    }

    /// Sets can only be compared when they share the same non-empty joint layout.
    pub fn is_compatible(&self, other: &LandmarkSet) -> bool {
        !self.0.is_empty() && self.0.len() == other.0.len()
    }

    pub fn visible_count(&self, threshold: f32) -> usize {
        self.0.iter().filter(|l| l.is_visible(threshold)).count()
    }

    /// Copy with every landmark passed through `f`.
    pub fn map(&self, mut f: impl FnMut(usize, &Landmark) -> Landmark) -> Self {
        Self(self.0.iter().enumerate().map(|(i, l)| f(i, l)).collect())
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(v: Vec<Landmark>) -> Self {
        Self(v)
    }
}

impl<'a> IntoIterator for &'a LandmarkSet {
    type Item = &'a Landmark;
    type IntoIter = std::slice::Iter<'a, Landmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
