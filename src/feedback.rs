use crate::error::{PoseMatchError, PoseMatchResult};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum FeedbackLabel {
    Perfect,
    Great,
    Good,
    Almost,
    Encourage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackTier {
    pub min_score: f32,
    pub label: FeedbackLabel,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub label: FeedbackLabel,
    pub points: u32,
}

/// Maps a similarity score onto descending (label, points) tiers.
///
/// Scores below every tier fall through to `Encourage` with 0 points.
#[derive(Debug, Clone)]
pub struct FeedbackClassifier {
    tiers: Vec<FeedbackTier>,
}

impl FeedbackClassifier {
    pub const FLOOR: Feedback = Feedback {
        label: FeedbackLabel::Encourage,
        points: 0,
    };

    /// Tiers must be strictly descending in `min_score` and non-increasing
    /// in `points`, otherwise a higher score could pay less.
    pub fn new(tiers: Vec<FeedbackTier>) -> PoseMatchResult<Self> {
        for t in &tiers {
            if !t.min_score.is_finite() {
                return Err(PoseMatchError::Config(format!(
                    "tier {} has a non-finite threshold",
                    t.label
                )));
            }
        }
        for pair in tiers.windows(2) {
            let (hi, lo) = (&pair[0], &pair[1]);
            if lo.min_score >= hi.min_score {
                return Err(PoseMatchError::Config(format!(
                    "tier thresholds must be strictly descending ({} {} then {} {})",
                    hi.label, hi.min_score, lo.label, lo.min_score
                )));
            }
            if lo.points > hi.points {
                return Err(PoseMatchError::Config(format!(
                    "tier {} pays more than higher tier {}",
                    lo.label, hi.label
                )));
            }
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[FeedbackTier] {
        &self.tiers
    }

    pub fn classify(&self, score: f32) -> Feedback {
        if !score.is_finite() {
            return Self::FLOOR;
        }
        self.tiers
            .iter()
            .find(|t| score >= t.min_score)
            .map(|t| Feedback {
                label: t.label,
                points: t.points,
            })
            .unwrap_or(Self::FLOOR)
    }
}

impl Default for FeedbackClassifier {
    fn default() -> Self {
        let tier = |min_score, label, points| FeedbackTier {
            min_score,
            label,
            points,
        };
        Self {
            tiers: vec![
                tier(95.0, FeedbackLabel::Perfect, 100),
                tier(85.0, FeedbackLabel::Great, 60),
                tier(70.0, FeedbackLabel::Good, 30),
                tier(50.0, FeedbackLabel::Almost, 10),
            ],
        }
    }
}
