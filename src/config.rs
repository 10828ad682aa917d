use crate::error::{PoseMatchError, PoseMatchResult};
use crate::feedback::{FeedbackLabel, FeedbackTier};
use clap::{parser::ValueSource, ArgMatches, Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub scoring: ScoringWeights,
    #[command(flatten)]
    pub feedback: FeedbackParams,
    #[command(flatten)]
    pub session: SessionParams,
    #[command(flatten)]
    pub backend: BackendParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    // === FILTER ===
    #[arg(long, default_value_t = 0.5)]
    pub visibility_threshold: f32,

    // === THRESHOLDS ===
    // Average joint distance (normalized units) at which positional similarity hits 0
    #[arg(long, default_value_t = 0.15)]
    pub position_distance_max: f32,
    // Average weighted angle difference (degrees) at which angular similarity hits 0
    #[arg(long, default_value_t = 30.0)]
    pub angle_diff_max: f32,

    // === BLEND ===
    #[arg(long, default_value_t = 0.6)]
    pub weight_angle: f32,
    #[arg(long, default_value_t = 0.4)]
    pub weight_position: f32,

    // === ANGLE WEIGHTS ===
    #[arg(long, default_value_t = 2.5)]
    pub weight_elbow: f32,
    #[arg(long, default_value_t = 2.5)]
    pub weight_knee: f32,
    #[arg(long, default_value_t = 2.0)]
    pub weight_shoulder: f32,
    #[arg(long, default_value_t = 2.0)]
    pub weight_hip: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.5,
            position_distance_max: 0.15,
            angle_diff_max: 30.0,
            weight_angle: 0.6,
            weight_position: 0.4,
            weight_elbow: 2.5,
            weight_knee: 2.5,
            weight_shoulder: 2.0,
            weight_hip: 2.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackParams {
    /// Comma separated `min_score:label:points` tiers, highest first.
    #[arg(long, default_value = "95:perfect:100,85:great:60,70:good:30,50:almost:10")]
    pub feedback_tiers: String,
}

impl Default for FeedbackParams {
    fn default() -> Self {
        Self {
            feedback_tiers: "95:perfect:100,85:great:60,70:good:30,50:almost:10".to_string(),
        }
    }
}

impl FeedbackParams {
    pub fn get_tiers(&self) -> PoseMatchResult<Vec<FeedbackTier>> {
        parse_tiers(&self.feedback_tiers)
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionParams {
    /// Max seconds between playback time and a checkpoint for it to count.
    #[arg(long, default_value_t = 0.3)]
    pub checkpoint_tolerance: f64,
    /// Min seconds between two emitted scores.
    #[arg(long, default_value_t = 0.4)]
    pub min_score_interval: f64,
    #[arg(long, default_value_t = crate::landmarks::POSE_JOINT_COUNT)]
    pub joint_count: usize,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            checkpoint_tolerance: 0.3,
            min_score_interval: 0.4,
            joint_count: crate::landmarks::POSE_JOINT_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Stub,
    Replay,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BackendParams {
    #[arg(long, value_enum, default_value_t = BackendKind::Stub)]
    pub backend: BackendKind,
    /// Uniform x/y noise added to replayed landmarks.
    #[arg(long, default_value_t = 0.0)]
    pub replay_jitter: f32,
    #[arg(long)]
    pub replay_seed: Option<u64>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PoseMatchResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PoseMatchResult<()> {
        let w = &self.scoring;
        if !(0.0..=1.0).contains(&w.visibility_threshold) {
            return Err(PoseMatchError::Config(format!(
                "visibility_threshold must be within [0, 1], got {}",
                w.visibility_threshold
            )));
        }
        if w.position_distance_max <= 0.0 || w.angle_diff_max <= 0.0 {
            return Err(PoseMatchError::Config(
                "position_distance_max and angle_diff_max must be positive".to_string(),
            ));
        }
        let weights = [
            w.weight_angle,
            w.weight_position,
            w.weight_elbow,
            w.weight_knee,
            w.weight_shoulder,
            w.weight_hip,
        ];
        if weights.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PoseMatchError::Config(
                "scoring weights must be finite and non-negative".to_string(),
            ));
        }
        if w.weight_angle + w.weight_position <= 0.0 {
            return Err(PoseMatchError::Config(
                "weight_angle + weight_position must be positive".to_string(),
            ));
        }

        let s = &self.session;
        if s.checkpoint_tolerance < 0.0 || s.min_score_interval < 0.0 {
            return Err(PoseMatchError::Config(
                "checkpoint_tolerance and min_score_interval must be non-negative".to_string(),
            ));
        }
        if s.joint_count == 0 {
            return Err(PoseMatchError::Config("joint_count must be > 0".to_string()));
        }

        if self.backend.replay_jitter < 0.0 {
            return Err(PoseMatchError::Config(
                "replay_jitter must be non-negative".to_string(),
            ));
        }

        self.feedback.get_tiers().map(|_| ())
    }

    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(scoring, visibility_threshold);
        update_if_present!(scoring, position_distance_max);
        update_if_present!(scoring, angle_diff_max);
        update_if_present!(scoring, weight_angle);
        update_if_present!(scoring, weight_position);
        update_if_present!(scoring, weight_elbow);
        update_if_present!(scoring, weight_knee);
        update_if_present!(scoring, weight_shoulder);
        update_if_present!(scoring, weight_hip);

        update_if_present!(feedback, feedback_tiers);

        update_if_present!(session, checkpoint_tolerance);
        update_if_present!(session, min_score_interval);
        update_if_present!(session, joint_count);

        update_if_present!(backend, backend);
        update_if_present!(backend, replay_jitter);
        update_if_present!(backend, replay_seed);
    }
}

fn parse_tiers(s: &str) -> PoseMatchResult<Vec<FeedbackTier>> {
    let mut tiers = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let fields: Vec<&str> = part.split(':').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(PoseMatchError::Config(format!(
                "feedback tier '{}' must look like min_score:label:points",
                part
            )));
        }
        let min_score: f32 = fields[0].parse().map_err(|_| {
            PoseMatchError::Config(format!("invalid min_score in tier '{}'", part))
        })?;
        let label = FeedbackLabel::from_str(fields[1]).map_err(|_| {
            PoseMatchError::Config(format!("unknown feedback label '{}'", fields[1]))
        })?;
        let points: u32 = fields[2].parse().map_err(|_| {
            PoseMatchError::Config(format!("invalid points in tier '{}'", part))
        })?;
        tiers.push(FeedbackTier {
            min_score,
            label,
            points,
        });
    }
    Ok(tiers)
}
