//! Offline analysis of a recorded user performance against a reference mesh.

use crate::error::PoseMatchResult;
use crate::feedback::{FeedbackClassifier, FeedbackLabel};
use crate::mesh::ActionMesh;
use crate::scorer::Scorer;
use crate::session::{SessionController, TickOutcome};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub user_time: f64,
    pub checkpoint_time: Option<f64>,
    pub score: Option<f32>,
    pub label: Option<FeedbackLabel>,
    pub points: u32,
}

/// Score every recorded frame against its nearest checkpoint, ignoring rate
/// limiting. Frames without a checkpoint in tolerance get an empty entry.
pub fn analyze_timeline(
    reference: &ActionMesh,
    performance: &ActionMesh,
    scorer: &Scorer,
    classifier: &FeedbackClassifier,
    tolerance: f64,
) -> Vec<TimelineEntry> {
    performance
        .checkpoints()
        .par_iter()
        .map(|frame| match reference.locate(frame.time, tolerance) {
            Some(cp) => {
                let score = scorer.score(&frame.landmarks, &cp.landmarks);
                let fb = classifier.classify(score);
                TimelineEntry {
                    user_time: frame.time,
                    checkpoint_time: Some(cp.time),
                    score: Some(score),
                    label: Some(fb.label),
                    points: fb.points,
                }
            }
            None => TimelineEntry {
                user_time: frame.time,
                checkpoint_time: None,
                score: None,
                label: None,
                points: 0,
            },
        })
        .collect()
}

/// Replay the recorded frames through a live session, in order, so rate
/// limiting applies exactly as it would during play.
pub fn simulate_session(
    session: &mut SessionController,
    performance: &ActionMesh,
) -> Vec<TickOutcome> {
    if !session.is_active() {
        session.start();
    }
    performance
        .checkpoints()
        .iter()
        .map(|frame| session.tick(&frame.landmarks, frame.time))
        .collect()
}

#[derive(Serialize)]
struct CsvRow {
    user_time: f64,
    checkpoint_time: String,
    score: String,
    label: String,
    points: u32,
}

pub fn write_timeline_csv<W: Write>(writer: W, entries: &[TimelineEntry]) -> PoseMatchResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for e in entries {
        wtr.serialize(CsvRow {
            user_time: e.user_time,
            checkpoint_time: e.checkpoint_time.map(|t| format!("{:.3}", t)).unwrap_or_default(),
            score: e.score.map(|s| format!("{:.2}", s)).unwrap_or_default(),
            label: e.label.map(|l| l.to_string()).unwrap_or_default(),
            points: e.points,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
