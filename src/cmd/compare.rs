use crate::reports;
use clap::Args;
use posematch::config::Config;
use posematch::error::{PoseMatchError, PoseMatchResult};
use posematch::feedback::FeedbackClassifier;
use posematch::landmarks::LandmarkSet;
use posematch::scorer::Scorer;
use std::fs;

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub config: Config,

    /// Landmark set JSON (array of {x, y, z, visibility}) for the user.
    #[arg(short, long)]
    pub user: String,

    /// Landmark set JSON for the reference pose.
    #[arg(short, long)]
    pub target: String,
}

fn load_set(path: &str) -> PoseMatchResult<LandmarkSet> {
    let content = fs::read_to_string(path)?;
    let set: LandmarkSet = serde_json::from_str(&content)?;
    if set.is_empty() {
        return Err(PoseMatchError::Validation(format!(
            "'{}' contains no landmarks",
            path
        )));
    }
    Ok(set)
}

pub fn run(args: CompareArgs, config: &Config) -> PoseMatchResult<()> {
    let user = load_set(&args.user)?;
    let target = load_set(&args.target)?;

    let scorer = Scorer::new(config.scoring.clone());
    let classifier = FeedbackClassifier::new(config.feedback.get_tiers()?)?;

    let details = scorer.score_details(&user, &target);
    let feedback = classifier.classify(details.final_score);

    println!("\n🔎 === POSE COMPARISON === 🔎");
    reports::print_score_details(&details, &feedback);
    Ok(())
}
