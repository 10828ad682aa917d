use crate::reports;
use clap::Args;
use posematch::backend::{create_backend, Frame, PoseAdapter};
use posematch::config::{BackendKind, Config};
use posematch::error::{PoseMatchError, PoseMatchResult};
use posematch::feedback::FeedbackClassifier;
use posematch::mesh::{load_mesh_from_file, load_mesh_or_empty};
use posematch::scorer::Scorer;
use posematch::session::{
    lock_session, shared, ScoringDriver, SessionController, SessionEvent, SessionStats,
};
use posematch::timeline::{analyze_timeline, write_timeline_csv};
use std::fs::File;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub config: Config,

    /// Reference action mesh JSON.
    #[arg(short, long)]
    pub mesh: String,

    /// Recorded user performance, same format as the mesh.
    #[arg(short, long)]
    pub performance: String,

    /// Simulated camera frame rate.
    #[arg(long, default_value_t = 30.0)]
    pub fps: f64,

    /// Write a per-frame score timeline to this CSV file.
    #[arg(long)]
    pub csv: Option<String>,
}

pub fn run(args: ReplayArgs, config: &Config) -> PoseMatchResult<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        return Err(PoseMatchError::Validation(format!(
            "--fps must be positive, got {}",
            args.fps
        )));
    }

    let joint_count = config.session.joint_count;
    let tolerance = config.session.checkpoint_tolerance;

    let reference = load_mesh_or_empty(&args.mesh, joint_count);
    let performance = load_mesh_from_file(&args.performance, joint_count)?;
    info!(
        "Reference: {} checkpoints, performance: {} frames",
        reference.len(),
        performance.len()
    );

    if config.backend.backend == BackendKind::Stub {
        warn!("⚠️  Stub backend selected (use --backend replay); no poses will be detected.");
    }

    // Offline timeline (parallel, no rate limiting)
    if let Some(path) = &args.csv {
        let scorer = Scorer::new(config.scoring.clone());
        let classifier = FeedbackClassifier::new(config.feedback.get_tiers()?)?;
        let entries = analyze_timeline(&reference, &performance, &scorer, &classifier, tolerance);
        write_timeline_csv(File::create(path)?, &entries)?;
        info!("📝 Wrote {} timeline rows to {}", entries.len(), path);
    }

    let start = performance.first_time().unwrap_or(0.0);
    let end = performance.last_time().unwrap_or(0.0);

    let session = shared(SessionController::from_config(config, reference)?);
    let backend = create_backend(&config.backend, joint_count, tolerance, Some(performance))?;
    let adapter = PoseAdapter::new(backend);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let stats = runtime.block_on(drive(
        ScoringDriver::new(session, adapter, tx),
        start,
        end,
        1.0 / args.fps,
    ))?;

    let mut events = Vec::new();
    let mut failures = 0usize;
    while let Ok(event) = rx.try_recv() {
        match event {
            SessionEvent::Scored(e) => events.push(e),
            SessionEvent::BackendFailed { .. } => failures += 1,
        }
    }
    if failures > 0 {
        warn!("⚠️  {} backend failures during replay", failures);
    }

    println!("\n🎯 === REPLAY RESULTS === 🎯");
    reports::print_events(&events);
    reports::print_session_stats(&stats);
    Ok(())
}

async fn drive(
    mut driver: ScoringDriver,
    start: f64,
    end: f64,
    step: f64,
) -> PoseMatchResult<SessionStats> {
    lock_session(driver.session())?.start();

    let mut sequence = 0u64;
    loop {
        let t = start + sequence as f64 * step;
        if t > end + f64::EPSILON {
            break;
        }
        driver.process_frame(&Frame::placeholder(sequence, t)).await?;
        sequence += 1;
    }

    lock_session(driver.session())?.stop();
    info!("Replayed {} frames", sequence);
    driver.shutdown().await
}
