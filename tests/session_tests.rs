use posematch::config::Config;
use posematch::feedback::{FeedbackClassifier, FeedbackLabel};
use posematch::landmarks::LandmarkSet;
use posematch::error::BackendError;
use posematch::mesh::{ActionMesh, Checkpoint};
use posematch::scorer::Scorer;
use posematch::session::{
    lock_session, shared, SessionConfig, SessionController, SessionState, TickOutcome,
};
use std::thread;

mod common;
use common::{mesh_at, standing, PoseBuilder};

fn controller(mesh: ActionMesh) -> SessionController {
    SessionController::new(
        mesh,
        Scorer::default(),
        FeedbackClassifier::default(),
        SessionConfig::default(),
    )
}

fn active(mesh: ActionMesh) -> SessionController {
    let mut c = controller(mesh);
    c.start();
    c
}

fn bad_pose() -> LandmarkSet {
    PoseBuilder::standing().all_visibility(0.1).build()
}

#[test]
fn test_idle_session_never_scores() {
    let mut s = controller(mesh_at(&[1.0]));
    assert_eq!(s.state(), SessionState::Idle);
    assert_eq!(s.tick(&standing(), 1.0), TickOutcome::Inactive);
    assert!(s.begin_request().is_none());
}

#[test]
fn test_first_checkpoint_scores() {
    let mut s = active(mesh_at(&[1.0]));
    match s.tick(&standing(), 1.0) {
        TickOutcome::Scored(e) => {
            assert_eq!(e.points, 100);
            assert_eq!(e.label, FeedbackLabel::Perfect);
            assert_eq!(e.checkpoint_time, 1.0);
            assert_eq!(e.playback_time, 1.0);
        }
        other => panic!("expected a score, got {:?}", other),
    }
    assert_eq!(s.last_scored_time(), 1.0);
}

#[test]
fn test_second_tick_within_interval_is_suppressed() {
    let mut s = active(mesh_at(&[1.0]));
    assert!(matches!(s.tick(&standing(), 1.00), TickOutcome::Scored(_)));
    assert_eq!(s.tick(&standing(), 1.30), TickOutcome::Suppressed);
    assert_eq!(s.last_scored_time(), 1.0);

    let stats = s.stats();
    assert_eq!(stats.scored, 1);
    assert_eq!(stats.suppressed, 1);
    assert_eq!(stats.total_points, 100);
}

#[test]
fn test_interval_boundary_is_allowed() {
    let mut s = active(mesh_at(&[1.0, 1.5]));
    assert!(matches!(s.tick(&standing(), 1.0), TickOutcome::Scored(_)));
    // 1.5 - 1.0 == 0.5 >= 0.4
    assert!(matches!(s.tick(&standing(), 1.5), TickOutcome::Scored(_)));
}

#[test]
fn test_no_checkpoint_does_not_mutate_state() {
    let mut s = active(mesh_at(&[1.0]));
    assert_eq!(s.tick(&standing(), 5.0), TickOutcome::NoCheckpoint);
    assert_eq!(s.last_scored_time(), f64::NEG_INFINITY);
    assert!(matches!(s.tick(&standing(), 1.1), TickOutcome::Scored(_)));
}

#[test]
fn test_zero_points_allows_immediate_retry() {
    let mut s = active(mesh_at(&[1.0]));
    match s.tick(&bad_pose(), 0.9) {
        TickOutcome::Missed { score, feedback, .. } => {
            assert_eq!(score, 0.0);
            assert_eq!(feedback.points, 0);
        }
        other => panic!("expected a miss, got {:?}", other),
    }
    assert_eq!(s.last_scored_time(), f64::NEG_INFINITY);
    // Corrected posture a frame later, inside the same window
    assert!(matches!(s.tick(&standing(), 0.93), TickOutcome::Scored(_)));
}

#[test]
fn test_stop_resets_so_first_checkpoint_is_eligible_again() {
    let mut s = active(mesh_at(&[1.0]));
    assert!(matches!(s.tick(&standing(), 1.0), TickOutcome::Scored(_)));
    s.stop();
    assert_eq!(s.last_scored_time(), f64::NEG_INFINITY);
    assert_eq!(s.tick(&standing(), 1.0), TickOutcome::Inactive);
    s.start();
    assert!(matches!(s.tick(&standing(), 1.0), TickOutcome::Scored(_)));
}

#[test]
fn test_restart_resets_while_active() {
    let mut s = active(mesh_at(&[0.0, 1.0]));
    assert!(matches!(s.tick(&standing(), 1.0), TickOutcome::Scored(_)));
    s.restart();
    assert!(s.is_active());
    assert!(matches!(s.tick(&standing(), 0.0), TickOutcome::Scored(_)));
}

#[test]
fn test_empty_mesh_is_a_quiet_no_op() {
    let mut s = active(ActionMesh::empty());
    for i in 0..20 {
        assert_eq!(s.tick(&standing(), i as f64 * 0.5), TickOutcome::NoCheckpoint);
    }
}

#[test]
fn test_wrong_joint_count_is_treated_as_no_pose() {
    let mut s = active(mesh_at(&[1.0]));
    let short = LandmarkSet::new(standing().as_slice()[..10].to_vec());
    assert_eq!(s.tick(&short, 1.0), TickOutcome::NoPose);
    assert_eq!(s.stats().no_pose, 1);
    assert_eq!(s.stats().missed, 0);
    assert_eq!(s.last_scored_time(), f64::NEG_INFINITY);

    let token = s.begin_request().unwrap();
    assert_eq!(s.complete(token, Some(&short), 1.0), TickOutcome::NoPose);
    assert!(matches!(s.tick(&standing(), 1.0), TickOutcome::Scored(_)));
}

#[test]
fn test_mesh_with_other_layout_scores_zero_without_panicking() {
    let mut s = active(ActionMesh::new(vec![Checkpoint {
        time: 1.0,
        landmarks: LandmarkSet::new(standing().as_slice()[..17].to_vec()),
    }]));
    assert!(matches!(s.tick(&standing(), 1.0), TickOutcome::Missed { .. }));
}

#[test]
fn test_stale_results_are_discarded() {
    let mut s = active(mesh_at(&[1.0]));
    let token = s.begin_request().unwrap();
    s.stop();
    s.start();
    assert_eq!(s.complete(token, Some(&standing()), 1.0), TickOutcome::Stale);
    assert_eq!(s.stats().stale, 1);

    let fresh = s.begin_request().unwrap();
    assert!(matches!(
        s.complete(fresh, Some(&standing()), 1.0),
        TickOutcome::Scored(_)
    ));
}

#[test]
fn test_result_after_stop_is_inert() {
    let mut s = active(mesh_at(&[1.0]));
    let token = s.begin_request().unwrap();
    s.stop();
    assert_eq!(s.complete(token, Some(&standing()), 1.0), TickOutcome::Inactive);
    assert_eq!(s.stats().scored, 0);
}

#[test]
fn test_no_pose_is_counted() {
    let mut s = active(mesh_at(&[1.0]));
    let token = s.begin_request().unwrap();
    assert_eq!(s.complete(token, None, 1.0), TickOutcome::NoPose);
    assert_eq!(s.stats().no_pose, 1);
}

#[test]
fn test_load_mesh_replaces_reference() {
    let mut s = active(mesh_at(&[1.0]));
    s.load_mesh(mesh_at(&[10.0]));
    assert_eq!(s.tick(&standing(), 1.0), TickOutcome::NoCheckpoint);
    assert!(matches!(s.tick(&standing(), 10.0), TickOutcome::Scored(_)));
}

#[test]
fn test_from_config_uses_injected_settings() {
    let mut config = Config::default();
    config.session.min_score_interval = 0.1;
    let mut s = SessionController::from_config(&config, mesh_at(&[1.0])).unwrap();
    s.start();
    assert!(matches!(s.tick(&standing(), 1.0), TickOutcome::Scored(_)));
    assert!(matches!(s.tick(&standing(), 1.2), TickOutcome::Scored(_)));
}

#[test]
fn test_shared_session_serializes_concurrent_ticks() {
    let session = shared(active(mesh_at(&[1.0])));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let s = session.clone();
            thread::spawn(move || {
                let mut guard = lock_session(&s).unwrap();
                guard.tick(&standing(), 1.0)
            })
        })
        .collect();

    let scored = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|o| matches!(o, TickOutcome::Scored(_)))
        .count();

    // Only one thread can win the checkpoint
    assert_eq!(scored, 1);
    assert_eq!(lock_session(&session).unwrap().stats().suppressed, 7);
}

fn backend_error() -> BackendError {
    BackendError::Failed {
        backend: "test".to_string(),
        reason: "timeout".to_string(),
    }
}

#[test]
fn test_backend_failure_is_counted_while_current() {
    let mut s = active(mesh_at(&[1.0]));
    let token = s.begin_request().unwrap();
    assert_eq!(
        s.fail(token, backend_error()),
        TickOutcome::BackendFailed(backend_error())
    );
    assert_eq!(s.stats().backend_failures, 1);
    assert!(s.is_active());
}

#[test]
fn test_backend_failure_after_stop_or_restart_is_inert() {
    let mut s = active(mesh_at(&[1.0]));

    let token = s.begin_request().unwrap();
    s.restart();
    assert_eq!(s.fail(token, backend_error()), TickOutcome::Stale);

    let token = s.begin_request().unwrap();
    s.stop();
    assert_eq!(s.fail(token, backend_error()), TickOutcome::Inactive);

    assert_eq!(s.stats().backend_failures, 0);
}

#[test]
fn test_reconfigure_applies_new_settings() {
    let mut s = active(mesh_at(&[1.0]));
    assert!(matches!(s.tick(&standing(), 1.0), TickOutcome::Scored(_)));
    let stale = s.begin_request().unwrap();

    let mut config = Config::default();
    config.session.min_score_interval = 0.1;
    config.feedback.feedback_tiers = "0:almost:3".to_string();
    s.reconfigure(&config).unwrap();

    assert!(s.is_active());
    assert_eq!(s.config().min_interval, 0.1);
    assert_eq!(s.last_scored_time(), f64::NEG_INFINITY);
    assert_eq!(s.complete(stale, Some(&standing()), 1.0), TickOutcome::Stale);
    match s.tick(&standing(), 1.1) {
        TickOutcome::Scored(e) => {
            assert_eq!(e.label, FeedbackLabel::Almost);
            assert_eq!(e.points, 3);
        }
        other => panic!("expected a score, got {:?}", other),
    }
    // 0.15s later: allowed under the new 0.1s interval
    assert!(matches!(s.tick(&standing(), 1.25), TickOutcome::Scored(_)));
}

#[test]
fn test_reconfigure_rejects_invalid_config() {
    let mut s = active(mesh_at(&[1.0]));
    let mut config = Config::default();
    config.session.joint_count = 0;
    assert!(s.reconfigure(&config).is_err());
    assert_eq!(s.config().min_interval, 0.4);
}
