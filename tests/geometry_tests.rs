use posematch::geometry::{
    angle_between_vectors, euclidean_distance, joint_angle, vector_between, Vec3,
};
use posematch::landmarks::{Joint, Landmark};
use rstest::rstest;

mod common;
use common::{left_arm_raised, standing};

fn lm(x: f32, y: f32, z: f32) -> Landmark {
    Landmark::new(x, y, z, 1.0)
}

#[rstest]
#[case(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.0)]
#[case(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 90.0)]
#[case(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), 180.0)]
#[case(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 45.0)]
#[case(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 3.0, 0.0), 90.0)]
fn test_angle_between_vectors(#[case] a: Vec3, #[case] b: Vec3, #[case] expected: f32) {
    let angle = angle_between_vectors(&a, &b);
    assert!((angle - expected).abs() < 1e-3, "got {}", angle);
}

#[test]
fn test_zero_vector_angle_is_zero() {
    assert_eq!(angle_between_vectors(&Vec3::ZERO, &Vec3::new(1.0, 2.0, 3.0)), 0.0);
    assert_eq!(angle_between_vectors(&Vec3::ZERO, &Vec3::ZERO), 0.0);
}

#[test]
fn test_angle_is_never_nan() {
    let v = Vec3::new(0.3, 0.7, 0.1);
    let scaled = Vec3::new(0.3 * 7.0, 0.7 * 7.0, 0.1 * 7.0);
    let flipped = Vec3::new(-0.3 * 7.0, -0.7 * 7.0, -0.1 * 7.0);
    assert!(angle_between_vectors(&v, &scaled).is_finite());
    assert!(angle_between_vectors(&v, &flipped).is_finite());
}

#[test]
fn test_distance_is_three_dimensional() {
    let a = lm(0.0, 0.0, 0.0);
    let b = lm(0.3, 0.4, 0.0);
    assert!((euclidean_distance(&a, &b) - 0.5).abs() < 1e-6);

    let c = lm(0.0, 0.0, 0.5);
    assert!((euclidean_distance(&a, &c) - 0.5).abs() < 1e-6);
    assert_eq!(vector_between(&a, &b), Vec3::new(0.3, 0.4, 0.0));
}

#[test]
fn test_joint_angle_on_fixture_pose() {
    let raised = left_arm_raised();
    let elbow = joint_angle(
        &raised,
        Joint::LeftElbow.index(),
        Joint::LeftShoulder.index(),
        Joint::LeftWrist.index(),
    )
    .unwrap();
    assert!((elbow - 90.0).abs() < 1e-3);

    let pose = standing();
    assert!(joint_angle(&pose, 40, 1, 2).is_none());
}
