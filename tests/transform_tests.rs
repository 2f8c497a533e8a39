//! Transform and TransformSystem tests
//!
//! Tests for:
//! - Transform TRS operations and dirty checking
//! - Animation writes dirtying transforms
//! - Hierarchical world-matrix propagation after animating

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use ember::animation::{AnimatedTransform, Animation, AnimationChannel, KeyframeTrack};
use ember::scene::transform_system::count_dirty;
use ember::scene::{NodeType, SceneGraph, Transform};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn world_position(graph: &SceneGraph, node: usize) -> Vec3 {
    Vec3::from(graph.transform(node).unwrap().world_matrix().translation)
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
    assert_eq!(t.world_matrix_as_mat4(), Mat4::IDENTITY);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    // A fresh transform always rebuilds once.
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.position = Vec3::new(1.0, 0.0, 0.0);
    assert!(t.is_dirty());
    assert!(t.update_local_matrix());
    assert!(!t.is_dirty());
}

#[test]
fn animated_setters_mark_dirty() {
    let mut t = Transform::new();
    t.update_local_matrix();

    // Writing the same value still counts as a change.
    t.set_position(Vec3::ZERO);
    assert!(t.is_dirty());
    t.update_local_matrix();

    t.set_orientation(Quat::from_rotation_x(0.3));
    t.set_scale(Vec3::splat(2.0));
    assert!(t.update_local_matrix());
}

#[test]
fn euler_rotation_rebuilds_local_matrix() {
    let mut t = Transform::new();
    t.update_local_matrix();

    t.set_rotation_euler(0.0, FRAC_PI_2, 0.0);
    assert!(t.is_dirty());
    assert!(t.rotation.abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2), EPSILON));

    assert!(t.update_local_matrix());
    let x_axis = t.local_matrix().transform_vector3(Vec3::X);
    assert!(vec3_approx(x_axis, Vec3::NEG_Z), "got {x_axis}");
}

// ============================================================================
// Hierarchy After Animation
// ============================================================================

/// shoulder -> elbow, with the shoulder rotating a quarter turn about Z.
fn arm() -> SceneGraph {
    let mut graph = SceneGraph::new();
    let shoulder = graph.add_node(None, NodeType::Bone, "shoulder", Transform::new()).unwrap();
    let elbow_start = Transform::from_trs(Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE);
    graph.add_node(Some(shoulder), NodeType::Bone, "elbow", elbow_start).unwrap();

    let mut channel = AnimationChannel::new();
    channel.rotation_frames = KeyframeTrack::from_keyframes(
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, Quat::from_rotation_z(FRAC_PI_2)],
    )
    .unwrap();
    let track = graph.add_channel(shoulder, channel).unwrap();

    let mut raise = Animation::new("raise");
    raise.add_channel(graph.node(shoulder).unwrap(), track).unwrap();
    graph.add_animation(raise);
    graph
}

#[test]
fn child_follows_animated_parent() {
    let mut graph = arm();
    graph.update();
    assert!(vec3_approx(world_position(&graph, 1), Vec3::new(2.0, 0.0, 0.0)));

    graph.animate(0, 1.0, 0);
    assert_eq!(count_dirty(graph.transforms()), 1);
    graph.update();

    assert!(vec3_approx(world_position(&graph, 1), Vec3::new(0.0, 2.0, 0.0)));
    assert_eq!(count_dirty(graph.transforms()), 0);
}

#[test]
fn world_matrices_wait_for_update() {
    let mut graph = arm();
    graph.update();

    graph.animate(0, 1.0, 0);
    // Animating only touches local TRS.
    assert!(vec3_approx(world_position(&graph, 1), Vec3::new(2.0, 0.0, 0.0)));
}

#[test]
fn scale_propagates_to_children() {
    let mut graph = arm();
    graph.transform_mut(0).unwrap().scale = Vec3::splat(3.0);
    graph.update();

    assert!(vec3_approx(world_position(&graph, 1), Vec3::new(6.0, 0.0, 0.0)));
}
