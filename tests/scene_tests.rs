//! Scene Graph Tests
//!
//! Tests for:
//! - Node creation, lookup, children and subtrees
//! - Deleting subtrees and the bindings that pointed at them
//! - Reparenting with storage reordering
//! - Importing one graph into another
//! - Random edit sequences keeping every binding on its named node

use std::collections::HashMap;

use glam::Vec3;
use proptest::prelude::*;
use proptest::sample::Index;

use ember::animation::{Animation, AnimationChannel, KeyframeTrack};
use ember::scene::{NodeType, SceneGraph, Transform};
use ember::EmberError;

/// Gives `node` a channel whose single position key is `marker`, and binds it
/// into `animation`.
fn animate_node(graph: &mut SceneGraph, animation: &mut Animation, node: usize, marker: f32) {
    let mut channel = AnimationChannel::new();
    channel.position_frames = KeyframeTrack::from_keyframes(vec![0.0], vec![Vec3::splat(marker)]).unwrap();
    let track = graph.add_channel(node, channel).unwrap();
    animation.add_channel(graph.node(node).unwrap(), track).unwrap();
}

/// Marker of the channel behind binding `index` of `animation`.
fn bound_marker(graph: &SceneGraph, animation: usize, index: usize) -> f32 {
    let binding = graph.animation(animation).unwrap().binding(index).unwrap();
    graph.channel_lists()[binding.channel_list_id][binding.track_id]
        .position_frames
        .first_value()
        .unwrap()
        .x
}

/// Every stored parent precedes its child and every node knows its index.
fn assert_storage_order(graph: &SceneGraph) {
    for (index, node) in graph.nodes().iter().enumerate() {
        assert_eq!(node.node_id(), index);
        if let Some(parent) = node.parent() {
            assert!(parent < index, "node {index} stored before parent {parent}");
        }
    }
}

/// root
/// ├── spine
/// │   ├── arm_l
/// │   └── arm_r
/// └── leg
fn humanoid() -> SceneGraph {
    let mut graph = SceneGraph::new();
    let root = graph.add_node(None, NodeType::Empty, "root", Transform::new()).unwrap();
    let spine = graph.add_node(Some(root), NodeType::Bone, "spine", Transform::new()).unwrap();
    let arm_l = graph.add_node(Some(spine), NodeType::Bone, "arm_l", Transform::new()).unwrap();
    let arm_r = graph.add_node(Some(spine), NodeType::Bone, "arm_r", Transform::new()).unwrap();
    let leg = graph.add_node(Some(root), NodeType::Bone, "leg", Transform::new()).unwrap();

    let mut walk = Animation::new("walk");
    for (node, marker) in [(spine, 1.0), (arm_l, 2.0), (arm_r, 3.0), (leg, 4.0)] {
        animate_node(&mut graph, &mut walk, node, marker);
    }
    graph.add_animation(walk);
    graph
}

// ============================================================================
// Construction & Lookup
// ============================================================================

#[test]
fn add_node_rejects_unknown_parent() {
    let mut graph = SceneGraph::new();
    let result = graph.add_node(Some(3), NodeType::Empty, "orphan", Transform::new());
    assert!(matches!(result, Err(EmberError::IndexOutOfBounds { index: 3, .. })));
}

#[test]
fn find_and_children() {
    let graph = humanoid();
    let spine = graph.find_node("spine").unwrap();

    assert_eq!(graph.find_node("tail"), None);
    assert_eq!(graph.children(spine).as_slice(), &[2, 3]);
    assert_eq!(graph.subtree(0).len(), 5);
    assert_eq!(graph.subtree(spine), vec![1, 2, 3]);
    assert_eq!(graph.find_animation("walk"), Some(0));
}

#[test]
fn node_channels_empty_for_static_node() {
    let graph = humanoid();
    assert!(graph.node_channels(0).is_empty());
    assert_eq!(graph.node_channels(1).len(), 1);
}

#[test]
fn add_channel_to_unanimated_node_fails() {
    let graph = humanoid();
    let mut anim = Animation::new("bad");
    let result = anim.add_channel(graph.node(0).unwrap(), 0);
    assert!(matches!(result, Err(EmberError::NodeNotAnimated(0))));
    assert!(anim.is_empty());
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn delete_subtree_drops_its_bindings() {
    let mut graph = humanoid();
    let spine = graph.find_node("spine").unwrap();

    graph.delete_node(spine).unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.channel_lists().len(), 1);
    assert_eq!(graph.find_node("arm_l"), None);

    let walk = graph.animation(0).unwrap();
    assert_eq!(walk.size(), 1);
    let leg = graph.find_node("leg").unwrap();
    assert_eq!(walk.transform_ids(), &[leg]);
    assert_eq!(bound_marker(&graph, 0, 0), 4.0);
    assert_storage_order(&graph);
}

#[test]
fn delete_leaf_keeps_siblings_bound() {
    let mut graph = humanoid();
    graph.delete_node(graph.find_node("arm_l").unwrap()).unwrap();

    let walk = graph.animation(0).unwrap();
    assert_eq!(walk.size(), 3);
    for (i, transform_id) in walk.transform_ids().iter().enumerate() {
        let expected = match graph.name(*transform_id).unwrap() {
            "spine" => 1.0,
            "arm_r" => 3.0,
            "leg" => 4.0,
            other => panic!("unexpected binding to {other}"),
        };
        assert_eq!(bound_marker(&graph, 0, i), expected);
    }
    assert_eq!(graph.node(graph.find_node("arm_r").unwrap()).unwrap().parent(), graph.find_node("spine"));
}

#[test]
fn delete_out_of_range_fails() {
    let mut graph = humanoid();
    assert!(graph.delete_node(99).is_err());
    assert_eq!(graph.node_count(), 5);
}

// ============================================================================
// Reparent
// ============================================================================

#[test]
fn reparent_under_later_node_reorders() {
    let mut graph = humanoid();
    let spine = graph.find_node("spine").unwrap();
    let leg = graph.find_node("leg").unwrap();

    graph.reparent_node(spine, Some(leg)).unwrap();
    assert_storage_order(&graph);

    let spine = graph.find_node("spine").unwrap();
    let leg = graph.find_node("leg").unwrap();
    assert_eq!(graph.node(spine).unwrap().parent(), Some(leg));
    assert_eq!(graph.node(graph.find_node("arm_l").unwrap()).unwrap().parent(), Some(spine));

    let walk = graph.animation(0).unwrap();
    assert_eq!(walk.size(), 4);
    for i in 0..walk.size() {
        let name = graph.name(walk.transform_ids()[i]).unwrap();
        let expected = match name {
            "spine" => 1.0,
            "arm_l" => 2.0,
            "arm_r" => 3.0,
            "leg" => 4.0,
            other => panic!("unexpected binding to {other}"),
        };
        assert_eq!(bound_marker(&graph, 0, i), expected, "binding {i} on {name}");
    }
}

#[test]
fn reparent_into_own_subtree_fails() {
    let mut graph = humanoid();
    let spine = graph.find_node("spine").unwrap();
    let arm_l = graph.find_node("arm_l").unwrap();

    let result = graph.reparent_node(spine, Some(arm_l));
    assert!(matches!(result, Err(EmberError::HierarchyCycle { .. })));
    assert_eq!(graph.node(spine).unwrap().parent(), Some(0));
}

#[test]
fn reparent_to_root_keeps_local_transform() {
    let mut graph = humanoid();
    let arm_r = graph.find_node("arm_r").unwrap();
    graph.transform_mut(arm_r).unwrap().position = Vec3::new(0.0, 2.0, 0.0);

    graph.reparent_node(arm_r, None).unwrap();

    assert!(graph.node(arm_r).unwrap().is_root());
    assert_eq!(graph.transform(arm_r).unwrap().position, Vec3::new(0.0, 2.0, 0.0));
}

#[test]
fn update_after_reparent_uses_new_parent() {
    let mut graph = humanoid();
    let leg = graph.find_node("leg").unwrap();
    graph.transform_mut(leg).unwrap().position = Vec3::new(0.0, -3.0, 0.0);
    graph.update();

    graph.reparent_node(graph.find_node("arm_l").unwrap(), Some(leg)).unwrap();
    graph.update();

    let arm_l = graph.find_node("arm_l").unwrap();
    let world = Vec3::from(graph.transform(arm_l).unwrap().world_matrix().translation);
    assert!(world.abs_diff_eq(Vec3::new(0.0, -3.0, 0.0), 1e-5));
}

// ============================================================================
// Import
// ============================================================================

#[test]
fn import_shifts_indices_and_bindings() {
    let mut graph = humanoid();
    let mut prop = SceneGraph::new();
    let sword = prop.add_node(None, NodeType::Mesh, "sword", Transform::new()).unwrap();
    let mut swing = Animation::new("swing");
    animate_node(&mut prop, &mut swing, sword, 9.0);
    prop.add_animation(swing);

    let arm_r = graph.find_node("arm_r").unwrap();
    let first = graph.import(prop, Some(arm_r)).unwrap();

    assert_eq!(first, 5);
    assert_eq!(graph.node(first).unwrap().parent(), Some(arm_r));
    assert_eq!(graph.find_node("sword"), Some(first));

    let swing = graph.find_animation("swing").unwrap();
    assert_eq!(graph.animation(swing).unwrap().transform_ids(), &[first]);
    assert_eq!(bound_marker(&graph, swing, 0), 9.0);
    // Existing animation untouched.
    assert_eq!(bound_marker(&graph, 0, 0), 1.0);
    assert_storage_order(&graph);
}

#[test]
fn import_then_delete_host_branch() {
    let mut graph = humanoid();
    let spine = graph.find_node("spine").unwrap();
    graph.import(humanoid(), Some(spine)).unwrap();
    assert_eq!(graph.node_count(), 10);

    graph.delete_node(spine).unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.animations().len(), 2);
    assert_eq!(graph.animation(0).unwrap().size(), 1);
    assert!(graph.animation(1).unwrap().is_empty());
}

// ============================================================================
// Random Edit Sequences
// ============================================================================

#[derive(Debug, Clone)]
enum Edit {
    Delete(Index),
    Reparent(Index, Index),
    Import(Index),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        any::<Index>().prop_map(Edit::Delete),
        (any::<Index>(), any::<Index>()).prop_map(|(node, parent)| Edit::Reparent(node, parent)),
        any::<Index>().prop_map(Edit::Import),
    ]
}

/// Builds a random tree where every node is animated with a unique marker.
struct Fixture {
    next_marker: f32,
    markers: HashMap<String, f32>,
}

impl Fixture {
    fn tree(&mut self, prefix: &str, parents: &[Index]) -> SceneGraph {
        let mut graph = SceneGraph::new();
        let mut animation = Animation::new(prefix);
        for i in 0..=parents.len() {
            let parent = (i > 0).then(|| parents[i - 1].index(i));
            let name = format!("{prefix}_{i}");
            let node = graph.add_node(parent, NodeType::Bone, &name, Transform::new()).unwrap();
            animate_node(&mut graph, &mut animation, node, self.next_marker);
            self.markers.insert(name, self.next_marker);
            self.next_marker += 1.0;
        }
        graph.add_animation(animation);
        graph
    }
}

proptest! {
    #[test]
    fn edits_keep_bindings_on_named_nodes(
        parents in prop::collection::vec(any::<Index>(), 0..8),
        edits in prop::collection::vec(edit_strategy(), 0..10)
    ) {
        let mut fixture = Fixture { next_marker: 1.0, markers: HashMap::new() };
        let mut graph = fixture.tree("base", &parents);

        for (step, edit) in edits.iter().enumerate() {
            let count = graph.node_count();
            match edit {
                Edit::Delete(node) if count > 0 => {
                    graph.delete_node(node.index(count)).unwrap();
                }
                Edit::Reparent(node, parent) if count > 0 => {
                    let node = node.index(count);
                    let parent = parent.index(count + 1);
                    let parent = (parent < count).then_some(parent);
                    let _ = graph.reparent_node(node, parent);
                }
                Edit::Import(at) => {
                    let attach = (count > 0).then(|| at.index(count));
                    let other = fixture.tree(&format!("imp{step}"), &parents[..parents.len().min(3)]);
                    graph.import(other, attach).unwrap();
                }
                _ => {}
            }
            assert_storage_order(&graph);
        }

        // Each surviving node is bound exactly once, by its own channel.
        let total: usize = graph.animations().iter().map(Animation::size).sum();
        prop_assert_eq!(total, graph.node_count());

        for (a, animation) in graph.animations().iter().enumerate() {
            for (i, binding) in animation.bindings().enumerate() {
                let node = graph.node(binding.transform_id).unwrap();
                prop_assert_eq!(node.channel_list_id(), Some(binding.channel_list_id));

                let name = graph.name(binding.transform_id).unwrap();
                prop_assert_eq!(bound_marker(&graph, a, i), fixture.markers[name]);
            }
        }
    }
}
