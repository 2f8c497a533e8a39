//! Transform System
//!
//! Recomputes world matrices for the scene graph's transform array.
//!
//! Nodes are stored parent-before-child, so one forward sweep visits every
//! parent before its children; no explicit stack or recursion is needed. A
//! node's world matrix is rebuilt when its own local matrix changed or when
//! any ancestor's world matrix changed during the same sweep.

use glam::Affine3A;

use crate::node::SceneNode;
use crate::transform::Transform;

/// Updates every transform's world matrix.
///
/// `changed` is scratch storage reused between frames; its contents on entry
/// are ignored.
pub fn update_hierarchy(nodes: &[SceneNode], transforms: &mut [Transform], changed: &mut Vec<bool>) {
    debug_assert_eq!(nodes.len(), transforms.len(), "node and transform arrays out of step");

    changed.clear();
    changed.resize(transforms.len(), false);

    for (index, node) in nodes.iter().enumerate() {
        let (parent_world, parent_changed) = match node.parent_id {
            Some(parent) => {
                debug_assert!(parent < index, "node {index} stored before its parent {parent}");
                match transforms.get(parent) {
                    Some(p) if parent < index => (p.world_matrix, changed[parent]),
                    _ => (Affine3A::IDENTITY, false),
                }
            }
            None => (Affine3A::IDENTITY, false),
        };

        let Some(transform) = transforms.get_mut(index) else {
            break;
        };

        let local_changed = transform.update_local_matrix();
        if local_changed || parent_changed {
            transform.set_world_matrix(parent_world * *transform.local_matrix());
            changed[index] = true;
        }
    }
}

/// Number of transforms whose local matrix is stale.
#[must_use]
pub fn count_dirty(transforms: &[Transform]) -> usize {
    transforms.iter().filter(|t| t.is_dirty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use glam::Vec3;

    fn node(node_id: usize, parent_id: Option<usize>) -> SceneNode {
        SceneNode {
            node_type: NodeType::Empty,
            node_id,
            parent_id,
            channel_list_id: None,
        }
    }

    #[test]
    fn test_hierarchy_update() {
        let nodes = vec![node(0, None), node(1, Some(0)), node(2, Some(1))];
        let mut transforms = vec![Transform::new(); 3];
        transforms[0].position = Vec3::new(1.0, 0.0, 0.0);
        transforms[1].position = Vec3::new(0.0, 1.0, 0.0);
        transforms[2].position = Vec3::new(0.0, 0.0, 1.0);

        let mut scratch = Vec::new();
        update_hierarchy(&nodes, &mut transforms, &mut scratch);

        let world = transforms[2].world_matrix().translation;
        assert!(Vec3::from(world).abs_diff_eq(Vec3::ONE, 1e-5));
        assert_eq!(count_dirty(&transforms), 0);
    }

    #[test]
    fn test_parent_change_propagates() {
        let nodes = vec![node(0, None), node(1, Some(0))];
        let mut transforms = vec![Transform::new(); 2];
        let mut scratch = Vec::new();
        update_hierarchy(&nodes, &mut transforms, &mut scratch);

        transforms[0].position = Vec3::new(5.0, 0.0, 0.0);
        update_hierarchy(&nodes, &mut transforms, &mut scratch);

        assert!((transforms[1].world_matrix().translation.x - 5.0).abs() < 1e-5);
    }
}
