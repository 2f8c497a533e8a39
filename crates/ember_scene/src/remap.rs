//! Index remapping for structural scene-graph edits.
//!
//! Animations, nodes and channel lists all refer to each other by plain
//! index. Deleting, reordering or merging nodes therefore has to rewrite every
//! one of those indices at once. Each edit describes its effect as a pair of
//! [`IndexRemap`] tables (one for nodes/transforms, one for channel lists) and
//! hands them to the functions here; nothing else in the crate shifts indices.

use ember_animation::{Animation, Binding};

use crate::node::SceneNode;

/// Old index to new index, `None` for removed entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRemap {
    targets: Vec<Option<usize>>,
}

impl IndexRemap {
    /// Every index maps to itself.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        Self {
            targets: (0..len).map(Some).collect(),
        }
    }

    /// Every index is shifted up by `by`.
    #[must_use]
    pub fn offset(len: usize, by: usize) -> Self {
        Self {
            targets: (0..len).map(|i| Some(i + by)).collect(),
        }
    }

    /// Drops the entries flagged in `removed` and closes the gaps, keeping the
    /// survivors in their original order.
    #[must_use]
    pub fn compact(removed: &[bool]) -> Self {
        let mut next = 0;
        let targets = removed
            .iter()
            .map(|&gone| {
                if gone {
                    None
                } else {
                    next += 1;
                    Some(next - 1)
                }
            })
            .collect();
        Self { targets }
    }

    /// Builds a permutation from `order`, where `order[new] = old`.
    #[must_use]
    pub fn from_order(order: &[usize]) -> Self {
        let mut targets = vec![None; order.len()];
        for (new, &old) in order.iter().enumerate() {
            if let Some(slot) = targets.get_mut(old) {
                *slot = Some(new);
            }
        }
        Self { targets }
    }

    /// New index of `old`, or `None` if it was removed or never existed.
    #[inline]
    #[must_use]
    pub fn get(&self, old: usize) -> Option<usize> {
        self.targets.get(old).copied().flatten()
    }

    /// Number of indices the table was built for.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of entries that survive.
    #[must_use]
    pub fn kept(&self) -> usize {
        self.targets.iter().flatten().count()
    }

    /// Moves each surviving element of `items` to its new position.
    ///
    /// Only meaningful for tables whose surviving targets are exactly
    /// `0..kept()` (those built by [`compact`](Self::compact) or
    /// [`from_order`](Self::from_order)).
    #[must_use]
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        debug_assert_eq!(items.len(), self.targets.len(), "remap table built for a different array");

        let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(self.kept()).collect();
        for (old, item) in items.into_iter().enumerate() {
            if let Some(slot) = self.get(old).and_then(|new| slots.get_mut(new)) {
                *slot = Some(item);
            }
        }
        slots.into_iter().flatten().collect()
    }
}

/// Rewrites one binding, or drops it if its transform or channel list is gone.
#[must_use]
pub fn remap_binding(binding: Binding, nodes: &IndexRemap, channel_lists: &IndexRemap) -> Option<Binding> {
    Some(Binding {
        channel_list_id: channel_lists.get(binding.channel_list_id)?,
        track_id: binding.track_id,
        transform_id: nodes.get(binding.transform_id)?,
    })
}

/// Rewrites every binding of every animation. Returns how many bindings were
/// dropped.
pub fn rebind_animations(animations: &mut [Animation], nodes: &IndexRemap, channel_lists: &IndexRemap) -> usize {
    let mut dropped = 0;
    for animation in animations {
        let before = animation.size();
        animation.rebind(|binding| remap_binding(binding, nodes, channel_lists));
        let lost = before - animation.size();
        if lost > 0 {
            log::debug!("Animation '{}' lost {lost} binding(s) to a scene edit", animation.name());
        }
        dropped += lost;
    }
    dropped
}

/// Rewrites a node's own, parent and channel-list indices.
///
/// A parent that no longer exists leaves the node as a root.
pub fn remap_node(node: &mut SceneNode, nodes: &IndexRemap, channel_lists: &IndexRemap) {
    if let Some(id) = nodes.get(node.node_id) {
        node.node_id = id;
    }
    node.parent_id = node.parent_id.and_then(|parent| nodes.get(parent));
    node.channel_list_id = node.channel_list_id.and_then(|list| channel_lists.get(list));
}
