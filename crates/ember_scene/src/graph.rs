use ember_animation::{Animation, AnimationChannel, AnimationTarget, AnimationView};
use ember_core::errors::{EmberError, Result};
use ember_core::hash::{NameId, hash_name};
use smallvec::SmallVec;

use crate::node::{NodeType, SceneNode};
use crate::remap::{self, IndexRemap};
use crate::transform::Transform;
use crate::transform_system;

/// Flat, index-addressed scene graph.
///
/// Nodes, transforms and names are parallel arrays stored parent-before-child.
/// Animated nodes additionally own one channel list each; animations bind to
/// those lists and to transforms purely by index.
///
/// Every structural edit ([`delete_node`](Self::delete_node),
/// [`reparent_node`](Self::reparent_node), [`import`](Self::import)) rewrites
/// node, channel-list and animation indices together through
/// [`remap`](crate::remap).
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    transforms: Vec<Transform>,
    names: Vec<String>,
    name_ids: Vec<NameId>,

    channel_lists: Vec<Vec<AnimationChannel>>,
    animations: Vec<Animation>,

    changed_scratch: Vec<bool>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Appends a node under `parent` (or as a root) and returns its index.
    pub fn add_node(
        &mut self,
        parent: Option<usize>,
        node_type: NodeType,
        name: &str,
        transform: Transform,
    ) -> Result<usize> {
        if let Some(parent) = parent {
            self.check_node(parent, "parent node")?;
        }

        let node_id = self.nodes.len();
        self.nodes.push(SceneNode {
            node_type,
            node_id,
            parent_id: parent,
            channel_list_id: None,
        });
        self.transforms.push(transform);
        self.names.push(name.to_owned());
        self.name_ids.push(hash_name(name));
        Ok(node_id)
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn node(&self, node_id: usize) -> Option<&SceneNode> {
        self.nodes.get(node_id)
    }

    #[inline]
    #[must_use]
    pub fn name(&self, node_id: usize) -> Option<&str> {
        self.names.get(node_id).map(String::as_str)
    }

    /// Index of the first node called `name`.
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<usize> {
        let id = hash_name(name);
        self.name_ids
            .iter()
            .zip(&self.names)
            .position(|(&node_id, node_name)| node_id == id && node_name == name)
    }

    /// Direct children of `node_id`, in storage order.
    #[must_use]
    pub fn children(&self, node_id: usize) -> SmallVec<[usize; 8]> {
        self.nodes
            .iter()
            .skip(node_id + 1)
            .filter(|node| node.parent_id == Some(node_id))
            .map(|node| node.node_id)
            .collect()
    }

    /// `node_id` and all its descendants, in storage order.
    #[must_use]
    pub fn subtree(&self, node_id: usize) -> Vec<usize> {
        let mask = self.subtree_mask(node_id);
        mask.iter().enumerate().filter_map(|(i, &inside)| inside.then_some(i)).collect()
    }

    /// Descendants always follow their ancestors, so one forward pass finds
    /// the whole subtree.
    fn subtree_mask(&self, node_id: usize) -> Vec<bool> {
        let mut mask = vec![false; self.nodes.len()];
        if node_id >= self.nodes.len() {
            return mask;
        }

        mask[node_id] = true;
        for index in node_id + 1..self.nodes.len() {
            if let Some(parent) = self.nodes[index].parent_id {
                mask[index] = mask[parent];
            }
        }
        mask
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    #[inline]
    #[must_use]
    pub fn transform(&self, node_id: usize) -> Option<&Transform> {
        self.transforms.get(node_id)
    }

    #[inline]
    pub fn transform_mut(&mut self, node_id: usize) -> Option<&mut Transform> {
        self.transforms.get_mut(node_id)
    }

    /// Recomputes world matrices for every dirty transform and its
    /// descendants. Must run after animating and before drawing.
    pub fn update(&mut self) {
        transform_system::update_hierarchy(&self.nodes, &mut self.transforms, &mut self.changed_scratch);
    }

    // ========================================================================
    // Channels
    // ========================================================================

    /// Adds `channel` to `node_id`'s channel list, creating the list on first
    /// use. Returns the channel's local track index for
    /// [`Animation::add_channel`].
    pub fn add_channel(&mut self, node_id: usize, channel: AnimationChannel) -> Result<usize> {
        self.check_node(node_id, "animated node")?;

        let list_id = match self.nodes[node_id].channel_list_id {
            Some(list_id) => list_id,
            None => {
                let list_id = self.channel_lists.len();
                self.channel_lists.push(Vec::new());
                self.nodes[node_id].channel_list_id = Some(list_id);
                list_id
            }
        };

        let list = &mut self.channel_lists[list_id];
        list.push(channel);
        Ok(list.len() - 1)
    }

    #[inline]
    #[must_use]
    pub fn channel_lists(&self) -> &[Vec<AnimationChannel>] {
        &self.channel_lists
    }

    /// Channels animating `node_id`, empty if the node is not animated.
    #[must_use]
    pub fn node_channels(&self, node_id: usize) -> &[AnimationChannel] {
        self.nodes
            .get(node_id)
            .and_then(|node| node.channel_list_id)
            .and_then(|list_id| self.channel_lists.get(list_id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    // ========================================================================
    // Animations
    // ========================================================================

    pub fn add_animation(&mut self, animation: Animation) -> usize {
        self.animations.push(animation);
        self.animations.len() - 1
    }

    #[inline]
    #[must_use]
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    #[inline]
    #[must_use]
    pub fn animation(&self, index: usize) -> Option<&Animation> {
        self.animations.get(index)
    }

    #[inline]
    pub fn animation_mut(&mut self, index: usize) -> Option<&mut Animation> {
        self.animations.get_mut(index)
    }

    /// Index of the first animation called `name`.
    #[must_use]
    pub fn find_animation(&self, name: &str) -> Option<usize> {
        let id = hash_name(name);
        self.animations
            .iter()
            .position(|animation| animation.id() == id && animation.name() == name)
    }

    pub fn remove_animation(&mut self, index: usize) -> Option<Animation> {
        (index < self.animations.len()).then(|| self.animations.remove(index))
    }

    /// Poses the graph with animation `index` at `percent`.
    pub fn animate(&mut self, index: usize, percent: f32, transform_offset: usize) {
        if let Some(animation) = self.animations.get(index) {
            animation.animate(&self.channel_lists, &mut self.transforms, percent, transform_offset);
        }
    }

    /// Snaps the graph to the first or last pose of animation `index`.
    pub fn init_animation(&mut self, index: usize, at_start: bool) {
        if let Some(animation) = self.animations.get(index) {
            animation.init(&self.channel_lists, &mut self.transforms, at_start);
        }
    }

    // ========================================================================
    // Structural edits
    // ========================================================================

    /// Removes `node_id` and its whole subtree, along with their channel
    /// lists and every animation binding that pointed at them.
    pub fn delete_node(&mut self, node_id: usize) -> Result<()> {
        self.check_node(node_id, "deleted node")?;

        let removed = self.subtree_mask(node_id);
        let mut lists_removed = vec![false; self.channel_lists.len()];
        for node in self.nodes.iter().filter(|node| removed[node.node_id]) {
            if let Some(list_id) = node.channel_list_id {
                lists_removed[list_id] = true;
            }
        }

        let node_map = IndexRemap::compact(&removed);
        let list_map = IndexRemap::compact(&lists_removed);
        log::debug!(
            "Deleting node {node_id}: {} node(s), {} channel list(s)",
            node_map.len() - node_map.kept(),
            list_map.len() - list_map.kept()
        );

        self.apply_remap(&node_map, &list_map);
        Ok(())
    }

    /// Moves `node_id` (with its subtree) under `new_parent`, or to the root
    /// level for `None`. Local transforms are kept as they are.
    ///
    /// Storage is reordered when needed so parents still precede children.
    pub fn reparent_node(&mut self, node_id: usize, new_parent: Option<usize>) -> Result<()> {
        self.check_node(node_id, "reparented node")?;
        let moved = self.subtree_mask(node_id);

        if let Some(parent) = new_parent {
            self.check_node(parent, "new parent")?;
            if moved[parent] {
                return Err(EmberError::HierarchyCycle { node: node_id, parent });
            }
        }

        self.nodes[node_id].parent_id = new_parent;
        self.transforms[node_id].mark_dirty();

        let Some(parent) = new_parent.filter(|&parent| parent > node_id) else {
            return Ok(());
        };

        // Lift the subtree out and re-insert it right after its new parent.
        let mut order: Vec<usize> = Vec::with_capacity(self.nodes.len());
        for index in (0..self.nodes.len()).filter(|&i| !moved[i]) {
            order.push(index);
            if index == parent {
                order.extend((0..self.nodes.len()).filter(|&i| moved[i]));
            }
        }

        log::debug!("Reparenting node {node_id} under {parent}: reordering storage");
        let node_map = IndexRemap::from_order(&order);
        let list_map = IndexRemap::identity(self.channel_lists.len());
        self.apply_remap(&node_map, &list_map);
        Ok(())
    }

    /// Merges `other` into this graph. Its root nodes are attached under
    /// `parent` (or stay roots for `None`); its channel lists and animations
    /// are appended with their indices shifted accordingly.
    ///
    /// Returns the index of the first imported node.
    pub fn import(&mut self, other: SceneGraph, parent: Option<usize>) -> Result<usize> {
        if let Some(parent) = parent {
            self.check_node(parent, "import parent")?;
        }

        let node_offset = self.nodes.len();
        let node_map = IndexRemap::offset(other.nodes.len(), node_offset);
        let list_map = IndexRemap::offset(other.channel_lists.len(), self.channel_lists.len());

        let SceneGraph {
            mut nodes,
            transforms,
            names,
            name_ids,
            channel_lists,
            mut animations,
            ..
        } = other;

        for node in &mut nodes {
            let was_root = node.parent_id.is_none();
            remap::remap_node(node, &node_map, &list_map);
            if was_root {
                node.parent_id = parent;
            }
        }
        remap::rebind_animations(&mut animations, &node_map, &list_map);

        log::debug!(
            "Importing {} node(s), {} channel list(s), {} animation(s) at offset {node_offset}",
            nodes.len(),
            channel_lists.len(),
            animations.len()
        );

        self.nodes.extend(nodes);
        self.transforms.extend(transforms);
        self.names.extend(names);
        self.name_ids.extend(name_ids);
        self.channel_lists.extend(channel_lists);
        self.animations.extend(animations);

        for transform in &mut self.transforms[node_offset..] {
            transform.mark_dirty();
        }
        Ok(node_offset)
    }

    /// Applies one node table and one channel-list table to every array and
    /// every animation binding.
    fn apply_remap(&mut self, node_map: &IndexRemap, list_map: &IndexRemap) {
        self.nodes = node_map.apply(std::mem::take(&mut self.nodes));
        self.transforms = node_map.apply(std::mem::take(&mut self.transforms));
        self.names = node_map.apply(std::mem::take(&mut self.names));
        self.name_ids = node_map.apply(std::mem::take(&mut self.name_ids));
        self.channel_lists = list_map.apply(std::mem::take(&mut self.channel_lists));

        for node in &mut self.nodes {
            remap::remap_node(node, node_map, list_map);
        }
        let dropped = remap::rebind_animations(&mut self.animations, node_map, list_map);
        if dropped > 0 {
            log::debug!("Scene edit removed {dropped} animation binding(s)");
        }

        // Parent indices may have moved; force a full world-matrix rebuild.
        for transform in &mut self.transforms {
            transform.mark_dirty();
        }
    }

    fn check_node(&self, node_id: usize, context: &'static str) -> Result<()> {
        if node_id < self.nodes.len() {
            Ok(())
        } else {
            Err(EmberError::IndexOutOfBounds { context, index: node_id })
        }
    }
}

impl AnimationTarget for SceneGraph {
    type Transform = Transform;

    fn animation_view(&mut self) -> AnimationView<'_, Transform> {
        AnimationView {
            animations: &self.animations,
            channel_lists: &self.channel_lists,
            transforms: &mut self.transforms,
        }
    }
}
