use ember_animation::AnimationNode;

/// What a scene node represents to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeType {
    #[default]
    Empty,
    Bone,
    Mesh,
    Camera,
}

/// A node of the flat scene graph.
///
/// Nodes are stored parent-before-child. `node_id` is both the node's own
/// index and the index of its transform; `channel_list_id` selects the
/// node's animation channels, if it has any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNode {
    pub node_type: NodeType,
    pub(crate) node_id: usize,
    pub(crate) parent_id: Option<usize>,
    pub(crate) channel_list_id: Option<usize>,
}

impl SceneNode {
    #[inline]
    #[must_use]
    pub fn node_id(&self) -> usize {
        self.node_id
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent_id
    }

    #[inline]
    #[must_use]
    pub fn channel_list_id(&self) -> Option<usize> {
        self.channel_list_id
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl AnimationNode for SceneNode {
    #[inline]
    fn node_id(&self) -> usize {
        self.node_id
    }

    #[inline]
    fn channel_list_id(&self) -> Option<usize> {
        self.channel_list_id
    }
}
