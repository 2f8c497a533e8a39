use ember_animation::AnimatedTransform;
use glam::{Affine3A, EulerRot, Mat4, Quat, Vec3};

/// Transform component
///
/// Holds a node's position, rotation and scale (TRS) together with cached
/// local and world matrices and the dirty state driving the hierarchy pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    // === Public properties ===
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    // === Matrix cache ===
    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    // === Dirty tracking ===
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            ..Self::new()
        }
    }

    // ========================================================================
    // Dirty tracking
    // ========================================================================

    /// Recomputes the local matrix if any TRS component changed since the
    /// last call. Returns whether it did.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.is_dirty();

        if changed {
            self.local_matrix = Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// `true` if the local matrix is stale.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.force_update
            || self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
    }

    /// Forces the next hierarchy pass to rebuild this transform's matrices.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }

    // ========================================================================
    // Getters & Helpers
    // ========================================================================

    /// Sets the rotation from XYZ Euler angles (radians).
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self.mark_dirty();
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    /// World matrix as a `Mat4`, as consumed by the rasterizer.
    #[inline]
    #[must_use]
    pub fn world_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.world_matrix)
    }

    pub(crate) fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatedTransform for Transform {
    #[inline]
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.mark_dirty();
    }

    #[inline]
    fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.mark_dirty();
    }

    #[inline]
    fn set_orientation(&mut self, orientation: Quat) {
        self.rotation = orientation;
        self.mark_dirty();
    }
}
