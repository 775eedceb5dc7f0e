/// Projection matrices

use glam::Mat4;

/// Anything that produces a clip-space projection matrix
pub trait Projection {
    fn projection_matrix(&self) -> Mat4;
}

/// Symmetric perspective projection (right-handed, OpenGL depth range)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveProjection {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveProjection {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self { fov_y, aspect, near, far }
    }
}

impl Projection for PerspectiveProjection {
    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Orthographic projection (right-handed, OpenGL depth range)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicProjection {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthographicProjection {
    pub fn new(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self { left, right, bottom, top, near, far }
    }
}

impl Projection for OrthographicProjection {
    fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

impl Projection for Mat4 {
    fn projection_matrix(&self) -> Mat4 {
        *self
    }
}
