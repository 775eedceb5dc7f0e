/// Object and view transforms

use glam::{Mat4, Quat, Vec3};

/// Object-to-world transform
pub trait Transform {
    fn model_matrix(&self) -> Mat4;
}

/// Transform that can also place a viewer (light or camera)
pub trait ViewTransform: Transform {
    /// World-to-view matrix
    fn view_matrix(&self) -> Mat4 {
        self.model_matrix().inverse()
    }
}

impl Transform for Mat4 {
    fn model_matrix(&self) -> Mat4 {
        *self
    }
}

impl ViewTransform for Mat4 {}

/// Rotation followed by translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationTranslation {
    pub orientation: Quat,
    pub translation: Vec3,
}

impl OrientationTranslation {
    pub fn new(orientation: Quat, translation: Vec3) -> Self {
        Self { orientation, translation }
    }

    pub fn identity() -> Self {
        Self { orientation: Quat::IDENTITY, translation: Vec3::ZERO }
    }
}

impl Transform for OrientationTranslation {
    fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.translation)
    }
}

impl ViewTransform for OrientationTranslation {
    fn view_matrix(&self) -> Mat4 {
        // Rigid transform: inverse is R^T * T(-t)
        let inverse_rotation = self.orientation.conjugate();
        Mat4::from_quat(inverse_rotation) * Mat4::from_translation(-self.translation)
    }
}

/// Uniform scale followed by translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTranslation {
    pub scale: f32,
    pub translation: Vec3,
}

impl ScaleTranslation {
    pub fn new(scale: f32, translation: Vec3) -> Self {
        Self { scale, translation }
    }
}

impl Transform for ScaleTranslation {
    fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), Quat::IDENTITY, self.translation)
    }
}

/// Per-axis scale, rotation, then translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleOrientationTranslation {
    pub scale: Vec3,
    pub orientation: Quat,
    pub translation: Vec3,
}

impl ScaleOrientationTranslation {
    pub fn new(scale: Vec3, orientation: Quat, translation: Vec3) -> Self {
        Self { scale, orientation, translation }
    }
}

impl Transform for ScaleOrientationTranslation {
    fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.translation)
    }
}
