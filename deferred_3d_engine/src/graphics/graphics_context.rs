/// GraphicsContext trait and the handles it deals in

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use crate::error::Result;
use crate::graphics::render_target::{RenderTarget, RenderTargetDescription};

// ============================================================================
// Handles
// ============================================================================

/// Compiled and linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// 2D texture owned by the graphics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture2D(pub u64);

/// Texture unit index, `0..texture_unit_count()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureUnit(pub u32);

impl TextureUnit {
    pub fn index(&self) -> u32 {
        self.0
    }
}

// ============================================================================
// Descriptors and values
// ============================================================================

/// Source of a shader program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDesc {
    /// Program name, used in logs and protocol violations
    pub name: String,
    /// Vertex stage source
    pub vertex: String,
    /// Optional geometry stage source
    pub geometry: Option<String>,
    /// Fragment stage source
    pub fragment: String,
}

impl ProgramDesc {
    pub fn new(name: impl Into<String>, vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertex: vertex.into(),
            geometry: None,
            fragment: fragment.into(),
        }
    }

    pub fn with_geometry(mut self, geometry: impl Into<String>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }
}

/// Value written to a program uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
    /// Sampler uniform pointing at a texture unit
    Sampler(TextureUnit),
}

/// Viewport area in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { x: 0.0, y: 0.0, width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }
}

// ============================================================================
// GraphicsContext trait
// ============================================================================

/// Low-level graphics operations used by shaders, pools and the texture
/// unit allocator.
///
/// Backends implement this on top of a concrete binding. Every call is
/// synchronous and made from the rendering thread.
pub trait GraphicsContext {
    /// Compile and link a program
    fn program_compile(&mut self, desc: &ProgramDesc) -> Result<ProgramHandle>;

    /// Make `program` the current program
    fn program_activate(&mut self, program: ProgramHandle) -> Result<()>;

    /// Unbind `program` (it must be the current program)
    fn program_deactivate(&mut self, program: ProgramHandle) -> Result<()>;

    /// Release `program`
    fn program_delete(&mut self, program: ProgramHandle) -> Result<()>;

    /// Write a uniform of the current program
    fn uniform_set(&mut self, program: ProgramHandle, name: &str, value: UniformValue) -> Result<()>;

    /// Number of texture units the backend exposes
    fn texture_unit_count(&self) -> u32;

    /// Bind `texture` to `unit`
    fn texture_2d_bind(&mut self, unit: TextureUnit, texture: Texture2D) -> Result<()>;

    /// Unbind whatever is bound to `unit`
    fn texture_unit_unbind(&mut self, unit: TextureUnit) -> Result<()>;

    /// Allocate a render target
    fn render_target_create(&mut self, desc: &RenderTargetDescription) -> Result<RenderTarget>;

    /// Release a render target
    fn render_target_delete(&mut self, target: &RenderTarget) -> Result<()>;
}
