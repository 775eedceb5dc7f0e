//! Graphics API seam
//!
//! The protocol layer never talks to a GPU binding directly: programs,
//! uniforms, texture units and render targets all go through a
//! [`GraphicsContext`].

pub mod graphics_context;
pub mod render_target;
#[cfg(test)]
pub mod mock_graphics_context;

pub use graphics_context::{
    GraphicsContext, ProgramDesc, ProgramHandle, Texture2D, TextureUnit, UniformValue, Viewport,
};
pub use render_target::{RenderTarget, RenderTargetDescription, RenderTargetFormat, RenderTargetHandle};
