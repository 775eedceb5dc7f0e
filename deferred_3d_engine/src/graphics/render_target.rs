/// Render target description and handle

use crate::graphics::graphics_context::Texture2D;

/// Color attachment format of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum RenderTargetFormat {
    R8G8B8A8_UNORM,
    R16G16B16A16_SFLOAT,
    R32_SFLOAT,
    R16G16_SFLOAT,
    D24_UNORM_S8_UINT,
    D32_FLOAT,
}

impl RenderTargetFormat {
    pub fn bytes_per_pixel(&self) -> u64 {
        match self {
            RenderTargetFormat::R8G8B8A8_UNORM => 4,
            RenderTargetFormat::R16G16B16A16_SFLOAT => 8,
            RenderTargetFormat::R32_SFLOAT => 4,
            RenderTargetFormat::R16G16_SFLOAT => 4,
            RenderTargetFormat::D24_UNORM_S8_UINT => 4,
            RenderTargetFormat::D32_FLOAT => 4,
        }
    }
}

/// Key of a pooled render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetDescription {
    pub width: u32,
    pub height: u32,
    pub format: RenderTargetFormat,
}

impl RenderTargetDescription {
    pub fn new(width: u32, height: u32, format: RenderTargetFormat) -> Self {
        Self { width, height, format }
    }

    /// Bytes of a target with this description
    pub fn estimate_size(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.format.bytes_per_pixel()
    }
}

/// Backend identifier of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetHandle(pub u64);

/// Render target created by a [`GraphicsContext`](crate::graphics::GraphicsContext)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub handle: RenderTargetHandle,
    pub description: RenderTargetDescription,
    /// Texture holding the color attachment, sampled by later passes
    pub color_texture: Texture2D,
    /// Actual byte size reported by the backend
    pub byte_size: u64,
}
