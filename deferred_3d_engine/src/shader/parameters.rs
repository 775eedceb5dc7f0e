/// Values fed to shaders between activation and validation

use crate::graphics::{Texture2D, Viewport};
use crate::matrices::ObserverMatrices;

/// Per-view values: the current observer and the viewport being drawn
#[derive(Clone, Copy)]
pub struct ViewParameters<'a> {
    pub observer: &'a ObserverMatrices,
    pub viewport: Viewport,
}

impl<'a> ViewParameters<'a> {
    pub fn new(observer: &'a ObserverMatrices, viewport: Viewport) -> Self {
        Self { observer, viewport }
    }
}

/// Per-light values: the light itself plus the view it is lit from
pub struct LightParameters<'a, L> {
    pub light: &'a L,
    pub observer: &'a ObserverMatrices,
    pub viewport: Viewport,
}

impl<'a, L> LightParameters<'a, L> {
    pub fn new(light: &'a L, observer: &'a ObserverMatrices, viewport: Viewport) -> Self {
        Self { light, observer, viewport }
    }
}

/// Textures of the geometry buffer sampled by light shaders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryBuffer {
    pub albedo_emissive: Texture2D,
    pub normal: Texture2D,
    pub specular: Texture2D,
    pub depth: Texture2D,
}

impl GeometryBuffer {
    /// Textures in binding order
    pub fn textures(&self) -> [Texture2D; 4] {
        [self.albedo_emissive, self.normal, self.specular, self.depth]
    }
}
