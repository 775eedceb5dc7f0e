//! Deferred3D Engine - explicit context for the protocol layer
//!
//! The engine owns the pieces every frame shares: the shader id pool, the
//! matrices scope manager and the texture unit allocator. It is passed
//! around explicitly; there is no global instance.
//!
//! # Example
//!
//! ```ignore
//! let mut engine = Engine::new(EngineConfig::default(), Arc::new(DefaultLogger), &gl)?;
//! let mut pool = engine.create_render_target_pool()?;
//! let mut blur: FilterShaderVerifier<_> = engine.build_shader(&mut gl, &blur_desc, BlurHooks)?;
//! ```

use std::sync::Arc;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::graphics::{GraphicsContext, ProgramDesc};
use crate::log::Logger;
use crate::matrices::Matrices;
use crate::pool::{RenderTargetListener, RenderTargetPool};
use crate::shader::{ProtocolShader, ShaderState, ShaderVerifier};
use crate::texture::TextureUnitAllocator;
use crate::utils::IdPool;

const SOURCE: &str = "deferred3d::Engine";

/// Shared state of one rendering context
pub struct Engine {
    config: EngineConfig,
    logger: Arc<dyn Logger>,
    id_pool: IdPool,
    matrices: Matrices,
    texture_units: TextureUnitAllocator,
}

impl Engine {
    /// Validate `config` and set up the shared state.
    ///
    /// The texture unit allocator is sized from
    /// [`GraphicsContext::texture_unit_count`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`](crate::error::Error::InvalidConfiguration)
    /// when `config` does not validate.
    pub fn new(config: EngineConfig, logger: Arc<dyn Logger>, g: &dyn GraphicsContext) -> Result<Self> {
        config
            .validate()
            .map_err(|err| engine_err!(logger, SOURCE, err))?;

        let unit_count = g.texture_unit_count();
        let texture_units =
            TextureUnitAllocator::new(config.texture_unit_stack_depth, unit_count, Arc::clone(&logger))?;

        engine_info!(
            logger,
            SOURCE,
            "Engine initialized: {} texture units, stack depth {}, shader checking {:?}",
            unit_count,
            config.texture_unit_stack_depth,
            config.shader_state_checking
        );

        Ok(Self {
            matrices: Matrices::new(Arc::clone(&logger)),
            id_pool: IdPool::new(),
            texture_units,
            config,
            logger,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    pub fn matrices(&self) -> &Matrices {
        &self.matrices
    }

    pub fn texture_units_mut(&mut self) -> &mut TextureUnitAllocator {
        &mut self.texture_units
    }

    pub fn id_pool_mut(&mut self) -> &mut IdPool {
        &mut self.id_pool
    }

    /// Matrices and texture units borrowed together, for frame code that
    /// needs both at once
    pub fn frame_state(&mut self) -> (&Matrices, &mut TextureUnitAllocator) {
        (&self.matrices, &mut self.texture_units)
    }

    /// New render target pool using the configured limits
    pub fn create_render_target_pool(&self) -> Result<RenderTargetPool> {
        let limits = self.config.render_target_pool;
        engine_debug!(
            self.logger,
            SOURCE,
            "Creating render target pool (soft {} bytes, hard {} bytes)",
            limits.soft_limit_bytes,
            limits.hard_limit_bytes
        );
        RenderTargetPool::new(
            RenderTargetListener::new(),
            limits.soft_limit_bytes,
            limits.hard_limit_bytes,
            Arc::clone(&self.logger),
        )
    }

    /// Compile `desc` into a shader of kind `S` and wrap it in a verifier
    /// following the configured checking policy
    pub fn build_shader<S: ShaderState, H>(
        &mut self,
        g: &mut dyn GraphicsContext,
        desc: &ProgramDesc,
        hooks: H,
    ) -> Result<ShaderVerifier<ProtocolShader<S, H>, S>> {
        let shader = ProtocolShader::new(g, &mut self.id_pool, desc, hooks, Arc::clone(&self.logger))?;
        Ok(ShaderVerifier::with_checking(shader, self.config.shader_state_checking))
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
