/// Render target pool: a [`BoundedPool`] of render targets keyed by
/// description, created and deleted through the graphics context.

use crate::error::{Error, Result};
use crate::graphics::{GraphicsContext, RenderTarget, RenderTargetDescription};
use crate::pool::bounded_pool::BoundedPool;
use crate::pool::pool_listener::PoolListener;

/// Graphics context the render target pool works through
pub type PoolGraphicsContext = dyn GraphicsContext + 'static;

/// Pool of render targets
pub type RenderTargetPool =
    BoundedPool<RenderTargetDescription, RenderTarget, PoolGraphicsContext, RenderTargetListener>;

/// Listener creating render targets through a [`GraphicsContext`]
#[derive(Debug, Default)]
pub struct RenderTargetListener {
    created: u64,
    deleted: u64,
    reused: u64,
    errors: u64,
}

impl RenderTargetListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render targets created so far
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Render targets deleted so far (failed deletions included)
    pub fn deleted(&self) -> u64 {
        self.deleted
    }

    pub fn reused(&self) -> u64 {
        self.reused
    }

    /// Failed deletions
    pub fn errors(&self) -> u64 {
        self.errors
    }
}

impl PoolListener<RenderTargetDescription, RenderTarget, PoolGraphicsContext> for RenderTargetListener {
    fn on_estimate_size(&mut self, _context: &mut PoolGraphicsContext, key: &RenderTargetDescription) -> u64 {
        key.estimate_size()
    }

    fn on_create(
        &mut self,
        context: &mut PoolGraphicsContext,
        key: &RenderTargetDescription,
    ) -> Result<RenderTarget> {
        let target = context.render_target_create(key)?;
        self.created += 1;
        Ok(target)
    }

    fn on_get_size(
        &mut self,
        _context: &mut PoolGraphicsContext,
        _key: &RenderTargetDescription,
        value: &RenderTarget,
    ) -> u64 {
        value.byte_size
    }

    fn on_reuse(
        &mut self,
        _context: &mut PoolGraphicsContext,
        _key: &RenderTargetDescription,
        _value: &mut RenderTarget,
    ) -> Result<()> {
        self.reused += 1;
        Ok(())
    }

    fn on_delete(
        &mut self,
        context: &mut PoolGraphicsContext,
        _key: &RenderTargetDescription,
        value: RenderTarget,
    ) -> Result<()> {
        self.deleted += 1;
        context.render_target_delete(&value)
    }

    fn on_error(&mut self, _context: &mut PoolGraphicsContext, _key: &RenderTargetDescription, _error: &Error) {
        self.errors += 1;
    }
}

#[cfg(test)]
#[path = "render_target_pool_tests.rs"]
mod tests;
