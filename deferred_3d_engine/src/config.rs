//! Engine configuration
//!
//! Plain configuration structs with sensible defaults. Validation is explicit
//! and happens when the [`Engine`](crate::engine::Engine) is created.

use crate::error::{Error, Result};

/// Byte budget of a render target pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    /// Free (idle) bytes the pool keeps around after returns
    pub soft_limit_bytes: u64,

    /// Bytes the pool never exceeds, free and checked-out combined
    pub hard_limit_bytes: u64,
}

impl PoolLimits {
    pub fn new(soft_limit_bytes: u64, hard_limit_bytes: u64) -> Self {
        Self { soft_limit_bytes, hard_limit_bytes }
    }

    /// Check that `0 < hard` and `soft <= hard`
    pub fn validate(&self) -> Result<()> {
        if self.hard_limit_bytes == 0 {
            return Err(Error::InvalidConfiguration(
                "pool hard limit must be greater than zero".to_string(),
            ));
        }
        if self.soft_limit_bytes > self.hard_limit_bytes {
            return Err(Error::InvalidConfiguration(format!(
                "pool soft limit ({}) exceeds hard limit ({})",
                self.soft_limit_bytes, self.hard_limit_bytes
            )));
        }
        Ok(())
    }
}

impl Default for PoolLimits {
    fn default() -> Self {
        // 64 MiB idle, 256 MiB total
        Self {
            soft_limit_bytes: 64 * 1024 * 1024,
            hard_limit_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Whether shaders built by the engine are wrapped in verifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderStateChecking {
    /// Every shader gets an independent checking state machine
    #[default]
    Enabled,
    /// Shaders are used as built
    Disabled,
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum nesting depth of texture unit contexts (root included)
    pub texture_unit_stack_depth: u32,

    /// Limits used by [`Engine::create_render_target_pool`](crate::engine::Engine::create_render_target_pool)
    pub render_target_pool: PoolLimits,

    /// Verifier wrapping policy
    pub shader_state_checking: ShaderStateChecking,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            texture_unit_stack_depth: 128,
            render_target_pool: PoolLimits::default(),
            shader_state_checking: ShaderStateChecking::Enabled,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.texture_unit_stack_depth < 2 {
            return Err(Error::InvalidConfiguration(format!(
                "texture unit stack depth must be at least 2, got {}",
                self.texture_unit_stack_depth
            )));
        }
        self.render_target_pool.validate()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
