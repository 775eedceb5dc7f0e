/*!
# Deferred 3D Engine

Protocol and resource layer of a deferred-shading renderer.

This crate enforces the call order of every shader kind with explicit state
machines and manages the resources a frame borrows: scoped transform
matrices, pooled render targets and nested texture unit contexts. The GPU is
reached only through the [`GraphicsContext`](deferred3d::graphics::GraphicsContext)
trait, so backends live outside this crate.

## Architecture

- **StateMachine**: Generic transition table with checked transitions
- **Shader kinds**: Filter, instance single/batched and light shaders, each
  with its own protocol
- **ShaderVerifier**: Independent protocol check in front of any shader
- **Matrices**: Observer, instance, projective-light and volume-light scopes
- **BoundedPool**: Key-matched reuse with soft and hard byte limits
- **TextureUnitAllocator**: Stack of texture unit contexts
*/

// Internal modules
#[macro_use]
pub mod log;
mod config;
mod engine;
mod error;
pub mod graphics;
pub mod matrices;
pub mod pool;
pub mod protocol;
pub mod shader;
pub mod texture;
pub mod utils;

// Main deferred3d namespace module
pub mod deferred3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::config::{EngineConfig, PoolLimits, ShaderStateChecking};

    // Engine context
    pub use crate::engine::Engine;

    // Logging sub-module (types only, macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger, NullLogger};
    }

    // Protocol state machines
    pub mod protocol {
        pub use crate::protocol::*;
    }

    // Shader contracts, implementations and verifiers
    pub mod shader {
        pub use crate::shader::filter::{FilterProtocolShader, FilterShaderVerifier};
        pub use crate::shader::instance_batched::{
            DepthBatchedShader, DepthBatchedVerifier, GeometryBatchedShader, GeometryBatchedVerifier,
            TranslucentBatchedShader, TranslucentBatchedVerifier, TranslucentBillboardedShader,
            TranslucentBillboardedVerifier,
        };
        pub use crate::shader::instance_single::{
            DepthSingleShader, DepthSingleVerifier, GeometrySingleShader, GeometrySingleVerifier,
            TranslucentSingleShader, TranslucentSingleVerifier,
        };
        pub use crate::shader::light::{
            LightProjectiveProtocolShader, LightProjectiveVerifier,
            LightProjectiveWithShadowProtocolShader, LightProjectiveWithShadowVerifier,
            LightScreenSingleShader, LightScreenSingleVerifier, LightVolumeSingleShader,
            LightVolumeSingleVerifier,
        };
        pub use crate::shader::*;
    }

    // Matrices scope manager
    pub mod matrices {
        pub use crate::matrices::*;
    }

    // Bounded pools
    pub mod pool {
        pub use crate::pool::*;
    }

    // Texture unit allocation
    pub mod texture {
        pub use crate::texture::*;
    }

    // Graphics API seam
    pub mod graphics {
        pub use crate::graphics::*;
    }

    // Identifiers
    pub use crate::utils::{IdPool, ShaderId};
}

// Re-export math library at crate root
pub use glam;
