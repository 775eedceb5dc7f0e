//! Shader lifecycle contracts
//!
//! Every shader kind follows `activate -> receive* -> validate -> deactivate`
//! with its own state machine. Concrete shaders are [`ProtocolShader`]s over
//! a kind's state type and a hook table; [`ShaderVerifier`] adds an
//! independent check in front of any shader.

pub mod filter;
pub mod instance_batched;
pub mod instance_single;
pub mod light;
pub mod parameters;
pub mod shader;
#[cfg(test)]
pub mod mock_shader_hooks;

pub use filter::{FilterShader, FilterShaderHooks, FilterShaderState};
pub use instance_batched::{
    DepthBatchedState, GeometryBatchedState, InstanceBatchedHooks, InstanceBatchedProtocol,
    InstanceBatchedShader, TranslucentBatchedState, TranslucentBillboardedState,
};
pub use instance_single::{
    DepthSingleState, GeometrySingleState, InstanceSingleHooks, InstanceSingleProtocol,
    InstanceSingleShader, TranslucentSingleState,
};
pub use light::{
    LightHooks, LightProjectiveHooks, LightProjectiveProtocol, LightProjectiveShader,
    LightProjectiveState, LightProjectiveWithShadowHooks, LightProjectiveWithShadowShader,
    LightProjectiveWithShadowState, LightProtocol, LightScreenSingleState, LightShader,
    LightShadowProtocol, LightVolumeHooks, LightVolumeProtocol, LightVolumeShader,
    LightVolumeSingleState,
};
pub use parameters::{GeometryBuffer, LightParameters, ViewParameters};
pub use shader::{ProtocolShader, Shader, ShaderState, ShaderVerifier};
