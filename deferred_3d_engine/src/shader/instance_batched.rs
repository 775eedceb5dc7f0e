//! Shaders drawing many instances per call
//!
//! Instance transforms arrive as vertex attributes, so only the view and
//! the material are received:
//!
//! ```text
//! DEACTIVATED -> ACTIVATED -> VIEW_RECEIVED -> MATERIAL_RECEIVED -> VALIDATED
//! MATERIAL_RECEIVED -> MATERIAL_RECEIVED
//! VALIDATED -> MATERIAL_RECEIVED
//! ```

use crate::error::Result;
use crate::graphics::{GraphicsContext, ProgramHandle};
use crate::protocol::{ProtocolState, StateMachine};
use crate::shader::parameters::ViewParameters;
use crate::shader::shader::{ProtocolShader, Shader, ShaderState, ShaderVerifier};
use crate::texture::TextureUnitScope;

/// States every batched protocol has
pub trait InstanceBatchedProtocol: ShaderState {
    const VIEW_RECEIVED: Self;
    const MATERIAL_RECEIVED: Self;
}

fn instance_batched_protocol<S: InstanceBatchedProtocol>() -> StateMachine<S> {
    StateMachine::builder(S::DEACTIVATED)
        .transition(S::DEACTIVATED, S::ACTIVATED)
        .transition(S::ACTIVATED, S::VIEW_RECEIVED)
        .transition(S::VIEW_RECEIVED, S::MATERIAL_RECEIVED)
        .transition(S::MATERIAL_RECEIVED, S::MATERIAL_RECEIVED)
        .transition(S::MATERIAL_RECEIVED, S::VALIDATED)
        .transition(S::VALIDATED, S::MATERIAL_RECEIVED)
        .with_universal_reset()
        .build()
}

macro_rules! instance_batched_state {
    ($(#[$meta:meta])* $name:ident, $machine:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            Deactivated,
            Activated,
            ViewReceived,
            MaterialReceived,
            Validated,
        }

        impl ProtocolState for $name {
            const MACHINE: &'static str = $machine;
        }

        impl ShaderState for $name {
            const DEACTIVATED: Self = Self::Deactivated;
            const ACTIVATED: Self = Self::Activated;
            const VALIDATED: Self = Self::Validated;

            fn protocol() -> StateMachine<Self> {
                instance_batched_protocol()
            }
        }

        impl InstanceBatchedProtocol for $name {
            const VIEW_RECEIVED: Self = Self::ViewReceived;
            const MATERIAL_RECEIVED: Self = Self::MaterialReceived;
        }
    };
}

instance_batched_state!(GeometryBatchedState, "GeometryInstanceBatchedShader");
instance_batched_state!(DepthBatchedState, "DepthInstanceBatchedShader");
instance_batched_state!(TranslucentBatchedState, "TranslucentInstanceBatchedShader");
instance_batched_state!(
    /// Camera-facing particles and sprites
    TranslucentBillboardedState, "TranslucentBillboardedShader"
);

/// Contract of a batched shader with material parameters `M`
pub trait InstanceBatchedShader<M>: Shader {
    fn on_receive_view(&mut self, g: &mut dyn GraphicsContext, view: &ViewParameters<'_>) -> Result<()>;

    fn on_receive_material_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        material: &M,
    ) -> Result<()>;
}

pub trait InstanceBatchedHooks<M> {
    fn on_actual_receive_view(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        view: &ViewParameters<'_>,
    ) -> Result<()>;

    fn on_actual_receive_material_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        units: &mut TextureUnitScope<'_>,
        material: &M,
    ) -> Result<()>;
}

pub type GeometryBatchedShader<H> = ProtocolShader<GeometryBatchedState, H>;
pub type DepthBatchedShader<H> = ProtocolShader<DepthBatchedState, H>;
pub type TranslucentBatchedShader<H> = ProtocolShader<TranslucentBatchedState, H>;
pub type TranslucentBillboardedShader<H> = ProtocolShader<TranslucentBillboardedState, H>;

pub type GeometryBatchedVerifier<T> = ShaderVerifier<T, GeometryBatchedState>;
pub type DepthBatchedVerifier<T> = ShaderVerifier<T, DepthBatchedState>;
pub type TranslucentBatchedVerifier<T> = ShaderVerifier<T, TranslucentBatchedState>;
pub type TranslucentBillboardedVerifier<T> = ShaderVerifier<T, TranslucentBillboardedState>;

impl<M, S, H> InstanceBatchedShader<M> for ProtocolShader<S, H>
where
    S: InstanceBatchedProtocol,
    H: InstanceBatchedHooks<M>,
{
    fn on_receive_view(&mut self, g: &mut dyn GraphicsContext, view: &ViewParameters<'_>) -> Result<()> {
        let (hooks, program) = self.step(S::VIEW_RECEIVED)?;
        hooks.on_actual_receive_view(g, program, view)
    }

    fn on_receive_material_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        material: &M,
    ) -> Result<()> {
        let (hooks, program) = self.step(S::MATERIAL_RECEIVED)?;
        hooks.on_actual_receive_material_values(g, program, units, material)
    }
}

impl<M, S, T> InstanceBatchedShader<M> for ShaderVerifier<T, S>
where
    S: InstanceBatchedProtocol,
    T: InstanceBatchedShader<M>,
{
    fn on_receive_view(&mut self, g: &mut dyn GraphicsContext, view: &ViewParameters<'_>) -> Result<()> {
        self.check(S::VIEW_RECEIVED)?.on_receive_view(g, view)
    }

    fn on_receive_material_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        material: &M,
    ) -> Result<()> {
        self.check(S::MATERIAL_RECEIVED)?.on_receive_material_values(g, units, material)
    }
}

#[cfg(test)]
#[path = "instance_batched_tests.rs"]
mod tests;
