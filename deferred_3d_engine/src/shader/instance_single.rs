//! Shaders drawing one instance at a time
//!
//! Geometry, depth and translucent single-instance shaders share one
//! protocol shape, each over its own state type:
//!
//! ```text
//! DEACTIVATED -> ACTIVATED -> VIEW_RECEIVED -> MATERIAL_RECEIVED
//!     -> INSTANCE_RECEIVED -> VALIDATED
//! VALIDATED -> MATERIAL_RECEIVED    (next material)
//! VALIDATED -> INSTANCE_RECEIVED    (next instance, same material)
//! ```

use crate::error::Result;
use crate::graphics::{GraphicsContext, ProgramHandle};
use crate::matrices::InstanceMatrices;
use crate::protocol::{ProtocolState, StateMachine};
use crate::shader::parameters::ViewParameters;
use crate::shader::shader::{ProtocolShader, Shader, ShaderState, ShaderVerifier};
use crate::texture::TextureUnitScope;

/// States every single-instance protocol has
pub trait InstanceSingleProtocol: ShaderState {
    const VIEW_RECEIVED: Self;
    const MATERIAL_RECEIVED: Self;
    const INSTANCE_RECEIVED: Self;
}

fn instance_single_protocol<S: InstanceSingleProtocol>() -> StateMachine<S> {
    StateMachine::builder(S::DEACTIVATED)
        .transition(S::DEACTIVATED, S::ACTIVATED)
        .transition(S::ACTIVATED, S::VIEW_RECEIVED)
        .transition(S::VIEW_RECEIVED, S::MATERIAL_RECEIVED)
        .transition(S::MATERIAL_RECEIVED, S::INSTANCE_RECEIVED)
        .transition(S::INSTANCE_RECEIVED, S::VALIDATED)
        .transition(S::VALIDATED, S::MATERIAL_RECEIVED)
        .transition(S::VALIDATED, S::INSTANCE_RECEIVED)
        .with_universal_reset()
        .build()
}

macro_rules! instance_single_state {
    ($(#[$meta:meta])* $name:ident, $machine:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            Deactivated,
            Activated,
            ViewReceived,
            MaterialReceived,
            InstanceReceived,
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
                instance_single_protocol()
            }
        }

        impl InstanceSingleProtocol for $name {
            const VIEW_RECEIVED: Self = Self::ViewReceived;
            const MATERIAL_RECEIVED: Self = Self::MaterialReceived;
            const INSTANCE_RECEIVED: Self = Self::InstanceReceived;
        }
    };
}

instance_single_state!(
    /// Geometry-buffer pass, one instance
    GeometrySingleState, "GeometryInstanceSingleShader"
);
instance_single_state!(
    /// Depth-only pass, one instance
    DepthSingleState, "DepthInstanceSingleShader"
);
instance_single_state!(
    /// Forward translucent pass, one instance
    TranslucentSingleState, "TranslucentInstanceSingleShader"
);

/// Contract of a single-instance shader with material parameters `M`
pub trait InstanceSingleShader<M>: Shader {
    fn on_receive_view(&mut self, g: &mut dyn GraphicsContext, view: &ViewParameters<'_>) -> Result<()>;

    fn on_receive_material_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        material: &M,
    ) -> Result<()>;

    fn on_receive_instance_transform_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        instance: &InstanceMatrices,
    ) -> Result<()>;
}

/// Uniform-writing half of a single-instance shader
pub trait InstanceSingleHooks<M> {
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

    fn on_actual_receive_instance_transform_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        instance: &InstanceMatrices,
    ) -> Result<()>;
}

pub type GeometrySingleShader<H> = ProtocolShader<GeometrySingleState, H>;
pub type DepthSingleShader<H> = ProtocolShader<DepthSingleState, H>;
pub type TranslucentSingleShader<H> = ProtocolShader<TranslucentSingleState, H>;

pub type GeometrySingleVerifier<T> = ShaderVerifier<T, GeometrySingleState>;
pub type DepthSingleVerifier<T> = ShaderVerifier<T, DepthSingleState>;
pub type TranslucentSingleVerifier<T> = ShaderVerifier<T, TranslucentSingleState>;

impl<M, S, H> InstanceSingleShader<M> for ProtocolShader<S, H>
where
    S: InstanceSingleProtocol,
    H: InstanceSingleHooks<M>,
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

    fn on_receive_instance_transform_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        instance: &InstanceMatrices,
    ) -> Result<()> {
        let (hooks, program) = self.step(S::INSTANCE_RECEIVED)?;
        hooks.on_actual_receive_instance_transform_values(g, program, instance)
    }
}

impl<M, S, T> InstanceSingleShader<M> for ShaderVerifier<T, S>
where
    S: InstanceSingleProtocol,
    T: InstanceSingleShader<M>,
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

    fn on_receive_instance_transform_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        instance: &InstanceMatrices,
    ) -> Result<()> {
        self.check(S::INSTANCE_RECEIVED)?.on_receive_instance_transform_values(g, instance)
    }
}

#[cfg(test)]
#[path = "instance_single_tests.rs"]
mod tests;
