//! Filter shaders
//!
//! Protocol: `DEACTIVATED -> ACTIVATED -> VALUES_RECEIVED -> VALIDATED`, and
//! `VALIDATED -> VALUES_RECEIVED` to run the same filter again with new
//! values.

use crate::error::Result;
use crate::graphics::{GraphicsContext, ProgramHandle};
use crate::protocol::{ProtocolState, StateMachine};
use crate::shader::shader::{ProtocolShader, Shader, ShaderState, ShaderVerifier};
use crate::texture::TextureUnitScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterShaderState {
    Deactivated,
    Activated,
    ValuesReceived,
    Validated,
}

impl ProtocolState for FilterShaderState {
    const MACHINE: &'static str = "FilterShader";
}

impl ShaderState for FilterShaderState {
    const DEACTIVATED: Self = Self::Deactivated;
    const ACTIVATED: Self = Self::Activated;
    const VALIDATED: Self = Self::Validated;

    fn protocol() -> StateMachine<Self> {
        StateMachine::builder(Self::Deactivated)
            .transition(Self::Deactivated, Self::Activated)
            .transition(Self::Activated, Self::ValuesReceived)
            .transition(Self::ValuesReceived, Self::Validated)
            .transition(Self::Validated, Self::ValuesReceived)
            .with_universal_reset()
            .build()
    }
}

/// Contract of a filter with parameters `P`
pub trait FilterShader<P>: Shader {
    fn on_receive_filter_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        values: &P,
    ) -> Result<()>;
}

/// What a concrete filter does with its parameters
pub trait FilterShaderHooks<P> {
    fn on_actual_receive_filter_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        units: &mut TextureUnitScope<'_>,
        values: &P,
    ) -> Result<()>;
}

pub type FilterProtocolShader<H> = ProtocolShader<FilterShaderState, H>;
pub type FilterShaderVerifier<T> = ShaderVerifier<T, FilterShaderState>;

impl<P, H: FilterShaderHooks<P>> FilterShader<P> for ProtocolShader<FilterShaderState, H> {
    fn on_receive_filter_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        values: &P,
    ) -> Result<()> {
        let (hooks, program) = self.step(FilterShaderState::ValuesReceived)?;
        hooks.on_actual_receive_filter_values(g, program, units, values)
    }
}

impl<P, T: FilterShader<P>> FilterShader<P> for ShaderVerifier<T, FilterShaderState> {
    fn on_receive_filter_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        values: &P,
    ) -> Result<()> {
        self.check(FilterShaderState::ValuesReceived)?
            .on_receive_filter_values(g, units, values)
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
