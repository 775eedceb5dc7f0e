//! Light shaders
//!
//! Each light kind extends the previous one by one received value:
//!
//! ```text
//! screen:             ACTIVATED -> GEOMETRY_BUFFER_RECEIVED -> VALUES_RECEIVED -> VALIDATED
//! volume:             ... VALUES_RECEIVED -> VOLUME_RECEIVED -> VALIDATED
//! projective:         ... VOLUME_RECEIVED -> PROJECTIVE_RECEIVED -> VALIDATED
//! projective shadow:  ... PROJECTIVE_RECEIVED -> SHADOW_RECEIVED -> VALIDATED
//! ```
//!
//! Light shaders draw one light per activation: there is no edge out of
//! `VALIDATED` other than back to `DEACTIVATED`.

use crate::error::Result;
use crate::graphics::{GraphicsContext, ProgramHandle, Texture2D};
use crate::matrices::{ProjectiveLightMatrices, VolumeLightMatrices};
use crate::protocol::{ProtocolState, StateMachine};
use crate::shader::parameters::{GeometryBuffer, LightParameters};
use crate::shader::shader::{ProtocolShader, Shader, ShaderState, ShaderVerifier};
use crate::texture::TextureUnitScope;

// ============================================================================
// Protocol shapes
// ============================================================================

pub trait LightProtocol: ShaderState {
    const GEOMETRY_BUFFER_RECEIVED: Self;
    const VALUES_RECEIVED: Self;
}

pub trait LightVolumeProtocol: LightProtocol {
    const VOLUME_RECEIVED: Self;
}

pub trait LightProjectiveProtocol: LightVolumeProtocol {
    const PROJECTIVE_RECEIVED: Self;
}

pub trait LightShadowProtocol: LightProjectiveProtocol {
    const SHADOW_RECEIVED: Self;
}

// ============================================================================
// States
// ============================================================================

/// Full-screen light (ambient, directional)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightScreenSingleState {
    Deactivated,
    Activated,
    GeometryBufferReceived,
    ValuesReceived,
    Validated,
}

impl ProtocolState for LightScreenSingleState {
    const MACHINE: &'static str = "LightScreenSingleShader";
}

impl ShaderState for LightScreenSingleState {
    const DEACTIVATED: Self = Self::Deactivated;
    const ACTIVATED: Self = Self::Activated;
    const VALIDATED: Self = Self::Validated;

    fn protocol() -> StateMachine<Self> {
        StateMachine::builder(Self::Deactivated)
            .transition(Self::Deactivated, Self::Activated)
            .transition(Self::Activated, Self::GeometryBufferReceived)
            .transition(Self::GeometryBufferReceived, Self::ValuesReceived)
            .transition(Self::ValuesReceived, Self::Validated)
            .with_universal_reset()
            .build()
    }
}

impl LightProtocol for LightScreenSingleState {
    const GEOMETRY_BUFFER_RECEIVED: Self = Self::GeometryBufferReceived;
    const VALUES_RECEIVED: Self = Self::ValuesReceived;
}

/// Light drawn as a volume mesh (point, spherical)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightVolumeSingleState {
    Deactivated,
    Activated,
    GeometryBufferReceived,
    ValuesReceived,
    VolumeReceived,
    Validated,
}

impl ProtocolState for LightVolumeSingleState {
    const MACHINE: &'static str = "LightVolumeSingleShader";
}

impl ShaderState for LightVolumeSingleState {
    const DEACTIVATED: Self = Self::Deactivated;
    const ACTIVATED: Self = Self::Activated;
    const VALIDATED: Self = Self::Validated;

    fn protocol() -> StateMachine<Self> {
        StateMachine::builder(Self::Deactivated)
            .transition(Self::Deactivated, Self::Activated)
            .transition(Self::Activated, Self::GeometryBufferReceived)
            .transition(Self::GeometryBufferReceived, Self::ValuesReceived)
            .transition(Self::ValuesReceived, Self::VolumeReceived)
            .transition(Self::VolumeReceived, Self::Validated)
            .with_universal_reset()
            .build()
    }
}

impl LightProtocol for LightVolumeSingleState {
    const GEOMETRY_BUFFER_RECEIVED: Self = Self::GeometryBufferReceived;
    const VALUES_RECEIVED: Self = Self::ValuesReceived;
}

impl LightVolumeProtocol for LightVolumeSingleState {
    const VOLUME_RECEIVED: Self = Self::VolumeReceived;
}

/// Projective light without shadows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightProjectiveState {
    Deactivated,
    Activated,
    GeometryBufferReceived,
    ValuesReceived,
    VolumeReceived,
    ProjectiveReceived,
    Validated,
}

impl ProtocolState for LightProjectiveState {
    const MACHINE: &'static str = "LightProjectiveShader";
}

impl ShaderState for LightProjectiveState {
    const DEACTIVATED: Self = Self::Deactivated;
    const ACTIVATED: Self = Self::Activated;
    const VALIDATED: Self = Self::Validated;

    fn protocol() -> StateMachine<Self> {
        StateMachine::builder(Self::Deactivated)
            .transition(Self::Deactivated, Self::Activated)
            .transition(Self::Activated, Self::GeometryBufferReceived)
            .transition(Self::GeometryBufferReceived, Self::ValuesReceived)
            .transition(Self::ValuesReceived, Self::VolumeReceived)
            .transition(Self::VolumeReceived, Self::ProjectiveReceived)
            .transition(Self::ProjectiveReceived, Self::Validated)
            .with_universal_reset()
            .build()
    }
}

impl LightProtocol for LightProjectiveState {
    const GEOMETRY_BUFFER_RECEIVED: Self = Self::GeometryBufferReceived;
    const VALUES_RECEIVED: Self = Self::ValuesReceived;
}

impl LightVolumeProtocol for LightProjectiveState {
    const VOLUME_RECEIVED: Self = Self::VolumeReceived;
}

impl LightProjectiveProtocol for LightProjectiveState {
    const PROJECTIVE_RECEIVED: Self = Self::ProjectiveReceived;
}

/// Projective light with a shadow map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightProjectiveWithShadowState {
    Deactivated,
    Activated,
    GeometryBufferReceived,
    ValuesReceived,
    VolumeReceived,
    ProjectiveReceived,
    ShadowReceived,
    Validated,
}

impl ProtocolState for LightProjectiveWithShadowState {
    const MACHINE: &'static str = "LightProjectiveWithShadowShader";
}

impl ShaderState for LightProjectiveWithShadowState {
    const DEACTIVATED: Self = Self::Deactivated;
    const ACTIVATED: Self = Self::Activated;
    const VALIDATED: Self = Self::Validated;

    fn protocol() -> StateMachine<Self> {
        StateMachine::builder(Self::Deactivated)
            .transition(Self::Deactivated, Self::Activated)
            .transition(Self::Activated, Self::GeometryBufferReceived)
            .transition(Self::GeometryBufferReceived, Self::ValuesReceived)
            .transition(Self::ValuesReceived, Self::VolumeReceived)
            .transition(Self::VolumeReceived, Self::ProjectiveReceived)
            .transition(Self::ProjectiveReceived, Self::ShadowReceived)
            .transition(Self::ShadowReceived, Self::Validated)
            .with_universal_reset()
            .build()
    }
}

impl LightProtocol for LightProjectiveWithShadowState {
    const GEOMETRY_BUFFER_RECEIVED: Self = Self::GeometryBufferReceived;
    const VALUES_RECEIVED: Self = Self::ValuesReceived;
}

impl LightVolumeProtocol for LightProjectiveWithShadowState {
    const VOLUME_RECEIVED: Self = Self::VolumeReceived;
}

impl LightProjectiveProtocol for LightProjectiveWithShadowState {
    const PROJECTIVE_RECEIVED: Self = Self::ProjectiveReceived;
}

impl LightShadowProtocol for LightProjectiveWithShadowState {
    const SHADOW_RECEIVED: Self = Self::ShadowReceived;
}

// ============================================================================
// Contracts
// ============================================================================

/// Contract of a light shader for lights of type `L`
pub trait LightShader<L>: Shader {
    fn on_receive_geometry_buffer(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        gbuffer: &GeometryBuffer,
    ) -> Result<()>;

    fn on_receive_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        values: &LightParameters<'_, L>,
    ) -> Result<()>;
}

pub trait LightVolumeShader<L>: LightShader<L> {
    fn on_receive_volume_light_transform(
        &mut self,
        g: &mut dyn GraphicsContext,
        volume: &VolumeLightMatrices,
    ) -> Result<()>;
}

pub trait LightProjectiveShader<L>: LightVolumeShader<L> {
    fn on_receive_projective_light(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        projective: &ProjectiveLightMatrices,
    ) -> Result<()>;
}

pub trait LightProjectiveWithShadowShader<L>: LightProjectiveShader<L> {
    fn on_receive_shadow_map(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        shadow_map: Texture2D,
    ) -> Result<()>;
}

// ============================================================================
// Hooks
// ============================================================================

pub trait LightHooks<L> {
    fn on_actual_receive_geometry_buffer(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        units: &mut TextureUnitScope<'_>,
        gbuffer: &GeometryBuffer,
    ) -> Result<()>;

    fn on_actual_receive_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        units: &mut TextureUnitScope<'_>,
        values: &LightParameters<'_, L>,
    ) -> Result<()>;
}

pub trait LightVolumeHooks<L>: LightHooks<L> {
    fn on_actual_receive_volume_light_transform(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        volume: &VolumeLightMatrices,
    ) -> Result<()>;
}

pub trait LightProjectiveHooks<L>: LightVolumeHooks<L> {
    fn on_actual_receive_projective_light(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        units: &mut TextureUnitScope<'_>,
        projective: &ProjectiveLightMatrices,
    ) -> Result<()>;
}

pub trait LightProjectiveWithShadowHooks<L>: LightProjectiveHooks<L> {
    fn on_actual_receive_shadow_map(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        units: &mut TextureUnitScope<'_>,
        shadow_map: Texture2D,
    ) -> Result<()>;
}

pub type LightScreenSingleShader<H> = ProtocolShader<LightScreenSingleState, H>;
pub type LightVolumeSingleShader<H> = ProtocolShader<LightVolumeSingleState, H>;
pub type LightProjectiveProtocolShader<H> = ProtocolShader<LightProjectiveState, H>;
pub type LightProjectiveWithShadowProtocolShader<H> = ProtocolShader<LightProjectiveWithShadowState, H>;

pub type LightScreenSingleVerifier<T> = ShaderVerifier<T, LightScreenSingleState>;
pub type LightVolumeSingleVerifier<T> = ShaderVerifier<T, LightVolumeSingleState>;
pub type LightProjectiveVerifier<T> = ShaderVerifier<T, LightProjectiveState>;
pub type LightProjectiveWithShadowVerifier<T> = ShaderVerifier<T, LightProjectiveWithShadowState>;

// ============================================================================
// ProtocolShader implementations
// ============================================================================

impl<L, S, H> LightShader<L> for ProtocolShader<S, H>
where
    S: LightProtocol,
    H: LightHooks<L>,
{
    fn on_receive_geometry_buffer(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        gbuffer: &GeometryBuffer,
    ) -> Result<()> {
        let (hooks, program) = self.step(S::GEOMETRY_BUFFER_RECEIVED)?;
        hooks.on_actual_receive_geometry_buffer(g, program, units, gbuffer)
    }

    fn on_receive_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        values: &LightParameters<'_, L>,
    ) -> Result<()> {
        let (hooks, program) = self.step(S::VALUES_RECEIVED)?;
        hooks.on_actual_receive_values(g, program, units, values)
    }
}

impl<L, S, H> LightVolumeShader<L> for ProtocolShader<S, H>
where
    S: LightVolumeProtocol,
    H: LightVolumeHooks<L>,
{
    fn on_receive_volume_light_transform(
        &mut self,
        g: &mut dyn GraphicsContext,
        volume: &VolumeLightMatrices,
    ) -> Result<()> {
        let (hooks, program) = self.step(S::VOLUME_RECEIVED)?;
        hooks.on_actual_receive_volume_light_transform(g, program, volume)
    }
}

impl<L, S, H> LightProjectiveShader<L> for ProtocolShader<S, H>
where
    S: LightProjectiveProtocol,
    H: LightProjectiveHooks<L>,
{
    fn on_receive_projective_light(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        projective: &ProjectiveLightMatrices,
    ) -> Result<()> {
        let (hooks, program) = self.step(S::PROJECTIVE_RECEIVED)?;
        hooks.on_actual_receive_projective_light(g, program, units, projective)
    }
}

impl<L, S, H> LightProjectiveWithShadowShader<L> for ProtocolShader<S, H>
where
    S: LightShadowProtocol,
    H: LightProjectiveWithShadowHooks<L>,
{
    fn on_receive_shadow_map(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        shadow_map: Texture2D,
    ) -> Result<()> {
        let (hooks, program) = self.step(S::SHADOW_RECEIVED)?;
        hooks.on_actual_receive_shadow_map(g, program, units, shadow_map)
    }
}

// ============================================================================
// Verifier implementations
// ============================================================================

impl<L, S, T> LightShader<L> for ShaderVerifier<T, S>
where
    S: LightProtocol,
    T: LightShader<L>,
{
    fn on_receive_geometry_buffer(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        gbuffer: &GeometryBuffer,
    ) -> Result<()> {
        self.check(S::GEOMETRY_BUFFER_RECEIVED)?.on_receive_geometry_buffer(g, units, gbuffer)
    }

    fn on_receive_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        values: &LightParameters<'_, L>,
    ) -> Result<()> {
        self.check(S::VALUES_RECEIVED)?.on_receive_values(g, units, values)
    }
}

impl<L, S, T> LightVolumeShader<L> for ShaderVerifier<T, S>
where
    S: LightVolumeProtocol,
    T: LightVolumeShader<L>,
{
    fn on_receive_volume_light_transform(
        &mut self,
        g: &mut dyn GraphicsContext,
        volume: &VolumeLightMatrices,
    ) -> Result<()> {
        self.check(S::VOLUME_RECEIVED)?.on_receive_volume_light_transform(g, volume)
    }
}

impl<L, S, T> LightProjectiveShader<L> for ShaderVerifier<T, S>
where
    S: LightProjectiveProtocol,
    T: LightProjectiveShader<L>,
{
    fn on_receive_projective_light(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        projective: &ProjectiveLightMatrices,
    ) -> Result<()> {
        self.check(S::PROJECTIVE_RECEIVED)?.on_receive_projective_light(g, units, projective)
    }
}

impl<L, S, T> LightProjectiveWithShadowShader<L> for ShaderVerifier<T, S>
where
    S: LightShadowProtocol,
    T: LightProjectiveWithShadowShader<L>,
{
    fn on_receive_shadow_map(
        &mut self,
        g: &mut dyn GraphicsContext,
        units: &mut TextureUnitScope<'_>,
        shadow_map: Texture2D,
    ) -> Result<()> {
        self.check(S::SHADOW_RECEIVED)?.on_receive_shadow_map(g, units, shadow_map)
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
