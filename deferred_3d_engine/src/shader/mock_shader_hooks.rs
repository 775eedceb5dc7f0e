/// Hook table for unit tests
///
/// Implements every hook trait, records each call in `calls` and writes one
/// uniform per call so tests can check what reached the graphics context.

use crate::error::Result;
use crate::graphics::{GraphicsContext, ProgramHandle, Texture2D, UniformValue};
use crate::matrices::{InstanceMatrices, ProjectiveLightMatrices, VolumeLightMatrices};
use crate::shader::filter::FilterShaderHooks;
use crate::shader::instance_batched::InstanceBatchedHooks;
use crate::shader::instance_single::InstanceSingleHooks;
use crate::shader::light::{
    LightHooks, LightProjectiveHooks, LightProjectiveWithShadowHooks, LightVolumeHooks,
};
use crate::shader::parameters::{GeometryBuffer, LightParameters, ViewParameters};
use crate::texture::TextureUnitScope;

#[derive(Debug, Default)]
pub struct RecordingHooks {
    pub calls: Vec<String>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Material used by test shaders: one albedo texture
#[derive(Debug, Clone, Copy)]
pub struct TestMaterial {
    pub albedo: Texture2D,
}

/// Light used by test shaders
#[derive(Debug, Clone, Copy)]
pub struct TestLight {
    pub intensity: f32,
}

impl<P> FilterShaderHooks<P> for RecordingHooks {
    fn on_actual_receive_filter_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        _units: &mut TextureUnitScope<'_>,
        _values: &P,
    ) -> Result<()> {
        self.calls.push("filter_values".to_string());
        g.uniform_set(program, "filter", UniformValue::Float(1.0))
    }
}

impl InstanceSingleHooks<TestMaterial> for RecordingHooks {
    fn on_actual_receive_view(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        view: &ViewParameters<'_>,
    ) -> Result<()> {
        self.calls.push("view".to_string());
        g.uniform_set(program, "projection", UniformValue::Mat4(view.observer.projection()?))
    }

    fn on_actual_receive_material_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        units: &mut TextureUnitScope<'_>,
        material: &TestMaterial,
    ) -> Result<()> {
        self.calls.push("material".to_string());
        let unit = units.bind_texture_2d(g, material.albedo)?;
        g.uniform_set(program, "albedo", UniformValue::Sampler(unit))
    }

    fn on_actual_receive_instance_transform_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        instance: &InstanceMatrices,
    ) -> Result<()> {
        self.calls.push("instance".to_string());
        g.uniform_set(program, "modelview", UniformValue::Mat4(instance.modelview()?))?;
        g.uniform_set(program, "normal", UniformValue::Mat3(instance.normal()?))
    }
}

impl InstanceBatchedHooks<TestMaterial> for RecordingHooks {
    fn on_actual_receive_view(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        view: &ViewParameters<'_>,
    ) -> Result<()> {
        self.calls.push("view".to_string());
        g.uniform_set(program, "view", UniformValue::Mat4(view.observer.view()?))
    }

    fn on_actual_receive_material_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        units: &mut TextureUnitScope<'_>,
        material: &TestMaterial,
    ) -> Result<()> {
        self.calls.push("material".to_string());
        let unit = units.bind_texture_2d(g, material.albedo)?;
        g.uniform_set(program, "albedo", UniformValue::Sampler(unit))
    }
}

impl LightHooks<TestLight> for RecordingHooks {
    fn on_actual_receive_geometry_buffer(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        units: &mut TextureUnitScope<'_>,
        gbuffer: &GeometryBuffer,
    ) -> Result<()> {
        self.calls.push("geometry_buffer".to_string());
        for (name, texture) in ["albedo", "normal", "specular", "depth"].iter().zip(gbuffer.textures()) {
            let unit = units.bind_texture_2d(g, texture)?;
            g.uniform_set(program, name, UniformValue::Sampler(unit))?;
        }
        Ok(())
    }

    fn on_actual_receive_values(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        _units: &mut TextureUnitScope<'_>,
        values: &LightParameters<'_, TestLight>,
    ) -> Result<()> {
        self.calls.push("values".to_string());
        g.uniform_set(program, "intensity", UniformValue::Float(values.light.intensity))
    }
}

impl LightVolumeHooks<TestLight> for RecordingHooks {
    fn on_actual_receive_volume_light_transform(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        volume: &VolumeLightMatrices,
    ) -> Result<()> {
        self.calls.push("volume".to_string());
        g.uniform_set(program, "volume_modelview", UniformValue::Mat4(volume.modelview()?))
    }
}

impl LightProjectiveHooks<TestLight> for RecordingHooks {
    fn on_actual_receive_projective_light(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        _units: &mut TextureUnitScope<'_>,
        projective: &ProjectiveLightMatrices,
    ) -> Result<()> {
        self.calls.push("projective".to_string());
        g.uniform_set(program, "eye_to_light_eye", UniformValue::Mat4(projective.eye_to_light_eye()?))
    }
}

impl LightProjectiveWithShadowHooks<TestLight> for RecordingHooks {
    fn on_actual_receive_shadow_map(
        &mut self,
        g: &mut dyn GraphicsContext,
        program: ProgramHandle,
        units: &mut TextureUnitScope<'_>,
        shadow_map: Texture2D,
    ) -> Result<()> {
        self.calls.push("shadow".to_string());
        let unit = units.bind_texture_2d(g, shadow_map)?;
        g.uniform_set(program, "shadow_map", UniformValue::Sampler(unit))
    }
}
