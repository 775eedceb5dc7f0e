use super::*;
use std::sync::Arc;
use glam::Mat4;
use crate::error::Error;
use crate::graphics::mock_graphics_context::MockGraphicsContext;
use crate::graphics::{ProgramDesc, Texture2D, Viewport};
use crate::log::NullLogger;
use crate::matrices::{Matrices, ObserverMatrices, OrthographicProjection};
use crate::shader::mock_shader_hooks::{RecordingHooks, TestMaterial};
use crate::texture::TextureUnitAllocator;
use crate::utils::IdPool;

fn build<S: InstanceBatchedProtocol>(g: &mut MockGraphicsContext) -> ProtocolShader<S, RecordingHooks> {
    ProtocolShader::new(
        g,
        &mut IdPool::new(),
        &ProgramDesc::new("batched", "v", "f"),
        RecordingHooks::new(),
        Arc::new(NullLogger),
    )
    .unwrap()
}

fn material(texture: u64) -> TestMaterial {
    TestMaterial { albedo: Texture2D(texture) }
}

/// Activate, receive the view, then one material per entry of `textures`
fn draw<S: InstanceBatchedProtocol>(
    g: &mut MockGraphicsContext,
    shader: &mut ProtocolShader<S, RecordingHooks>,
    textures: &[u64],
) -> crate::error::Result<()> {
    let matrices = Matrices::new(Arc::new(NullLogger));
    let mut units = TextureUnitAllocator::new(4, 8, Arc::new(NullLogger))?;
    let projection = OrthographicProjection::new(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0);

    matrices.with_observer(Mat4::IDENTITY, &projection, (), |observer, _| {
        let mut units = units.root_scope();
        shader.on_activate(g)?;
        InstanceBatchedShader::<TestMaterial>::on_receive_view(
            shader,
            g,
            &ViewParameters::new(observer, Viewport::new(256.0, 256.0)),
        )?;
        for &texture in textures {
            units.with_child(g, |units, g| {
                InstanceBatchedShader::<TestMaterial>::on_receive_material_values(
                    shader,
                    g,
                    units,
                    &material(texture),
                )?;
                shader.on_validate()
            })?;
        }
        shader.on_deactivate(g)
    })
}

#[test]
fn test_batched_kinds_share_edges() {
    let geometry = GeometryBatchedState::protocol();
    let billboarded = TranslucentBillboardedState::protocol();
    assert_eq!(geometry.transition_count(), billboarded.transition_count());
    // 6 forward edges + 4 resets
    assert_eq!(geometry.transition_count(), 10);
}

#[test]
fn test_documented_order_with_several_materials() {
    let mut g = MockGraphicsContext::new();
    let mut shader: GeometryBatchedShader<RecordingHooks> = build(&mut g);
    g.clear();

    draw(&mut g, &mut shader, &[10, 11, 12]).unwrap();

    assert_eq!(shader.hooks().calls, vec!["view", "material", "material", "material"]);
    assert_eq!(
        g.commands_matching("texture_2d_bind"),
        vec!["texture_2d_bind 0 10", "texture_2d_bind 0 11", "texture_2d_bind 0 12"]
    );
    assert_eq!(shader.state(), GeometryBatchedState::Deactivated);
}

#[test]
fn test_every_batched_kind_runs_the_same_sequence() {
    let mut g = MockGraphicsContext::new();

    let mut depth: DepthBatchedShader<RecordingHooks> = build(&mut g);
    draw(&mut g, &mut depth, &[1]).unwrap();

    let mut translucent: TranslucentBatchedShader<RecordingHooks> = build(&mut g);
    draw(&mut g, &mut translucent, &[1, 2]).unwrap();

    let mut billboarded: TranslucentBillboardedShader<RecordingHooks> = build(&mut g);
    draw(&mut g, &mut billboarded, &[3]).unwrap();
}

#[test]
fn test_material_can_be_replaced_before_validate() {
    let mut g = MockGraphicsContext::new();
    let mut units = TextureUnitAllocator::new(4, 8, Arc::new(NullLogger)).unwrap();
    let matrices = Matrices::new(Arc::new(NullLogger));
    let mut shader: DepthBatchedShader<RecordingHooks> = build(&mut g);

    matrices
        .with_observer(Mat4::IDENTITY, &Mat4::IDENTITY, (), |observer, _| {
            let mut units = units.root_scope();
            shader.on_activate(&mut g)?;
            InstanceBatchedShader::<TestMaterial>::on_receive_view(
                &mut shader,
                &mut g,
                &ViewParameters::new(observer, Viewport::new(1.0, 1.0)),
            )?;
            for texture in [5, 6] {
                InstanceBatchedShader::<TestMaterial>::on_receive_material_values(
                    &mut shader,
                    &mut g,
                    &mut units,
                    &material(texture),
                )?;
            }
            assert_eq!(shader.state(), DepthBatchedState::MaterialReceived);
            shader.on_validate()
        })
        .unwrap();
}

#[test]
fn test_material_before_view_rejected() {
    let mut g = MockGraphicsContext::new();
    let mut units = TextureUnitAllocator::new(4, 8, Arc::new(NullLogger)).unwrap();
    let mut shader: TranslucentBillboardedShader<RecordingHooks> = build(&mut g);

    shader.on_activate(&mut g).unwrap();
    let result = InstanceBatchedShader::<TestMaterial>::on_receive_material_values(
        &mut shader,
        &mut g,
        &mut units.root_scope(),
        &material(1),
    );
    assert!(matches!(
        result,
        Err(Error::ProtocolViolation { machine: "TranslucentBillboardedShader", .. })
    ));
    assert!(shader.hooks().calls.is_empty());
}

#[test]
fn test_validate_straight_after_view_rejected() {
    let mut g = MockGraphicsContext::new();
    let matrices = Matrices::new(Arc::new(NullLogger));
    let mut shader: GeometryBatchedShader<RecordingHooks> = build(&mut g);

    let result = matrices.with_observer(Mat4::IDENTITY, &Mat4::IDENTITY, (), |observer, _| {
        shader.on_activate(&mut g)?;
        InstanceBatchedShader::<TestMaterial>::on_receive_view(
            &mut shader,
            &mut g,
            &ViewParameters::new(observer, Viewport::new(1.0, 1.0)),
        )?;
        shader.on_validate()
    });
    assert!(matches!(result, Err(Error::ProtocolViolation { .. })));
}

#[test]
fn test_verifier_rejects_view_twice() {
    let mut g = MockGraphicsContext::new();
    let matrices = Matrices::new(Arc::new(NullLogger));
    let mut verifier: GeometryBatchedVerifier<_> =
        ShaderVerifier::new(build::<GeometryBatchedState>(&mut g));

    let result = matrices.with_observer(Mat4::IDENTITY, &Mat4::IDENTITY, (), |observer, _| {
        let view = ViewParameters::new(observer, Viewport::new(1.0, 1.0));
        verifier.on_activate(&mut g)?;
        InstanceBatchedShader::<TestMaterial>::on_receive_view(&mut verifier, &mut g, &view)?;
        InstanceBatchedShader::<TestMaterial>::on_receive_view(&mut verifier, &mut g, &view)
    });
    assert!(matches!(result, Err(Error::ProtocolViolation { .. })));
    assert_eq!(verifier.inner().hooks().calls, vec!["view"]);
}

// ============================================================================
// Deactivation
// ============================================================================

/// Make the first `steps` calls of the documented batched order
fn advance<T: InstanceBatchedShader<TestMaterial>>(
    shader: &mut T,
    g: &mut dyn GraphicsContext,
    units: &mut TextureUnitScope<'_>,
    observer: &ObserverMatrices,
    steps: usize,
) -> crate::error::Result<()> {
    for step in 0..steps {
        match step {
            0 => shader.on_activate(g)?,
            1 => InstanceBatchedShader::<TestMaterial>::on_receive_view(
                shader,
                g,
                &ViewParameters::new(observer, Viewport::new(256.0, 256.0)),
            )?,
            2 => InstanceBatchedShader::<TestMaterial>::on_receive_material_values(
                shader,
                g,
                units,
                &material(20),
            )?,
            _ => shader.on_validate()?,
        }
    }
    Ok(())
}

/// Deactivate after each prefix of the documented order, checking `state`
/// before and after
fn deactivate_after_each_step<T, S>(shader: &mut T, state: impl Fn(&T) -> S, order: [S; 5])
where
    T: InstanceBatchedShader<TestMaterial>,
    S: PartialEq + std::fmt::Debug + Copy,
{
    let mut g = MockGraphicsContext::new();
    let mut units = TextureUnitAllocator::new(4, 8, Arc::new(NullLogger)).unwrap();
    let matrices = Matrices::new(Arc::new(NullLogger));
    let projection = OrthographicProjection::new(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0);

    matrices
        .with_observer(Mat4::IDENTITY, &projection, (), |observer, _| {
            let mut units = units.root_scope();
            for (steps, expected) in order.into_iter().enumerate() {
                advance(shader, &mut g, &mut units, observer, steps)?;
                assert_eq!(state(&*shader), expected);
                shader.on_deactivate(&mut g)?;
                assert_eq!(state(&*shader), order[0]);
            }
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_deactivate_from_every_state() {
    use DepthBatchedState::*;
    let mut g = MockGraphicsContext::new();
    let mut shader: DepthBatchedShader<RecordingHooks> = build(&mut g);

    deactivate_after_each_step(
        &mut shader,
        |shader| shader.state(),
        [Deactivated, Activated, ViewReceived, MaterialReceived, Validated],
    );
    assert_eq!(shader.hooks().calls, vec!["view", "view", "material", "view", "material"]);
}

#[test]
fn test_verifier_deactivates_from_every_state() {
    use TranslucentBillboardedState::*;
    let mut g = MockGraphicsContext::new();
    let mut verifier: TranslucentBillboardedVerifier<_> =
        ShaderVerifier::new(build::<TranslucentBillboardedState>(&mut g));
    let order = [Deactivated, Activated, ViewReceived, MaterialReceived, Validated];

    deactivate_after_each_step(&mut verifier, |verifier| verifier.state(), order);
    deactivate_after_each_step(&mut verifier, |verifier| verifier.inner().state(), order);
    assert_eq!(verifier.state(), Deactivated);
}
