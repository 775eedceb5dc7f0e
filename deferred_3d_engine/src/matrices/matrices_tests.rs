use super::*;
use crate::error::Error;
use crate::log::NullLogger;
use crate::matrices::projection::{OrthographicProjection, PerspectiveProjection};
use crate::matrices::transform::{OrientationTranslation, ScaleTranslation};
use glam::{Quat, Vec3};

fn matrices() -> Matrices {
    Matrices::new(Arc::new(NullLogger))
}

fn perspective() -> PerspectiveProjection {
    PerspectiveProjection::new(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 100.0)
}

fn camera_view() -> Mat4 {
    Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y)
}

fn approx(a: Mat4, b: Mat4) -> bool {
    a.abs_diff_eq(b, 1e-4)
}

// ============================================================================
// Observer scope
// ============================================================================

#[test]
fn test_with_observer_returns_callback_value() {
    let m = matrices();
    let value = m
        .with_observer(camera_view(), &perspective(), 20, |observer, ctx| {
            assert!(observer.is_active());
            Ok(ctx + 22)
        })
        .unwrap();
    assert_eq!(value, 42);
    assert!(m.active_scopes().is_empty());
}

#[test]
fn test_nested_observer_rejected() {
    let m = matrices();
    let result: Result<()> = m.with_observer(camera_view(), &perspective(), (), |_, _| {
        m.with_observer(camera_view(), &perspective(), (), |_, _| Ok(()))
    });
    assert_eq!(result, Err(Error::ObserverAlreadyActive));
    assert!(m.active_scopes().is_empty());
}

#[test]
fn test_observer_closed_after_error() {
    let m = matrices();
    let result: Result<()> = m.with_observer(camera_view(), &perspective(), (), |_, _| {
        Err(Error::BackendError("draw failed".to_string()))
    });
    assert!(result.is_err());
    assert!(m.active_scopes().is_empty());

    // A new observer can be opened
    assert!(m.with_observer(camera_view(), &perspective(), (), |_, _| Ok(())).is_ok());
}

#[test]
fn test_observer_closed_after_panic() {
    let m = matrices();
    let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _: Result<()> = m.with_observer(camera_view(), &perspective(), (), |_, _| {
            panic!("renderer crashed")
        });
    }));
    assert!(unwound.is_err());
    assert!(m.active_scopes().is_empty());
}

#[test]
fn test_observer_accessors_outside_scope() {
    let m = matrices();
    let escaped = m
        .with_observer(camera_view(), &perspective(), (), |observer, _| Ok(observer.clone()))
        .unwrap();

    assert!(!escaped.is_active());
    assert_eq!(escaped.view(), Err(Error::ScopeNotActive(Scope::Observer)));
    assert_eq!(escaped.projection(), Err(Error::ScopeNotActive(Scope::Observer)));
    assert_eq!(escaped.view_rays(), Err(Error::ScopeNotActive(Scope::Observer)));
}

#[test]
fn test_stale_observer_handle_in_new_scope() {
    let m = matrices();
    let escaped = m
        .with_observer(camera_view(), &perspective(), (), |observer, _| Ok(observer.clone()))
        .unwrap();

    m.with_observer(camera_view(), &perspective(), (), |_, _| {
        assert_eq!(escaped.view(), Err(Error::ScopeNotActive(Scope::Observer)));
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_observer_derived_matrices() {
    let m = matrices();
    let projection = perspective();
    m.with_observer(camera_view(), &projection, (), |observer, _| {
        assert!(approx(observer.view()? * observer.view_inverse()?, Mat4::IDENTITY));
        assert!(approx(observer.projection()?, projection.projection_matrix()));
        assert!(approx(observer.projection()? * observer.projection_inverse()?, Mat4::IDENTITY));
        Ok(())
    })
    .unwrap();
}

// ============================================================================
// Nested scopes
// ============================================================================

#[test]
fn test_instance_matrices() {
    let m = matrices();
    let transform = OrientationTranslation::new(Quat::IDENTITY, Vec3::new(1.0, 2.0, 3.0));
    m.with_observer(camera_view(), &perspective(), (), |observer, _| {
        observer.with_transform(&transform, Mat3::IDENTITY, (), |instance, _| {
            let model = transform.model_matrix();
            assert!(approx(instance.model()?, model));
            assert!(approx(instance.modelview()?, camera_view() * model));
            // No rotation or scale: normal matrix is the view rotation
            let expected = Mat3::from_mat4(camera_view());
            assert!(instance.normal()?.abs_diff_eq(expected, 1e-4));
            assert_eq!(instance.uv()?, Mat3::IDENTITY);
            Ok(())
        })
    })
    .unwrap();
}

#[test]
fn test_normal_matrix_handles_non_uniform_scale() {
    let m = matrices();
    let transform = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
    m.with_observer(Mat4::IDENTITY, &perspective(), (), |observer, _| {
        observer.with_transform(&transform, Mat3::IDENTITY, (), |instance, _| {
            let normal = instance.normal()?;
            assert!((normal.x_axis.x - 0.5).abs() < 1e-5);
            assert!((normal.y_axis.y - 1.0).abs() < 1e-5);
            Ok(())
        })
    })
    .unwrap();
}

#[test]
fn test_nested_instance_rejected() {
    let m = matrices();
    let t = Mat4::IDENTITY;
    let result: Result<()> = m.with_observer(camera_view(), &perspective(), (), |observer, _| {
        observer.with_transform(&t, Mat3::IDENTITY, (), |_, _| {
            observer.with_transform(&t, Mat3::IDENTITY, (), |_, _| Ok(()))
        })
    });
    assert_eq!(result, Err(Error::InstanceAlreadyActive));
}

#[test]
fn test_exclusivity_names_open_scope() {
    let m = matrices();
    let t = Mat4::IDENTITY;
    let light = OrientationTranslation::identity();

    let result: Result<()> = m.with_observer(camera_view(), &perspective(), (), |observer, _| {
        observer.with_projective_light(&light, &perspective(), (), |_, _| {
            observer.with_transform(&t, Mat3::IDENTITY, (), |_, _| Ok(()))
        })
    });
    assert_eq!(result, Err(Error::ProjectiveAlreadyActive));

    let result: Result<()> = m.with_observer(camera_view(), &perspective(), (), |observer, _| {
        observer.with_volume_light(&t, (), |_, _| observer.with_volume_light(&t, (), |_, _| Ok(())))
    });
    assert_eq!(result, Err(Error::VolumeLightAlreadyActive));

    let result: Result<()> = m.with_observer(camera_view(), &perspective(), (), |observer, _| {
        observer.with_transform(&t, Mat3::IDENTITY, (), |_, _| {
            observer.with_volume_light(&t, (), |_, _| Ok(()))
        })
    });
    assert_eq!(result, Err(Error::InstanceAlreadyActive));
    assert!(m.active_scopes().is_empty());
}

#[test]
fn test_sequential_nested_scopes_allowed() {
    let m = matrices();
    let t = ScaleTranslation::new(2.0, Vec3::ZERO);
    m.with_observer(camera_view(), &perspective(), (), |observer, _| {
        for _ in 0..3 {
            observer.with_transform(&t, Mat3::IDENTITY, (), |_, _| Ok(()))?;
            observer.with_volume_light(&t, (), |_, _| Ok(()))?;
        }
        assert_eq!(m.active_scopes(), ScopeFlags::OBSERVER);
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_nested_scope_outside_observer() {
    let m = matrices();
    let escaped = m
        .with_observer(camera_view(), &perspective(), (), |observer, _| Ok(observer.clone()))
        .unwrap();

    let result = escaped.with_transform(&Mat4::IDENTITY, Mat3::IDENTITY, (), |_, _| Ok(()));
    assert_eq!(result, Err(Error::ScopeNotActive(Scope::Observer)));
    let result = escaped.with_volume_light(&Mat4::IDENTITY, (), |_, _| Ok(()));
    assert_eq!(result, Err(Error::ScopeNotActive(Scope::Observer)));
}

#[test]
fn test_instance_handle_stale_after_scope() {
    let m = matrices();
    m.with_observer(camera_view(), &perspective(), (), |observer, _| {
        let escaped = observer.with_transform(&Mat4::IDENTITY, Mat3::IDENTITY, (), |instance, _| {
            Ok(instance.clone())
        })?;
        assert_eq!(escaped.model(), Err(Error::ScopeNotActive(Scope::Instance)));

        observer.with_transform(&Mat4::IDENTITY, Mat3::IDENTITY, (), |_, _| {
            assert_eq!(escaped.modelview(), Err(Error::ScopeNotActive(Scope::Instance)));
            Ok(())
        })
    })
    .unwrap();
}

#[test]
fn test_volume_light_handle_stale_after_scope() {
    let m = matrices();
    let sphere = ScaleTranslation::new(3.0, Vec3::new(0.0, 1.0, -6.0));
    m.with_observer(camera_view(), &perspective(), (), |observer, _| {
        let escaped = observer.with_volume_light(&sphere, (), |volume, _| {
            assert!(volume.model().is_ok());
            Ok(volume.clone())
        })?;
        assert_eq!(escaped.model(), Err(Error::ScopeNotActive(Scope::VolumeLight)));

        // A new volume scope does not revive the old handle
        observer.with_volume_light(&sphere, (), |_, _| {
            assert_eq!(escaped.modelview(), Err(Error::ScopeNotActive(Scope::VolumeLight)));
            assert_eq!(escaped.normal(), Err(Error::ScopeNotActive(Scope::VolumeLight)));
            Ok(())
        })
    })
    .unwrap();
}

#[test]
fn test_projective_light_matrices() {
    let m = matrices();
    let light = OrientationTranslation::new(Quat::from_rotation_y(0.5), Vec3::new(0.0, 5.0, 0.0));
    let light_projection = perspective();
    m.with_observer(camera_view(), &perspective(), (), |observer, _| {
        observer.with_projective_light(&light, &light_projection, (), |projective, _| {
            let light_view = projective.projective_view()?;
            assert!(approx(light_view, light.model_matrix().inverse()));
            assert!(approx(projective.eye_to_light_eye()?, light_view * camera_view().inverse()));
            assert!(approx(projective.projective_projection()?, light_projection.projection_matrix()));
            assert!(approx(projective.modelview()?, camera_view() * light.model_matrix()));
            Ok(())
        })
    })
    .unwrap();
}

// ============================================================================
// View rays
// ============================================================================

#[test]
fn test_perspective_view_rays() {
    let m = matrices();
    m.with_observer(Mat4::IDENTITY, &perspective(), (), |observer, _| {
        let rays = observer.view_rays()?;
        for origin in rays.origins() {
            assert!(origin.abs_diff_eq(Vec3::ZERO, 1e-3));
        }
        for ray in rays.rays() {
            assert!((ray.z - 1.0).abs() < 1e-5);
        }
        // 90 degree FOV, aspect 1: corners at |x| = |y| = z
        assert!(rays.ray_x0y0.abs_diff_eq(Vec3::new(1.0, 1.0, 1.0), 1e-3));
        assert!(rays.ray_x1y1.abs_diff_eq(Vec3::new(-1.0, -1.0, 1.0), 1e-3));
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_orthographic_view_rays() {
    let m = matrices();
    let ortho = OrthographicProjection::new(-2.0, 2.0, -1.0, 1.0, 1.0, 10.0);
    m.with_observer(Mat4::IDENTITY, &ortho, (), |observer, _| {
        let rays = observer.view_rays()?;
        for ray in rays.rays() {
            assert!(ray.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-4));
        }
        assert!(rays.origin_x0y0.abs_diff_eq(Vec3::new(-2.0, -1.0, 0.0), 1e-4));
        assert!(rays.origin_x1y1.abs_diff_eq(Vec3::new(2.0, 1.0, 0.0), 1e-4));
        Ok(())
    })
    .unwrap();
}
