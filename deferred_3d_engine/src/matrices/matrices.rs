//! Matrices scope manager and the per-scope matrix handles
//!
//! Nesting rules:
//! - at most one observer scope is open at a time;
//! - inside an observer, at most one of instance, projective light and
//!   volume light is open at a time;
//! - handles are only readable while the scope that produced them is open.
//!
//! Every scope is closed by a guard, so a callback returning an error (or a
//! panic unwinding through it) never leaves a scope marked open.

use std::rc::Rc;
use std::sync::Arc;
use glam::{Mat3, Mat4};
use crate::error::Result;
use crate::log::Logger;
use crate::matrices::projection::Projection;
use crate::matrices::scope::{Scope, ScopeFlags, ScopeGuard, ScopeState};
use crate::matrices::transform::{Transform, ViewTransform};
use crate::matrices::view_rays::ViewRays;

const SOURCE: &str = "deferred3d::Matrices";

/// Inverse transpose of the upper 3x3 of `modelview`
fn normal_matrix(modelview: &Mat4) -> Mat3 {
    Mat3::from_mat4(*modelview).inverse().transpose()
}

// ============================================================================
// Matrices
// ============================================================================

/// Entry point for observer scopes
pub struct Matrices {
    state: Rc<ScopeState>,
    logger: Arc<dyn Logger>,
}

impl Matrices {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { state: Rc::new(ScopeState::default()), logger }
    }

    /// Scopes currently open
    pub fn active_scopes(&self) -> ScopeFlags {
        self.state.active()
    }

    /// Run `f` inside an observer scope built from `view` and `projection`.
    ///
    /// Returns whatever `f` returns. The scope is closed afterwards in every
    /// case.
    ///
    /// # Errors
    ///
    /// [`Error::ObserverAlreadyActive`](crate::error::Error::ObserverAlreadyActive) if an observer scope is already open.
    pub fn with_observer<A, B>(
        &self,
        view: Mat4,
        projection: &dyn Projection,
        context: A,
        f: impl FnOnce(&ObserverMatrices, A) -> Result<B>,
    ) -> Result<B> {
        let guard = ScopeGuard::open(&self.state, Scope::Observer)
            .map_err(|err| engine_err!(self.logger, SOURCE, err))?;

        let projection = projection.projection_matrix();
        let projection_inverse = projection.inverse();
        let observer = ObserverMatrices {
            state: Rc::clone(&self.state),
            generation: guard.generation(),
            logger: Arc::clone(&self.logger),
            view,
            view_inverse: view.inverse(),
            projection,
            projection_inverse,
            view_rays: ViewRays::from_inverse_projection(&projection_inverse),
        };

        let result = f(&observer, context);
        drop(guard);
        result
    }
}

// ============================================================================
// Observer
// ============================================================================

/// Matrices of the current observer (camera)
#[derive(Clone)]
pub struct ObserverMatrices {
    state: Rc<ScopeState>,
    generation: u64,
    logger: Arc<dyn Logger>,
    view: Mat4,
    view_inverse: Mat4,
    projection: Mat4,
    projection_inverse: Mat4,
    view_rays: ViewRays,
}

impl ObserverMatrices {
    fn require(&self) -> Result<()> {
        self.state.require(Scope::Observer, self.generation)
    }

    /// Whether this handle's scope is still open
    pub fn is_active(&self) -> bool {
        self.state.is_current(Scope::Observer, self.generation)
    }

    pub fn view(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.view)
    }

    pub fn view_inverse(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.view_inverse)
    }

    pub fn projection(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.projection)
    }

    pub fn projection_inverse(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.projection_inverse)
    }

    pub fn view_rays(&self) -> Result<ViewRays> {
        self.require()?;
        Ok(self.view_rays)
    }

    /// Open the nested scope `scope`.
    ///
    /// The exclusivity error names the first open scope found, checked in
    /// the order instance, projective light, volume light.
    fn open_nested(&self, scope: Scope) -> Result<ScopeGuard> {
        self.require()
            .map_err(|err| engine_err!(self.logger, SOURCE, err))?;

        let active = self.state.active();
        for open in [Scope::Instance, Scope::ProjectiveLight, Scope::VolumeLight] {
            if active.contains(open.flag()) {
                return Err(engine_err!(self.logger, SOURCE, open.already_active_error()));
            }
        }
        ScopeGuard::open(&self.state, scope)
    }

    /// Run `f` with the matrices of an object placed by `transform`.
    ///
    /// # Errors
    ///
    /// [`Error::ScopeNotActive`](crate::error::Error::ScopeNotActive) outside the observer scope, or the
    /// exclusivity error of the nested scope already open.
    pub fn with_transform<A, B>(
        &self,
        transform: &dyn Transform,
        uv: Mat3,
        context: A,
        f: impl FnOnce(&InstanceMatrices, A) -> Result<B>,
    ) -> Result<B> {
        let guard = self.open_nested(Scope::Instance)?;

        let model = transform.model_matrix();
        let modelview = self.view * model;
        let instance = InstanceMatrices {
            state: Rc::clone(&self.state),
            generation: guard.generation(),
            model,
            modelview,
            normal: normal_matrix(&modelview),
            uv,
            projection: self.projection,
        };

        let result = f(&instance, context);
        drop(guard);
        result
    }

    /// Run `f` with the matrices of a projective light placed by
    /// `transform` and projecting through `projection`
    pub fn with_projective_light<A, B>(
        &self,
        transform: &dyn ViewTransform,
        projection: &dyn Projection,
        context: A,
        f: impl FnOnce(&ProjectiveLightMatrices, A) -> Result<B>,
    ) -> Result<B> {
        let guard = self.open_nested(Scope::ProjectiveLight)?;

        let model = transform.model_matrix();
        let modelview = self.view * model;
        let projective_view = transform.view_matrix();
        let projective = ProjectiveLightMatrices {
            state: Rc::clone(&self.state),
            generation: guard.generation(),
            model,
            modelview,
            normal: normal_matrix(&modelview),
            projective_view,
            projective_projection: projection.projection_matrix(),
            eye_to_light_eye: projective_view * self.view_inverse,
        };

        let result = f(&projective, context);
        drop(guard);
        result
    }

    /// Run `f` with the matrices of a light volume placed by `transform`
    pub fn with_volume_light<A, B>(
        &self,
        transform: &dyn Transform,
        context: A,
        f: impl FnOnce(&VolumeLightMatrices, A) -> Result<B>,
    ) -> Result<B> {
        let guard = self.open_nested(Scope::VolumeLight)?;

        let model = transform.model_matrix();
        let modelview = self.view * model;
        let volume = VolumeLightMatrices {
            state: Rc::clone(&self.state),
            generation: guard.generation(),
            model,
            modelview,
            normal: normal_matrix(&modelview),
        };

        let result = f(&volume, context);
        drop(guard);
        result
    }
}

// ============================================================================
// Nested scopes
// ============================================================================

/// Matrices of one rendered instance
#[derive(Clone)]
pub struct InstanceMatrices {
    state: Rc<ScopeState>,
    generation: u64,
    model: Mat4,
    modelview: Mat4,
    normal: Mat3,
    uv: Mat3,
    projection: Mat4,
}

impl InstanceMatrices {
    fn require(&self) -> Result<()> {
        self.state.require(Scope::Instance, self.generation)
    }

    pub fn model(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.model)
    }

    pub fn modelview(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.modelview)
    }

    pub fn normal(&self) -> Result<Mat3> {
        self.require()?;
        Ok(self.normal)
    }

    pub fn uv(&self) -> Result<Mat3> {
        self.require()?;
        Ok(self.uv)
    }

    /// Projection of the enclosing observer
    pub fn projection(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.projection)
    }
}

/// Matrices of a projective light
#[derive(Clone)]
pub struct ProjectiveLightMatrices {
    state: Rc<ScopeState>,
    generation: u64,
    model: Mat4,
    modelview: Mat4,
    normal: Mat3,
    projective_view: Mat4,
    projective_projection: Mat4,
    eye_to_light_eye: Mat4,
}

impl ProjectiveLightMatrices {
    fn require(&self) -> Result<()> {
        self.state.require(Scope::ProjectiveLight, self.generation)
    }

    /// Model matrix of the light volume
    pub fn model(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.model)
    }

    pub fn modelview(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.modelview)
    }

    pub fn normal(&self) -> Result<Mat3> {
        self.require()?;
        Ok(self.normal)
    }

    /// World-to-light matrix
    pub fn projective_view(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.projective_view)
    }

    pub fn projective_projection(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.projective_projection)
    }

    /// Observer eye space to light eye space
    pub fn eye_to_light_eye(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.eye_to_light_eye)
    }
}

/// Matrices of a light volume
#[derive(Clone)]
pub struct VolumeLightMatrices {
    state: Rc<ScopeState>,
    generation: u64,
    model: Mat4,
    modelview: Mat4,
    normal: Mat3,
}

impl VolumeLightMatrices {
    fn require(&self) -> Result<()> {
        self.state.require(Scope::VolumeLight, self.generation)
    }

    pub fn model(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.model)
    }

    pub fn modelview(&self) -> Result<Mat4> {
        self.require()?;
        Ok(self.modelview)
    }

    pub fn normal(&self) -> Result<Mat3> {
        self.require()?;
        Ok(self.normal)
    }
}

#[cfg(test)]
#[path = "matrices_tests.rs"]
mod tests;
