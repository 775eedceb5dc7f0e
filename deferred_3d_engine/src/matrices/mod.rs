//! Scoped transform matrices
//!
//! [`Matrices`] hands out observer, instance, projective-light and
//! volume-light matrix sets through scoped callbacks and refuses illegal
//! nesting.

pub mod matrices;
pub mod projection;
pub mod scope;
pub mod transform;
pub mod view_rays;

pub use matrices::{
    InstanceMatrices, Matrices, ObserverMatrices, ProjectiveLightMatrices, VolumeLightMatrices,
};
pub use projection::{OrthographicProjection, PerspectiveProjection, Projection};
pub use scope::{Scope, ScopeFlags};
pub use transform::{
    OrientationTranslation, ScaleOrientationTranslation, ScaleTranslation, Transform, ViewTransform,
};
pub use view_rays::ViewRays;
