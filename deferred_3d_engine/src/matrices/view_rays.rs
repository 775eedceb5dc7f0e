/// View rays for eye-space position reconstruction

use glam::{Mat4, Vec3, Vec4};

/// Ray origins and directions through the four corners of the view frustum.
///
/// Rays are normalised so their `z` component is 1 and origins lie on the
/// `z = 0` plane. Light shaders reconstruct an eye-space position from a
/// linear depth `d` as `origin + ray * d` interpolated across the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRays {
    pub origin_x0y0: Vec3,
    pub origin_x1y0: Vec3,
    pub origin_x0y1: Vec3,
    pub origin_x1y1: Vec3,
    pub ray_x0y0: Vec3,
    pub ray_x1y0: Vec3,
    pub ray_x0y1: Vec3,
    pub ray_x1y1: Vec3,
}

impl ViewRays {
    /// Compute rays from an inverse projection matrix
    pub fn from_inverse_projection(projection_inverse: &Mat4) -> Self {
        let (origin_x0y0, ray_x0y0) = Self::corner(projection_inverse, -1.0, -1.0);
        let (origin_x1y0, ray_x1y0) = Self::corner(projection_inverse, 1.0, -1.0);
        let (origin_x0y1, ray_x0y1) = Self::corner(projection_inverse, -1.0, 1.0);
        let (origin_x1y1, ray_x1y1) = Self::corner(projection_inverse, 1.0, 1.0);
        Self {
            origin_x0y0,
            origin_x1y0,
            origin_x0y1,
            origin_x1y1,
            ray_x0y0,
            ray_x1y0,
            ray_x0y1,
            ray_x1y1,
        }
    }

    pub fn origins(&self) -> [Vec3; 4] {
        [self.origin_x0y0, self.origin_x1y0, self.origin_x0y1, self.origin_x1y1]
    }

    pub fn rays(&self) -> [Vec3; 4] {
        [self.ray_x0y0, self.ray_x1y0, self.ray_x0y1, self.ray_x1y1]
    }

    fn corner(projection_inverse: &Mat4, x: f32, y: f32) -> (Vec3, Vec3) {
        let near = Self::unproject(projection_inverse, Vec4::new(x, y, -1.0, 1.0));
        let far = Self::unproject(projection_inverse, Vec4::new(x, y, 1.0, 1.0));
        let ray = (far - near) / (far.z - near.z);
        let origin = near - ray * near.z;
        (origin, ray)
    }

    fn unproject(projection_inverse: &Mat4, ndc: Vec4) -> Vec3 {
        let eye = *projection_inverse * ndc;
        eye.truncate() / eye.w
    }
}
