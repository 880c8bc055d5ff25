use glam::{Mat4, Vec3, Vec4};

use crate::fit::CameraParams;

pub const DEFAULT_FOV_Y_DEGREES: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;

/// Right-handed perspective matrix with OpenGL clip depth (-1..1).
pub fn perspective_matrix(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_radians).tan();
    let m00 = f / aspect;
    let m11 = f;
    let m22 = (far + near) / (near - far);
    let m23 = (2.0 * far * near) / (near - far);
    let m32 = -1.0;

    Mat4::from_cols(
        Vec4::new(m00, 0.0, 0.0, 0.0),
        Vec4::new(0.0, m11, 0.0, 0.0),
        Vec4::new(0.0, 0.0, m22, m32),
        Vec4::new(0.0, 0.0, m23, 0.0),
    )
}

/// Perspective camera looking at a fixed target.
///
/// The projection matrix is cached. Changing `aspect`, `fov_y_degrees`,
/// `near` or `far` has no effect on rendering until
/// [`update_projection_matrix`](Self::update_projection_matrix) runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Mat4,
}

impl Camera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees,
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn params(&self) -> CameraParams {
        CameraParams {
            fov_y_degrees: self.fov_y_degrees,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
    }

    pub fn fov_y_radians(&self) -> f32 {
        self.fov_y_degrees.to_radians()
    }

    pub fn fov_x_radians(&self) -> f32 {
        2.0 * ((self.fov_y_radians() * 0.5).tan() * self.aspect).atan()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Unit vector from the camera toward its target; -Z when they coincide.
    pub fn forward(&self) -> Vec3 {
        let d = self.target - self.position;
        if d.length_squared() > 1e-12 {
            d.normalize()
        } else {
            Vec3::NEG_Z
        }
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = perspective_matrix(self.fov_y_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        let up = if self.forward().cross(self.up).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_FOV_Y_DEGREES, 1.0, DEFAULT_NEAR, DEFAULT_FAR)
    }
}

#[cfg(test)]
mod tests {
    use super::{perspective_matrix, Camera};
    use approx::assert_relative_eq;
    use glam::{Vec3, Vec4};

    #[test]
    fn near_and_far_map_to_clip_bounds() {
        let m = perspective_matrix(60f32.to_radians(), 1.5, 0.5, 50.0);
        let n = m * Vec4::new(0.0, 0.0, -0.5, 1.0);
        let f = m * Vec4::new(0.0, 0.0, -50.0, 1.0);
        assert_relative_eq!(n.z / n.w, -1.0, epsilon = 1e-5);
        assert_relative_eq!(f.z / f.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn horizontal_fov_widens_with_aspect() {
        let cam = Camera::new(75.0, 2.0, 0.1, 100.0);
        let expected = 2.0 * ((37.5f32).to_radians().tan() * 2.0).atan();
        assert_relative_eq!(cam.fov_x_radians(), expected, epsilon = 1e-6);
        assert!(cam.fov_x_radians() > cam.fov_y_radians());
    }

    #[test]
    fn aspect_change_is_deferred_until_update() {
        let mut cam = Camera::new(75.0, 1.0, 0.1, 100.0);
        let before = cam.projection_matrix();
        cam.set_aspect(2.0);
        assert_eq!(cam.projection_matrix(), before);
        cam.update_projection_matrix();
        assert_ne!(cam.projection_matrix(), before);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = Camera::default().with_position(Vec3::new(1.0, 2.0, 6.0));
        let clip = cam.view_projection() * cam.target.extend(1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn straight_down_view_is_finite() {
        let cam = Camera::default().with_position(Vec3::new(0.0, 10.0, 0.0));
        assert!(cam.view_matrix().is_finite());
    }
}
