use glam::Vec3;

/// Diffuse surface color of the subject.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub kd: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self { kd: Vec3::splat(0.8) }
    }
}
