use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Quantizes a linear [0, 1] color, clamping out-of-range channels.
    pub fn from_unit(rgb: Vec3) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        Self::new(q(rgb.x), q(rgb.y), q(rgb.z))
    }

    pub fn to_le_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}
