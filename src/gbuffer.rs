use glam::Vec3;

use crate::shader::SurfaceSample;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GBufferPixel {
    /// NDC depth in [-1, 1]; infinity when nothing was drawn.
    pub depth: f32,
    pub normal: Vec3,
    pub world_pos: Vec3,
    pub albedo: Vec3,
}

impl GBufferPixel {
    pub fn is_covered(&self) -> bool {
        self.depth.is_finite()
    }

    pub fn surface(&self) -> SurfaceSample {
        SurfaceSample {
            world_pos: self.world_pos,
            normal: self.normal,
            kd: self.albedo,
        }
    }
}

impl Default for GBufferPixel {
    fn default() -> Self {
        Self {
            depth: f32::INFINITY,
            normal: Vec3::ZERO,
            world_pos: Vec3::ZERO,
            albedo: Vec3::ZERO,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GBuffer {
    width: usize,
    height: usize,
    pixels: Vec<GBufferPixel>,
}

impl GBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![GBufferPixel::default(); width.saturating_mul(height)],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.pixels.fill(GBufferPixel::default());
    }

    pub fn as_slice(&self) -> &[GBufferPixel] {
        &self.pixels
    }

    /// Depth-tested write; returns whether the texel was replaced.
    pub fn try_write(&mut self, x: usize, y: usize, px: GBufferPixel) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = y * self.width + x;
        if px.depth < self.pixels[i].depth {
            self.pixels[i] = px;
            true
        } else {
            false
        }
    }

    pub fn at(&self, x: usize, y: usize) -> Option<GBufferPixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn covered_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_covered()).count()
    }

    /// Nearest and farthest covered depth, if anything was drawn.
    pub fn depth_range(&self) -> Option<(f32, f32)> {
        self.pixels
            .iter()
            .filter(|p| p.is_covered())
            .fold(None, |acc, p| match acc {
                None => Some((p.depth, p.depth)),
                Some((lo, hi)) => Some((lo.min(p.depth), hi.max(p.depth))),
            })
    }
}
