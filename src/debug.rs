use glam::Vec3;
use serde::Deserialize;

use crate::{
    gbuffer::GBufferPixel,
    shader::{BuiltinShader, Shader},
    Light,
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugView {
    #[default]
    Final,
    Depth,
    Normals,
}

impl DebugView {
    pub fn as_str(self) -> &'static str {
        match self {
            DebugView::Final => "final",
            DebugView::Depth => "depth",
            DebugView::Normals => "normals",
        }
    }

    pub fn parse(s: &str) -> Option<DebugView> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "final" => DebugView::Final,
            "depth" => DebugView::Depth,
            "normals" | "normal" => DebugView::Normals,
            _ => return None,
        })
    }
}

/// Per-frame inputs shared by every texel.
#[derive(Clone, Copy, Debug)]
pub struct ViewInputs<'a> {
    pub view: DebugView,
    pub shader: &'a BuiltinShader,
    pub lights: &'a [Light],
    /// Nearest and farthest covered NDC depth in the frame.
    pub depth_range: (f32, f32),
}

/// 1 at `near`, 0 at `far`. An empty range is fully bright.
pub fn depth_intensity(depth: f32, (near, far): (f32, f32)) -> f32 {
    let span = far - near;
    if !(span > 1e-9) {
        return 1.0;
    }
    (1.0 - (depth - near) / span).clamp(0.0, 1.0)
}

/// Color of a covered texel.
pub fn rgb_for_view(inputs: &ViewInputs<'_>, px: &GBufferPixel) -> Vec3 {
    match inputs.view {
        DebugView::Final => inputs.shader.shade_rgb(&px.surface(), inputs.lights),
        DebugView::Depth => Vec3::splat(depth_intensity(px.depth, inputs.depth_range)),
        DebugView::Normals => (px.normal + Vec3::ONE) * 0.5,
    }
}

/// Brightness in [0, 1] used to pick the glyph.
pub fn scalar_for_view(inputs: &ViewInputs<'_>, px: &GBufferPixel) -> f32 {
    match inputs.view {
        DebugView::Final => inputs.shader.shade(&px.surface(), inputs.lights).intensity,
        DebugView::Depth => depth_intensity(px.depth, inputs.depth_range),
        DebugView::Normals => (0.5 + 0.5 * px.normal.z).clamp(0.0, 1.0),
    }
}
