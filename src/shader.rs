use glam::Vec3;
use serde::Deserialize;

use crate::Light;

/// One G-buffer texel as the shader sees it.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceSample {
    pub world_pos: Vec3,
    pub normal: Vec3,
    pub kd: Vec3,
}

#[derive(Clone, Copy, Debug)]
pub struct ShadeSample {
    pub intensity: f32,
    pub rgb: Vec3,
}

pub trait Shader {
    fn shade_rgb(&self, surface: &SurfaceSample, lights: &[Light]) -> Vec3;

    fn shade(&self, surface: &SurfaceSample, lights: &[Light]) -> ShadeSample {
        let rgb = self.shade_rgb(surface, lights);
        ShadeSample {
            intensity: luma(rgb).clamp(0.0, 1.0),
            rgb,
        }
    }
}

pub fn luma(rgb: Vec3) -> f32 {
    0.2126 * rgb.x + 0.7152 * rgb.y + 0.0722 * rgb.z
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderId {
    #[default]
    Lambert,
    Unlit,
}

impl ShaderId {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "lambert" | "lit" => ShaderId::Lambert,
            "unlit" => ShaderId::Unlit,
            _ => return None,
        })
    }
}

/// Diffuse shading. Surfaces are treated as double-sided.
#[derive(Clone, Copy, Debug)]
pub struct LambertShader {
    /// Used only when the light list is empty.
    pub fallback_dir: Vec3,
    pub fallback_ambient: f32,
}

impl Default for LambertShader {
    fn default() -> Self {
        Self {
            fallback_dir: Vec3::new(0.2, 0.4, 1.0).normalize(),
            fallback_ambient: 0.15,
        }
    }
}

impl Shader for LambertShader {
    fn shade_rgb(&self, s: &SurfaceSample, lights: &[Light]) -> Vec3 {
        let n = s.normal.normalize_or_zero();

        if lights.is_empty() {
            let ndotl = n.dot(self.fallback_dir).abs();
            let a = self.fallback_ambient;
            return s.kd * (a + (1.0 - a) * ndotl);
        }

        let mut out = Vec3::ZERO;
        for light in lights {
            out += s.kd * light.ambient_radiance();
            let Some((l, radiance)) = light.incident(s.world_pos) else {
                continue;
            };
            let ndotl = n.dot(l).abs();
            out += s.kd * ndotl * radiance;
        }
        out
    }
}

#[derive(Clone, Copy, Debug)]
pub struct UnlitShader;

impl Shader for UnlitShader {
    fn shade_rgb(&self, s: &SurfaceSample, _lights: &[Light]) -> Vec3 {
        s.kd
    }
}

#[derive(Clone, Copy, Debug)]
pub enum BuiltinShader {
    Lambert(LambertShader),
    Unlit(UnlitShader),
}

impl BuiltinShader {
    pub fn from_id(id: ShaderId) -> Self {
        match id {
            ShaderId::Lambert => BuiltinShader::Lambert(LambertShader::default()),
            ShaderId::Unlit => BuiltinShader::Unlit(UnlitShader),
        }
    }

    pub fn id(&self) -> ShaderId {
        match self {
            BuiltinShader::Lambert(_) => ShaderId::Lambert,
            BuiltinShader::Unlit(_) => ShaderId::Unlit,
        }
    }
}

impl Shader for BuiltinShader {
    fn shade_rgb(&self, s: &SurfaceSample, lights: &[Light]) -> Vec3 {
        match self {
            BuiltinShader::Lambert(sh) => sh.shade_rgb(s, lights),
            BuiltinShader::Unlit(sh) => sh.shade_rgb(s, lights),
        }
    }
}
