use glam::Vec3;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: Vec3,
        intensity: f32,
    },
    /// `direction` is the direction light travels, in world space.
    Directional {
        direction: Vec3,
        color: Vec3,
        intensity: f32,
    },
    Point {
        position: Vec3,
        color: Vec3,
        intensity: f32,
    },
}

impl Light {
    pub fn ambient(color: Vec3, intensity: f32) -> Self {
        Self::Ambient { color, intensity }
    }

    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self::Directional {
            direction,
            color,
            intensity,
        }
    }

    pub fn point(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self::Point {
            position,
            color,
            intensity,
        }
    }

    /// Unit vector toward the light and the radiance reaching `world_pos`, or
    /// `None` for ambient lights and lights that contribute nothing.
    pub fn incident(&self, world_pos: Vec3) -> Option<(Vec3, Vec3)> {
        match *self {
            Light::Ambient { .. } => None,
            Light::Directional {
                direction,
                color,
                intensity,
            } => {
                let l = (-direction).normalize_or_zero();
                let radiance = color.max(Vec3::ZERO) * intensity.max(0.0);
                (l != Vec3::ZERO && radiance != Vec3::ZERO).then_some((l, radiance))
            }
            Light::Point {
                position,
                color,
                intensity,
            } => {
                let to_light = position - world_pos;
                let dist_sq = to_light.length_squared();
                if dist_sq <= 1e-6 {
                    return None;
                }
                let l = to_light * dist_sq.sqrt().recip();
                // Inverse-square falloff, normalized so the light is at full
                // strength one unit away.
                let radiance = color.max(Vec3::ZERO) * intensity.max(0.0) * dist_sq.max(1.0).recip();
                (radiance != Vec3::ZERO).then_some((l, radiance))
            }
        }
    }

    pub fn ambient_radiance(&self) -> Vec3 {
        match *self {
            Light::Ambient { color, intensity } => color.max(Vec3::ZERO) * intensity.max(0.0),
            _ => Vec3::ZERO,
        }
    }
}

/// Named light rigs for the two subject kinds plus an unlit fallback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingPreset {
    /// Soft ambient, a key light from the upper front-right and a point fill.
    #[default]
    Studio,
    /// Strong frontal light so extruded letter faces read clearly.
    Text,
    /// Ambient only.
    Flat,
}

impl LightingPreset {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "studio" | "model" => LightingPreset::Studio,
            "text" => LightingPreset::Text,
            "flat" | "none" => LightingPreset::Flat,
            _ => return None,
        })
    }

    /// Lights scaled to a subject of the given radius centered on the origin.
    pub fn lights(self, subject_radius: f32) -> Vec<Light> {
        let r = subject_radius.max(1.0);
        match self {
            LightingPreset::Studio => vec![
                Light::ambient(Vec3::ONE, 0.25),
                Light::directional(Vec3::new(-0.5, -0.8, -0.6), Vec3::ONE, 0.9),
                Light::point(Vec3::new(-2.0 * r, 0.5 * r, 2.0 * r), Vec3::ONE, 0.5 * r * r),
            ],
            LightingPreset::Text => vec![
                Light::ambient(Vec3::ONE, 0.3),
                Light::directional(Vec3::new(-0.2, -0.3, -1.0), Vec3::ONE, 0.8),
            ],
            LightingPreset::Flat => vec![Light::ambient(Vec3::ONE, 1.0)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Light, LightingPreset};
    use glam::Vec3;

    #[test]
    fn directional_points_against_travel() {
        let l = Light::directional(Vec3::NEG_Z, Vec3::ONE, 1.0);
        let (dir, rad) = l.incident(Vec3::ZERO).unwrap();
        assert_eq!(dir, Vec3::Z);
        assert_eq!(rad, Vec3::ONE);
    }

    #[test]
    fn point_light_falls_off() {
        let l = Light::point(Vec3::new(0.0, 0.0, 4.0), Vec3::ONE, 1.0);
        let (_, near) = l.incident(Vec3::new(0.0, 0.0, 2.0)).unwrap();
        let (_, far) = l.incident(Vec3::ZERO).unwrap();
        assert!(near.x > far.x);
    }

    #[test]
    fn ambient_has_no_direction() {
        let l = Light::ambient(Vec3::ONE, 0.5);
        assert!(l.incident(Vec3::ZERO).is_none());
        assert_eq!(l.ambient_radiance(), Vec3::splat(0.5));
    }

    #[test]
    fn preset_parse() {
        assert_eq!(LightingPreset::parse("Studio"), Some(LightingPreset::Studio));
        assert_eq!(LightingPreset::parse("none"), Some(LightingPreset::Flat));
        assert_eq!(LightingPreset::parse("disco"), None);
    }

    #[test]
    fn flat_preset_is_ambient_only() {
        let lights = LightingPreset::Flat.lights(3.0);
        assert!(lights.iter().all(|l| matches!(l, Light::Ambient { .. })));
    }
}
