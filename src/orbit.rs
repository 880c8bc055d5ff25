//! Orbit controls: rotate the camera around its target on a sphere and zoom
//! along the view ray.

use glam::{Quat, Vec3};

use crate::Camera;

const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OrbitInput {
    /// Radians around the world Y axis.
    Yaw(f32),
    /// Radians up (+) or down (-), clamped short of the poles.
    Pitch(f32),
    /// Distance multiplier; < 1 moves closer.
    Zoom(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    pub rotate_step: f32,
    pub zoom_step: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate_step: 10f32.to_radians(),
            zoom_step: 1.1,
        }
    }
}

impl OrbitControls {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Moves `camera` and returns whether anything changed.
    pub fn apply(&self, camera: &mut Camera, input: OrbitInput) -> bool {
        if !self.enabled {
            return false;
        }
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }

        let new_offset = match input {
            OrbitInput::Yaw(angle) => Quat::from_rotation_y(angle) * offset,
            OrbitInput::Pitch(angle) => {
                let dir = offset / radius;
                let pitch = dir.y.clamp(-1.0, 1.0).asin();
                let target = (pitch + angle).clamp(-MAX_PITCH, MAX_PITCH);
                let applied = target - pitch;
                if applied.abs() < 1e-6 {
                    return false;
                }
                let mut right = Vec3::Y.cross(dir);
                if right.length_squared() < 1e-8 {
                    right = Vec3::X;
                }
                // Rotating about `right` toward +Y raises the camera.
                Quat::from_axis_angle(right.normalize(), -applied) * offset
            }
            OrbitInput::Zoom(factor) => {
                if !(factor > 0.0) || !factor.is_finite() {
                    return false;
                }
                // Clamp only in the direction of travel.
                let min = camera.near * 2.0;
                let max = camera.far * 0.5;
                let next = radius * factor;
                let next = if factor < 1.0 {
                    next.max(min.min(radius))
                } else {
                    next.min(max.max(radius))
                };
                offset / radius * next
            }
        };

        if new_offset == offset {
            return false;
        }
        camera.position = camera.target + new_offset;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{OrbitControls, OrbitInput, MAX_PITCH};
    use crate::Camera;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn cam() -> Camera {
        Camera::new(75.0, 1.0, 0.1, 100.0).with_position(Vec3::new(0.0, 0.0, 5.0))
    }

    #[test]
    fn yaw_keeps_distance() {
        let mut c = cam();
        assert!(OrbitControls::default().apply(&mut c, OrbitInput::Yaw(1.0)));
        assert_relative_eq!(c.distance_to_target(), 5.0, epsilon = 1e-5);
        assert!(c.position.x.abs() > 1.0);
    }

    #[test]
    fn pitch_up_raises_camera_and_stops_at_pole() {
        let mut c = cam();
        let orbit = OrbitControls::default();
        assert!(orbit.apply(&mut c, OrbitInput::Pitch(0.3)));
        assert!(c.position.y > 0.0);
        for _ in 0..20 {
            orbit.apply(&mut c, OrbitInput::Pitch(0.5));
        }
        let pitch = (c.position.y / c.distance_to_target()).asin();
        assert!(pitch <= MAX_PITCH + 1e-4);
        assert_relative_eq!(c.distance_to_target(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn zoom_respects_near_plane() {
        let mut c = cam();
        let orbit = OrbitControls::default();
        for _ in 0..200 {
            orbit.apply(&mut c, OrbitInput::Zoom(0.5));
        }
        assert!(c.distance_to_target() >= c.near * 2.0 - 1e-6);
    }

    #[test]
    fn zoom_out_beyond_far_limit_never_moves_closer() {
        let mut c = Camera::new(75.0, 1.0, 0.1, 1000.0).with_position(Vec3::new(0.0, 0.0, 600.0));
        OrbitControls::default().apply(&mut c, OrbitInput::Zoom(1.1));
        assert!(c.distance_to_target() >= 600.0 - 1e-3, "moved in to {}", c.distance_to_target());
    }

    #[test]
    fn zoom_in_inside_near_limit_never_moves_farther() {
        let mut c = Camera::new(75.0, 1.0, 5.0, 100.0).with_position(Vec3::new(0.0, 0.0, 6.0));
        OrbitControls::default().apply(&mut c, OrbitInput::Zoom(1.0 / 1.1));
        assert!(c.distance_to_target() <= 6.0 + 1e-4, "moved out to {}", c.distance_to_target());
    }

    #[test]
    fn zoom_scales_distance_inside_limits() {
        let mut c = cam();
        assert!(OrbitControls::default().apply(&mut c, OrbitInput::Zoom(1.1)));
        assert_relative_eq!(c.distance_to_target(), 5.5, epsilon = 1e-4);
    }

    #[test]
    fn disabled_controls_do_nothing() {
        let mut c = cam();
        let before = c;
        assert!(!OrbitControls::disabled().apply(&mut c, OrbitInput::Yaw(1.0)));
        assert_eq!(c, before);
    }
}
