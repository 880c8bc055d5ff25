//! Viewport-aware framing: how far back the camera must sit so the subject
//! fills a chosen fraction of the frame without clipping.

use glam::Vec3;
use tracing::{debug, warn};

use crate::{BoundingBox, Camera};

/// Coverage used for loaded models.
pub const MODEL_COVERAGE: f32 = 0.90;
/// Coverage used for generated text.
pub const TEXT_COVERAGE: f32 = 0.80;

/// Extra distance added beyond the near plane when a fit lands inside it.
const NEAR_PLANE_MARGIN: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    /// Vertical field of view, strictly inside (0, 180).
    pub fov_y_degrees: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameFitRequest {
    pub bounds: BoundingBox,
    pub camera: CameraParams,
    /// Fraction in (0, 1] of the frustum cross-section the binding dimension
    /// should occupy.
    pub coverage: f32,
}

/// Which object dimension constrains the camera distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitAxis {
    Height,
    Width,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameFitResult {
    /// Distance from the object's center to the camera.
    pub distance: f32,
    /// Distance from the object's front face that satisfies the coverage.
    pub required_distance: f32,
    pub axis: FitAxis,
    /// Set when `distance` was pushed out past the near plane.
    pub clamped: bool,
}

impl FrameFitResult {
    /// Camera position on the +Z axis of `target`, facing -Z.
    pub fn camera_position(&self, target: Vec3) -> Vec3 {
        target + Vec3::Z * self.distance
    }
}

/// Height binds when the viewport is at least as wide (proportionally) as the
/// object. Objects with no height always fit by width.
pub fn select_axis(size: Vec3, viewport_aspect: f32) -> FitAxis {
    if size.y == 0.0 {
        return FitAxis::Width;
    }
    let object_aspect = size.x / size.y;
    if viewport_aspect >= object_aspect {
        FitAxis::Height
    } else {
        FitAxis::Width
    }
}

/// Computes the camera distance that frames `request.bounds`.
///
/// Returns `None` for zero-size bounds; the camera should be left alone.
///
/// # Panics
///
/// When the field of view is not strictly inside (0, 180) degrees, the aspect
/// is not a positive finite number, or coverage is outside (0, 1]. These are
/// caller errors and would otherwise produce an unusable camera.
pub fn solve(request: &FrameFitRequest) -> Option<FrameFitResult> {
    let size = request.bounds.size();
    if size == Vec3::ZERO {
        debug!("frame fit skipped: zero-size bounds");
        return None;
    }

    let CameraParams {
        fov_y_degrees,
        aspect,
        near,
        ..
    } = request.camera;
    let coverage = request.coverage;

    assert!(
        fov_y_degrees > 0.0 && fov_y_degrees < 180.0,
        "vertical fov must be inside (0, 180) degrees, got {fov_y_degrees}"
    );
    assert!(
        aspect.is_finite() && aspect > 0.0,
        "aspect must be positive, got {aspect}"
    );
    assert!(
        coverage > 0.0 && coverage <= 1.0,
        "coverage must be inside (0, 1], got {coverage}"
    );

    let half_v = fov_y_degrees.to_radians() * 0.5;
    let axis = select_axis(size, aspect);
    let required_distance = match axis {
        FitAxis::Height => (size.y / coverage / 2.0) / half_v.tan(),
        FitAxis::Width => {
            let h_fov = 2.0 * (half_v.tan() * aspect).atan();
            (size.x / coverage / 2.0) / (h_fov * 0.5).tan()
        }
    };

    let mut distance = required_distance + size.z / 2.0;
    let mut clamped = false;
    if distance < near {
        let pushed = near + size.z / 2.0 + NEAR_PLANE_MARGIN;
        warn!(
            distance,
            near,
            pushed,
            "subject too close to fit inside the near plane; pushing camera back"
        );
        distance = pushed;
        clamped = true;
    }

    Some(FrameFitResult {
        distance,
        required_distance,
        axis,
        clamped,
    })
}

/// Solves for `bounds` and moves `camera` onto the result, aimed at the
/// bounds center. Leaves the camera untouched for zero-size bounds.
///
/// The projection matrix is not recomputed here.
pub fn fit_camera(camera: &mut Camera, bounds: &BoundingBox, coverage: f32) -> Option<FrameFitResult> {
    let result = solve(&FrameFitRequest {
        bounds: *bounds,
        camera: camera.params(),
        coverage,
    })?;
    let center = bounds.center();
    camera.look_at(center);
    camera.position = result.camera_position(center);
    debug!(
        distance = result.distance,
        axis = ?result.axis,
        clamped = result.clamped,
        "camera framed"
    );
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WIDE: f32 = 1.777;

    fn request(size: Vec3, fov: f32, aspect: f32, coverage: f32) -> FrameFitRequest {
        FrameFitRequest {
            bounds: BoundingBox::from_center_size(Vec3::ZERO, size),
            camera: CameraParams {
                fov_y_degrees: fov,
                aspect,
                near: 0.1,
                far: 1000.0,
            },
            coverage,
        }
    }

    #[test]
    fn wide_object_in_wide_viewport_fits_by_width() {
        let r = solve(&request(Vec3::new(4.0, 2.0, 1.0), 75.0, WIDE, MODEL_COVERAGE)).unwrap();
        assert_eq!(r.axis, FitAxis::Width);

        let half_h = ((37.5f32).to_radians().tan() * WIDE).atan();
        let expected = (4.0 / 0.9 / 2.0) / half_h.tan();
        assert_relative_eq!(r.required_distance, expected, max_relative = 1e-5);
        assert_relative_eq!(r.distance, expected + 0.5, max_relative = 1e-5);
        // Width spans exactly `coverage` of the horizontal cross-section at the front face.
        assert_relative_eq!(2.0 / (r.required_distance * half_h.tan()), 0.9, max_relative = 1e-5);
        assert!(!r.clamped);
    }

    #[test]
    fn tall_object_fits_by_height() {
        let r = solve(&request(Vec3::new(2.0, 4.0, 0.5), 75.0, WIDE, MODEL_COVERAGE)).unwrap();
        assert_eq!(r.axis, FitAxis::Height);
        let expected = (4.0 / 0.9 / 2.0) / (37.5f32).to_radians().tan();
        assert_relative_eq!(r.required_distance, expected, max_relative = 1e-5);
        assert_relative_eq!(r.distance, expected + 0.25, max_relative = 1e-5);
    }

    #[test]
    fn flat_object_fits_by_width_without_dividing_by_zero() {
        let r = solve(&request(Vec3::new(5.0, 0.0, 0.0), 60.0, 1.0, MODEL_COVERAGE)).unwrap();
        assert_eq!(r.axis, FitAxis::Width);
        assert!(r.distance.is_finite());
        assert!(r.distance > 0.0);
    }

    #[test]
    fn equal_aspects_fit_by_height() {
        assert_eq!(select_axis(Vec3::new(3.0, 2.0, 1.0), 1.5), FitAxis::Height);
        let r = solve(&request(Vec3::new(3.0, 2.0, 1.0), 50.0, 1.5, 1.0)).unwrap();
        assert_eq!(r.axis, FitAxis::Height);
    }

    #[test]
    fn tiny_object_is_pushed_past_near_plane() {
        let size = Vec3::splat(0.01);
        let r = solve(&request(size, 75.0, WIDE, MODEL_COVERAGE)).unwrap();
        assert!(r.clamped);
        assert_relative_eq!(r.distance, 0.1 + 0.005 + 1.0, max_relative = 1e-6);
    }

    #[test]
    fn zero_size_is_a_no_op() {
        assert!(solve(&request(Vec3::ZERO, 75.0, WIDE, MODEL_COVERAGE)).is_none());

        let mut cam = Camera::new(75.0, WIDE, 0.1, 1000.0).with_position(Vec3::new(1.0, 2.0, 3.0));
        let before = cam;
        let point = BoundingBox::from_points([Vec3::new(4.0, 4.0, 4.0)]);
        assert!(fit_camera(&mut cam, &point, MODEL_COVERAGE).is_none());
        assert_eq!(cam, before);
    }

    #[test]
    fn solving_twice_is_identical() {
        let req = request(Vec3::new(1.3, 0.7, 2.2), 45.0, 0.8, TEXT_COVERAGE);
        assert_eq!(solve(&req), solve(&req));
    }

    #[test]
    fn fit_camera_aims_at_bounds_center() {
        let mut cam = Camera::new(75.0, 1.0, 0.1, 1000.0);
        let bounds = BoundingBox::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 2.0, 2.0));
        let r = fit_camera(&mut cam, &bounds, MODEL_COVERAGE).unwrap();
        assert_eq!(cam.target, bounds.center());
        assert_relative_eq!(cam.distance_to_target(), r.distance, max_relative = 1e-6);
        assert_relative_eq!(cam.forward().z, -1.0, epsilon = 1e-6);
    }

    #[test]
    #[should_panic(expected = "vertical fov")]
    fn zero_fov_fails_fast() {
        let _ = solve(&request(Vec3::ONE, 0.0, 1.0, 0.9));
    }

    #[test]
    #[should_panic(expected = "vertical fov")]
    fn straight_angle_fov_fails_fast() {
        let _ = solve(&request(Vec3::ONE, 180.0, 1.0, 0.9));
    }

    #[test]
    #[should_panic(expected = "coverage")]
    fn zero_coverage_fails_fast() {
        let _ = solve(&request(Vec3::ONE, 60.0, 1.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "aspect must be positive")]
    fn zero_aspect_fails_fast() {
        let _ = solve(&request(Vec3::ONE, 60.0, 0.0, 0.9));
    }

    #[test]
    #[should_panic(expected = "aspect must be positive")]
    fn nan_aspect_fails_fast() {
        let _ = solve(&request(Vec3::ONE, 60.0, f32::NAN, 0.9));
    }
}
