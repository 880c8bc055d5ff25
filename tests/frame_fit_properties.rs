use framefit::{solve, BoundingBox, CameraParams, FitAxis, FrameFitRequest};
use glam::Vec3;
use proptest::prelude::*;

fn request(size: Vec3, center: Vec3, fov: f32, aspect: f32, near: f32, coverage: f32) -> FrameFitRequest {
    FrameFitRequest {
        bounds: BoundingBox::from_center_size(center, size),
        camera: CameraParams {
            fov_y_degrees: fov,
            aspect,
            near,
            far: 1.0e9,
        },
        coverage,
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-3 * a.abs().max(b.abs()).max(1.0)
}

fn size_strategy() -> impl Strategy<Value = Vec3> {
    (0.01f32..1000.0, 0.01f32..1000.0, 0.0f32..1000.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn distance_never_inside_near_plane(
        size in size_strategy(),
        fov in 1.0f32..179.0,
        aspect in 0.1f32..10.0,
        near in 0.001f32..50.0,
        coverage in 0.05f32..=1.0,
    ) {
        let fit = solve(&request(size, Vec3::ZERO, fov, aspect, near, coverage)).unwrap();
        prop_assert!(fit.distance >= near);
        prop_assert!(fit.distance.is_finite());
        if fit.clamped {
            prop_assert!(close(fit.distance, near + size.z / 2.0 + 1.0));
        } else {
            prop_assert!(close(fit.distance, fit.required_distance + size.z / 2.0));
        }
    }

    #[test]
    fn front_face_fits_and_binding_side_fills_coverage(
        size in size_strategy(),
        fov in 1.0f32..179.0,
        aspect in 0.1f32..10.0,
        coverage in 0.05f32..=1.0,
    ) {
        let fit = solve(&request(size, Vec3::ZERO, fov, aspect, 0.0001, coverage)).unwrap();
        let half_tan = (fov.to_radians() / 2.0).tan();
        let visible_h = 2.0 * fit.required_distance * half_tan;
        let visible_w = visible_h * aspect;

        prop_assert!(size.y <= coverage * visible_h * (1.0 + 1e-3));
        prop_assert!(size.x <= coverage * visible_w * (1.0 + 1e-3));
        match fit.axis {
            FitAxis::Height => prop_assert!(close(size.y, coverage * visible_h)),
            FitAxis::Width => prop_assert!(close(size.x, coverage * visible_w)),
        }
    }

    #[test]
    fn axis_follows_aspect_comparison(
        size in size_strategy(),
        aspect in 0.1f32..10.0,
    ) {
        let fit = solve(&request(size, Vec3::ZERO, 60.0, aspect, 0.1, 0.9)).unwrap();
        let expected = if aspect >= size.x / size.y { FitAxis::Height } else { FitAxis::Width };
        prop_assert_eq!(fit.axis, expected);
    }

    #[test]
    fn solving_is_idempotent_and_position_independent(
        eighths in (1u32..8000, 1u32..8000, 0u32..8000),
        center in (-1000i32..1000, -1000i32..1000, -1000i32..1000),
        fov in 1.0f32..179.0,
        aspect in 0.1f32..10.0,
        coverage in 0.05f32..=1.0,
    ) {
        // Sizes in eighths and integer centers keep every corner exact.
        let size = Vec3::new(eighths.0 as f32, eighths.1 as f32, eighths.2 as f32) / 8.0;
        let center = Vec3::new(center.0 as f32, center.1 as f32, center.2 as f32);
        let at_origin = request(size, Vec3::ZERO, fov, aspect, 0.1, coverage);
        let first = solve(&at_origin).unwrap();
        prop_assert_eq!(solve(&at_origin).unwrap(), first);
        prop_assert_eq!(solve(&request(size, center, fov, aspect, 0.1, coverage)).unwrap(), first);
    }
}

#[test]
fn zero_size_bounds_are_a_no_op() {
    for center in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0)] {
        assert_eq!(solve(&request(Vec3::ZERO, center, 75.0, 1.5, 0.1, 0.9)), None);
    }
}
