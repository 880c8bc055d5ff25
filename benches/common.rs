#![allow(dead_code)]

use framefit::{Mesh, Viewer, ViewerConfig, Viewport};

use glam::Vec3;

pub const COLS: usize = 200;
pub const ROWS: usize = 60;

/// A 4x4 grid of cubes merged into one subject, so raster and glyph work is
/// non-trivial but stable.
pub fn make_subject() -> Mesh {
    let grid = 4;
    let spacing = 1.1_f32;
    let mut mesh = Mesh::new();
    for y in 0..grid {
        for x in 0..grid {
            let tx = (x as f32 - (grid as f32 - 1.0) * 0.5) * spacing;
            let ty = (y as f32 - (grid as f32 - 1.0) * 0.5) * spacing;
            let c = Vec3::new(tx, ty, 0.0);
            mesh.append_cuboid(c - Vec3::splat(0.5), c + Vec3::splat(0.5));
        }
    }
    mesh
}

pub fn make_viewer() -> Viewer {
    let mut viewer = Viewer::with_viewport(ViewerConfig::default(), Viewport::new(COLS, ROWS, 0.5))
        .expect("default config is valid");
    viewer.on_object_ready(make_subject());
    viewer
}
