//! Triangle rasterization into a [`GBuffer`].

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::{gbuffer::GBufferPixel, Camera, GBuffer, Material, Mesh, Scene};

const W_CLIP_EPS: f32 = 1e-6;
const AREA_EPS: f32 = 1e-8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub triangles_submitted: u64,
    pub triangles_drawn: u64,
}

#[derive(Copy, Clone, Debug)]
struct ClipVert {
    clip: Vec4,
    world: Vec3,
    normal: Vec3,
}

impl ClipVert {
    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            clip: self.clip.lerp(other.clip, t),
            world: self.world.lerp(other.world, t),
            normal: self.normal.lerp(other.normal, t),
        }
    }

    // Signed distance to the near plane in clip space; >= 0 is inside.
    fn near_distance(&self) -> f32 {
        self.clip.z + self.clip.w
    }
}

#[derive(Copy, Clone, Debug)]
struct ScreenVert {
    p: Vec2,
    z: f32,
    inv_w: f32,
    world_w: Vec3,
    normal_w: Vec3,
}

fn to_screen(v: &ClipVert, width: usize, height: usize) -> ScreenVert {
    let inv_w = 1.0 / v.clip.w.max(W_CLIP_EPS);
    let ndc = v.clip.truncate() * inv_w;
    ScreenVert {
        p: Vec2::new(
            (ndc.x * 0.5 + 0.5) * width as f32,
            (1.0 - (ndc.y * 0.5 + 0.5)) * height as f32,
        ),
        z: ndc.z,
        inv_w,
        world_w: v.world * inv_w,
        normal_w: v.normal * inv_w,
    }
}

fn edge(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Sutherland-Hodgman against the near plane only; the other planes are
/// handled by the screen-space bounding box clamp.
fn clip_near(tri: [ClipVert; 3], out: &mut Vec<ClipVert>) {
    out.clear();
    for i in 0..3 {
        let a = tri[i];
        let b = tri[(i + 1) % 3];
        let da = a.near_distance();
        let db = b.near_distance();
        if da >= 0.0 {
            out.push(a);
        }
        if (da >= 0.0) != (db >= 0.0) {
            out.push(a.lerp(b, da / (da - db)));
        }
    }
}

fn draw_tri(gbuf: &mut GBuffer, s0: ScreenVert, s1: ScreenVert, s2: ScreenVert, material: &Material) -> bool {
    let area = edge(s0.p, s1.p, s2.p);
    if area.abs() < AREA_EPS {
        return false;
    }

    let w = gbuf.width() as f32;
    let h = gbuf.height() as f32;
    let min_x = s0.p.x.min(s1.p.x).min(s2.p.x).floor().max(0.0) as i64;
    let max_x = s0.p.x.max(s1.p.x).max(s2.p.x).ceil().min(w - 1.0) as i64;
    let min_y = s0.p.y.min(s1.p.y).min(s2.p.y).floor().max(0.0) as i64;
    let max_y = s0.p.y.max(s1.p.y).max(s2.p.y).ceil().min(h - 1.0) as i64;
    if min_x > max_x || min_y > max_y {
        return false;
    }

    let mut any = false;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let b0 = edge(s1.p, s2.p, sample) / area;
            let b1 = edge(s2.p, s0.p, sample) / area;
            let b2 = edge(s0.p, s1.p, sample) / area;
            if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                continue;
            }

            let depth = b0 * s0.z + b1 * s1.z + b2 * s2.z;
            if !(-1.0..=1.0).contains(&depth) {
                continue;
            }

            let denom = b0 * s0.inv_w + b1 * s1.inv_w + b2 * s2.inv_w;
            if denom.abs() <= AREA_EPS {
                continue;
            }
            let world = (s0.world_w * b0 + s1.world_w * b1 + s2.world_w * b2) / denom;
            let normal = ((s0.normal_w * b0 + s1.normal_w * b1 + s2.normal_w * b2) / denom).normalize_or_zero();

            any |= gbuf.try_write(
                x as usize,
                y as usize,
                GBufferPixel {
                    depth,
                    normal,
                    world_pos: world,
                    albedo: material.kd,
                },
            );
        }
    }
    any
}

fn raster_mesh(
    gbuf: &mut GBuffer,
    mesh: &Mesh,
    model: Mat4,
    normal_matrix: Mat3,
    view_proj: Mat4,
    material: &Material,
    stats: &mut RasterStats,
) {
    let has_normals = mesh.normals.len() == mesh.positions.len();
    let mut poly: Vec<ClipVert> = Vec::with_capacity(4);

    for tri in &mesh.indices {
        stats.triangles_submitted += 1;
        let [Some(p0), Some(p1), Some(p2)] = tri.map(|i| mesh.positions.get(i as usize).copied()) else {
            continue;
        };
        let world = [p0, p1, p2].map(|p| model.transform_point3(p));

        let face_normal = (world[1] - world[0]).cross(world[2] - world[0]).normalize_or_zero();
        let normals = if has_normals {
            tri.map(|i| (normal_matrix * mesh.normals[i as usize]).normalize_or_zero())
        } else {
            [face_normal; 3]
        };

        let verts = [0usize, 1, 2].map(|k| ClipVert {
            clip: view_proj * world[k].extend(1.0),
            world: world[k],
            normal: normals[k],
        });

        clip_near(verts, &mut poly);
        if poly.len() < 3 {
            continue;
        }

        let screen: Vec<ScreenVert> = poly
            .iter()
            .map(|v| to_screen(v, gbuf.width(), gbuf.height()))
            .collect();
        let mut drawn = false;
        for i in 1..screen.len() - 1 {
            drawn |= draw_tri(gbuf, screen[0], screen[i], screen[i + 1], material);
        }
        if drawn {
            stats.triangles_drawn += 1;
        }
    }
}

/// Rasterizes every object of `scene` as seen from `camera`. The G-buffer is
/// not cleared first.
pub fn render_to_gbuffer(scene: &Scene, camera: &Camera, gbuf: &mut GBuffer) -> RasterStats {
    let mut stats = RasterStats::default();
    if gbuf.width() == 0 || gbuf.height() == 0 {
        return stats;
    }
    let view_proj = camera.view_projection();
    for (mesh, material, transform) in scene.iter_objects() {
        raster_mesh(
            gbuf,
            mesh,
            transform.to_mat4(),
            transform.normal_matrix(),
            view_proj,
            material,
            &mut stats,
        );
    }
    stats
}
