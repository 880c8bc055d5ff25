use glam::Vec3;
use thiserror::Error;

use crate::bounds::{BoundingBox, BoundsProvider};

pub type Tri = [u32; 3];

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MeshValidationError {
    #[error("position_not_finite:{index}")]
    PositionNotFinite { index: usize },
    #[error("normal_not_finite:{index}")]
    NormalNotFinite { index: usize },
    #[error("normals_len_mismatch:{normals}:{positions}")]
    NormalsLenMismatch { normals: usize, positions: usize },
    #[error("tri_oob:{tri}:{index}:{vertex_count}")]
    TriangleIndexOutOfBounds {
        tri: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Indexed triangle mesh. `normals` is either empty or one per position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<Tri>,
    pub normals: Vec<Vec3>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_positions(mut self, positions: Vec<Vec3>) -> Self {
        self.positions = positions;
        self
    }

    pub fn with_indices(mut self, indices: Vec<Tri>) -> Self {
        self.indices = indices;
        self
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    pub fn push_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push([i0, i1, i2]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    pub fn unit_cube() -> Self {
        Self::cuboid(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    /// Box between `min` and `max` with flat per-face normals (24 vertices).
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let mut mesh = Self::new();
        mesh.append_cuboid(min, max);
        mesh
    }

    pub fn append_cuboid(&mut self, min: Vec3, max: Vec3) {
        let (a, b) = (min.min(max), min.max(max));
        // (normal, four corners counter-clockwise seen from outside)
        let faces = [
            (
                Vec3::Z,
                [
                    Vec3::new(a.x, a.y, b.z),
                    Vec3::new(b.x, a.y, b.z),
                    Vec3::new(b.x, b.y, b.z),
                    Vec3::new(a.x, b.y, b.z),
                ],
            ),
            (
                Vec3::NEG_Z,
                [
                    Vec3::new(b.x, a.y, a.z),
                    Vec3::new(a.x, a.y, a.z),
                    Vec3::new(a.x, b.y, a.z),
                    Vec3::new(b.x, b.y, a.z),
                ],
            ),
            (
                Vec3::X,
                [
                    Vec3::new(b.x, a.y, b.z),
                    Vec3::new(b.x, a.y, a.z),
                    Vec3::new(b.x, b.y, a.z),
                    Vec3::new(b.x, b.y, b.z),
                ],
            ),
            (
                Vec3::NEG_X,
                [
                    Vec3::new(a.x, a.y, a.z),
                    Vec3::new(a.x, a.y, b.z),
                    Vec3::new(a.x, b.y, b.z),
                    Vec3::new(a.x, b.y, a.z),
                ],
            ),
            (
                Vec3::Y,
                [
                    Vec3::new(a.x, b.y, b.z),
                    Vec3::new(b.x, b.y, b.z),
                    Vec3::new(b.x, b.y, a.z),
                    Vec3::new(a.x, b.y, a.z),
                ],
            ),
            (
                Vec3::NEG_Y,
                [
                    Vec3::new(a.x, a.y, a.z),
                    Vec3::new(b.x, a.y, a.z),
                    Vec3::new(b.x, a.y, b.z),
                    Vec3::new(a.x, a.y, b.z),
                ],
            ),
        ];

        if self.normals.len() != self.positions.len() {
            self.ensure_normals();
        }
        for (n, quad) in faces {
            let base = self.positions.len() as u32;
            self.positions.extend_from_slice(&quad);
            self.normals.extend_from_slice(&[n; 4]);
            self.indices.push([base, base + 1, base + 2]);
            self.indices.push([base, base + 2, base + 3]);
        }
    }

    /// Appends `other`, re-basing its indices.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.positions.len() as u32;
        let normals_ok = self.normals.len() == self.positions.len()
            && other.normals.len() == other.positions.len();
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(
            other
                .indices
                .iter()
                .map(|t| [t[0] + base, t[1] + base, t[2] + base]),
        );
        if normals_ok {
            self.normals.extend_from_slice(&other.normals);
        } else {
            self.normals.clear();
            self.ensure_normals();
        }
    }

    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Moves the mesh so its bounding box is centered on the origin and returns
    /// the offset that was applied.
    pub fn recenter(&mut self) -> Vec3 {
        let offset = -self.compute_bounds().center();
        self.translate(offset);
        offset
    }

    pub fn validate_basic(&self) -> Result<(), MeshValidationError> {
        for (i, p) in self.positions.iter().enumerate() {
            if !p.is_finite() {
                return Err(MeshValidationError::PositionNotFinite { index: i });
            }
        }

        if !self.normals.is_empty() && self.normals.len() != self.positions.len() {
            return Err(MeshValidationError::NormalsLenMismatch {
                normals: self.normals.len(),
                positions: self.positions.len(),
            });
        }

        for (i, n) in self.normals.iter().enumerate() {
            if !n.is_finite() {
                return Err(MeshValidationError::NormalNotFinite { index: i });
            }
        }

        let vc = self.positions.len();
        for (ti, t) in self.indices.iter().enumerate() {
            for &ix in t.iter() {
                if ix as usize >= vc {
                    return Err(MeshValidationError::TriangleIndexOutOfBounds {
                        tri: ti,
                        index: ix,
                        vertex_count: vc,
                    });
                }
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        if let Err(e) = self.validate_basic() {
            panic!("{e:?}");
        }
    }

    /// Fills missing normals with angle-weighted face normals. Existing normals
    /// are renormalized.
    pub fn ensure_normals(&mut self) {
        if self.positions.is_empty() {
            self.normals.clear();
            return;
        }

        if self.normals.len() == self.positions.len() {
            for n in &mut self.normals {
                *n = n.normalize_or_zero();
            }
            return;
        }

        fn angle(u: Vec3, v: Vec3) -> f32 {
            let uu = u.normalize_or_zero();
            let vv = v.normalize_or_zero();
            let dot = uu.dot(vv).clamp(-1.0, 1.0);
            uu.cross(vv).length().atan2(dot)
        }

        let len = self.positions.len();
        let mut acc = vec![Vec3::ZERO; len];

        for &[i0, i1, i2] in &self.indices {
            let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);
            if i0 >= len || i1 >= len || i2 >= len {
                continue;
            }

            let a = self.positions[i0];
            let b = self.positions[i1];
            let c = self.positions[i2];

            let face = (b - a).cross(c - a).normalize_or_zero();
            if face == Vec3::ZERO {
                continue;
            }

            acc[i0] += face * angle(b - a, c - a);
            acc[i1] += face * angle(c - b, a - b);
            acc[i2] += face * angle(a - c, b - c);
        }

        self.normals = acc.into_iter().map(Vec3::normalize_or_zero).collect();
    }
}

impl BoundsProvider for Mesh {
    fn compute_bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::{Mesh, MeshValidationError};
    use crate::bounds::BoundsProvider;
    use glam::Vec3;

    fn triangle() -> Mesh {
        Mesh::new()
            .with_positions(vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.0, 0.5, 0.0),
            ])
            .with_indices(vec![[0, 1, 2]])
    }

    #[test]
    fn cube_invariants_and_bounds() {
        let m = Mesh::unit_cube();
        m.assert_invariants();
        assert_eq!(m.positions.len(), 24);
        assert_eq!(m.triangle_count(), 12);
        assert_eq!(m.compute_bounds().size(), Vec3::ONE);
    }

    #[test]
    fn cube_faces_wind_outward() {
        let m = Mesh::unit_cube();
        for t in &m.indices {
            let [a, b, c] = t.map(|i| m.positions[i as usize]);
            let n = (b - a).cross(c - a).normalize();
            assert!(n.dot(m.normals[t[0] as usize]) > 0.99);
        }
    }

    #[test]
    fn ensure_normals_triangle_faces_z() {
        let mut m = triangle();
        m.ensure_normals();
        assert_eq!(m.normals.len(), m.positions.len());
        for n in &m.normals {
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.z > 0.9);
        }
    }

    #[test]
    fn recenter_moves_bounds_to_origin() {
        let mut m = Mesh::cuboid(Vec3::new(2.0, 3.0, 4.0), Vec3::new(4.0, 7.0, 5.0));
        let offset = m.recenter();
        assert_eq!(offset, Vec3::new(-3.0, -5.0, -4.5));
        let b = m.compute_bounds();
        assert!(b.center().length() < 1e-6);
        assert_eq!(b.size(), Vec3::new(2.0, 4.0, 1.0));
    }

    #[test]
    fn append_rebases_indices() {
        let mut m = Mesh::unit_cube();
        m.append(&Mesh::cuboid(Vec3::splat(1.0), Vec3::splat(2.0)));
        m.assert_invariants();
        assert_eq!(m.triangle_count(), 24);
        assert_eq!(m.compute_bounds().max, Vec3::splat(2.0));
    }

    #[test]
    fn validate_rejects_oob_indices() {
        let mut m = triangle();
        m.indices = vec![[0, 1, 3]];
        assert!(matches!(
            m.validate_basic(),
            Err(MeshValidationError::TriangleIndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn empty_mesh_has_degenerate_bounds() {
        assert!(Mesh::new().compute_bounds().is_degenerate());
    }
}
