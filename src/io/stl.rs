use glam::Vec3;
use thiserror::Error;

use crate::Mesh;

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum StlError {
    #[error("invalid stl: {0}")]
    InvalidFormat(&'static str),
    #[error("stl truncated: expected {expected} bytes, got {actual}")]
    UnexpectedEof { expected: usize, actual: usize },
}

fn read_vec3(buf: &[u8], off: usize) -> Vec3 {
    let f = |i: usize| {
        let at = off + i * 4;
        f32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
    };
    Vec3::new(f(0), f(1), f(2))
}

fn parse_binary(buf: &[u8]) -> Result<Mesh, StlError> {
    let count_bytes: [u8; 4] = buf
        .get(HEADER_LEN..HEADER_LEN + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or(StlError::InvalidFormat("missing triangle count"))?;
    let tri_count = u32::from_le_bytes(count_bytes) as usize;

    let expected = HEADER_LEN + 4 + tri_count * TRIANGLE_LEN;
    if buf.len() < expected {
        return Err(StlError::UnexpectedEof {
            expected,
            actual: buf.len(),
        });
    }

    let mut mesh = Mesh::new();
    mesh.positions.reserve(tri_count * 3);
    mesh.normals.reserve(tri_count * 3);
    mesh.indices.reserve(tri_count);

    let mut all_normals = true;
    for t in 0..tri_count {
        let off = HEADER_LEN + 4 + t * TRIANGLE_LEN;
        let n = read_vec3(buf, off);
        let base = (t * 3) as u32;
        for k in 0..3 {
            mesh.positions.push(read_vec3(buf, off + 12 + k * 12));
        }
        let n = n.normalize_or_zero();
        all_normals &= n != Vec3::ZERO && n.is_finite();
        mesh.normals.extend_from_slice(&[n; 3]);
        mesh.indices.push([base, base + 1, base + 2]);
    }

    if !all_normals {
        mesh.normals.clear();
    }
    mesh.ensure_normals();
    Ok(mesh)
}

fn parse_ascii(src: &str) -> Result<Mesh, StlError> {
    let mut verts: Vec<Vec3> = Vec::new();
    for line in src.lines() {
        let mut it = line.split_whitespace();
        if it.next() != Some("vertex") {
            continue;
        }
        let mut coord = || {
            it.next()
                .and_then(|s| s.parse::<f32>().ok())
                .ok_or(StlError::InvalidFormat("bad vertex line"))
        };
        verts.push(Vec3::new(coord()?, coord()?, coord()?));
    }

    if verts.len() % 3 != 0 {
        return Err(StlError::InvalidFormat("vertex count is not a multiple of three"));
    }

    let tri_count = verts.len() / 3;
    let mut mesh = Mesh::new().with_positions(verts);
    mesh.indices = (0..tri_count)
        .map(|i| {
            let b = (i * 3) as u32;
            [b, b + 1, b + 2]
        })
        .collect();
    mesh.ensure_normals();
    Ok(mesh)
}

/// Binary files may also start with `solid`, so ASCII is only assumed when
/// the payload is text that contains facets.
fn looks_ascii(bytes: &[u8]) -> Option<&str> {
    if !bytes.trim_ascii_start().starts_with(b"solid") {
        return None;
    }
    let s = std::str::from_utf8(bytes).ok()?;
    (s.contains("facet") && s.contains("vertex")).then_some(s)
}

pub fn parse_stl_bytes(bytes: &[u8]) -> Result<Mesh, StlError> {
    match looks_ascii(bytes) {
        Some(s) => parse_ascii(s),
        None => parse_binary(bytes),
    }
}

pub fn parse_stl_str(src: &str) -> Result<Mesh, StlError> {
    parse_ascii(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"
solid s
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
vertex 0 1 0
endloop
endfacet
endsolid
"#;

    fn binary(tris: &[[Vec3; 4]]) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_LEN];
        out.extend_from_slice(&(tris.len() as u32).to_le_bytes());
        for tri in tris {
            for v in tri {
                for c in v.to_array() {
                    out.extend_from_slice(&c.to_le_bytes());
                }
            }
            out.extend_from_slice(&[0, 0]);
        }
        out
    }

    #[test]
    fn ascii_triangle_parses() {
        let mesh = parse_stl_str(TRIANGLE).unwrap();
        assert_eq!(mesh.indices.len(), 1);
        assert_eq!(mesh.positions.len(), 3);
        mesh.assert_invariants();
        assert_eq!(parse_stl_bytes(TRIANGLE.as_bytes()).unwrap(), mesh);
    }

    #[test]
    fn binary_triangle_parses() {
        let bytes = binary(&[[Vec3::Z, Vec3::ZERO, Vec3::X, Vec3::Y]]);
        let mesh = parse_stl_bytes(&bytes).unwrap();
        mesh.assert_invariants();
        assert_eq!(mesh.positions, vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(mesh.normals, vec![Vec3::Z; 3]);
    }

    #[test]
    fn binary_without_normals_gets_computed_ones() {
        let bytes = binary(&[[Vec3::ZERO, Vec3::ZERO, Vec3::X, Vec3::Y]]);
        let mesh = parse_stl_bytes(&bytes).unwrap();
        assert!(mesh.normals.iter().all(|n| (*n - Vec3::Z).length() < 1e-5));
    }

    #[test]
    fn truncated_binary_is_rejected() {
        let mut bytes = binary(&[[Vec3::Z, Vec3::ZERO, Vec3::X, Vec3::Y]]);
        bytes.truncate(bytes.len() - 10);
        assert!(matches!(
            parse_stl_bytes(&bytes),
            Err(StlError::UnexpectedEof { expected: 134, actual: 124 })
        ));
        assert!(matches!(parse_stl_bytes(b"tiny"), Err(StlError::InvalidFormat(_))));
    }

    #[test]
    fn ascii_bytes_are_detected() {
        assert_eq!(parse_stl_bytes(TRIANGLE.as_bytes()).unwrap().triangle_count(), 1);
    }
}
